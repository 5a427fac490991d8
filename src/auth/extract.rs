use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::db::users;
use crate::error::AppError;
use crate::models::{Role, User};
use crate::state::AppState;

/// Authenticated caller, resolved to the local user record.
///
/// Verifies the `Authorization: Bearer <token>` header through the
/// configured [`TokenVerifier`](crate::auth::TokenVerifier) and looks the
/// identity up by provider uid, creating a `student` record on first sight.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthorized("Invalid Authorization format. Expected: Bearer <token>".to_string())
        })?;

        let identity = state.verifier.verify(token).await?;

        let user = match users::find_user_by_firebase_uid(&state.db, &identity.uid).await? {
            Some(user) => user,
            None => {
                let email = identity.email.unwrap_or_default();
                let name = identity
                    .name
                    .unwrap_or_else(|| email.split('@').next().unwrap_or("Learner").to_string());
                users::insert_user(
                    &state.db,
                    &identity.uid,
                    &name,
                    &email,
                    identity.picture.as_deref(),
                )
                .await?
            }
        };

        Ok(AuthUser(user))
    }
}

/// Requires role `instructor` or `admin`. Rejects with 403 otherwise.
///
/// Note the policy is role-only: ownership of the targeted course is not
/// checked anywhere on the authoring surface.
#[derive(Debug)]
pub struct RequireInstructor(pub User);

impl FromRequestParts<AppState> for RequireInstructor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.role.can_author() {
            return Err(AppError::Forbidden(
                "Instructor or admin role required".to_string(),
            ));
        }
        Ok(RequireInstructor(user))
    }
}

/// Requires the `admin` role. Rejects with 403 otherwise.
pub struct RequireAdmin(pub User);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            return Err(AppError::Forbidden("Admin role required".to_string()));
        }
        Ok(RequireAdmin(user))
    }
}
