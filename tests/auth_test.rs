mod common;

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::Request;
use axum::http::request::Parts;

use backend::auth::{AuthUser, RequireAdmin, RequireInstructor, StaticTokenVerifier, VerifiedIdentity};
use backend::db::users;
use backend::error::AppError;
use backend::media::NoopMediaStore;
use backend::models::Role;
use backend::state::AppState;

fn parts_with_token(token: &str) -> Parts {
    let request = Request::builder()
        .header("authorization", format!("Bearer {token}"))
        .body(())
        .expect("Failed to build request");
    request.into_parts().0
}

async fn state_with_tokens() -> AppState {
    let db = common::setup_db().await;
    let verifier = StaticTokenVerifier::new().with_token(
        "tok-grace",
        VerifiedIdentity {
            uid: "uid-grace".to_string(),
            name: Some("Grace".to_string()),
            email: Some("grace@example.com".to_string()),
            picture: None,
        },
    );

    common::test_state(db, Arc::new(NoopMediaStore), Arc::new(verifier))
}

#[tokio::test]
async fn first_sight_creates_a_student_once() {
    let state = state_with_tokens().await;

    let mut parts = parts_with_token("tok-grace");
    let AuthUser(user) = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .expect("auth must succeed");

    assert_eq!(user.role, Role::Student);
    assert_eq!(user.name, "Grace");
    assert_eq!(user.firebase_uid.as_deref(), Some("uid-grace"));

    // Second request resolves the same record, no duplicate.
    let mut parts = parts_with_token("tok-grace");
    let AuthUser(again) = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .expect("auth must succeed");
    assert_eq!(again.id, user.id);

    let all = users::fetch_users(&state.db).await.expect("fetch failed");
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn missing_or_unknown_token_is_unauthorized() {
    let state = state_with_tokens().await;

    let request = Request::builder().body(()).expect("Failed to build request");
    let mut parts = request.into_parts().0;
    let err = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .expect_err("missing header must fail");
    assert!(matches!(err, AppError::Unauthorized(_)));

    let mut parts = parts_with_token("tok-unknown");
    let err = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .expect_err("unknown token must fail");
    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[tokio::test]
async fn role_policy_gates_instructor_and_admin_routes() {
    let state = state_with_tokens().await;

    // Resolve the user once, then drive the role through its lifecycle.
    let mut parts = parts_with_token("tok-grace");
    let AuthUser(user) = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .expect("auth must succeed");

    // Student: both gated extractors reject.
    let mut parts = parts_with_token("tok-grace");
    let err = RequireInstructor::from_request_parts(&mut parts, &state)
        .await
        .expect_err("student must be rejected");
    assert!(matches!(err, AppError::Forbidden(_)));

    let mut parts = parts_with_token("tok-grace");
    assert!(
        RequireAdmin::from_request_parts(&mut parts, &state)
            .await
            .is_err()
    );

    // Instructor: authoring allowed, admin still rejected.
    users::update_role(&state.db, &user.id, Role::Instructor)
        .await
        .expect("role update failed");

    let mut parts = parts_with_token("tok-grace");
    assert!(
        RequireInstructor::from_request_parts(&mut parts, &state)
            .await
            .is_ok()
    );
    let mut parts = parts_with_token("tok-grace");
    assert!(
        RequireAdmin::from_request_parts(&mut parts, &state)
            .await
            .is_err()
    );

    // Admin: both allowed.
    users::update_role(&state.db, &user.id, Role::Admin)
        .await
        .expect("role update failed");

    let mut parts = parts_with_token("tok-grace");
    assert!(
        RequireInstructor::from_request_parts(&mut parts, &state)
            .await
            .is_ok()
    );
    let mut parts = parts_with_token("tok-grace");
    assert!(
        RequireAdmin::from_request_parts(&mut parts, &state)
            .await
            .is_ok()
    );
}
