use axum::Json;
use axum::extract::{Multipart, State};
use serde_json::{Value, json};
use tracing::warn;

use crate::auth::AuthUser;
use crate::db::users;
use crate::error::AppError;
use crate::media::AssetKind;
use crate::models::User;
use crate::state::AppState;

/// Own profile. The [`AuthUser`] extractor has already created the record
/// on first sight, so this is a plain read-back.
pub async fn get_profile(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}

/// Multipart profile update: `name` text field plus an optional
/// `profilePhoto` file part. Replacing the photo deletes the old asset.
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let mut name = user.name.clone();
    let mut photo: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        match field.name().unwrap_or_default() {
            "name" => {
                name = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(e.to_string()))?;
            }
            "profilePhoto" => {
                let file_name = field.file_name().unwrap_or("photo").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(e.to_string()))?;
                photo = Some((file_name, bytes.to_vec()));
            }
            _ => {}
        }
    }

    if name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }

    let (photo_url, photo_public_id) = match photo {
        Some((file_name, bytes)) => {
            if let Some(old_id) = user.photo_public_id.as_deref() {
                if let Err(e) = state.media.destroy(AssetKind::Image, old_id).await {
                    warn!(user_id = %user.id, "failed to delete replaced photo: {}", e);
                }
            }
            let asset = state.media.upload(AssetKind::Image, &file_name, bytes).await?;
            (Some(asset.url), Some(asset.public_id))
        }
        None => (None, None),
    };

    let updated = users::update_profile(
        &state.db,
        &user.id,
        &name,
        photo_url.as_deref(),
        photo_public_id.as_deref(),
    )
    .await?
    .ok_or(AppError::NotFound("User"))?;

    Ok(Json(json!({
        "success": true,
        "message": "Profile updated",
        "user": updated,
    })))
}
