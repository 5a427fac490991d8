use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use serde_json::{Value, json};
use tracing::info;

use crate::db::{courses, purchases, users};
use crate::error::AppError;
use crate::models::PurchaseWebhookRequest;
use crate::state::AppState;

/// Payment provider webhook. Carries a shared secret in `x-webhook-secret`;
/// a completed purchase is what enrolls the student in the course.
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<PurchaseWebhookRequest>,
) -> Result<Json<Value>, AppError> {
    let secret = headers
        .get("x-webhook-secret")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing webhook secret".to_string()))?;

    if secret != state.webhook.secret {
        return Err(AppError::Unauthorized("Invalid webhook secret".to_string()));
    }

    users::find_user_by_id(&state.db, &req.user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    courses::find_course_by_id(&state.db, &req.course_id)
        .await?
        .ok_or(AppError::NotFound("Course"))?;

    let purchase = purchases::insert_completed_purchase(&state.db, &req).await?;
    info!(
        purchase_id = %purchase.id,
        course_id = %purchase.course_id,
        "purchase recorded"
    );

    Ok(Json(json!({
        "success": true,
        "message": "Purchase recorded",
        "purchase": purchase,
    })))
}
