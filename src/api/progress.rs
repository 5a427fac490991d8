use axum::Json;
use axum::extract::{Path, State};
use serde_json::{Value, json};

use crate::auth::AuthUser;
use crate::db::{courses, lectures, progress};
use crate::error::AppError;
use crate::models::CourseProgress;
use crate::state::AppState;

pub async fn get_progress(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(course_id): Path<String>,
) -> Result<Json<CourseProgress>, AppError> {
    courses::find_course_by_id(&state.db, &course_id)
        .await?
        .ok_or(AppError::NotFound("Course"))?;

    let progress = progress::fetch_course_progress(&state.db, &user.id, &course_id).await?;
    Ok(Json(progress))
}

pub async fn mark_lecture_viewed(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((course_id, lecture_id)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let parent = lectures::find_parent_course_id(&state.db, &lecture_id).await?;
    if parent.as_deref() != Some(course_id.as_str()) {
        return Err(AppError::NotFound("Lecture"));
    }

    progress::mark_lecture_viewed(&state.db, &user.id, &lecture_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Lecture progress updated",
    })))
}

pub async fn mark_complete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(course_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    courses::find_course_by_id(&state.db, &course_id)
        .await?
        .ok_or(AppError::NotFound("Course"))?;

    progress::set_course_completed(&state.db, &user.id, &course_id, true).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Course marked as completed",
    })))
}

pub async fn mark_incomplete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(course_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    courses::find_course_by_id(&state.db, &course_id)
        .await?
        .ok_or(AppError::NotFound("Course"))?;

    progress::set_course_completed(&state.db, &user.id, &course_id, false).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Course marked as incompleted",
    })))
}
