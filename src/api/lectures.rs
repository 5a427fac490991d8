use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::auth::RequireInstructor;
use crate::db::{courses, lectures};
use crate::error::AppError;
use crate::models::{Lecture, NewLectureRequest, UpdateLectureRequest};
use crate::services::CourseService;
use crate::state::AppState;

pub async fn create_lecture(
    State(state): State<AppState>,
    RequireInstructor(_user): RequireInstructor,
    Path(course_id): Path<String>,
    Json(req): Json<NewLectureRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if req.lecture_title.trim().is_empty() {
        return Err(AppError::Validation("Lecture title is required".to_string()));
    }

    courses::find_course_by_id(&state.db, &course_id)
        .await?
        .ok_or(AppError::NotFound("Course"))?;

    let lecture = lectures::insert_lecture(&state.db, &course_id, &req.lecture_title).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Lecture created",
            "lecture": lecture,
        })),
    ))
}

pub async fn list_lectures(
    State(state): State<AppState>,
    RequireInstructor(_user): RequireInstructor,
    Path(course_id): Path<String>,
) -> Result<Json<Vec<Lecture>>, AppError> {
    courses::find_course_by_id(&state.db, &course_id)
        .await?
        .ok_or(AppError::NotFound("Course"))?;

    let lectures = lectures::fetch_course_lectures(&state.db, &course_id).await?;
    Ok(Json(lectures))
}

pub async fn get_lecture(
    State(state): State<AppState>,
    RequireInstructor(_user): RequireInstructor,
    Path(lecture_id): Path<String>,
) -> Result<Json<Lecture>, AppError> {
    let lecture = lectures::find_lecture_by_id(&state.db, &lecture_id)
        .await?
        .ok_or(AppError::NotFound("Lecture"))?;
    Ok(Json(lecture))
}

pub async fn edit_lecture(
    State(state): State<AppState>,
    RequireInstructor(_user): RequireInstructor,
    Path((course_id, lecture_id)): Path<(String, String)>,
    Json(req): Json<UpdateLectureRequest>,
) -> Result<Json<Value>, AppError> {
    // The lecture must actually belong to the addressed course.
    let parent = lectures::find_parent_course_id(&state.db, &lecture_id).await?;
    if parent.as_deref() != Some(course_id.as_str()) {
        return Err(AppError::NotFound("Lecture"));
    }

    let service = CourseService::new(state.db.clone(), state.media.clone());
    let lecture = service.edit_lecture(&lecture_id, req).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Lecture updated",
        "lecture": lecture,
    })))
}

pub async fn remove_lecture(
    State(state): State<AppState>,
    RequireInstructor(_user): RequireInstructor,
    Path(lecture_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = CourseService::new(state.db.clone(), state.media.clone());
    service.remove_lecture(&lecture_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Lecture removed",
    })))
}
