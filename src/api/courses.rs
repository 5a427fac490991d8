use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::auth::RequireInstructor;
use crate::db::{courses, lectures};
use crate::error::AppError;
use crate::models::{CourseDetail, NewCourseRequest, PublishedCourse, UpdateCourseRequest};
use crate::services::{CourseService, PublicationService};
use crate::state::AppState;

pub async fn create_course(
    State(state): State<AppState>,
    RequireInstructor(user): RequireInstructor,
    Json(req): Json<NewCourseRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if req.course_title.trim().is_empty() || req.category.trim().is_empty() {
        return Err(AppError::Validation(
            "Course title and category are required".to_string(),
        ));
    }

    let course = courses::insert_course(&state.db, req, &user.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Course created",
            "course": course,
        })),
    ))
}

pub async fn list_creator_courses(
    State(state): State<AppState>,
    RequireInstructor(user): RequireInstructor,
) -> Result<Json<Value>, AppError> {
    let courses = courses::fetch_creator_courses(&state.db, &user.id).await?;
    Ok(Json(json!({ "success": true, "courses": courses })))
}

pub async fn get_course(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<CourseDetail>, AppError> {
    let course = courses::find_course_by_id(&state.db, &course_id)
        .await?
        .ok_or(AppError::NotFound("Course"))?;
    let lectures = lectures::fetch_course_lectures(&state.db, &course_id).await?;

    Ok(Json(CourseDetail { course, lectures }))
}

/// Multipart course edit: metadata text fields plus an optional
/// `courseThumbnail` file part. Replacing the thumbnail deletes the old
/// remote asset.
pub async fn edit_course(
    State(state): State<AppState>,
    RequireInstructor(_user): RequireInstructor,
    Path(course_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let mut req = UpdateCourseRequest::default();
    let mut thumbnail: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "courseThumbnail" => {
                let file_name = field.file_name().unwrap_or("thumbnail").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(e.to_string()))?;
                thumbnail = Some((file_name, bytes.to_vec()));
            }
            _ => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(e.to_string()))?;
                match name.as_str() {
                    "courseTitle" => req.course_title = Some(value),
                    "subTitle" => req.sub_title = Some(value),
                    "description" => req.description = Some(value),
                    "category" => req.category = Some(value),
                    "courseLevel" => req.course_level = Some(value),
                    "coursePrice" => {
                        let price = value.parse::<i64>().map_err(|_| {
                            AppError::Validation("coursePrice must be a number".to_string())
                        })?;
                        req.course_price = Some(price);
                    }
                    _ => {}
                }
            }
        }
    }

    let service = CourseService::new(state.db.clone(), state.media.clone());
    let course = service.edit_course(&course_id, req, thumbnail).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Course updated",
        "course": course,
    })))
}

#[derive(Deserialize)]
pub struct PublishQuery {
    publish: String,
}

/// The legacy publish toggle: `?publish=true|false`. Publishing re-checks
/// the readiness predicate; unpublishing always succeeds.
pub async fn toggle_publish(
    State(state): State<AppState>,
    RequireInstructor(_user): RequireInstructor,
    Path(course_id): Path<String>,
    Query(params): Query<PublishQuery>,
) -> Result<Json<Value>, AppError> {
    let publish = match params.publish.as_str() {
        "true" => true,
        "false" => false,
        other => {
            return Err(AppError::Validation(format!(
                "publish must be 'true' or 'false', got '{other}'"
            )));
        }
    };

    let outcome = PublicationService::new(state.db.clone())
        .set_publish_state(&course_id, publish)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": outcome.message,
        "isPublished": outcome.is_published,
    })))
}

pub async fn published_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<PublishedCourse>>, AppError> {
    let courses = courses::fetch_published_courses(&state.db).await?;
    Ok(Json(courses))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(default)]
    query: String,
    /// Comma-separated category filter.
    categories: Option<String>,
    sort_by_price: Option<String>,
}

pub async fn search_courses(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<PublishedCourse>>, AppError> {
    let categories: Vec<String> = params
        .categories
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    let results = courses::search_published(
        &state.db,
        &params.query,
        &categories,
        params.sort_by_price.as_deref(),
    )
    .await?;

    Ok(Json(results))
}
