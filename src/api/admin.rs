use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::auth::RequireAdmin;
use crate::db::{courses, users};
use crate::error::AppError;
use crate::models::{AdminCourse, UpdateRoleRequest, User};
use crate::services::{
    AnalyticsService, CourseService, EnrollmentPage, OverviewMetrics, PublicationService,
};
use crate::state::AppState;

pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<User>>, AppError> {
    let users = users::fetch_users(&state.db).await?;
    Ok(Json(users))
}

/// The only way a role changes.
pub async fn update_user_role(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(user_id): Path<String>,
    Json(req): Json<UpdateRoleRequest>,
) -> Result<Json<Value>, AppError> {
    let updated = users::update_role(&state.db, &user_id, req.role).await?;
    if !updated {
        return Err(AppError::NotFound("User"));
    }

    Ok(Json(json!({
        "success": true,
        "message": "Role updated",
    })))
}

pub async fn list_courses(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<AdminCourse>>, AppError> {
    let courses = courses::fetch_all_courses_admin(&state.db).await?;
    Ok(Json(courses))
}

/// Unconditional publish-flag flip, independent of readiness.
pub async fn toggle_course_status(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(course_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let outcome = PublicationService::new(state.db.clone())
        .admin_toggle(&course_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": outcome.message,
        "isPublished": outcome.is_published,
    })))
}

pub async fn remove_course(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(course_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = CourseService::new(state.db.clone(), state.media.clone());
    service.remove_course(&course_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Course removed",
    })))
}

pub async fn analytics_overview(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<OverviewMetrics>, AppError> {
    let overview = AnalyticsService::new(state.db.clone()).overview().await?;
    Ok(Json(overview))
}

#[derive(Deserialize)]
pub struct EnrollmentQuery {
    #[serde(default)]
    search: String,
    page: Option<i64>,
    limit: Option<i64>,
}

pub async fn list_enrollments(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<EnrollmentQuery>,
) -> Result<Json<EnrollmentPage>, AppError> {
    let page = AnalyticsService::new(state.db.clone())
        .enrollments(
            &params.search,
            params.page.unwrap_or(1),
            params.limit.unwrap_or(10),
        )
        .await?;

    Ok(Json(page))
}
