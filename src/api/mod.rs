pub mod admin;
pub mod courses;
pub mod lectures;
pub mod progress;
pub mod purchase;
pub mod users;

use axum::http::{HeaderValue, Method, header};
use axum::routing::{delete, get, patch, post, put};
use axum::{Router, extract::State, http::StatusCode};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

pub fn router(state: AppState, cors_origin: Option<&str>) -> Router {
    let api = Router::new()
        .route("/user/profile", get(users::get_profile).put(users::update_profile))
        .route("/course", post(courses::create_course).get(courses::list_creator_courses))
        .route("/course/published-courses", get(courses::published_courses))
        .route("/course/search", get(courses::search_courses))
        .route(
            "/course/{course_id}",
            get(courses::get_course)
                .put(courses::edit_course)
                .patch(courses::toggle_publish),
        )
        .route(
            "/course/{course_id}/lecture",
            post(lectures::create_lecture).get(lectures::list_lectures),
        )
        .route("/course/{course_id}/lecture/{lecture_id}", post(lectures::edit_lecture))
        .route(
            "/course/lecture/{lecture_id}",
            get(lectures::get_lecture).delete(lectures::remove_lecture),
        )
        .route("/course/admin/courses", get(admin::list_courses))
        .route("/course/admin/courses/{course_id}", delete(admin::remove_course))
        .route(
            "/course/admin/courses/{course_id}/toggle-status",
            patch(admin::toggle_course_status),
        )
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/{user_id}/role", patch(admin::update_user_role))
        .route("/admin/analytics/overview", get(admin::analytics_overview))
        .route("/admin/enrollments", get(admin::list_enrollments))
        .route("/progress/{course_id}", get(progress::get_progress))
        .route(
            "/progress/{course_id}/lecture/{lecture_id}/view",
            post(progress::mark_lecture_viewed),
        )
        .route("/progress/{course_id}/complete", post(progress::mark_complete))
        .route("/progress/{course_id}/incomplete", post(progress::mark_incomplete))
        .route("/purchase/webhook", post(purchase::payment_webhook));

    let mut app = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http());

    if let Some(origin) = cors_origin {
        let cors = CorsLayer::new()
            .allow_origin(origin.parse::<HeaderValue>().expect("invalid CORS origin"))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true);
        app = app.layer(cors);
    }

    app.with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}
