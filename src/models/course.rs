use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::lecture::Lecture;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub course_title: String,
    pub sub_title: String,
    pub description: String,
    pub category: String,
    pub course_level: String,
    pub course_price: i64,
    pub course_thumbnail: String,
    pub thumbnail_public_id: Option<String>,
    pub creator_id: String,
    pub is_published: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourseRequest {
    pub course_title: String,
    pub category: String,
}

/// Metadata fields accepted by the course edit call. The thumbnail travels
/// in the same multipart request as a file part, not here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    pub course_title: Option<String>,
    pub sub_title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub course_level: Option<String>,
    pub course_price: Option<i64>,
}

/// Course with its lectures populated in authoring order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    pub lectures: Vec<Lecture>,
}

/// Admin listing row: course plus creator name and enrollment count.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AdminCourse {
    pub id: String,
    pub course_title: String,
    pub category: String,
    pub course_price: i64,
    pub is_published: bool,
    pub created_at: String,
    pub creator_name: String,
    pub enrolled_count: i64,
}

/// Catalog listing row: course plus its creator's public identity.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PublishedCourse {
    pub id: String,
    pub course_title: String,
    pub sub_title: String,
    pub category: String,
    pub course_level: String,
    pub course_price: i64,
    pub course_thumbnail: String,
    pub creator_name: String,
    pub creator_photo_url: Option<String>,
}
