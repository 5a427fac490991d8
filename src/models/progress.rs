use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LectureProgress {
    pub lecture_id: String,
    pub viewed: bool,
    pub viewed_at: Option<String>,
}

/// Progress of one student through one course: the course completion flag
/// plus the per-lecture viewed flags, in authoring order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgress {
    pub course_id: String,
    pub completed: bool,
    pub lectures: Vec<LectureProgress>,
}
