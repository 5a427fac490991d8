use serde::Serialize;
use sqlx::SqlitePool;
use tracing::info;

use crate::db::{courses, lectures};
use crate::error::AppError;
use crate::models::Course;

/// Fields that must be filled before a course may go live. Price counts as
/// filled when non-zero, the text fields when non-empty; on top of these the
/// course needs at least one lecture.
pub fn missing_requirements(course: &Course, lecture_count: i64) -> Vec<&'static str> {
    let mut missing = Vec::new();

    if course.course_title.is_empty() {
        missing.push("courseTitle");
    }
    if course.sub_title.is_empty() {
        missing.push("subTitle");
    }
    if course.description.is_empty() {
        missing.push("description");
    }
    if course.category.is_empty() {
        missing.push("category");
    }
    if course.course_level.is_empty() {
        missing.push("courseLevel");
    }
    if course.course_price == 0 {
        missing.push("coursePrice");
    }
    if lecture_count == 0 {
        missing.push("lectures");
    }

    missing
}

pub fn can_publish(course: &Course, lecture_count: i64) -> bool {
    missing_requirements(course, lecture_count).is_empty()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishOutcome {
    pub is_published: bool,
    pub message: String,
}

/// Governs the Draft <-> Published transition of a course.
///
/// Publishing re-validates the readiness predicate here, server-side, and
/// rejects an incomplete course; unpublishing is always allowed and
/// idempotent. The transition is a read-modify-write with no versioning, so
/// concurrent toggles resolve last-write-wins.
pub struct PublicationService {
    db: SqlitePool,
}

impl PublicationService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn set_publish_state(
        &self,
        course_id: &str,
        publish: bool,
    ) -> Result<PublishOutcome, AppError> {
        let course = courses::find_course_by_id(&self.db, course_id)
            .await?
            .ok_or(AppError::NotFound("Course"))?;

        if publish {
            let lecture_count = lectures::count_course_lectures(&self.db, course_id).await?;
            let missing = missing_requirements(&course, lecture_count);
            if !missing.is_empty() {
                return Err(AppError::Validation(format!(
                    "Course cannot be published. Missing: {}",
                    missing.join(", ")
                )));
            }
        }

        courses::set_published(&self.db, course_id, publish).await?;
        info!(course_id, publish, "course publish state changed");

        Ok(PublishOutcome {
            is_published: publish,
            message: if publish {
                "Course is published".to_string()
            } else {
                "Course is unpublished".to_string()
            },
        })
    }

    /// Unconditional flag flip for the admin surface. Ignores readiness.
    pub async fn admin_toggle(&self, course_id: &str) -> Result<PublishOutcome, AppError> {
        let course = courses::find_course_by_id(&self.db, course_id)
            .await?
            .ok_or(AppError::NotFound("Course"))?;

        let next = !course.is_published;
        courses::set_published(&self.db, course_id, next).await?;
        info!(course_id, next, "admin toggled course status");

        Ok(PublishOutcome {
            is_published: next,
            message: if next {
                "Course is published".to_string()
            } else {
                "Course is unpublished".to_string()
            },
        })
    }
}
