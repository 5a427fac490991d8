use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::{CourseProgress, LectureProgress};

use super::lectures;

/// Progress for one (user, course) pair: completion flag plus per-lecture
/// viewed flags in authoring order. Lectures without a progress row read as
/// unviewed.
pub async fn fetch_course_progress(
    db: &SqlitePool,
    user_id: &str,
    course_id: &str,
) -> Result<CourseProgress, sqlx::Error> {
    let completed = sqlx::query_scalar::<_, bool>(
        "SELECT completed FROM course_progress WHERE user_id = ? AND course_id = ?",
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_optional(db)
    .await?
    .unwrap_or(false);

    let lecture_rows = lectures::fetch_course_lectures(db, course_id).await?;
    let mut result = Vec::with_capacity(lecture_rows.len());

    for lecture in lecture_rows {
        let row = sqlx::query_as::<_, LectureProgress>(
            "SELECT lecture_id, viewed, viewed_at FROM lecture_progress \
             WHERE user_id = ? AND lecture_id = ?",
        )
        .bind(user_id)
        .bind(&lecture.id)
        .fetch_optional(db)
        .await?;

        result.push(row.unwrap_or(LectureProgress {
            lecture_id: lecture.id,
            viewed: false,
            viewed_at: None,
        }));
    }

    Ok(CourseProgress {
        course_id: course_id.to_string(),
        completed,
        lectures: result,
    })
}

pub async fn mark_lecture_viewed(
    db: &SqlitePool,
    user_id: &str,
    lecture_id: &str,
) -> Result<(), sqlx::Error> {
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO lecture_progress (user_id, lecture_id, viewed, viewed_at) \
         VALUES (?, ?, 1, ?) \
         ON CONFLICT (user_id, lecture_id) DO UPDATE SET viewed = 1, viewed_at = excluded.viewed_at",
    )
    .bind(user_id)
    .bind(lecture_id)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(())
}

/// Set the course completion flag and force every lecture's viewed flag to
/// match, so "mark complete" and "mark incomplete" behave symmetrically.
pub async fn set_course_completed(
    db: &SqlitePool,
    user_id: &str,
    course_id: &str,
    completed: bool,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO course_progress (user_id, course_id, completed) VALUES (?, ?, ?) \
         ON CONFLICT (user_id, course_id) DO UPDATE SET completed = excluded.completed",
    )
    .bind(user_id)
    .bind(course_id)
    .bind(completed)
    .execute(db)
    .await?;

    let now = Utc::now().to_rfc3339();
    let viewed_at: Option<String> = completed.then_some(now);

    for lecture in lectures::fetch_course_lectures(db, course_id).await? {
        sqlx::query(
            "INSERT INTO lecture_progress (user_id, lecture_id, viewed, viewed_at) \
             VALUES (?, ?, ?, ?) \
             ON CONFLICT (user_id, lecture_id) \
             DO UPDATE SET viewed = excluded.viewed, viewed_at = excluded.viewed_at",
        )
        .bind(user_id)
        .bind(&lecture.id)
        .bind(completed)
        .bind(&viewed_at)
        .execute(db)
        .await?;
    }

    Ok(())
}
