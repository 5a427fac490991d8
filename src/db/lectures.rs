use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{Lecture, UpdateLectureRequest};

const LECTURE_COLUMNS: &str =
    "id, lecture_title, video_url, public_id, is_preview_free, created_at, updated_at";

/// Insert a lecture and append its id to the owning course's ordering.
pub async fn insert_lecture(
    db: &SqlitePool,
    course_id: &str,
    lecture_title: &str,
) -> Result<Lecture, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO lectures (id, lecture_title, is_preview_free, created_at, updated_at) \
         VALUES (?, ?, 0, ?, ?)",
    )
    .bind(&id)
    .bind(lecture_title)
    .bind(&now)
    .bind(&now)
    .execute(db)
    .await?;

    sqlx::query(
        "INSERT INTO course_lectures (course_id, lecture_id, position) \
         VALUES (?, ?, (SELECT COALESCE(MAX(position), -1) + 1 FROM course_lectures WHERE course_id = ?))",
    )
    .bind(course_id)
    .bind(&id)
    .bind(course_id)
    .execute(db)
    .await?;

    Ok(Lecture {
        id,
        lecture_title: lecture_title.to_string(),
        video_url: None,
        public_id: None,
        is_preview_free: false,
        created_at: now.clone(),
        updated_at: now,
    })
}

pub async fn find_lecture_by_id(db: &SqlitePool, id: &str) -> Result<Option<Lecture>, sqlx::Error> {
    sqlx::query_as::<_, Lecture>(&format!("SELECT {LECTURE_COLUMNS} FROM lectures WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Lectures of a course in authoring order.
pub async fn fetch_course_lectures(
    db: &SqlitePool,
    course_id: &str,
) -> Result<Vec<Lecture>, sqlx::Error> {
    sqlx::query_as::<_, Lecture>(
        "SELECT l.id, l.lecture_title, l.video_url, l.public_id, l.is_preview_free, \
         l.created_at, l.updated_at \
         FROM lectures l JOIN course_lectures cl ON cl.lecture_id = l.id \
         WHERE cl.course_id = ? ORDER BY cl.position",
    )
    .bind(course_id)
    .fetch_all(db)
    .await
}

pub async fn count_course_lectures(db: &SqlitePool, course_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM course_lectures WHERE course_id = ?")
        .bind(course_id)
        .fetch_one(db)
        .await
}

/// The id of the course whose ordering references this lecture, if any.
pub async fn find_parent_course_id(
    db: &SqlitePool,
    lecture_id: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT course_id FROM course_lectures WHERE lecture_id = ?")
        .bind(lecture_id)
        .fetch_optional(db)
        .await
}

pub async fn update_lecture(
    db: &SqlitePool,
    id: &str,
    req: UpdateLectureRequest,
) -> Result<Option<Lecture>, sqlx::Error> {
    let mut current = match find_lecture_by_id(db, id).await? {
        Some(l) => l,
        None => return Ok(None),
    };

    if let Some(lecture_title) = req.lecture_title {
        current.lecture_title = lecture_title;
    }
    if let Some(video_url) = req.video_url {
        current.video_url = Some(video_url);
    }
    if let Some(public_id) = req.public_id {
        current.public_id = Some(public_id);
    }
    if let Some(is_preview_free) = req.is_preview_free {
        current.is_preview_free = is_preview_free;
    }
    current.updated_at = Utc::now().to_rfc3339();

    sqlx::query(
        "UPDATE lectures SET lecture_title = ?, video_url = ?, public_id = ?, \
         is_preview_free = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&current.lecture_title)
    .bind(&current.video_url)
    .bind(&current.public_id)
    .bind(current.is_preview_free)
    .bind(&current.updated_at)
    .bind(id)
    .execute(db)
    .await?;

    Ok(Some(current))
}

/// Remove the lecture record and its reference in the parent's ordering.
pub async fn delete_lecture(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    sqlx::query("DELETE FROM course_lectures WHERE lecture_id = ?")
        .bind(id)
        .execute(db)
        .await?;

    let result = sqlx::query("DELETE FROM lectures WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}
