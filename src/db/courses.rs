use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{AdminCourse, Course, NewCourseRequest, PublishedCourse, UpdateCourseRequest};

const COURSE_COLUMNS: &str = "id, course_title, sub_title, description, category, course_level, \
     course_price, course_thumbnail, thumbnail_public_id, creator_id, is_published, \
     created_at, updated_at";

pub async fn insert_course(
    db: &SqlitePool,
    req: NewCourseRequest,
    creator_id: &str,
) -> Result<Course, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO courses (id, course_title, category, creator_id, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&req.course_title)
    .bind(&req.category)
    .bind(creator_id)
    .bind(&now)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(Course {
        id,
        course_title: req.course_title,
        sub_title: String::new(),
        description: String::new(),
        category: req.category,
        course_level: String::new(),
        course_price: 0,
        course_thumbnail: String::new(),
        thumbnail_public_id: None,
        creator_id: creator_id.to_string(),
        is_published: false,
        created_at: now.clone(),
        updated_at: now,
    })
}

pub async fn find_course_by_id(db: &SqlitePool, id: &str) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn fetch_creator_courses(
    db: &SqlitePool,
    creator_id: &str,
) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {COURSE_COLUMNS} FROM courses WHERE creator_id = ? ORDER BY created_at DESC"
    ))
    .bind(creator_id)
    .fetch_all(db)
    .await
}

/// Read-modify-write metadata update. Concurrent edits race with
/// last-write-wins semantics; there is no versioning on courses.
pub async fn update_course(
    db: &SqlitePool,
    id: &str,
    req: UpdateCourseRequest,
) -> Result<Option<Course>, sqlx::Error> {
    let mut current = match find_course_by_id(db, id).await? {
        Some(c) => c,
        None => return Ok(None),
    };

    if let Some(course_title) = req.course_title {
        current.course_title = course_title;
    }
    if let Some(sub_title) = req.sub_title {
        current.sub_title = sub_title;
    }
    if let Some(description) = req.description {
        current.description = description;
    }
    if let Some(category) = req.category {
        current.category = category;
    }
    if let Some(course_level) = req.course_level {
        current.course_level = course_level;
    }
    if let Some(course_price) = req.course_price {
        current.course_price = course_price;
    }
    current.updated_at = Utc::now().to_rfc3339();

    sqlx::query(
        "UPDATE courses SET course_title = ?, sub_title = ?, description = ?, category = ?, \
         course_level = ?, course_price = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&current.course_title)
    .bind(&current.sub_title)
    .bind(&current.description)
    .bind(&current.category)
    .bind(&current.course_level)
    .bind(current.course_price)
    .bind(&current.updated_at)
    .bind(id)
    .execute(db)
    .await?;

    Ok(Some(current))
}

pub async fn set_thumbnail(
    db: &SqlitePool,
    id: &str,
    url: &str,
    public_id: &str,
) -> Result<bool, sqlx::Error> {
    let now = Utc::now().to_rfc3339();
    let result = sqlx::query(
        "UPDATE courses SET course_thumbnail = ?, thumbnail_public_id = ?, updated_at = ? \
         WHERE id = ?",
    )
    .bind(url)
    .bind(public_id)
    .bind(&now)
    .bind(id)
    .execute(db)
    .await?
    .rows_affected();

    Ok(result > 0)
}

pub async fn set_published(db: &SqlitePool, id: &str, value: bool) -> Result<bool, sqlx::Error> {
    let now = Utc::now().to_rfc3339();
    let result = sqlx::query("UPDATE courses SET is_published = ?, updated_at = ? WHERE id = ?")
        .bind(value)
        .bind(&now)
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn delete_course(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM courses WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn fetch_published_courses(db: &SqlitePool) -> Result<Vec<PublishedCourse>, sqlx::Error> {
    sqlx::query_as::<_, PublishedCourse>(
        "SELECT c.id, c.course_title, c.sub_title, c.category, c.course_level, c.course_price, \
         c.course_thumbnail, u.name AS creator_name, u.photo_url AS creator_photo_url \
         FROM courses c JOIN users u ON u.id = c.creator_id \
         WHERE c.is_published = 1 ORDER BY c.created_at DESC",
    )
    .fetch_all(db)
    .await
}

/// Case-insensitive substring search over title/subtitle/category among
/// published courses, with optional category filter and price ordering.
pub async fn search_published(
    db: &SqlitePool,
    query: &str,
    categories: &[String],
    sort_by_price: Option<&str>,
) -> Result<Vec<PublishedCourse>, sqlx::Error> {
    let like = format!("%{query}%");

    let mut sql = String::from(
        "SELECT c.id, c.course_title, c.sub_title, c.category, c.course_level, c.course_price, \
         c.course_thumbnail, u.name AS creator_name, u.photo_url AS creator_photo_url \
         FROM courses c JOIN users u ON u.id = c.creator_id \
         WHERE c.is_published = 1 \
         AND (c.course_title LIKE ? OR c.sub_title LIKE ? OR c.category LIKE ?)",
    );

    if !categories.is_empty() {
        let placeholders = vec!["?"; categories.len()].join(", ");
        sql.push_str(&format!(" AND c.category IN ({placeholders})"));
    }

    sql.push_str(match sort_by_price {
        Some("low") => " ORDER BY c.course_price ASC",
        Some("high") => " ORDER BY c.course_price DESC",
        _ => " ORDER BY c.created_at DESC",
    });

    let mut q = sqlx::query_as::<_, PublishedCourse>(&sql)
        .bind(&like)
        .bind(&like)
        .bind(&like);
    for category in categories {
        q = q.bind(category);
    }

    q.fetch_all(db).await
}

pub async fn fetch_all_courses_admin(db: &SqlitePool) -> Result<Vec<AdminCourse>, sqlx::Error> {
    sqlx::query_as::<_, AdminCourse>(
        "SELECT c.id, c.course_title, c.category, c.course_price, c.is_published, c.created_at, \
         u.name AS creator_name, \
         (SELECT COUNT(*) FROM purchases p \
          WHERE p.course_id = c.id AND p.status = 'completed') AS enrolled_count \
         FROM courses c JOIN users u ON u.id = c.creator_id \
         ORDER BY c.created_at DESC",
    )
    .fetch_all(db)
    .await
}
