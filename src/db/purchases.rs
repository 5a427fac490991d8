use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{EnrollmentRow, Purchase, PurchaseWebhookRequest, TopCourse};

/// Record a settled purchase. A completed row is what makes the student
/// count as enrolled everywhere else.
pub async fn insert_completed_purchase(
    db: &SqlitePool,
    req: &PurchaseWebhookRequest,
) -> Result<Purchase, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO purchases (id, user_id, course_id, amount, status, payment_ref, created_at) \
         VALUES (?, ?, ?, ?, 'completed', ?, ?)",
    )
    .bind(&id)
    .bind(&req.user_id)
    .bind(&req.course_id)
    .bind(req.amount)
    .bind(&req.payment_ref)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(Purchase {
        id,
        user_id: req.user_id.clone(),
        course_id: req.course_id.clone(),
        amount: req.amount,
        status: "completed".to_string(),
        payment_ref: req.payment_ref.clone(),
        created_at: now,
    })
}

pub async fn is_enrolled(
    db: &SqlitePool,
    user_id: &str,
    course_id: &str,
) -> Result<bool, sqlx::Error> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM purchases \
         WHERE user_id = ? AND course_id = ? AND status = 'completed'",
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_one(db)
    .await?;

    Ok(count > 0)
}

/// Completed purchases with `created_at` in `[start, end)`. RFC 3339 UTC
/// strings compare lexicographically, so plain TEXT comparison is ordered.
pub async fn count_enrollments_between(
    db: &SqlitePool,
    start: &str,
    end: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM purchases \
         WHERE status = 'completed' AND created_at >= ? AND created_at < ?",
    )
    .bind(start)
    .bind(end)
    .fetch_one(db)
    .await
}

pub async fn revenue_between(db: &SqlitePool, start: &str, end: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(amount), 0) FROM purchases \
         WHERE status = 'completed' AND created_at >= ? AND created_at < ?",
    )
    .bind(start)
    .bind(end)
    .fetch_one(db)
    .await
}

pub async fn total_enrollments(db: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM purchases WHERE status = 'completed'")
        .fetch_one(db)
        .await
}

pub async fn total_revenue(db: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(amount), 0) FROM purchases WHERE status = 'completed'",
    )
    .fetch_one(db)
    .await
}

pub async fn top_courses_by_revenue(
    db: &SqlitePool,
    limit: i64,
) -> Result<Vec<TopCourse>, sqlx::Error> {
    sqlx::query_as::<_, TopCourse>(
        "SELECT c.id AS course_id, c.course_title, \
         COALESCE(SUM(p.amount), 0) AS revenue, COUNT(p.id) AS enrollments \
         FROM purchases p JOIN courses c ON c.id = p.course_id \
         WHERE p.status = 'completed' \
         GROUP BY c.id, c.course_title \
         ORDER BY revenue DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(db)
    .await
}

/// One page of the admin enrollment listing, newest first, with an optional
/// free-text match over student name/email and course title.
pub async fn fetch_enrollments_page(
    db: &SqlitePool,
    search: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<EnrollmentRow>, sqlx::Error> {
    let like = format!("%{search}%");

    sqlx::query_as::<_, EnrollmentRow>(
        "SELECT p.id AS purchase_id, u.name AS student_name, u.email AS student_email, \
         c.course_title, p.amount, p.created_at \
         FROM purchases p \
         JOIN users u ON u.id = p.user_id \
         JOIN courses c ON c.id = p.course_id \
         WHERE p.status = 'completed' \
         AND (u.name LIKE ? OR u.email LIKE ? OR c.course_title LIKE ?) \
         ORDER BY p.created_at DESC LIMIT ? OFFSET ?",
    )
    .bind(&like)
    .bind(&like)
    .bind(&like)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
}

pub async fn count_enrollments_matching(
    db: &SqlitePool,
    search: &str,
) -> Result<i64, sqlx::Error> {
    let like = format!("%{search}%");

    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM purchases p \
         JOIN users u ON u.id = p.user_id \
         JOIN courses c ON c.id = p.course_id \
         WHERE p.status = 'completed' \
         AND (u.name LIKE ? OR u.email LIKE ? OR c.course_title LIKE ?)",
    )
    .bind(&like)
    .bind(&like)
    .bind(&like)
    .fetch_one(db)
    .await
}
