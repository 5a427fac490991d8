use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{Role, User};

const USER_COLUMNS: &str =
    "id, name, email, role, firebase_uid, photo_url, photo_public_id, created_at";

pub async fn find_user_by_id(db: &SqlitePool, id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn find_user_by_firebase_uid(
    db: &SqlitePool,
    uid: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE firebase_uid = ?"))
        .bind(uid)
        .fetch_optional(db)
        .await
}

/// Create the local record for a provider identity seen for the first time.
/// New users start as students; role changes go through the admin surface.
pub async fn insert_user(
    db: &SqlitePool,
    firebase_uid: &str,
    name: &str,
    email: &str,
    photo_url: Option<&str>,
) -> Result<User, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO users (id, name, email, role, firebase_uid, photo_url, created_at) \
         VALUES (?, ?, ?, 'student', ?, ?, ?)",
    )
    .bind(&id)
    .bind(name)
    .bind(email)
    .bind(firebase_uid)
    .bind(photo_url)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(User {
        id,
        name: name.to_string(),
        email: email.to_string(),
        role: Role::Student,
        firebase_uid: Some(firebase_uid.to_string()),
        photo_url: photo_url.map(|s| s.to_string()),
        photo_public_id: None,
        created_at: now,
    })
}

pub async fn fetch_users(db: &SqlitePool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"))
        .fetch_all(db)
        .await
}

pub async fn update_role(db: &SqlitePool, id: &str, role: Role) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET role = ? WHERE id = ?")
        .bind(role)
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn update_profile(
    db: &SqlitePool,
    id: &str,
    name: &str,
    photo_url: Option<&str>,
    photo_public_id: Option<&str>,
) -> Result<Option<User>, sqlx::Error> {
    let mut current = match find_user_by_id(db, id).await? {
        Some(u) => u,
        None => return Ok(None),
    };

    current.name = name.to_string();
    if let Some(url) = photo_url {
        current.photo_url = Some(url.to_string());
        current.photo_public_id = photo_public_id.map(|s| s.to_string());
    }

    sqlx::query("UPDATE users SET name = ?, photo_url = ?, photo_public_id = ? WHERE id = ?")
        .bind(&current.name)
        .bind(&current.photo_url)
        .bind(&current.photo_public_id)
        .bind(id)
        .execute(db)
        .await?;

    Ok(Some(current))
}
