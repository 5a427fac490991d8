#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use backend::config::WebhookConfig;
use backend::error::AppError;
use backend::media::{AssetKind, MediaStore, UploadedAsset};
use backend::auth::TokenVerifier;
use backend::state::AppState;

/// In-memory database with the full schema applied. A single connection,
/// since every `sqlite::memory:` connection is its own database.
pub async fn setup_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Media store that records every destroy call so cascade behavior can be
/// asserted on.
#[derive(Default)]
pub struct RecordingMediaStore {
    pub destroyed: Mutex<Vec<(AssetKind, String)>>,
}

#[async_trait]
impl MediaStore for RecordingMediaStore {
    async fn upload(
        &self,
        _kind: AssetKind,
        file_name: &str,
        _bytes: Vec<u8>,
    ) -> Result<UploadedAsset, AppError> {
        Ok(UploadedAsset {
            url: format!("recorded://{file_name}"),
            public_id: format!("recorded/{file_name}"),
        })
    }

    async fn destroy(&self, kind: AssetKind, public_id: &str) -> Result<(), AppError> {
        self.destroyed
            .lock()
            .expect("destroy log poisoned")
            .push((kind, public_id.to_string()));
        Ok(())
    }
}

pub fn test_state(
    db: SqlitePool,
    media: Arc<dyn MediaStore>,
    verifier: Arc<dyn TokenVerifier>,
) -> AppState {
    AppState {
        db,
        media,
        verifier,
        webhook: WebhookConfig {
            secret: "test-secret".to_string(),
        },
    }
}
