use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::TokenVerifier;
use crate::config::WebhookConfig;
use crate::media::MediaStore;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub media: Arc<dyn MediaStore>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub webhook: WebhookConfig,
}
