use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use backend::api::router;
use backend::auth::FirebaseTokenVerifier;
use backend::config::{CloudinaryConfig, FirebaseConfig, WebhookConfig};
use backend::media::CloudinaryStore;
use backend::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "backend=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://marketplace.db".to_string());

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let verifier = Arc::new(FirebaseTokenVerifier::new(FirebaseConfig::new_from_env()?)?);
    let media = Arc::new(CloudinaryStore::new(CloudinaryConfig::new_from_env()?)?);
    let webhook = WebhookConfig::new_from_env()?;

    let state = AppState {
        db: pool.clone(),
        media,
        verifier,
        webhook,
    };

    let cors_origin = std::env::var("CORS_ORIGIN").ok();
    let app = router(state, cors_origin.as_deref());

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let addr: SocketAddr = bind_addr.parse()?;
    info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
