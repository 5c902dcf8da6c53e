//! Userbase server entry point
//!
//! Startup order matters: the schema must be initialized and self-healed
//! before the service starts accepting requests.

use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::EnvFilter;

use userbase::{create_router, AppConfig, AppState, AuthService, UserStore};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    if let Err(err) = config.auth.validate() {
        tracing::error!("invalid configuration: {err}");
        std::process::exit(1);
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("failed to open database");

    let store = UserStore::new(pool);
    store
        .init_schema()
        .await
        .expect("schema initialization failed");
    store
        .ensure_credential_column()
        .await
        .expect("schema self-heal failed");

    let auth = Arc::new(AuthService::new(store.clone(), config.auth.clone()));
    let app = create_router(AppState { store, auth });

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("failed to bind listener");
    tracing::info!("listening on {}", config.bind_addr);
    axum::serve(listener, app).await.expect("server error");
}
