//! authgate server binary

use authgate::{
    create_router, AppState, AuthConfig, CredentialStore, MemoryCredentialStore,
    PgCredentialStore,
};

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AuthConfig::from_env();
    config.validate().expect("Invalid configuration");

    let store: Arc<dyn CredentialStore> = match &config.database_url {
        Some(url) => {
            let store = PgCredentialStore::connect(url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Using PostgreSQL credential store");
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory credential store");
            Arc::new(MemoryCredentialStore::new())
        }
    };

    let state = AppState::new(&config, store);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind listen address");
    tracing::info!(addr = %config.bind_addr, "Server listening");

    axum::serve(listener, app).await.expect("Server error");
}
