//! Devconnect API server binary.
//!
//! Wires the in-memory document store and the live GitHub client into the
//! router and serves it.

use std::sync::Arc;

use devconnect_api::providers::github::HttpGithubClient;
use devconnect_api::stores::{
    MemoryPostRepository, MemoryProfileRepository, MemoryUserRepository,
};
use devconnect_api::{api_router, ApiConfig, ApiEnvironment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DEVCONNECT_* overrides
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "devconnect_api=info,tower_http=info".into()),
        )
        .init();

    let config = ApiConfig::from_env();
    let bind_addr = config.bind_addr.clone();

    let env = Arc::new(ApiEnvironment::new(
        config.clone(),
        MemoryUserRepository::new(),
        MemoryProfileRepository::new(),
        MemoryPostRepository::new(),
        HttpGithubClient::new(config.github),
    ));

    let app = api_router(env);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "devconnect API listening");

    axum::serve(listener, app).await?;
    Ok(())
}
