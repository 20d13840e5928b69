//! graphql-api バイナリのエントリポイント

use anyhow::{anyhow, Result};
use graphql_api::{build_schema, RequireToken, Server, Services};
use infrastructure::{seed_demo_data, MemoryGraph, SessionExecutor};
use shared::{init_tracing, Config};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format).map_err(|e| anyhow!("failed to initialise tracing: {e}"))?;

    // ストアは起動ごとに新しく作る
    let executor = SessionExecutor::new(Arc::new(MemoryGraph::new()));
    let services = Services::from_config(&config);

    if config.seed_demo_data {
        seed_demo_data(&executor, services.ids.as_ref(), &services.passwords).await?;
    }

    let policy = Arc::new(RequireToken::new(services.tokens.clone()));
    let server = Server::new(build_schema(services, policy), executor);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, environment = %config.environment, "GraphQL server starting");

    axum::serve(listener, server.router()).await?;

    Ok(())
}
