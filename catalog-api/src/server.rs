//! API server setup

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

use crate::middleware::JwtConfig;
use crate::router::create_router;
use crate::state::AppState;
use crate::ServerConfig;

/// Create the API server
pub async fn create_server(
    config: &ServerConfig,
    jwt: JwtConfig,
) -> Result<(Router, SocketAddr), Box<dyn std::error::Error + Send + Sync>> {
    let state = AppState::new(&config.data_path, jwt).await?;
    let router = create_router(state);
    let addr: SocketAddr = config.bind_address().parse()?;
    Ok((router, addr))
}

/// Run the API server
pub async fn run_server(
    config: ServerConfig,
    jwt: JwtConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let (router, addr) = create_server(&config, jwt).await?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "catalog API listening");

    axum::serve(listener, router).await?;

    Ok(())
}
