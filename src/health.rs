//! Liveness endpoint for the hosting platform.
//!
//! Runs beside the bot and shares nothing with form handling.

use std::future::Future;
use std::net::{Ipv4Addr, SocketAddr};

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::info;

pub const HEALTH_PATH: &str = "/health";

/// Router serving `GET /health`
pub fn router() -> Router {
    Router::new().route(HEALTH_PATH, get(health))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Bind the liveness listener on `0.0.0.0:<port>`
pub async fn bind(port: u16) -> std::io::Result<TcpListener> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, path = HEALTH_PATH, "Health server listening");
    Ok(listener)
}

/// Serve the liveness endpoint until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown)
        .await
}
