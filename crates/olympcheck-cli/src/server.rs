//! HTTP API: liveness probe and diploma check.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use olympcheck_core::PersonQuery;
use olympcheck_fetch::{DiplomaChecker, Transport};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Any origin, method and header may call the API from a browser.
pub fn router<T: Transport + 'static>(checker: Arc<DiplomaChecker<T>>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/check", post(check::<T>))
        .with_state(checker)
        .layer(CorsLayer::permissive())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// 200 with the diploma list, or 404 when nothing was found. A 404 does not
/// distinguish "no diplomas" from "every year failed to fetch".
async fn check<T: Transport + 'static>(
    State(checker): State<Arc<DiplomaChecker<T>>>,
    Json(person): Json<PersonQuery>,
) -> Response {
    let diplomas = checker.check(&person).await;
    if diplomas.is_empty() {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "No diplomas found" })),
        )
            .into_response();
    }
    Json(diplomas).into_response()
}

pub async fn serve<T: Transport + 'static>(
    checker: Arc<DiplomaChecker<T>>,
    addr: SocketAddr,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(addr = %addr, "serving diploma checks");
    axum::serve(listener, router(checker))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server")?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
