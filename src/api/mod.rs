//! REST API for the web dashboard.
//!
//! Thin HTTP surface over the same adapter and audit engine the CLI uses.
//! Finished audit reports are kept in an in-memory registry keyed by a
//! generated id; every audit request gets its own report instance.

pub mod routes;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use dashmap::DashMap;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::ble::BleAdapter;
use crate::errors::BlescopeError;
use crate::reporting::ReportDocument;

#[derive(Clone)]
pub struct AppState {
    pub adapter: Arc<dyn BleAdapter>,
    pub audits: Arc<DashMap<String, ReportDocument>>,
}

impl AppState {
    pub fn new(adapter: Arc<dyn BleAdapter>) -> Self {
        Self {
            adapter,
            audits: Arc::new(DashMap::new()),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/devices", get(routes::list_devices))
        .route(
            "/api/audits",
            post(routes::create_audit).get(routes::list_audits),
        )
        .route("/api/audits/{id}", get(routes::get_audit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: AppState, host: &str, port: u16) -> Result<(), BlescopeError> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "Dashboard API listening");
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
