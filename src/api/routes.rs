use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::audit::SecurityAuditor;
use crate::reporting::ReportDocument;

use super::AppState;

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "blescope",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Deserialize)]
pub struct DevicesQuery {
    pub duration_secs: Option<f64>,
}

pub async fn list_devices(
    State(state): State<AppState>,
    Query(query): Query<DevicesQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let duration = Duration::from_secs_f64(query.duration_secs.unwrap_or(5.0));
    let devices = state.adapter.discover(duration).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": e.to_string()})),
        )
    })?;
    let total = devices.len();
    Ok(Json(json!({"devices": devices, "total": total})))
}

#[derive(Deserialize)]
pub struct CreateAuditRequest {
    pub address: String,
    pub timeout_secs: Option<f64>,
}

pub async fn create_audit(
    State(state): State<AppState>,
    Json(request): Json<CreateAuditRequest>,
) -> (StatusCode, Json<Value>) {
    let timeout = Duration::from_secs_f64(request.timeout_secs.unwrap_or(10.0));
    let auditor = SecurityAuditor::new(state.adapter.clone());
    let report = auditor.audit(&request.address, timeout).await;
    let document = ReportDocument::from_report(&report);

    let id = uuid::Uuid::new_v4().to_string();
    state.audits.insert(id.clone(), document.clone());
    (StatusCode::CREATED, Json(json!({"id": id, "report": document})))
}

pub async fn list_audits(State(state): State<AppState>) -> Json<Value> {
    let audits: Vec<Value> = state
        .audits
        .iter()
        .map(|entry| {
            let document = entry.value();
            json!({
                "id": entry.key(),
                "address": document.device.address,
                "name": document.device.name,
                "score": document.score,
                "grade": document.grade,
                "findings": document.findings.len(),
                "timestamp": document.timestamp,
            })
        })
        .collect();
    let total = audits.len();
    Json(json!({"audits": audits, "total": total}))
}

pub async fn get_audit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ReportDocument>, (StatusCode, Json<Value>)> {
    match state.audits.get(&id) {
        Some(entry) => Ok(Json(entry.value().clone())),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Audit not found"})),
        )),
    }
}
