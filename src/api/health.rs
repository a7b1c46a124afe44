//! Liveness and readiness probes

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::AppState;
use crate::db::schema_sync;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Readiness report. `missing_tables` lists tables the store lacks.
#[derive(Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub database: bool,
    pub missing_tables: Vec<&'static str>,
}

async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// 200 when the store answers and has every table, 503 otherwise
async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let report = match schema_sync::missing_tables(state.db.pool()).await {
        Ok(missing_tables) => ReadyResponse {
            ready: missing_tables.is_empty(),
            database: true,
            missing_tables,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check could not reach the store");
            ReadyResponse {
                ready: false,
                database: false,
                missing_tables: Vec::new(),
            }
        }
    };

    let status = if report.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
}
