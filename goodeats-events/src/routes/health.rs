use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use diesel::prelude::*;
use std::sync::Arc;

use goodeats_shared::clients::db::connection;
use goodeats_shared::types::api::{HealthCheck, HealthResponse, HealthStatus};

use crate::AppState;

pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let database = match connection(&state.db)
        .and_then(|mut conn| Ok(diesel::sql_query("SELECT 1").execute(&mut conn)?))
    {
        Ok(_) => HealthCheck::passed("database"),
        Err(e) => HealthCheck::failed("database", e.to_string()),
    };
    let rabbitmq = if state.rabbitmq.is_connected() {
        HealthCheck::passed("rabbitmq")
    } else {
        HealthCheck::failed("rabbitmq", "channel closed")
    };

    let response = HealthResponse::healthy("goodeats-events", env!("CARGO_PKG_VERSION"))
        .with_checks(vec![database, rabbitmq]);
    let status = match response.status {
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
    };
    (status, Json(response))
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> String {
    state.metrics.render()
}
