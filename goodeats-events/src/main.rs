use axum::{routing::{get, post}, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod config;
mod events;
mod ledger;
mod models;
mod routes;
mod schema;
mod services;

use config::AppConfig;
use goodeats_shared::clients::db::{create_pool, DbPool};
use goodeats_shared::clients::rabbitmq::RabbitMQClient;
use goodeats_shared::middleware::{init_metrics, init_tracing, metrics_middleware};

pub struct AppState {
    pub db: DbPool,
    pub rabbitmq: RabbitMQClient,
    pub metrics: PrometheusHandle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("goodeats-events");

    let config = AppConfig::load()?;
    let port = config.port;
    // The auth extractor reads the signing secret from the environment.
    std::env::set_var("JWT_SECRET", &config.jwt_secret);

    let db = create_pool(&config.database_url, config.db_pool_size)?;
    let rabbitmq = RabbitMQClient::connect(&config.rabbitmq_url).await?;
    let metrics = init_metrics()?;

    let state = Arc::new(AppState { db, rabbitmq, metrics });

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        .route("/events", get(routes::events::list_events).post(routes::events::create_event))
        .route("/events/:id", get(routes::events::get_event).patch(routes::events::update_event))
        .route("/events/:id/rsvp", get(routes::rsvps::get_my_rsvp).post(routes::rsvps::submit_rsvp))
        .route("/events/:id/roster", get(routes::rsvps::get_roster))
        .route("/events/:id/meal-plan", get(routes::rsvps::get_meal_plan))
        .route("/calendar", get(routes::calendar::get_calendar))
        // Internal service-to-service endpoints (no auth)
        .route("/internal/events/:id/recount", post(routes::internal::recount_attendees))
        .layer(axum::middleware::from_fn(metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "goodeats-events starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
