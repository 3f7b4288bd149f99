use axum::{routing::{get, post}, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod config;
mod events;
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
    init_tracing("goodeats-social");

    let config = AppConfig::load()?;
    let port = config.port;
    std::env::set_var("JWT_SECRET", &config.jwt_secret);

    let db = create_pool(&config.database_url, config.db_pool_size)?;
    let rabbitmq = RabbitMQClient::connect(&config.rabbitmq_url).await?;
    let metrics = init_metrics()?;

    let state = Arc::new(AppState { db, rabbitmq, metrics });

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        .route("/profile", post(routes::profile::create_profile))
        .route("/me", get(routes::profile::get_profile).patch(routes::profile::update_profile))
        .route("/me/stats", get(routes::profile::get_stats))
        .route("/me/upcoming", get(routes::profile::get_upcoming))
        .route("/users/:id", get(routes::profile::get_public_profile))
        .route("/feed", get(routes::feed::get_feed))
        .route("/posts", post(routes::feed::create_post))
        .route("/posts/:id/like", post(routes::feed::like_post).delete(routes::feed::unlike_post))
        .route("/posts/:id/comments", get(routes::feed::list_comments).post(routes::feed::add_comment))
        .route("/friends", get(routes::friends::list_friends))
        .route("/friends/:id", axum::routing::delete(routes::friends::remove_friend))
        .layer(axum::middleware::from_fn(metrics_middleware))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "goodeats-social starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
