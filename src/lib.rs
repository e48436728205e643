pub mod config;
pub mod controllers;
pub mod database;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::{response::Json, routing::get, Router};
use serde_json::json;

use middleware::cors::{cors_middleware, cors_middleware_with_origins};
use state::AppState;

/// Construir el router completo de la aplicación
pub fn create_app(state: AppState) -> Router {
    let cors = if state.config.cors_origins.is_empty() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(state.config.cors_origins.clone())
    };

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/users", routes::user_routes::create_user_router(state.clone()))
        .nest("/api/owner", routes::owner_routes::create_owner_router(state.clone()))
        .nest(
            "/api/bookings",
            routes::booking_routes::create_booking_router(state.clone()),
        )
        .layer(cors)
        .with_state(state)
}

/// Health check simple
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "service": "car-rental-backend",
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
