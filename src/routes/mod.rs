use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::config::Config;
use crate::session_factory::actor_client::SessionFactoryClient;

mod game;
mod health;
mod metrics;

pub fn create_router(config: &Config) -> Router<Arc<SessionFactoryClient>> {
    Router::new()
        .route("/health", get(health::get))
        .route("/metrics", get(metrics::metrics_handler))
        .route("/game", post(game::create))
        .route("/game/:game_id/ws", get(game::connect_main_device))
        .route("/game/code/:room_code", get(game::get_by_code))
        .route("/game/code/:room_code/ws", get(game::connect_timer_device))
        .layer(if config.allow_cors {
            log::info!("CorsLayer Permissive");
            CorsLayer::permissive()
        } else {
            CorsLayer::default()
        })
}
