pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::recruiter::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/match", post(handlers::handle_match))
        .with_state(state)
}
