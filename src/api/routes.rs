use axum::{routing::get, Router};

use super::handlers::*;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // PnL curve
        .route("/pnl/curve", get(get_pnl_curve))
        .with_state(state)
}
