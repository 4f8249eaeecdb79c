use axum::{
    extract::{Query, State},
    Json,
};

use crate::api::{dto::*, errors::ApiError};
use crate::services::PnlAggregator;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<PnlAggregator>,
}

/// GET /health - Health check
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "pnlcurve-backend"
    }))
}

/// GET /pnl/curve?wallet=..&window_days=..&asset_class=spot|perp
pub async fn get_pnl_curve(
    State(state): State<AppState>,
    Query(query): Query<PnlCurveQuery>,
) -> Result<Json<PnlCurveResponse>, ApiError> {
    if query.wallet.trim().is_empty() {
        return Err(ApiError::BadRequest("wallet must not be empty".to_string()));
    }
    if query.window_days <= 0 {
        return Err(ApiError::BadRequest(format!(
            "window_days must be positive, got {}",
            query.window_days
        )));
    }

    let report = state
        .aggregator
        .fetch_and_aggregate(&query.wallet, query.window_days, query.asset_class)
        .await?;

    Ok(Json(PnlCurveResponse::from_report(query, report)))
}
