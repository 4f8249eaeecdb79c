use serde::{Deserialize, Serialize};
use rust_decimal::Decimal;
use chrono::{DateTime, Utc};

use crate::domain::{AssetClass, PnlPoint, PnlReport, SmoothedCurve};

/// Query parameters for the PnL curve endpoint
#[derive(Debug, Deserialize)]
pub struct PnlCurveQuery {
    pub wallet: String,
    pub window_days: i64,
    pub asset_class: AssetClass,
}

/// One point of the cumulative PnL series
#[derive(Debug, Serialize)]
pub struct PnlPointDto {
    pub timestamp: DateTime<Utc>,
    pub cumulative_pnl: Decimal,
}

impl From<PnlPoint> for PnlPointDto {
    fn from(point: PnlPoint) -> Self {
        Self {
            timestamp: point.timestamp,
            cumulative_pnl: point.cumulative_pnl,
        }
    }
}

/// Smoothed curve samples for rendering
#[derive(Debug, Serialize)]
pub struct SmoothedCurveDto {
    pub sample_timestamps: Vec<DateTime<Utc>>,
    pub sample_values: Vec<f64>,
}

impl From<SmoothedCurve> for SmoothedCurveDto {
    fn from(curve: SmoothedCurve) -> Self {
        Self {
            sample_timestamps: curve.sample_timestamps,
            sample_values: curve.sample_values,
        }
    }
}

/// PnL curve response
#[derive(Debug, Serialize)]
pub struct PnlCurveResponse {
    pub wallet: String,
    pub window_days: i64,
    pub asset_class: AssetClass,
    pub points: Vec<PnlPointDto>,
    pub curve: Option<SmoothedCurveDto>,
}

impl PnlCurveResponse {
    pub fn from_report(query: PnlCurveQuery, report: PnlReport) -> Self {
        Self {
            wallet: query.wallet,
            window_days: query.window_days,
            asset_class: query.asset_class,
            points: report.points.into_iter().map(PnlPointDto::from).collect(),
            curve: report.curve.map(SmoothedCurveDto::from),
        }
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
