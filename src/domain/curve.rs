use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of evenly spaced samples the smoothed curve is rendered at.
pub const CURVE_SAMPLES: usize = 300;

/// One element of the cumulative PnL series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PnlPoint {
    pub timestamp: DateTime<Utc>,
    pub cumulative_pnl: Decimal,
}

/// Evenly spaced resampling of the PnL series for rendering.
///
/// Values are f64: the curve exists purely for visual smoothing, so the
/// exact-decimal guarantees of the series are not carried through the
/// spline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmoothedCurve {
    pub sample_timestamps: Vec<DateTime<Utc>>,
    pub sample_values: Vec<f64>,
}

/// Result of one aggregation run. `curve` is absent when the filtered
/// series is empty or has fewer than 2 distinct timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PnlReport {
    pub points: Vec<PnlPoint>,
    pub curve: Option<SmoothedCurve>,
}

impl PnlReport {
    pub fn empty() -> Self {
        Self {
            points: Vec::new(),
            curve: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
