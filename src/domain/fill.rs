use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Prefix Hyperliquid uses for spot market codes (e.g. "@107").
/// Perpetual codes are plain symbols ("BTC", "ETH") without it.
pub const SPOT_MARKER_PREFIX: &str = "@";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Spot,
    Perp,
}

/// One matched trade event after schema coercion.
///
/// `timestamp` is synthetic: the exchange feed carries no usable per-fill
/// time here, so the pipeline assigns strictly increasing timestamps that
/// preserve fetch order. It must not be read as genuine event time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fill {
    pub coin: String,
    pub realized_pnl: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl Fill {
    pub fn is_spot(&self) -> bool {
        self.coin.starts_with(SPOT_MARKER_PREFIX)
    }
}
