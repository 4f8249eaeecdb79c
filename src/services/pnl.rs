use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::{AssetClass, Fill, PnlPoint, PnlReport, SmoothedCurve, CURVE_SAMPLES};
use crate::infrastructure::{HyperliquidClient, RawFill, TransportError};
use crate::services::spline::CubicSpline;
use crate::services::spot_meta::SpotMetadataResolver;

/// Aggregates a wallet's fill history into a cumulative realized-PnL
/// series plus a smoothed rendering curve.
///
/// The pipeline is a sequence of pure stages over immutable values:
/// fetch -> synthetic timestamps + coercion -> classify/resolve ->
/// order/dedup -> accumulate -> fit.
pub struct PnlAggregator {
    client: Arc<HyperliquidClient>,
    spot_meta: SpotMetadataResolver,
}

impl PnlAggregator {
    pub fn new(client: Arc<HyperliquidClient>) -> Self {
        let spot_meta = SpotMetadataResolver::new(Arc::clone(&client));
        Self { client, spot_meta }
    }

    /// Fetch all fills for `wallet` over `[now - window_days, now]` and
    /// aggregate them into a `PnlReport`.
    ///
    /// A failed fills fetch (transport or HTTP status) degrades to an
    /// empty report: the end user sees "no data", not an exchange outage.
    /// A failed spot-metadata fetch propagates, since silently resolving
    /// nothing would drop every spot fill.
    pub async fn fetch_and_aggregate(
        &self,
        wallet: &str,
        window_days: i64,
        asset_class: AssetClass,
    ) -> Result<PnlReport, TransportError> {
        let now = Utc::now();
        let start = now - Duration::days(window_days);

        let raw_fills = match self
            .client
            .fetch_user_fills(wallet, start.timestamp_millis(), now.timestamp_millis())
            .await
        {
            Ok(fills) => fills,
            Err(e) => {
                warn!("fills fetch for {} failed, returning empty series: {}", wallet, e);
                return Ok(PnlReport::empty());
            }
        };

        let fills = assign_synthetic_timestamps(raw_fills, now);

        let filtered = match asset_class {
            AssetClass::Spot => {
                let names = self.spot_meta.resolve_spot_names().await?;
                filter_spot(fills, &names)
            }
            AssetClass::Perp => filter_perp(fills),
        };

        let ordered = sort_and_dedup(filtered);
        let points = accumulate(ordered);
        let curve = fit_curve(&points);

        info!(
            "aggregated {} {:?} points for {} ({} day window, curve: {})",
            points.len(),
            asset_class,
            wallet,
            window_days,
            curve.is_some()
        );

        Ok(PnlReport { points, curve })
    }
}

/// Turn raw fills into domain fills with a synthetic time axis: one-day
/// spacing ending at `now`, preserving fetch order.
///
/// The fills feed carries no usable per-fill time in this pipeline, so
/// position in the fetch order is the only real ordering key; the day
/// spacing only gives the curve a plottable axis. Realized PnL is coerced
/// here as well, in fetch order.
pub fn assign_synthetic_timestamps(raw: Vec<RawFill>, now: DateTime<Utc>) -> Vec<Fill> {
    let count = raw.len() as i64;

    raw.into_iter()
        .enumerate()
        .map(|(i, fill)| Fill {
            timestamp: now - Duration::days(count - 1 - i as i64),
            realized_pnl: coerce_realized_pnl(fill.closed_pnl.as_ref()),
            coin: fill.coin,
        })
        .collect()
}

/// Coerce the exchange's `closedPnl` value to a decimal. Absent or
/// malformed values count as zero rather than being excluded, so a bad
/// fill still occupies its slot in the series without moving the total.
pub fn coerce_realized_pnl(raw: Option<&serde_json::Value>) -> Decimal {
    match raw {
        Some(serde_json::Value::String(s)) => s.parse().unwrap_or(Decimal::ZERO),
        Some(serde_json::Value::Number(n)) => n
            .as_f64()
            .and_then(Decimal::from_f64_retain)
            .unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

/// Keep only spot fills and replace each internal code with its display
/// name. Fills whose code has no metadata entry are dropped.
pub fn filter_spot(fills: Vec<Fill>, names: &HashMap<String, String>) -> Vec<Fill> {
    fills
        .into_iter()
        .filter(|fill| fill.is_spot())
        .filter_map(|mut fill| match names.get(&fill.coin) {
            Some(display_name) => {
                fill.coin = display_name.clone();
                Some(fill)
            }
            None => None,
        })
        .collect()
}

/// Keep only perpetual fills (no spot marker prefix).
pub fn filter_perp(fills: Vec<Fill>) -> Vec<Fill> {
    fills.into_iter().filter(|fill| !fill.is_spot()).collect()
}

/// Stable sort ascending by timestamp, then keep only the first fill of
/// any group sharing a timestamp.
///
/// Synthetic timestamps cannot tie; under a future real-timestamp source
/// this would silently discard legitimate same-instant fills.
pub fn sort_and_dedup(mut fills: Vec<Fill>) -> Vec<Fill> {
    fills.sort_by_key(|fill| fill.timestamp);
    fills.dedup_by_key(|fill| fill.timestamp);
    fills
}

/// Running sum of realized PnL over the ordered fills, inclusive.
pub fn accumulate(fills: Vec<Fill>) -> Vec<PnlPoint> {
    let mut running = Decimal::ZERO;

    fills
        .into_iter()
        .map(|fill| {
            running += fill.realized_pnl;
            PnlPoint {
                timestamp: fill.timestamp,
                cumulative_pnl: running,
            }
        })
        .collect()
}

/// Fit a natural cubic spline through the cumulative series and resample
/// it at `CURVE_SAMPLES` evenly spaced points from the first to the last
/// timestamp. Fewer than 2 distinct timestamps yields no curve.
pub fn fit_curve(points: &[PnlPoint]) -> Option<SmoothedCurve> {
    let xs: Vec<f64> = points
        .iter()
        .map(|p| p.timestamp.timestamp_millis() as f64)
        .collect();
    let ys: Vec<f64> = points
        .iter()
        .map(|p| p.cumulative_pnl.to_f64().unwrap_or(0.0))
        .collect();

    let spline = CubicSpline::fit(&xs, &ys)?;
    let samples = spline.resample(CURVE_SAMPLES);

    let first = points.first()?;
    let last = points.last()?;
    let x0 = xs[0];

    let mut sample_timestamps = Vec::with_capacity(samples.len());
    let mut sample_values = Vec::with_capacity(samples.len());
    for (i, (x, y)) in samples.into_iter().enumerate() {
        // Endpoints map back to the exact input timestamps; interior
        // samples round to the nearest millisecond.
        let timestamp = if i == 0 {
            first.timestamp
        } else if i + 1 == CURVE_SAMPLES {
            last.timestamp
        } else {
            first.timestamp + Duration::milliseconds((x - x0).round() as i64)
        };
        sample_timestamps.push(timestamp);
        sample_values.push(y);
    }

    Some(SmoothedCurve {
        sample_timestamps,
        sample_values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn raw_fill(coin: &str, closed_pnl: Option<serde_json::Value>) -> RawFill {
        RawFill {
            coin: coin.to_string(),
            closed_pnl,
        }
    }

    fn fill(coin: &str, pnl: Decimal, timestamp: DateTime<Utc>) -> Fill {
        Fill {
            coin: coin.to_string(),
            realized_pnl: pnl,
            timestamp,
        }
    }

    #[test]
    fn test_coerce_realized_pnl() {
        assert_eq!(coerce_realized_pnl(Some(&json!("12.5"))), dec!(12.5));
        assert_eq!(coerce_realized_pnl(Some(&json!(-3.25))), dec!(-3.25));
        assert_eq!(coerce_realized_pnl(Some(&json!("bad"))), Decimal::ZERO);
        assert_eq!(coerce_realized_pnl(Some(&json!(null))), Decimal::ZERO);
        assert_eq!(coerce_realized_pnl(None), Decimal::ZERO);
    }

    #[test]
    fn test_synthetic_timestamps_daily_ending_now() {
        let now = Utc::now();
        let raw = vec![
            raw_fill("BTC", Some(json!("1"))),
            raw_fill("ETH", Some(json!("2"))),
            raw_fill("SOL", Some(json!("3"))),
        ];

        let fills = assign_synthetic_timestamps(raw, now);

        assert_eq!(fills.len(), 3);
        assert_eq!(fills[2].timestamp, now);
        assert_eq!(fills[1].timestamp, now - Duration::days(1));
        assert_eq!(fills[0].timestamp, now - Duration::days(2));
        // fetch order preserved
        assert_eq!(fills[0].coin, "BTC");
        assert!(fills.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn test_synthetic_timestamps_empty() {
        assert!(assign_synthetic_timestamps(Vec::new(), Utc::now()).is_empty());
    }

    #[test]
    fn test_spot_perp_filters_partition_fills() {
        let now = Utc::now();
        let fills = vec![
            fill("BTC", dec!(5), now - Duration::days(2)),
            fill("@1", dec!(10), now - Duration::days(1)),
            fill("ETH", dec!(-3), now),
        ];
        let names = HashMap::from([("@1".to_string(), "PURR".to_string())]);

        let spot = filter_spot(fills.clone(), &names);
        let perp = filter_perp(fills);

        assert_eq!(spot.len(), 1);
        assert_eq!(spot[0].coin, "PURR");
        assert_eq!(perp.len(), 2);
        assert!(perp.iter().all(|f| !f.is_spot()));
    }

    #[test]
    fn test_filter_spot_drops_unmapped_codes() {
        let now = Utc::now();
        let fills = vec![
            fill("@1", dec!(1), now - Duration::days(1)),
            fill("@9", dec!(2), now),
        ];
        let names = HashMap::from([("@1".to_string(), "PURR".to_string())]);

        let spot = filter_spot(fills, &names);

        assert_eq!(spot.len(), 1);
        assert_eq!(spot[0].coin, "PURR");
    }

    #[test]
    fn test_dedup_keeps_first_of_tied_timestamps() {
        let ts = Utc::now();
        let fills = vec![
            fill("BTC", dec!(5), ts),
            fill("ETH", dec!(7), ts),
            fill("SOL", dec!(1), ts + Duration::days(1)),
        ];

        let ordered = sort_and_dedup(fills);

        assert_eq!(ordered.len(), 2);
        assert_eq!(ordered[0].coin, "BTC");
        assert_eq!(ordered[1].coin, "SOL");
    }

    #[test]
    fn test_cumulative_series_with_coercion() {
        // realized_pnl [5, -3, "bad", 2] in timestamp order -> [5, 2, 2, 4]
        let now = Utc::now();
        let raw = vec![
            raw_fill("BTC", Some(json!("5"))),
            raw_fill("BTC", Some(json!("-3"))),
            raw_fill("BTC", Some(json!("bad"))),
            raw_fill("BTC", Some(json!("2"))),
        ];

        let fills = assign_synthetic_timestamps(raw, now);
        let points = accumulate(sort_and_dedup(fills));

        let series: Vec<Decimal> = points.iter().map(|p| p.cumulative_pnl).collect();
        assert_eq!(series, vec![dec!(5), dec!(2), dec!(2), dec!(4)]);
    }

    #[test]
    fn test_last_point_equals_total() {
        let now = Utc::now();
        let fills = vec![
            fill("BTC", dec!(1.5), now - Duration::days(2)),
            fill("ETH", dec!(-0.5), now - Duration::days(1)),
            fill("SOL", dec!(4), now),
        ];
        let total: Decimal = fills.iter().map(|f| f.realized_pnl).sum();

        let points = accumulate(sort_and_dedup(fills));

        assert_eq!(points.last().unwrap().cumulative_pnl, total);
    }

    #[test]
    fn test_fit_curve_sample_count_and_endpoints() {
        let now = Utc::now();
        let points: Vec<PnlPoint> = accumulate(vec![
            fill("BTC", dec!(5), now - Duration::days(3)),
            fill("BTC", dec!(-2), now - Duration::days(2)),
            fill("BTC", dec!(1), now - Duration::days(1)),
            fill("BTC", dec!(3), now),
        ]);

        let curve = fit_curve(&points).unwrap();

        assert_eq!(curve.sample_timestamps.len(), CURVE_SAMPLES);
        assert_eq!(curve.sample_values.len(), CURVE_SAMPLES);
        assert_eq!(curve.sample_timestamps[0], points[0].timestamp);
        assert_eq!(
            *curve.sample_timestamps.last().unwrap(),
            points.last().unwrap().timestamp
        );
        // curve passes through the first and last cumulative values
        assert!((curve.sample_values[0] - 5.0).abs() < 1e-6);
        assert!((curve.sample_values[CURVE_SAMPLES - 1] - 7.0).abs() < 1e-6);
    }

    #[test]
    fn test_fit_curve_degenerate_input() {
        assert!(fit_curve(&[]).is_none());

        let single = accumulate(vec![fill("BTC", dec!(5), Utc::now())]);
        assert_eq!(single.len(), 1);
        assert!(fit_curve(&single).is_none());
    }
}
