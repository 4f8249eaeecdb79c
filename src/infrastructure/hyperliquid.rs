use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::infrastructure::TransportError;

const MAINNET_INFO_URL: &str = "https://api.hyperliquid.xyz/info";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// One fill object as the exchange sends it.
///
/// `closedPnl` is exchange-defined (string on mainnet, but treated as
/// string-or-number here); it stays a raw value until the aggregation
/// pipeline's coercion step, where absent/malformed collapses to zero.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFill {
    pub coin: String,
    #[serde(default, rename = "closedPnl")]
    pub closed_pnl: Option<serde_json::Value>,
}

/// Tradable token row of the spot metadata payload.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotToken {
    pub name: String,
    pub index: u32,
}

/// Spot market code row of the spot metadata payload. `name` is the
/// internal "@N" code fills are tagged with; `index` correlates it with a
/// token row.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotUniverseEntry {
    pub name: String,
    pub index: u32,
}

/// First element of the `spotMetaAndAssetCtxs` response array.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpotMeta {
    #[serde(default)]
    pub tokens: Vec<SpotToken>,
    #[serde(default)]
    pub universe: Vec<SpotUniverseEntry>,
}

/// Client for the Hyperliquid `/info` endpoint.
///
/// Every request is a POST to the same URL with a `type` discriminator in
/// the JSON body. Requests carry a bounded timeout; a timeout surfaces as
/// `TransportError::Request`.
#[derive(Clone)]
pub struct HyperliquidClient {
    http_client: reqwest::Client,
    info_url: String,
    timeout: Duration,
}

impl HyperliquidClient {
    pub fn new(info_url: String, timeout: Duration) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            info_url,
            timeout,
        }
    }

    /// Create against the public mainnet info endpoint.
    pub fn new_mainnet() -> Self {
        Self::new(MAINNET_INFO_URL.to_string(), DEFAULT_TIMEOUT)
    }

    pub fn info_url(&self) -> &str {
        &self.info_url
    }

    /// Fetch all fills for `wallet` in `[start_time_ms, end_time_ms]`.
    ///
    /// A non-success status is returned as `TransportError::Status`; the
    /// caller decides whether that is fatal.
    pub async fn fetch_user_fills(
        &self,
        wallet: &str,
        start_time_ms: i64,
        end_time_ms: i64,
    ) -> Result<Vec<RawFill>, TransportError> {
        let body = serde_json::json!({
            "type": "userFillsByTime",
            "user": wallet,
            "startTime": start_time_ms,
            "endTime": end_time_ms,
            "aggregateByTime": false,
        });

        let response = self
            .http_client
            .post(&self.info_url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status { status });
        }

        let fills = response.json::<Vec<RawFill>>().await?;
        debug!("fetched {} fills for {}", fills.len(), wallet);

        Ok(fills)
    }

    /// Fetch the exchange-wide spot metadata tables.
    ///
    /// The response is a two-element array; only the first element (tokens
    /// and universe) is used. Transport and HTTP-status failures are
    /// errors; a body that does not decode to the expected shape degrades
    /// to empty tables.
    pub async fn fetch_spot_meta(&self) -> Result<SpotMeta, TransportError> {
        let body = serde_json::json!({ "type": "spotMetaAndAssetCtxs" });

        let response = self
            .http_client
            .post(&self.info_url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status { status });
        }

        match response.json::<(SpotMeta, serde_json::Value)>().await {
            Ok((meta, _asset_ctxs)) => {
                debug!(
                    "fetched spot metadata: {} tokens, {} universe entries",
                    meta.tokens.len(),
                    meta.universe.len()
                );
                Ok(meta)
            }
            Err(e) => {
                warn!("spot metadata did not decode, treating as empty: {}", e);
                Ok(SpotMeta::default())
            }
        }
    }
}
