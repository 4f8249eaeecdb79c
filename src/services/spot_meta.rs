use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::infrastructure::{HyperliquidClient, SpotToken, SpotUniverseEntry, TransportError};

/// Resolves internal spot market codes ("@N") to token display names.
///
/// The mapping is a pure function of one metadata fetch; nothing is cached
/// across requests (freshness over reuse).
pub struct SpotMetadataResolver {
    client: Arc<HyperliquidClient>,
}

impl SpotMetadataResolver {
    pub fn new(client: Arc<HyperliquidClient>) -> Self {
        Self { client }
    }

    /// Fetch the exchange-wide spot universe and map internal market codes
    /// to display names. Empty exchange tables yield an empty map, not an
    /// error; transport failure propagates.
    pub async fn resolve_spot_names(&self) -> Result<HashMap<String, String>, TransportError> {
        let meta = self.client.fetch_spot_meta().await?;
        let names = join_spot_tables(&meta.tokens, &meta.universe);
        debug!("resolved {} spot market names", names.len());
        Ok(names)
    }
}

/// Inner join of the token and universe tables on their shared index.
/// Rows without a counterpart on the other side are dropped.
pub fn join_spot_tables(
    tokens: &[SpotToken],
    universe: &[SpotUniverseEntry],
) -> HashMap<String, String> {
    let names_by_index: HashMap<u32, &str> = tokens
        .iter()
        .map(|token| (token.index, token.name.as_str()))
        .collect();

    universe
        .iter()
        .filter_map(|entry| {
            names_by_index
                .get(&entry.index)
                .map(|name| (entry.name.clone(), (*name).to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(name: &str, index: u32) -> SpotToken {
        SpotToken {
            name: name.to_string(),
            index,
        }
    }

    fn entry(name: &str, index: u32) -> SpotUniverseEntry {
        SpotUniverseEntry {
            name: name.to_string(),
            index,
        }
    }

    #[test]
    fn test_join_matches_on_index() {
        let tokens = vec![token("PURR", 1), token("HFUN", 2)];
        let universe = vec![entry("@1", 1), entry("@2", 2)];

        let names = join_spot_tables(&tokens, &universe);

        assert_eq!(names.len(), 2);
        assert_eq!(names["@1"], "PURR");
        assert_eq!(names["@2"], "HFUN");
    }

    #[test]
    fn test_join_drops_unmatched_rows() {
        // token index 3 has no universe row, universe index 9 has no token
        let tokens = vec![token("PURR", 1), token("ORPHAN", 3)];
        let universe = vec![entry("@1", 1), entry("@9", 9)];

        let names = join_spot_tables(&tokens, &universe);

        assert_eq!(names.len(), 1);
        assert_eq!(names["@1"], "PURR");
        assert!(!names.contains_key("@9"));
    }

    #[test]
    fn test_join_empty_tables() {
        assert!(join_spot_tables(&[], &[]).is_empty());
        assert!(join_spot_tables(&[token("PURR", 1)], &[]).is_empty());
        assert!(join_spot_tables(&[], &[entry("@1", 1)]).is_empty());
    }
}
