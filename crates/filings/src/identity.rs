//! Ticker and CIK identity resolution.
//!
//! Maps ticker symbols to registrant identity records and CIKs to display
//! names, memoizing both directions. Name resolution never fails: on any
//! error it degrades to the raw identifier, and callers must treat the
//! result as a best-effort display name, never a validated identity.

use std::fmt;
use std::sync::Arc;

use filings_core::{EntityMapping, FilingsApi, FilingsError, Result};
use filings_cache::LruCache;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Capacity of the ticker → identity cache.
const TICKER_CACHE_CAPACITY: usize = 1024;

/// Capacity of the CIK → display-name cache.
const NAME_CACHE_CAPACITY: usize = 2048;

/// A best-effort display name for a registrant.
///
/// Name resolution degrades gracefully: when the mapping endpoint fails or
/// returns nothing usable, the raw identifier stands in for the name. The
/// two cases stay distinguishable so callers can tell a resolved identity
/// from a fallback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisplayName {
    /// The registered entity name from the mapping endpoint.
    Resolved(String),
    /// The raw identifier, used because resolution failed.
    Fallback(String),
}

impl DisplayName {
    /// The display string, whichever case applies.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Resolved(name) | Self::Fallback(name) => name,
        }
    }

    /// Whether the name came from a successful lookup.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolves tickers to identity records and CIKs to display names.
///
/// Both directions are memoized in bounded caches; only the outcome of a
/// completed resolution is stored, so a failed ticker lookup is retried on
/// the next call while a fallback display name (a completed resolution) is
/// cached like any other.
#[derive(Debug)]
pub struct IdentityResolver {
    api: Arc<dyn FilingsApi>,
    tickers: Mutex<LruCache<String, EntityMapping>>,
    names: Mutex<LruCache<String, DisplayName>>,
}

impl IdentityResolver {
    /// Create a resolver backed by the given API.
    #[must_use]
    pub fn new(api: Arc<dyn FilingsApi>) -> Self {
        Self {
            api,
            tickers: Mutex::new(LruCache::new(TICKER_CACHE_CAPACITY)),
            names: Mutex::new(LruCache::new(NAME_CACHE_CAPACITY)),
        }
    }

    /// Resolve a ticker symbol to its identity record.
    ///
    /// Selects the first candidate the mapping endpoint returns; fails with
    /// [`FilingsError::NotFound`] when the candidate list is empty. Memoized
    /// by the ticker exactly as given (no case folding).
    pub async fn resolve_ticker(&self, ticker: &str) -> Result<EntityMapping> {
        if let Some(mapping) = self.tickers.lock().await.get(&ticker.to_string()) {
            debug!(ticker, "Identity cache hit");
            return Ok(mapping.clone());
        }

        let candidates = self.api.ticker_mappings(ticker).await?;
        let mapping = candidates.into_iter().next().ok_or_else(|| {
            FilingsError::NotFound(format!("Ticker {ticker} not found in SEC mapping API"))
        })?;

        self.tickers
            .lock()
            .await
            .insert(ticker.to_string(), mapping.clone());
        Ok(mapping)
    }

    /// Resolve a CIK to a best-effort display name.
    ///
    /// Pads the identifier to 10 digits (the mapping endpoint requires this
    /// width) and returns the first candidate's name. On any failure -
    /// network error, malformed payload, missing or empty name - the raw,
    /// un-padded identifier is returned as a [`DisplayName::Fallback`]
    /// rather than an error.
    pub async fn resolve_name(&self, cik: &str) -> DisplayName {
        if let Some(name) = self.names.lock().await.get(&cik.to_string()) {
            debug!(cik, "Name cache hit");
            return name.clone();
        }

        let padded = format!("{cik:0>10}");
        let name = match self.api.cik_mappings(&padded).await {
            Ok(candidates) => match candidates.into_iter().next().and_then(|m| m.name) {
                Some(name) if !name.is_empty() => DisplayName::Resolved(name),
                _ => DisplayName::Fallback(cik.to_string()),
            },
            Err(e) => {
                warn!(cik, error = %e, "CIK name resolution failed, using raw identifier");
                DisplayName::Fallback(cik.to_string())
            }
        };

        self.names
            .lock()
            .await
            .insert(cik.to_string(), name.clone());
        name
    }
}
