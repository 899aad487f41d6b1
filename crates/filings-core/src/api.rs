//! Trait over the remote filings/XBRL API.
//!
//! The resolution engines depend on this trait rather than on a concrete
//! HTTP client, so tests can substitute in-memory transports and count
//! remote calls.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::Result,
    types::{
        CompensationRecord, EntityMapping, FilingRecord, HoldingsFiling, HoldingsQuery,
        InsiderFiling, InsiderQuery, XbrlInstance,
    },
};

/// A fallible, rate-limited source of filings, XBRL content and ownership data.
///
/// All methods map transport-level failures (network errors, non-2xx status,
/// malformed bodies) to [`FilingsError::FetchFailed`](crate::FilingsError::FetchFailed).
#[async_trait]
pub trait FilingsApi: Send + Sync + Debug {
    /// Candidate identity mappings for a ticker symbol.
    async fn ticker_mappings(&self, ticker: &str) -> Result<Vec<EntityMapping>>;

    /// Candidate identity mappings for a zero-padded 10-digit CIK.
    async fn cik_mappings(&self, cik_padded: &str) -> Result<Vec<EntityMapping>>;

    /// The latest annual (10-K) filings for a registrant, newest first.
    async fn annual_filings(&self, cik: &str, count: usize) -> Result<Vec<FilingRecord>>;

    /// Convert and download an XBRL instance document.
    ///
    /// Callers pass the canonical URL; the conversion is the expensive call
    /// the document cache exists to avoid repeating.
    async fn xbrl_instance(&self, canonical_url: &str) -> Result<XbrlInstance>;

    /// Extract one section of a filing as plain text.
    async fn filing_section(&self, filing_url: &str, section: &str) -> Result<String>;

    /// Insider (Form 4/5) filings matching a query, newest first.
    async fn insider_filings(&self, query: &InsiderQuery) -> Result<Vec<InsiderFiling>>;

    /// 13F holdings filings matching a query, newest first.
    async fn holdings_filings(&self, query: &HoldingsQuery) -> Result<Vec<HoldingsFiling>>;

    /// Executive compensation records for a ticker.
    async fn compensation_records(&self, ticker: &str) -> Result<Vec<CompensationRecord>>;
}
