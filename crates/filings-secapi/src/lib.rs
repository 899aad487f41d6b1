#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/filings/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! sec-api.io client.
//!
//! This crate implements the [`FilingsApi`] trait from `filings-core` for the
//! [sec-api.io](https://sec-api.io) service: identity mapping, full-text
//! filing search, XBRL-to-JSON conversion, filing-section extraction,
//! insider-transaction search, 13F holdings search, and compensation lookup.
//!
//! # Usage
//!
//! ```rust,ignore
//! use filings_secapi::SecApiClient;
//! use filings_core::FilingsApi;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SecApiClient::new("your_api_key");
//!
//!     let mappings = client.ticker_mappings("AAPL").await?;
//!     println!("CIK: {}", mappings[0].cik);
//!
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;
use filings_core::{
    CompensationRecord, EntityMapping, FilingRecord, FilingsApi, FilingsError, HoldingsFiling,
    HoldingsQuery, InsiderFiling, InsiderQuery, Result, XbrlInstance,
};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Base URL for the sec-api.io service.
const API_HOST: &str = "https://api.sec-api.io";

/// User agent sent with every request; the service asks for identification.
const USER_AGENT: &str = concat!("filings-secapi/", env!("CARGO_PKG_VERSION"));

/// Timeout for identity mapping lookups (small responses).
const MAPPING_TIMEOUT: Duration = Duration::from_secs(20);

/// Timeout for search endpoints.
const SEARCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for XBRL conversion, the slowest endpoint.
const XBRL_TIMEOUT: Duration = Duration::from_secs(60);

/// Hard cap the service places on search result sizes.
const MAX_SEARCH_SIZE: usize = 50;

/// sec-api.io client.
///
/// Authenticates with a query-parameter `token` plus an `Authorization`
/// header, and applies per-endpoint timeouts: a timeout surfaces as a
/// normal [`FilingsError::FetchFailed`], not a distinct condition.
#[derive(Clone)]
pub struct SecApiClient {
    client: Client,
    api_key: String,
}

impl fmt::Debug for SecApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecApiClient")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl SecApiClient {
    /// Create a new client with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            api_key: api_key.into(),
        }
    }

    /// Create a new client with a custom HTTP client.
    #[must_use]
    pub fn with_client(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
        }
    }

    /// Create a client from the `SEC_API_IO_KEY` environment variable.
    ///
    /// Returns `None` when the variable is unset or empty.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        match std::env::var("SEC_API_IO_KEY") {
            Ok(key) if !key.is_empty() => Some(Self::new(key)),
            _ => None,
        }
    }

    /// Start a GET request with percent-encoded query parameters.
    ///
    /// The auth token rides as the last query pair; volatile parameter
    /// values (document URLs, section names) must never be spliced into
    /// the endpoint string, or an embedded `&`/`#` corrupts the request.
    fn get(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        timeout: Duration,
    ) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{API_HOST}{endpoint}"))
            .query(params)
            .query(&[("token", self.api_key.as_str())])
            .header("Authorization", &self.api_key)
            .timeout(timeout)
    }

    /// GET an endpoint and parse the JSON response.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<T> {
        debug!(endpoint, "sec-api GET");
        let response = self
            .get(endpoint, params, timeout)
            .send()
            .await
            .map_err(|e| FilingsError::FetchFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FilingsError::FetchFailed(format!(
                "HTTP {} from {endpoint}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| FilingsError::FetchFailed(format!("invalid JSON from {endpoint}: {e}")))
    }

    /// GET an endpoint and return the body as text.
    async fn get_text(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<String> {
        debug!(endpoint, "sec-api GET (text)");
        let response = self
            .get(endpoint, params, timeout)
            .send()
            .await
            .map_err(|e| FilingsError::FetchFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FilingsError::FetchFailed(format!(
                "HTTP {} from {endpoint}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| FilingsError::FetchFailed(e.to_string()))
    }

    /// POST a JSON payload to an endpoint and parse the JSON response.
    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        payload: &Value,
        timeout: Duration,
    ) -> Result<T> {
        debug!(endpoint, "sec-api POST");
        let response = self
            .client
            .post(format!("{API_HOST}{endpoint}"))
            .query(&[("token", self.api_key.as_str())])
            .header("Authorization", &self.api_key)
            .timeout(timeout)
            .json(payload)
            .send()
            .await
            .map_err(|e| FilingsError::FetchFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FilingsError::FetchFailed(format!(
                "HTTP {} from {endpoint}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| FilingsError::FetchFailed(format!("invalid JSON from {endpoint}: {e}")))
    }
}

/// Build a Lucene range clause for `periodOfReport`.
///
/// Inputs are validated as `YYYY-MM-DD`; open ends render as `*`.
fn date_range(start: Option<&str>, end: Option<&str>) -> Result<Option<String>> {
    for date in [start, end].into_iter().flatten() {
        NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
            FilingsError::MalformedInput(format!("invalid date {date:?}, expected YYYY-MM-DD"))
        })?;
    }

    Ok(match (start, end) {
        (Some(s), Some(e)) => Some(format!("[{s} TO {e}]")),
        (Some(s), None) => Some(format!("[{s} TO *]")),
        (None, Some(e)) => Some(format!("[* TO {e}]")),
        (None, None) => None,
    })
}

/// Build the flat Lucene query string for an insider-transaction search.
fn insider_query_string(query: &InsiderQuery) -> Result<String> {
    let mut clauses = vec![format!(
        "issuer.tradingSymbol:{}",
        query.ticker.to_uppercase()
    )];
    if let Some(code) = &query.transaction_code {
        clauses.push(format!(
            "nonDerivativeTable.transactions.coding.code:{code}"
        ));
    }
    if let Some(range) = date_range(query.start_date.as_deref(), query.end_date.as_deref())? {
        clauses.push(format!("periodOfReport:{range}"));
    }
    Ok(clauses.join(" AND "))
}

/// Build the flat Lucene query string for a 13F holdings search.
fn holdings_query_string(query: &HoldingsQuery) -> String {
    let mut q = format!("holdings.ticker:{}", query.ticker.to_uppercase());
    if let Some(quarter) = &query.quarter {
        q.push_str(&format!(" AND periodOfReport:{quarter}"));
    }
    q
}

/// JSON payload for the full-text 10-K filing search.
fn filing_search_payload(cik: &str, count: usize) -> Value {
    json!({
        "query": { "query_string": { "query": format!("cik:{cik} AND formType:\"10-K\"") } },
        "from": "0",
        "size": count.to_string(),
        "sort": [{ "filedAt": { "order": "desc" } }],
    })
}

/// JSON payload for the insider-transaction search.
///
/// The service rejects sizes above 50, so the requested maximum is capped.
fn insider_search_payload(query: &InsiderQuery) -> Result<Value> {
    Ok(json!({
        "query": insider_query_string(query)?,
        "from": "0",
        "size": query.max_results.min(MAX_SEARCH_SIZE).to_string(),
        "sort": [{ "filedAt": { "order": "desc" } }],
    }))
}

/// JSON payload for the 13F holdings search.
fn holdings_search_payload(query: &HoldingsQuery) -> Value {
    json!({
        "query": holdings_query_string(query),
        "from": "0",
        "size": MAX_SEARCH_SIZE.to_string(),
        "sort": [{ "filedAt": { "order": "desc" } }],
    })
}

/// Body of a mapping endpoint response.
///
/// On success the service returns a list of candidates; error payloads are
/// JSON objects. A non-list body means "no candidates", the same not-found
/// outcome as an empty list, not a transport failure.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MappingResponse {
    Candidates(Vec<EntityMapping>),
    Other(Value),
}

impl MappingResponse {
    fn into_candidates(self) -> Vec<EntityMapping> {
        match self {
            Self::Candidates(list) => list,
            Self::Other(_) => Vec::new(),
        }
    }
}

/// Envelope of the full-text filing search response.
#[derive(Debug, Deserialize)]
struct FilingSearchResponse {
    #[serde(default)]
    filings: Vec<FilingRecord>,
}

/// Envelope of the insider-trading search response.
#[derive(Debug, Deserialize)]
struct InsiderSearchResponse {
    #[serde(default)]
    transactions: Vec<InsiderFiling>,
}

/// Envelope of the 13F holdings search response.
#[derive(Debug, Deserialize)]
struct HoldingsSearchResponse {
    #[serde(default)]
    data: Vec<HoldingsFiling>,
}

#[async_trait]
impl FilingsApi for SecApiClient {
    async fn ticker_mappings(&self, ticker: &str) -> Result<Vec<EntityMapping>> {
        let response: MappingResponse = self
            .get_json(&format!("/mapping/ticker/{ticker}"), &[], MAPPING_TIMEOUT)
            .await?;
        Ok(response.into_candidates())
    }

    async fn cik_mappings(&self, cik_padded: &str) -> Result<Vec<EntityMapping>> {
        let response: MappingResponse = self
            .get_json(&format!("/mapping/cik/{cik_padded}"), &[], MAPPING_TIMEOUT)
            .await?;
        Ok(response.into_candidates())
    }

    async fn annual_filings(&self, cik: &str, count: usize) -> Result<Vec<FilingRecord>> {
        let payload = filing_search_payload(cik, count);
        let response: FilingSearchResponse = self.post_json("", &payload, SEARCH_TIMEOUT).await?;
        Ok(response.filings)
    }

    async fn xbrl_instance(&self, canonical_url: &str) -> Result<XbrlInstance> {
        self.get_json(
            "/xbrl-to-json",
            &[("xbrl-url", canonical_url)],
            XBRL_TIMEOUT,
        )
        .await
    }

    async fn filing_section(&self, filing_url: &str, section: &str) -> Result<String> {
        self.get_text(
            "/extractor",
            &[("url", filing_url), ("item", section), ("type", "text")],
            SEARCH_TIMEOUT,
        )
        .await
    }

    async fn insider_filings(&self, query: &InsiderQuery) -> Result<Vec<InsiderFiling>> {
        let payload = insider_search_payload(query)?;
        let response: InsiderSearchResponse = self
            .post_json("/insider-trading", &payload, SEARCH_TIMEOUT)
            .await?;
        Ok(response.transactions)
    }

    async fn holdings_filings(&self, query: &HoldingsQuery) -> Result<Vec<HoldingsFiling>> {
        let payload = holdings_search_payload(query);
        let response: HoldingsSearchResponse = self
            .post_json("/form-13f/holdings", &payload, SEARCH_TIMEOUT)
            .await?;
        Ok(response.data)
    }

    async fn compensation_records(&self, ticker: &str) -> Result<Vec<CompensationRecord>> {
        self.get_json(
            &format!("/compensation/{}", ticker.to_uppercase()),
            &[],
            SEARCH_TIMEOUT,
        )
        .await
    }
}
