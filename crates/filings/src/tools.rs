//! The tool surface exposed to the research-assistant layer.
//!
//! Every tool is string-in/string-out (the snapshot returns JSON): engine
//! errors are converted into descriptive messages at this boundary and are
//! never allowed to surface as faults. The caching layers underneath mean
//! repeated calls against the same documents cost one remote fetch.

use std::sync::Arc;

use filings_core::{
    expect_xbrl, FilingRecord, FilingsApi, FilingsError, HoldingsQuery, InsiderQuery,
};
use indexmap::IndexMap;
use serde_json::{json, Map, Value};
use tracing::info;

use crate::documents::DocumentStore;
use crate::format::{group_thousands, truncate_chars};
use crate::identity::IdentityResolver;
use crate::metrics::{self, ResolvedMetric, DEFAULT_STRICT_SECTION};
use crate::{holdings, insider};

/// Maximum length (in characters) of returned section text.
const SECTION_TEXT_LIMIT: usize = 3900;

/// Research tools over SEC filings data.
///
/// Wraps one [`FilingsApi`] with the identity and document caches and
/// presents the report-formatting operations on top.
#[derive(Debug)]
pub struct ResearchTools {
    api: Arc<dyn FilingsApi>,
    identity: IdentityResolver,
    documents: DocumentStore,
}

impl ResearchTools {
    /// Create the tool set backed by the given API.
    #[must_use]
    pub fn new(api: Arc<dyn FilingsApi>) -> Self {
        Self {
            identity: IdentityResolver::new(Arc::clone(&api)),
            documents: DocumentStore::new(Arc::clone(&api)),
            api,
        }
    }

    /// Convert a CIK to its entity name.
    ///
    /// ```text
    /// map_cik_to_name("924171") → "CIK 924171 → BlackRock Fund Advisors"
    /// ```
    pub async fn map_cik_to_name(&self, cik: &str) -> String {
        let name = self.identity.resolve_name(cik).await;
        format!("CIK {cik} → {name}")
    }

    /// List the latest 10-K filings for a ticker, with XBRL instance URLs.
    pub async fn latest_annual_filings(&self, ticker: &str, count: usize) -> String {
        let mapping = match self.identity.resolve_ticker(ticker).await {
            Ok(mapping) => mapping,
            Err(e) => return format!("Error while fetching filings: {e}"),
        };
        let cik = &mapping.cik;

        let filings = match self.api.annual_filings(cik, count).await {
            Ok(filings) => filings,
            Err(e) => return format!("Error while fetching filings: {e}"),
        };
        if filings.is_empty() {
            return format!("No recent 10-K filings found for {ticker} (CIK {cik}).");
        }

        info!(ticker, count = filings.len(), "Listing annual filings");
        let mut lines = vec![format!(
            "Found {} 10-K filings for {ticker} (CIK {cik}):\n",
            filings.len()
        )];
        for filing in &filings {
            let filed_at = truncate_chars(filing.filed_at.as_deref().unwrap_or("N/A"), 10);
            let html = filing.link_to_filing_details.as_deref().unwrap_or("N/A");
            let xbrl = xbrl_instance_url(filing);
            lines.push(format!(
                "• {filed_at} → HTML: {html}  |  XBRL: {}",
                xbrl.as_deref().unwrap_or("⚠️ not found")
            ));
        }
        lines.join("\n")
    }

    /// Extract one metric from an explicitly named section.
    pub async fn extract_metric_from_section(
        &self,
        xbrl_url: &str,
        section: &str,
        tag: &str,
    ) -> String {
        if let Err(e) = expect_xbrl(xbrl_url) {
            return format!("Error: {e}");
        }
        let instance = match self.documents.instance(xbrl_url).await {
            Ok(instance) => instance,
            Err(e) => return format!("Failed to load XBRL: {e}"),
        };
        match metrics::strict(&instance, section, tag) {
            Ok(metric) => strict_line(tag, section, &metric),
            Err(e) => e.to_string(),
        }
    }

    /// Return a filing section as plain text, truncated for display.
    pub async fn extract_section_from_filing(&self, filing_url: &str, section: &str) -> String {
        match self.documents.section_text(filing_url, section).await {
            Ok(text) if text.is_empty() => format!("Section {section} not found in filing."),
            Ok(text) => {
                if text.chars().count() < SECTION_TEXT_LIMIT {
                    text.to_string()
                } else {
                    format!("{}…", truncate_chars(&text, SECTION_TEXT_LIMIT))
                }
            }
            Err(e) => format!("Error extracting section: {e}"),
        }
    }

    /// Single-metric lookup through the tiered resolution engine.
    ///
    /// Tries the hinted section, then a full scan, then a strict lookup in
    /// the hint (or the operations statement when no hint was given) so the
    /// failure message carries sample tag names.
    pub async fn metric_smart(
        &self,
        xbrl_url: &str,
        tag: &str,
        section_hint: Option<&str>,
    ) -> String {
        if let Err(e) = expect_xbrl(xbrl_url) {
            return format!("Error: {e}");
        }
        let instance = match self.documents.instance(xbrl_url).await {
            Ok(instance) => instance,
            Err(e) => return format!("Failed to load XBRL: {e}"),
        };

        if let Some(hint) = section_hint {
            if let Some(metric) = metrics::hinted(&instance, tag, hint) {
                return smart_line(tag, &metric);
            }
        }
        if let Some(metric) = metrics::scan(&instance, tag) {
            return smart_line(tag, &metric);
        }

        let section = section_hint.unwrap_or(DEFAULT_STRICT_SECTION);
        match metrics::strict(&instance, section, tag) {
            Ok(metric) => strict_line(tag, section, &metric),
            Err(e) => e.to_string(),
        }
    }

    /// Resolve many metrics at once into a JSON mapping.
    ///
    /// Keys are sections where values were actually found; unresolved tags
    /// appear under their requested section with a null value.
    pub async fn financial_snapshot(
        &self,
        xbrl_url: &str,
        requests: &IndexMap<String, Vec<String>>,
    ) -> Value {
        let instance = match self.documents.instance(xbrl_url).await {
            Ok(instance) => instance,
            Err(e) => return json!({ "error": format!("Failed to load XBRL: {e}") }),
        };

        let mut out = Map::new();
        for (section, tags) in metrics::snapshot(&instance, requests) {
            let mut inner = Map::new();
            for (tag, value) in tags {
                inner.insert(tag, value.map_or(Value::Null, Value::from));
            }
            out.insert(section, Value::Object(inner));
        }
        Value::Object(out)
    }

    /// Report recent insider (Form 4/5) transactions for a ticker.
    pub async fn insider_trades(
        &self,
        ticker: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
        transaction_code: Option<&str>,
        max_results: usize,
    ) -> String {
        let query = InsiderQuery {
            ticker: ticker.to_string(),
            start_date: start_date.map(str::to_string),
            end_date: end_date.map(str::to_string),
            transaction_code: transaction_code.map(str::to_string),
            max_results,
        };
        let filings = match self.api.insider_filings(&query).await {
            Ok(filings) => filings,
            Err(e) => return format!("Error contacting insider-trading endpoint: {e}"),
        };
        if filings.is_empty() {
            return format!("No insider trades found for {ticker}.");
        }

        let mut lines = vec![format!(
            "Top {} Form 4/5 transactions for {ticker}:",
            filings.len()
        )];
        for entry in &filings {
            let owner = entry.reporting_owner.name.as_deref().unwrap_or("—");
            let date = entry.period_of_report.as_deref().unwrap_or("?");
            let tx = insider::first_transaction(entry);
            let share_txt = tx
                .shares
                .map_or_else(|| "?".to_string(), |s| group_thousands(s as i64));
            // Debug float formatting keeps the decimal point on whole
            // numbers ("$12.0", not "$12").
            let price_txt = tx
                .price
                .map_or_else(|| "?".to_string(), |p| format!("${p:?}"));
            lines.push(format!("• {date}: {owner} {} {share_txt} @ {price_txt}", tx.code));
        }
        lines.join("\n")
    }

    /// Report top institutional holders of a ticker for one 13F quarter.
    pub async fn institutional_holders(
        &self,
        ticker: &str,
        quarter: Option<&str>,
        top_n: usize,
    ) -> String {
        let query = HoldingsQuery {
            ticker: ticker.to_string(),
            quarter: quarter.map(str::to_string),
        };
        let filings = match self.api.holdings_filings(&query).await {
            Ok(filings) => filings,
            Err(e) => return format!("Error contacting 13F holdings endpoint: {e}"),
        };
        if filings.is_empty() {
            return format!("No 13F holdings found for {ticker}.");
        }

        let report = holdings::aggregate(&filings, ticker, quarter, &self.identity).await;
        let period = report.period.as_deref().unwrap_or("unknown");
        if report.rows.is_empty() {
            return format!("Ticker {ticker} not held by any institution in {period}.");
        }

        let mut lines = vec![format!(
            "Institutional holders of {} — {period} (top {top_n}):",
            ticker.to_uppercase()
        )];
        for row in report.rows.iter().take(top_n) {
            lines.push(format!(
                "• {}: {} sh @ ${:.1} M",
                row.institution,
                group_thousands(row.shares),
                row.value as f64 / 1e6
            ));
        }
        lines.join("\n")
    }

    /// Report executive compensation for a ticker and fiscal year.
    ///
    /// Defaults to the most recent year present in the data.
    pub async fn executive_compensation(
        &self,
        ticker: &str,
        year: Option<i32>,
        top_n: usize,
    ) -> String {
        let records = match self.api.compensation_records(ticker).await {
            Ok(records) => records,
            Err(e) => return format!("Error contacting compensation endpoint: {e}"),
        };
        if records.is_empty() {
            return format!("No compensation data found for {ticker}.");
        }

        let year =
            year.unwrap_or_else(|| records.iter().map(|r| r.year).max().unwrap_or_default());
        let mut rows: Vec<_> = records.iter().filter(|r| r.year == year).collect();
        rows.sort_by(|a, b| b.total.cmp(&a.total));

        let mut lines = vec![format!(
            "{} — executive compensation {year} (top {top_n}):",
            ticker.to_uppercase()
        )];
        for rec in rows.iter().take(top_n) {
            lines.push(format!(
                "• {} ({}): ${}",
                rec.name,
                rec.position,
                group_thousands(rec.total)
            ));
        }
        lines.join("\n")
    }

    /// Warm the document cache and return the section list of an instance.
    pub async fn preload_xbrl_summary(&self, xbrl_url: &str) -> String {
        match self.documents.summary(xbrl_url).await {
            Ok(summary) => summary,
            Err(e) => format!("Error preloading XBRL: {e}"),
        }
    }
}

/// Success line for the strict single-section lookup.
fn strict_line(tag: &str, section: &str, metric: &ResolvedMetric) -> String {
    format!(
        "{tag} in {section} for period ending {}: ${}",
        metric.period_end.as_deref().unwrap_or("unknown date"),
        group_thousands(metric.value_as_int().unwrap_or_default())
    )
}

/// Success line for the hinted/scanned lookup tiers.
///
/// The fast tiers surface facts with null values; those report the same
/// message as a strict lookup would instead of formatting a bogus zero.
fn smart_line(tag: &str, metric: &ResolvedMetric) -> String {
    match metric.value_as_int() {
        Some(value) => format!(
            "{tag} ({}) – {}: ${}",
            metric.section,
            metric.period_end.as_deref().unwrap_or("unknown"),
            group_thousands(value)
        ),
        None => FilingsError::NoValue {
            tag: tag.to_string(),
        }
        .to_string(),
    }
}

/// Best XBRL instance URL for a filing.
///
/// Prefers the direct link; otherwise scans the attachments for an extracted
/// instance document by description, by type code, or by an `.xml` URL that
/// is not one of the linkbase files.
fn xbrl_instance_url(filing: &FilingRecord) -> Option<String> {
    if let Some(url) = filing.link_to_xbrl.as_deref().filter(|u| !u.is_empty()) {
        return Some(url.to_string());
    }
    for file in &filing.data_files {
        let desc = file.description.to_lowercase();
        let url_lower = file.document_url.to_lowercase();
        let linkbase = ["_cal", "_def", "_lab", "_pre"]
            .iter()
            .any(|s| url_lower.contains(s));
        if desc.contains("extracted xbrl instance document")
            || file.document_type.to_uppercase() == "EX-101.INS"
            || (url_lower.ends_with(".xml") && !linkbase)
        {
            return Some(full_url(&file.document_url));
        }
    }
    None
}

/// Prefix relative EDGAR paths with the SEC host.
fn full_url(partial: &str) -> String {
    if partial.starts_with("http") {
        partial.to_string()
    } else {
        format!("https://www.sec.gov{partial}")
    }
}
