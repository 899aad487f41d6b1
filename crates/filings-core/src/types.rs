//! Core data types for SEC filings data.
//!
//! This module defines the parsed XBRL content model and the payload types
//! shared between the API client and the resolution engines:
//!
//! - [`XbrlInstance`] / [`XbrlSection`] / [`Fact`] - converted XBRL content
//! - [`EntityMapping`] - ticker/CIK identity records
//! - [`FilingRecord`] - full-text filing search hits
//! - [`InsiderFiling`] / [`InsiderTransaction`] - Form 4/5 payloads
//! - [`HoldingsFiling`] / [`HoldingLine`] - 13F holdings payloads
//! - [`CompensationRecord`] - executive compensation rows

use indexmap::IndexMap;
use serde::de::{self, Deserializer};
use serde::Deserialize;

/// Parsed content of an XBRL instance document: section name → section.
///
/// `IndexMap` keeps the document's stored section order, which the full-scan
/// tag lookup depends on (first section encountered wins).
pub type XbrlInstance = IndexMap<String, XbrlSection>;

/// One section of a converted XBRL document: tag name → reported facts.
pub type XbrlSection = IndexMap<String, Vec<Fact>>;

/// One reported value for a tag, with its reporting period.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Fact {
    /// Reported value. The converter emits numbers, numeric strings, or null.
    #[serde(default, deserialize_with = "deserialize_loose_number")]
    pub value: Option<f64>,
    /// Reporting period descriptor.
    #[serde(default)]
    pub period: FactPeriod,
}

/// Period descriptor attached to a [`Fact`].
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactPeriod {
    /// End date of the reporting period (e.g. "2025-06-30").
    #[serde(default)]
    pub end_date: Option<String>,
    /// Start date of the reporting period, absent for instant facts.
    #[serde(default)]
    pub start_date: Option<String>,
}

/// Accept a JSON number, a numeric string, or null as an optional `f64`.
///
/// The XBRL-to-JSON converter is inconsistent about value encoding across
/// filings, so both forms must parse to the same thing.
fn deserialize_loose_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Number(f64),
        Text(String),
        Null,
    }

    match Loose::deserialize(deserializer)? {
        Loose::Number(n) => Ok(Some(n)),
        Loose::Text(s) => {
            if s.trim().is_empty() {
                Ok(None)
            } else {
                s.trim()
                    .parse::<f64>()
                    .map(Some)
                    .map_err(|e| de::Error::custom(format!("invalid numeric string {s:?}: {e}")))
            }
        }
        Loose::Null => Ok(None),
    }
}

/// One candidate record from the ticker/CIK mapping endpoints.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct EntityMapping {
    /// Registrant identifier as returned by the API.
    #[serde(default)]
    pub cik: String,
    /// Ticker symbol, when the mapping direction provides one.
    #[serde(default)]
    pub ticker: Option<String>,
    /// Registered entity name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Metadata for one filing returned by the full-text search endpoint.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingRecord {
    /// Filing timestamp (ISO 8601; callers display the date prefix).
    #[serde(default)]
    pub filed_at: Option<String>,
    /// Link to the human-readable filing details page.
    #[serde(default)]
    pub link_to_filing_details: Option<String>,
    /// Link to the XBRL instance document. The API has used both casings.
    #[serde(default, alias = "linkToXBRL")]
    pub link_to_xbrl: Option<String>,
    /// Attached data files, scanned when no direct XBRL link is present.
    #[serde(default)]
    pub data_files: Vec<DataFile>,
}

/// One attachment listed on a filing.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFile {
    /// Free-text description (e.g. "EXTRACTED XBRL INSTANCE DOCUMENT").
    #[serde(default)]
    pub description: String,
    /// Document type code (e.g. "EX-101.INS").
    #[serde(default)]
    pub document_type: String,
    /// Attachment URL, possibly relative to www.sec.gov.
    #[serde(default)]
    pub document_url: String,
}

/// One insider (Form 4/5) filing entry.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsiderFiling {
    /// Reporting period of the filing.
    #[serde(default)]
    pub period_of_report: Option<String>,
    /// The reporting owner block.
    #[serde(default)]
    pub reporting_owner: ReportingOwner,
    /// Non-derivative transaction table.
    #[serde(default)]
    pub non_derivative_table: NonDerivativeTable,
}

/// Reporting owner block of an insider filing.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ReportingOwner {
    /// Owner display name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Non-derivative transaction table of an insider filing.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NonDerivativeTable {
    /// Listed transactions, in filing order.
    #[serde(default)]
    pub transactions: Vec<InsiderTransaction>,
}

/// One non-derivative transaction.
///
/// Two field-naming conventions exist in the wild for share counts and
/// prices; both are modeled so the extractor can try them in order.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsiderTransaction {
    /// Transaction coding block.
    #[serde(default)]
    pub coding: TransactionCoding,
    /// Share count, newer schema.
    #[serde(default)]
    pub transaction_shares: Option<ValueField>,
    /// Price per share, newer schema.
    #[serde(default)]
    pub transaction_price: Option<ValueField>,
    /// Share count and price, older schema.
    #[serde(default)]
    pub amounts: Option<TransactionAmounts>,
}

/// Transaction coding block.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TransactionCoding {
    /// Transaction code (e.g. "P", "S").
    #[serde(default)]
    pub code: Option<String>,
}

/// Wrapper for `{ "value": ... }` fields in the newer insider schema.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ValueField {
    /// The wrapped value.
    #[serde(default)]
    pub value: Option<f64>,
}

/// Share/price pair in the older insider schema.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionAmounts {
    /// Share count.
    #[serde(default)]
    pub shares: Option<f64>,
    /// Price per share.
    #[serde(default)]
    pub price_per_share: Option<f64>,
}

/// One 13F institutional holdings filing.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingsFiling {
    /// Registrant identifier of the filing manager.
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub cik: Option<String>,
    /// Reporting period of the filing.
    #[serde(default)]
    pub period_of_report: Option<String>,
    /// Per-security holding line items.
    #[serde(default)]
    pub holdings: Vec<HoldingLine>,
}

/// One holding line item within a 13F filing.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingLine {
    /// Ticker of the held security.
    #[serde(default)]
    pub ticker: Option<String>,
    /// Reported dollar value of the position.
    #[serde(default)]
    pub value: i64,
    /// Shares-or-principal block.
    #[serde(default)]
    pub shrs_or_prn_amt: SharesOrPrincipal,
}

/// Shares-or-principal block of a holding line.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharesOrPrincipal {
    /// Share (or principal) count.
    #[serde(default)]
    pub ssh_prnamt: i64,
}

/// Accept a JSON string or number as an optional string (CIKs appear both ways).
fn deserialize_loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Number(u64),
        Null,
    }

    Ok(match Loose::deserialize(deserializer)? {
        Loose::Text(s) => Some(s),
        Loose::Number(n) => Some(n.to_string()),
        Loose::Null => None,
    })
}

/// One executive compensation row.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CompensationRecord {
    /// Executive name.
    #[serde(default)]
    pub name: String,
    /// Executive title.
    #[serde(default)]
    pub position: String,
    /// Fiscal year of the record.
    #[serde(default)]
    pub year: i32,
    /// Total compensation in dollars.
    #[serde(default)]
    pub total: i64,
}

/// Parameters for an insider-transaction search.
#[derive(Clone, Debug, Default)]
pub struct InsiderQuery {
    /// Issuer ticker symbol.
    pub ticker: String,
    /// Inclusive start of the reporting-period range (YYYY-MM-DD).
    pub start_date: Option<String>,
    /// Inclusive end of the reporting-period range (YYYY-MM-DD).
    pub end_date: Option<String>,
    /// Transaction code filter (e.g. "P", "S").
    pub transaction_code: Option<String>,
    /// Maximum number of results; the API caps this at 50.
    pub max_results: usize,
}

/// Parameters for a 13F holdings search.
#[derive(Clone, Debug, Default)]
pub struct HoldingsQuery {
    /// Held-security ticker symbol.
    pub ticker: String,
    /// Reporting quarter filter (e.g. "2025-06-30").
    pub quarter: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fact_value_from_number() {
        let fact: Fact = serde_json::from_value(json!({
            "value": 1234567.89,
            "period": { "endDate": "2025-06-30" }
        }))
        .unwrap();
        assert_eq!(fact.value, Some(1234567.89));
        assert_eq!(fact.period.end_date.as_deref(), Some("2025-06-30"));
    }

    #[test]
    fn fact_value_from_numeric_string() {
        let fact: Fact = serde_json::from_value(json!({
            "value": "365817000000",
            "period": { "endDate": "2021-09-25" }
        }))
        .unwrap();
        assert_eq!(fact.value, Some(365_817_000_000.0));
    }

    #[test]
    fn fact_value_null_and_missing_period() {
        let fact: Fact = serde_json::from_value(json!({ "value": null })).unwrap();
        assert_eq!(fact.value, None);
        assert_eq!(fact.period.end_date, None);
    }

    #[test]
    fn instance_preserves_section_order() {
        let instance: XbrlInstance = serde_json::from_value(json!({
            "CoverPage": {},
            "StatementsOfOperations": {},
            "BalanceSheets": {}
        }))
        .unwrap();
        let names: Vec<&String> = instance.keys().collect();
        assert_eq!(
            names,
            ["CoverPage", "StatementsOfOperations", "BalanceSheets"]
        );
    }

    #[test]
    fn filing_record_accepts_both_xbrl_link_casings() {
        let a: FilingRecord =
            serde_json::from_value(json!({ "linkToXbrl": "https://x/a.xml" })).unwrap();
        let b: FilingRecord =
            serde_json::from_value(json!({ "linkToXBRL": "https://x/b.xml" })).unwrap();
        assert_eq!(a.link_to_xbrl.as_deref(), Some("https://x/a.xml"));
        assert_eq!(b.link_to_xbrl.as_deref(), Some("https://x/b.xml"));
    }

    #[test]
    fn holdings_cik_from_number_or_string() {
        let a: HoldingsFiling = serde_json::from_value(json!({ "cik": 924171 })).unwrap();
        let b: HoldingsFiling = serde_json::from_value(json!({ "cik": "924171" })).unwrap();
        assert_eq!(a.cik.as_deref(), Some("924171"));
        assert_eq!(b.cik.as_deref(), Some("924171"));
    }

    #[test]
    fn insider_transaction_both_schemas() {
        let newer: InsiderTransaction = serde_json::from_value(json!({
            "coding": { "code": "P" },
            "transactionShares": { "value": 100.0 },
            "transactionPrice": { "value": 12.5 }
        }))
        .unwrap();
        assert_eq!(newer.transaction_shares.unwrap().value, Some(100.0));

        let older: InsiderTransaction = serde_json::from_value(json!({
            "coding": { "code": "S" },
            "amounts": { "shares": 200.0, "pricePerShare": 9.75 }
        }))
        .unwrap();
        let amounts = older.amounts.unwrap();
        assert_eq!(amounts.shares, Some(200.0));
        assert_eq!(amounts.price_per_share, Some(9.75));
    }
}
