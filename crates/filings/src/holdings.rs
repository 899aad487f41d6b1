//! Institutional holdings aggregation.
//!
//! Raw 13F records arrive per filer, identified only by CIK, with one line
//! item per held security. Aggregation resolves each CIK to a display name
//! and sums shares and value per name for one reporting period. Names are
//! the grouping key: two registrants whose resolved names collide (for
//! example two fallback raw-CIK names) merge into one row. Changing the
//! key would change observable totals, so the merge stays.

use filings_core::HoldingsFiling;
use indexmap::IndexMap;

use crate::identity::IdentityResolver;

/// Summed position of one institution in one reporting period.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregatedHolding {
    /// Resolved institution display name.
    pub institution: String,
    /// Total shares held.
    pub shares: i64,
    /// Total reported dollar value.
    pub value: i64,
}

/// Aggregated holdings for one ticker and period.
#[derive(Clone, Debug, Default)]
pub struct HoldingsReport {
    /// The period the rows were filtered to.
    pub period: Option<String>,
    /// One row per institution, sorted by total value descending.
    pub rows: Vec<AggregatedHolding>,
}

/// Aggregate raw 13F filings into per-institution totals.
///
/// The target period is the explicit `quarter` when given, otherwise the
/// period of the first record (the input is sorted by filing date,
/// descending). Records for any other period in the batch are discarded.
/// Line items are matched against the upper-cased ticker exactly.
pub async fn aggregate(
    filings: &[HoldingsFiling],
    ticker: &str,
    quarter: Option<&str>,
    identity: &IdentityResolver,
) -> HoldingsReport {
    let period = quarter
        .map(str::to_string)
        .or_else(|| filings.first().and_then(|f| f.period_of_report.clone()));
    let ticker_upper = ticker.to_uppercase();

    let mut totals: IndexMap<String, (i64, i64)> = IndexMap::new();

    for filing in filings
        .iter()
        .filter(|f| f.period_of_report == period)
    {
        let cik = filing.cik.as_deref().unwrap_or("unknown");
        let name = identity.resolve_name(cik).await;

        for line in &filing.holdings {
            if line.ticker.as_deref() != Some(ticker_upper.as_str()) {
                continue;
            }
            let entry = totals.entry(name.as_str().to_string()).or_insert((0, 0));
            entry.0 += line.shrs_or_prn_amt.ssh_prnamt;
            entry.1 += line.value;
        }
    }

    let mut rows: Vec<AggregatedHolding> = totals
        .into_iter()
        .map(|(institution, (shares, value))| AggregatedHolding {
            institution,
            shares,
            value,
        })
        .collect();
    // Stable sort keeps first-encountered order among equal values.
    rows.sort_by(|a, b| b.value.cmp(&a.value));

    HoldingsReport { period, rows }
}
