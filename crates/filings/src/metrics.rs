//! Tiered tag resolution over parsed XBRL content.
//!
//! A requested tag resolves through three tiers:
//!
//! 1. **Hinted fast path** - the hinted section, when it exists and carries
//!    the tag. The only tier guaranteed not to scan unrelated sections.
//! 2. **Full scan** - every section in the document's stored order; the
//!    first section carrying the tag wins. Duplicate tags with conflicting
//!    values across sections are not ranked or deduplicated.
//! 3. **Strict single-section lookup** - an explicit section name with
//!    fine-grained errors, also exposed directly as its own tool.
//!
//! Values are surfaced as integers by truncation, never rounding.

use filings_core::{Fact, FilingsError, Result, XbrlInstance};
use indexmap::IndexMap;

/// Number of sample tag names listed in a `TagNotFound` error.
const TAG_SAMPLE_LIMIT: usize = 10;

/// Section searched by the strict fallback when no hint was given.
pub const DEFAULT_STRICT_SECTION: &str = "StatementsOfOperations";

/// A tag resolved to its first fact in some section.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedMetric {
    /// Section where the value was actually found.
    pub section: String,
    /// The fact's value; null values are reported explicitly, not dropped.
    pub value: Option<f64>,
    /// End date of the fact's reporting period.
    pub period_end: Option<String>,
}

impl ResolvedMetric {
    fn from_fact(section: &str, fact: &Fact) -> Self {
        Self {
            section: section.to_string(),
            value: fact.value,
            period_end: fact.period.end_date.clone(),
        }
    }

    /// The value truncated to an integer, when present.
    #[must_use]
    pub fn value_as_int(&self) -> Option<i64> {
        self.value.map(|v| v as i64)
    }
}

/// Tier 1: the hinted section, when present and carrying the tag.
#[must_use]
pub fn hinted(instance: &XbrlInstance, tag: &str, hint: &str) -> Option<ResolvedMetric> {
    let fact = instance.get(hint)?.get(tag)?.first()?;
    Some(ResolvedMetric::from_fact(hint, fact))
}

/// Tier 2: scan all sections in stored order; first match wins.
#[must_use]
pub fn scan(instance: &XbrlInstance, tag: &str) -> Option<ResolvedMetric> {
    for (section, tags) in instance {
        if let Some(fact) = tags.get(tag).and_then(|facts| facts.first()) {
            return Some(ResolvedMetric::from_fact(section, fact));
        }
    }
    None
}

/// Tier 3: strict lookup in one explicitly named section.
///
/// Fails with [`FilingsError::SectionNotFound`] when the section is absent,
/// [`FilingsError::TagNotFound`] (listing up to 10 sample tags) when the tag
/// is absent, and [`FilingsError::NoValue`] when the first fact's value is
/// null. On success the value is always present.
pub fn strict(instance: &XbrlInstance, section: &str, tag: &str) -> Result<ResolvedMetric> {
    let tags = instance
        .get(section)
        .ok_or_else(|| FilingsError::SectionNotFound {
            section: section.to_string(),
        })?;

    let facts = tags.get(tag).ok_or_else(|| FilingsError::TagNotFound {
        tag: tag.to_string(),
        section: section.to_string(),
        sample: tags.keys().take(TAG_SAMPLE_LIMIT).cloned().collect(),
    })?;

    let fact = facts.first().ok_or_else(|| FilingsError::NoValue {
        tag: tag.to_string(),
    })?;

    if fact.value.is_none() {
        return Err(FilingsError::NoValue {
            tag: tag.to_string(),
        });
    }

    Ok(ResolvedMetric::from_fact(section, fact))
}

/// Batch resolution: one entry per requested tag, grouped by found section.
///
/// For each requested (section, tags) pair, each tag first tries the
/// requested section, then falls back to a full scan. Results land under
/// the section where the value was actually found, which may differ from
/// the requested one; an unresolved tag lands under its originally
/// requested section with a null value, so every requested tag appears in
/// the output. Values are truncated to integers.
#[must_use]
pub fn snapshot(
    instance: &XbrlInstance,
    requests: &IndexMap<String, Vec<String>>,
) -> IndexMap<String, IndexMap<String, Option<i64>>> {
    let mut out: IndexMap<String, IndexMap<String, Option<i64>>> = IndexMap::new();

    for (wanted_section, tags) in requests {
        for tag in tags {
            let mut value = instance
                .get(wanted_section)
                .and_then(|section| section.get(tag))
                .and_then(|facts| facts.first())
                .and_then(|fact| fact.value);
            let mut actual_section = wanted_section.clone();

            // A null in the requested section falls through to the scan,
            // same as an absent tag.
            if value.is_none() {
                for (name, section) in instance {
                    if let Some(facts) = section.get(tag) {
                        value = facts.first().and_then(|fact| fact.value);
                        actual_section = name.clone();
                        break;
                    }
                }
            }

            out.entry(actual_section)
                .or_default()
                .insert(tag.clone(), value.map(|v| v as i64));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use filings_core::FactPeriod;

    fn fact(value: Option<f64>, end_date: &str) -> Fact {
        Fact {
            value,
            period: FactPeriod {
                end_date: Some(end_date.to_string()),
                start_date: None,
            },
        }
    }

    /// Assets appears in two sections with different values; the document
    /// order puts StatementsOfFinancialPosition after BalanceSheets.
    fn sample_instance() -> XbrlInstance {
        let mut balance_sheets = indexmap::IndexMap::new();
        balance_sheets.insert("Liabilities".to_string(), vec![fact(Some(1e9), "2025-06-30")]);
        balance_sheets.insert(
            "Assets".to_string(),
            vec![fact(Some(2_000_000_000.0), "2025-06-30")],
        );

        let mut financial_position = indexmap::IndexMap::new();
        financial_position.insert(
            "Assets".to_string(),
            vec![fact(Some(5_000_000_000.0), "2025-06-30")],
        );

        let mut operations = indexmap::IndexMap::new();
        operations.insert(
            "Revenues".to_string(),
            vec![fact(Some(1234567.89), "2025-06-30")],
        );
        operations.insert("NetIncomeLoss".to_string(), vec![fact(None, "2025-06-30")]);

        let mut instance = XbrlInstance::new();
        instance.insert("BalanceSheets".to_string(), balance_sheets);
        instance.insert(
            "StatementsOfFinancialPosition".to_string(),
            financial_position,
        );
        instance.insert("StatementsOfOperations".to_string(), operations);
        instance
    }

    #[test]
    fn hinted_section_wins_over_scan_order() {
        let instance = sample_instance();
        let resolved = hinted(&instance, "Assets", "StatementsOfFinancialPosition").unwrap();
        assert_eq!(resolved.section, "StatementsOfFinancialPosition");
        assert_eq!(resolved.value, Some(5_000_000_000.0));

        // The scan would have surfaced the BalanceSheets value instead.
        let scanned = scan(&instance, "Assets").unwrap();
        assert_eq!(scanned.section, "BalanceSheets");
        assert_eq!(scanned.value, Some(2_000_000_000.0));
    }

    #[test]
    fn scan_falls_through_when_hint_lacks_tag() {
        let instance = sample_instance();
        // Hint names a real section that lacks the tag.
        assert!(hinted(&instance, "Revenues", "BalanceSheets").is_none());
        let scanned = scan(&instance, "Revenues").unwrap();
        assert_eq!(scanned.section, "StatementsOfOperations");
    }

    #[test]
    fn strict_section_not_found() {
        let err = strict(&sample_instance(), "CashFlows", "Assets").unwrap_err();
        assert!(matches!(err, FilingsError::SectionNotFound { .. }));
    }

    #[test]
    fn strict_tag_not_found_lists_samples() {
        let err = strict(&sample_instance(), "BalanceSheets", "Goodwill").unwrap_err();
        match err {
            FilingsError::TagNotFound { sample, .. } => {
                assert_eq!(sample, vec!["Liabilities".to_string(), "Assets".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn strict_null_value_is_no_value() {
        let err = strict(&sample_instance(), "StatementsOfOperations", "NetIncomeLoss")
            .unwrap_err();
        assert!(matches!(err, FilingsError::NoValue { .. }));
    }

    #[test]
    fn strict_success_carries_period() {
        let resolved = strict(&sample_instance(), "StatementsOfOperations", "Revenues").unwrap();
        assert_eq!(resolved.period_end.as_deref(), Some("2025-06-30"));
        assert_eq!(resolved.value_as_int(), Some(1_234_567));
    }

    #[test]
    fn value_truncates_instead_of_rounding() {
        let metric = ResolvedMetric {
            section: "S".to_string(),
            value: Some(1234567.89),
            period_end: None,
        };
        assert_eq!(metric.value_as_int(), Some(1_234_567));
    }

    #[test]
    fn snapshot_groups_by_found_section() {
        let instance = sample_instance();
        let mut requests = IndexMap::new();
        // Assets requested under a section that lacks it entirely.
        requests.insert("CashFlows".to_string(), vec!["Assets".to_string()]);
        requests.insert(
            "StatementsOfOperations".to_string(),
            vec!["Revenues".to_string(), "Missing".to_string()],
        );

        let snap = snapshot(&instance, &requests);

        // Assets lands under the first section the scan found it in.
        assert_eq!(snap["BalanceSheets"]["Assets"], Some(2_000_000_000));
        assert_eq!(snap["StatementsOfOperations"]["Revenues"], Some(1_234_567));
        // Unresolved tags land under the requested section with a null.
        assert_eq!(snap["StatementsOfOperations"]["Missing"], None);
        assert!(!snap.contains_key("CashFlows"));

        // Every requested tag appears exactly once.
        let total: usize = snap.values().map(IndexMap::len).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn snapshot_null_in_requested_section_falls_to_scan() {
        let mut first = indexmap::IndexMap::new();
        first.insert("Tag".to_string(), vec![fact(None, "2025-06-30")]);
        let mut second = indexmap::IndexMap::new();
        second.insert("Tag".to_string(), vec![fact(Some(7.0), "2025-06-30")]);

        let mut instance = XbrlInstance::new();
        instance.insert("First".to_string(), first);
        instance.insert("Second".to_string(), second);

        let mut requests = IndexMap::new();
        requests.insert("First".to_string(), vec!["Tag".to_string()]);

        let snap = snapshot(&instance, &requests);
        // The scan revisits sections in stored order and stops at the first
        // section carrying the tag, even though its value is null there.
        assert_eq!(snap["First"]["Tag"], None);
    }
}
