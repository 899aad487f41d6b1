//! First-transaction extraction from insider (Form 4/5) filings.

use filings_core::{InsiderFiling, InsiderTransaction};

/// Displayable summary of one insider transaction.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionSummary {
    /// Transaction code, `"?"` when absent.
    pub code: String,
    /// Share count, when either schema reported one.
    pub shares: Option<f64>,
    /// Price per share, when either schema reported one.
    pub price: Option<f64>,
}

impl Default for TransactionSummary {
    fn default() -> Self {
        Self {
            code: "?".to_string(),
            shares: None,
            price: None,
        }
    }
}

/// Summarize the first non-derivative transaction of a filing.
///
/// Filings list transactions in filing order and reports show one line per
/// filing, so only the first entry matters. A filing without transactions
/// yields the placeholder summary.
pub fn first_transaction(filing: &InsiderFiling) -> TransactionSummary {
    match filing.non_derivative_table.transactions.first() {
        Some(tx) => summarize(tx),
        None => TransactionSummary::default(),
    }
}

/// Read share count and price, trying the newer wrapped-value fields first
/// and falling back to the older flat `amounts` block.
fn summarize(tx: &InsiderTransaction) -> TransactionSummary {
    let shares = tx
        .transaction_shares
        .as_ref()
        .and_then(|f| f.value)
        .or_else(|| tx.amounts.as_ref().and_then(|a| a.shares));
    let price = tx
        .transaction_price
        .as_ref()
        .and_then(|f| f.value)
        .or_else(|| tx.amounts.as_ref().and_then(|a| a.price_per_share));

    TransactionSummary {
        code: tx.coding.code.clone().unwrap_or_else(|| "?".to_string()),
        shares,
        price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filings_core::{NonDerivativeTable, TransactionAmounts, TransactionCoding, ValueField};

    fn filing_with(transactions: Vec<InsiderTransaction>) -> InsiderFiling {
        InsiderFiling {
            non_derivative_table: NonDerivativeTable { transactions },
            ..InsiderFiling::default()
        }
    }

    #[test]
    fn empty_table_yields_placeholder() {
        let summary = first_transaction(&filing_with(vec![]));
        assert_eq!(summary, TransactionSummary::default());
        assert_eq!(summary.code, "?");
    }

    #[test]
    fn newer_schema_fields_win() {
        let tx = InsiderTransaction {
            coding: TransactionCoding {
                code: Some("P".to_string()),
            },
            transaction_shares: Some(ValueField { value: Some(100.0) }),
            transaction_price: Some(ValueField { value: Some(12.5) }),
            amounts: Some(TransactionAmounts {
                shares: Some(999.0),
                price_per_share: Some(99.0),
            }),
        };
        let summary = first_transaction(&filing_with(vec![tx]));
        assert_eq!(summary.code, "P");
        assert_eq!(summary.shares, Some(100.0));
        assert_eq!(summary.price, Some(12.5));
    }

    #[test]
    fn falls_back_to_amounts_per_field() {
        // Newer-schema shares present but null; price field absent entirely.
        let tx = InsiderTransaction {
            coding: TransactionCoding {
                code: Some("S".to_string()),
            },
            transaction_shares: Some(ValueField { value: None }),
            transaction_price: None,
            amounts: Some(TransactionAmounts {
                shares: Some(200.0),
                price_per_share: Some(9.75),
            }),
        };
        let summary = first_transaction(&filing_with(vec![tx]));
        assert_eq!(summary.shares, Some(200.0));
        assert_eq!(summary.price, Some(9.75));
    }

    #[test]
    fn only_first_transaction_is_read() {
        let first = InsiderTransaction {
            coding: TransactionCoding {
                code: Some("A".to_string()),
            },
            ..InsiderTransaction::default()
        };
        let second = InsiderTransaction {
            coding: TransactionCoding {
                code: Some("B".to_string()),
            },
            ..InsiderTransaction::default()
        };
        let summary = first_transaction(&filing_with(vec![first, second]));
        assert_eq!(summary.code, "A");
    }

    #[test]
    fn missing_everything_yields_nones_with_placeholder_code() {
        let summary = first_transaction(&filing_with(vec![InsiderTransaction::default()]));
        assert_eq!(summary.code, "?");
        assert_eq!(summary.shares, None);
        assert_eq!(summary.price, None);
    }
}
