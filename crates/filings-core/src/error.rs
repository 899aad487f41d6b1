//! Error types for filings operations.
//!
//! This module defines [`FilingsError`] which covers all error cases that can
//! occur when resolving identities, fetching remote documents, or looking up
//! tags in parsed XBRL content.

use thiserror::Error;

/// Errors that can occur during filings operations.
#[derive(Error, Debug)]
pub enum FilingsError {
    /// An identity lookup returned nothing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A remote call failed (network error, non-2xx status, or malformed body).
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    /// The requested section does not exist in the parsed document.
    #[error("Section '{section}' not found in the filing.")]
    SectionNotFound {
        /// The section that was requested.
        section: String,
    },

    /// The requested tag does not exist in the given section.
    #[error("Metric '{tag}' not in section '{section}'. Sample available metrics: {sample:?}")]
    TagNotFound {
        /// The tag that was requested.
        tag: String,
        /// The section that was searched.
        section: String,
        /// Up to 10 tag names present in the section, as a hint to callers.
        sample: Vec<String>,
    },

    /// The tag exists but its first fact carries a null value.
    #[error("Metric '{tag}' was found but has no value.")]
    NoValue {
        /// The tag whose value was null.
        tag: String,
    },

    /// An input was not of the expected shape (e.g. a non-XBRL document URL).
    #[error("{0}")]
    MalformedInput(String),
}

/// Result type alias using [`FilingsError`].
pub type Result<T> = std::result::Result<T, FilingsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_not_found_lists_sample_tags() {
        let err = FilingsError::TagNotFound {
            tag: "Assets".to_string(),
            section: "BalanceSheets".to_string(),
            sample: vec!["Liabilities".to_string(), "Revenues".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("'Assets'"));
        assert!(msg.contains("'BalanceSheets'"));
        assert!(msg.contains("Liabilities"));
    }

    #[test]
    fn section_not_found_message() {
        let err = FilingsError::SectionNotFound {
            section: "BalanceSheets".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Section 'BalanceSheets' not found in the filing."
        );
    }
}
