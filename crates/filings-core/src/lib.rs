#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/filings/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for SEC filings data access.
//!
//! This crate provides the foundational abstractions for the workspace:
//!
//! - [`FilingsApi`](api::FilingsApi) - Trait over the remote filings/XBRL API
//! - [`FilingsError`](error::FilingsError) - Error taxonomy for lookups and fetches
//! - [`XbrlInstance`](types::XbrlInstance) - Parsed section → tag → facts model
//! - [`canonical_url`](reference::canonical_url) - Stable cache keys for document URLs

/// Trait over the remote filings/XBRL API.
pub mod api;
/// Error types for filings operations.
pub mod error;
/// Document reference canonicalization.
pub mod reference;
/// Core data types (XBRL content model, wire payloads, queries).
pub mod types;

// Re-export commonly used items at crate root
pub use api::FilingsApi;
pub use error::{FilingsError, Result};
pub use reference::{canonical_url, expect_xbrl};
pub use types::{
    CompensationRecord, DataFile, EntityMapping, Fact, FactPeriod, FilingRecord, HoldingLine,
    HoldingsFiling, HoldingsQuery, InsiderFiling, InsiderQuery, InsiderTransaction,
    NonDerivativeTable, ReportingOwner, SharesOrPrincipal, TransactionAmounts, TransactionCoding,
    ValueField, XbrlInstance, XbrlSection,
};
