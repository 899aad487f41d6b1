#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/filings/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! SEC filings research toolkit.
//!
//! This crate combines the document resolution and caching engine with the
//! tool surface exposed to the reporting layer:
//!
//! - [`IdentityResolver`] - ticker/CIK identity lookups with caching
//! - [`DocumentStore`] - canonical-keyed memoized document fetches
//! - [`metrics`] - tiered tag resolution over parsed XBRL content
//! - [`holdings`] - per-institution share/value aggregation
//! - [`insider`] - first-transaction extraction from Form 4/5 entries
//! - [`ResearchTools`] - the string-in/string-out tool facade
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use filings::{ResearchTools, SecApiClient};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = SecApiClient::from_env().expect("SEC_API_IO_KEY missing");
//!     let tools = ResearchTools::new(Arc::new(client));
//!
//!     println!("{}", tools.latest_annual_filings("AAPL", 5).await);
//!     println!("{}", tools.map_cik_to_name("924171").await);
//! }
//! ```

// Core types and traits
pub use filings_core::*;

// The concrete API client
pub use filings_secapi::SecApiClient;

/// Memoized XBRL instance and filing-section fetches.
pub mod documents;
/// Display formatting helpers.
pub mod format;
/// Institutional holdings aggregation.
pub mod holdings;
/// Ticker and CIK identity resolution.
pub mod identity;
/// Insider transaction extraction.
pub mod insider;
/// Tiered tag resolution over parsed XBRL content.
pub mod metrics;
/// The tool surface exposed to the research-assistant layer.
pub mod tools;

pub use documents::DocumentStore;
pub use identity::{DisplayName, IdentityResolver};
pub use tools::ResearchTools;
