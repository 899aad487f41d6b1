#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/filings/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Bounded in-memory caching for filings data access.
//!
//! This crate provides [`LruCache`], the process-lifetime caching primitive
//! used throughout the workspace. Entries live until evicted by capacity
//! pressure; there is no TTL and no explicit invalidation, so staleness is
//! an accepted tradeoff for request-volume reduction.

/// Least-recently-used cache implementation.
pub mod lru;

pub use lru::LruCache;
