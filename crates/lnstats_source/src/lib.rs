//! # lnstats Source
//!
//! Remote source adapter for Bitcoin Lightning Network statistics.
//!
//! This crate provides:
//! - The fixed [`StatRecord`] schema and its declared field order
//! - An HTTP client abstraction with a `reqwest` implementation
//! - [`MempoolSource`], which fetches the statistics series from mempool.space
//! - [`MockSource`] for driving the sync engine in tests
//!
//! ## Contract
//!
//! A fetch returns a non-empty list of records in whatever order the remote
//! sent them. Timestamps stay in **seconds**, exactly as they arrived on the
//! wire; converting them is the sync engine's job.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod http;
mod mempool;
mod record;
mod source;

pub use config::SourceConfig;
pub use error::{SourceError, SourceResult};
pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use mempool::MempoolSource;
pub use record::{StatRecord, STAT_FIELDS};
pub use source::{MockSource, StatsSource};
