//! topseries: rebuild per-process CPU and memory time series from
//! `top -b` captures.
//!
//! A capture is parsed into per-PID series ([`series::SnapshotParser`]),
//! consolidated into name-keyed tables on an evenly spaced time axis
//! ([`series::Consolidator`]), and persisted as a two-level-header CSV
//! ([`store::persist`] / [`store::reload`]).

pub mod app;
pub mod color_scheme;
pub mod config;
pub mod error;
pub mod input;
pub mod series;
pub mod store;
pub mod ui;

pub use error::{Result, TopSeriesError, WriteOutcome};
