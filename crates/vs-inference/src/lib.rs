//! # vs-inference
//!
//! Statistics for vanstat.
//!
//! This crate provides:
//! - the log transform of the crime target ([`transforms`])
//! - single-predictor ordinary least squares with scipy-style statistics ([`regression`])
//! - histogram binning, boxplot statistics, and pairwise correlation ([`summary`])
//!
//! Everything here is a pure function of its inputs; no I/O.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Simple linear regression (one predictor + intercept).
pub mod regression;
/// Descriptive statistics: quantiles, histograms, boxplot stats, correlation.
pub mod summary;
/// Target transforms.
pub mod transforms;

pub use regression::{FitError, LinearFit, MIN_OBSERVATIONS, linregress, linregress_pairs};
pub use summary::{BoxStats, Histogram, correlation_matrix, histogram, quantile_sorted};
pub use transforms::LogTarget;
