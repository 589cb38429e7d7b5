//! # Overview
//! "Stochastic" provides the random variate and output analysis layers of
//! Monte-Carlo simulation studies.
//!
//! This repository contains:
//!
//! * Named, buffered uniform streams, reproducible by name and independent
//! across names.
//! * Variate transforms for ten distribution families (uniform,
//! log-uniform, Bernoulli, Poisson, exponential, k-Erlang, normal,
//! symmetric triangular, ramp, and Weibull), with a JSON/YAML
//! configuration layer.
//! * Output analysis, for estimating a mean with confidence intervals and
//! planning how many further observations a target precision needs.
//!
//! Stochastic is compatible with a wide variety of compilation targets,
//! including WASM.  Nothing in the crate is shared across threads: every
//! stream, distribution, and estimator belongs to the context that created
//! it, and concurrent workers should each own independently named streams.
pub mod input_modeling;
pub mod output_analysis;
pub mod utils;
pub mod web;

pub use web::{WebEstimator, WebRandomVariable};
