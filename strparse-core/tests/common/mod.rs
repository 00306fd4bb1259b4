//! Test infrastructure for the strparse parsers
//!
//! Provides fixture loading, stochastic input variations, and trace helpers.

#![allow(dead_code)]

mod loader;
mod harness;
mod generators;

pub use loader::{TestCase, load_fixtures_by_name};
pub use harness::{run_test, run_with_variations, json_trace, Kind, TraceListener};
pub use generators::Gen;
