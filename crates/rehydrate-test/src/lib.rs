//! Rehydrate Test Harness - Hydration fuzzing and page load simulation
//!
//! This crate provides:
//! - Signal fuzzing against a reference model of merge-once hydration
//! - Server render / client session simulation across a JSON boundary
//! - Benchmarks for the steady-state and hydrate paths

pub mod signal_fuzzer;
pub mod simulator;

pub use signal_fuzzer::*;
pub use simulator::*;
