//! Benchmark utilities for the tiny2d ECS.
//!
//! Microbenchmarks cover the hot paths of a frame: component pool edits, entity creation and
//! destruction through the deferred queues, and walking a system's entity list.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench -p tiny2d_bench
//!
//! # Run specific benchmark group
//! cargo bench -p tiny2d_bench -- pool
//! ```
//!
//! Results are written to `target/criterion/` with HTML reports for visualization.

pub mod components;
pub mod workload;
