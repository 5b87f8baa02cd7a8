//! Metrics for the rating service
//!
//! This module provides Prometheus metrics describing recorded matches,
//! applied CP deltas and rank movement.

pub mod collector;

pub use collector::MetricsCollector;
