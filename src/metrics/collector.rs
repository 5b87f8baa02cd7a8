//! Metrics collection using Prometheus
//!
//! Counters and histograms describing recorded matches and rank movement.

use crate::types::{MatchResult, RankMovement};
use anyhow::Result;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;
use std::time::Duration;

/// Metrics collector for the rating service
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Matches recorded, labelled by the first player's result
    matches_recorded_total: IntCounterVec,

    /// Rank movements per player side
    rank_movements_total: IntCounterVec,

    /// Distribution of applied CP deltas
    cp_delta: Histogram,

    /// Time spent recording one match
    calculation_duration: Histogram,
}

impl MetricsCollector {
    /// Create a new metrics collector with default registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let matches_recorded_total = IntCounterVec::new(
            Opts::new(
                "caro_rating_matches_recorded_total",
                "Total matches recorded",
            ),
            &["result"],
        )?;
        registry.register(Box::new(matches_recorded_total.clone()))?;

        let rank_movements_total = IntCounterVec::new(
            Opts::new(
                "caro_rating_rank_movements_total",
                "Rank movements after recorded matches",
            ),
            &["movement"],
        )?;
        registry.register(Box::new(rank_movements_total.clone()))?;

        let cp_delta = Histogram::with_opts(
            HistogramOpts::new("caro_rating_cp_delta", "CP delta applied per player")
                .buckets(vec![
                    -40.0, -30.0, -20.0, -10.0, -1.0, 0.0, 1.0, 10.0, 20.0, 30.0, 40.0,
                ]),
        )?;
        registry.register(Box::new(cp_delta.clone()))?;

        let calculation_duration = Histogram::with_opts(
            HistogramOpts::new(
                "caro_rating_calculation_duration_seconds",
                "Time spent recording a match",
            )
            .buckets(vec![0.00001, 0.0001, 0.001, 0.01, 0.1, 1.0]),
        )?;
        registry.register(Box::new(calculation_duration.clone()))?;

        Ok(Self {
            registry,
            matches_recorded_total,
            rank_movements_total,
            cp_delta,
            calculation_duration,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Record one finished match
    pub fn record_match(&self, result: MatchResult, duration: Duration) {
        self.matches_recorded_total
            .with_label_values(&[result.as_str()])
            .inc();

        self.calculation_duration.observe(duration.as_secs_f64());
    }

    /// Record the outcome for one side of a match
    pub fn record_rating_change(&self, delta: i64, movement: RankMovement) {
        self.cp_delta.observe(delta as f64);

        self.rank_movements_total
            .with_label_values(&[movement.as_str()])
            .inc();
    }

    /// Total matches recorded for a given result label
    pub fn matches_recorded(&self, result: MatchResult) -> u64 {
        self.matches_recorded_total
            .with_label_values(&[result.as_str()])
            .get()
    }

    /// Total rank movements of a given kind
    pub fn rank_movements(&self, movement: RankMovement) -> u64 {
        self.rank_movements_total
            .with_label_values(&[movement.as_str()])
            .get()
    }

    /// Render all metrics in the Prometheus text format
    pub fn export(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| anyhow::anyhow!("Failed to encode metrics: {}", e))?;
        Ok(String::from_utf8(buffer)?)
    }
}
