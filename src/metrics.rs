// Prometheus metrics definitions for the snake backend.

use lazy_static::lazy_static;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder,
};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // ── Gauges ───────────────────────────────────────────────────────

    /// Currently running rounds (0 or 1; the server runs one at a time).
    pub static ref ACTIVE_ROUNDS: IntGauge =
        IntGauge::new("snake_active_rounds", "Currently running rounds").unwrap();

    /// Live WebSocket connections.
    pub static ref CONNECTED_WEBSOCKETS: IntGauge =
        IntGauge::new("snake_connected_websockets", "Live WebSocket connections").unwrap();

    // ── Counters ─────────────────────────────────────────────────────

    /// Total rounds started.
    pub static ref ROUNDS_STARTED_TOTAL: IntCounter =
        IntCounter::new("snake_rounds_started_total", "Total rounds started").unwrap();

    /// Total rounds completed (by collision, tick limit, or stop).
    pub static ref ROUNDS_COMPLETED_TOTAL: IntCounter =
        IntCounter::new("snake_rounds_completed_total", "Total rounds completed").unwrap();

    /// Total game ticks executed.
    pub static ref TICKS_TOTAL: IntCounter =
        IntCounter::new("snake_ticks_total", "Total game ticks executed").unwrap();

    /// Total targets consumed across all rounds.
    pub static ref TARGETS_CONSUMED_TOTAL: IntCounter =
        IntCounter::new("snake_targets_consumed_total", "Total targets consumed").unwrap();

    // ── Histograms ───────────────────────────────────────────────────

    /// Tick processing duration in milliseconds (excluding the sleep).
    pub static ref TICK_DURATION_MS: Histogram = Histogram::with_opts(
        HistogramOpts::new("snake_tick_duration_ms", "Tick processing duration in ms")
            .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 33.0]),
    )
    .unwrap();

    /// Final score of each completed round.
    pub static ref ROUND_FINAL_SCORE: Histogram = Histogram::with_opts(
        HistogramOpts::new("snake_round_final_score", "Final score per round")
            .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0]),
    )
    .unwrap();
}

/// Register all metrics with the registry. Call once at startup.
pub fn register_metrics() {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(ACTIVE_ROUNDS.clone()),
        Box::new(CONNECTED_WEBSOCKETS.clone()),
        Box::new(ROUNDS_STARTED_TOTAL.clone()),
        Box::new(ROUNDS_COMPLETED_TOTAL.clone()),
        Box::new(TICKS_TOTAL.clone()),
        Box::new(TARGETS_CONSUMED_TOTAL.clone()),
        Box::new(TICK_DURATION_MS.clone()),
        Box::new(ROUND_FINAL_SCORE.clone()),
    ];

    for c in collectors {
        REGISTRY.register(c).expect("failed to register metric");
    }
}

/// Serialize all registered metrics to the Prometheus text exposition format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}
