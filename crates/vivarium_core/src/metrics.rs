//! Structured logging setup and engine-wide metrics snapshots.

use serde::Serialize;

use crate::engine::Engine;

/// Initialize the tracing subscriber for logging.
pub fn init_logging() {
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(tracing::Level::INFO)
            .finish(),
    )
    .ok();
}

/// A point-in-time summary of an engine, aggregated over all cores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub cycle: u64,
    pub cores: usize,
    pub organisms: usize,
    pub allocated: u64,
    pub block_starts: u64,
    pub wormholes: u64,
}

impl Metrics {
    /// Collects a snapshot from the incremental per-core counters.
    #[must_use]
    pub fn collect(engine: &Engine) -> Self {
        let mut organisms = 0;
        let mut allocated = 0;
        let mut block_starts = 0;
        let mut wormholes = 0;
        for core in engine.cores() {
            organisms += core.organisms().len();
            allocated += u64::from(core.flagged_alloc());
            block_starts += u64::from(core.flagged_block_start());
            wormholes += u64::from(core.flagged_wormhole());
        }
        Self {
            cycle: engine.cycle_count(),
            cores: engine.core_count(),
            organisms,
            allocated,
            block_starts,
            wormholes,
        }
    }

    /// Logs the snapshot as a structured event.
    pub fn log(&self) {
        tracing::info!(
            cycle = self.cycle,
            organisms = self.organisms,
            allocated = self.allocated,
            "engine metrics"
        );
    }
}
