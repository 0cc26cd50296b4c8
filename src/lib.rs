//! # Vivarium
//!
//! A deterministic digital-evolution engine: circular memory cores populated
//! by self-replicating machine-code organisms, perturbed each cycle by a
//! seeded mutation engine. Same parameters, same trajectory, always.
//!
//! This crate is the public face of the workspace: it re-exports the engine
//! (`vivarium_core`) and the instruction-set data layer (`vivarium_data`),
//! and adds the small amount of host glue (config file loading) that does
//! not belong in the engine itself.

pub use vivarium_core::{
    init_logging, Core, Engine, EngineConfig, EngineError, MemBlock, Metrics, OrgId, Organism,
    MAX_ORDER, MIN_ORDER, STATE_WORDS,
};
pub use vivarium_data::{Inst, InstFamily, INST_COUNT};

use std::path::Path;

use anyhow::Context;

/// Loads an [`EngineConfig`] from a TOML file.
pub fn load_config(path: impl AsRef<Path>) -> anyhow::Result<EngineConfig> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    EngineConfig::from_toml_str(&text)
        .with_context(|| format!("parsing config file {}", path.display()))
}
