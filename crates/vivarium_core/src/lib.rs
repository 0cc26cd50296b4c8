//! # Vivarium Core
//!
//! The simulation engine for Vivarium, a deterministic digital-evolution
//! system in which self-replicating machine-code organisms live inside
//! circular memory arenas ("cores") under constant mutation pressure.
//!
//! The engine is a pure in-process library:
//! - **Memory cores**: bit-packed circular arenas with incremental flag
//!   counters ([`memory`]).
//! - **Evolver**: a per-core xorshift mutation engine, two strikes per
//!   cycle, reproducible down to the bit from the seed ([`evolver`]).
//! - **Interpreter**: the 32-opcode organism CPU ([`interpreter`]).
//! - **Engine clock**: owns the cores and the single global cycle counter
//!   ([`engine`]).
//!
//! ## Example
//!
//! ```
//! use vivarium_core::{Engine, EngineConfig};
//!
//! let config = EngineConfig::new(123_456, 8, 2).with_ancestor("abcdefg.:.:");
//! let mut engine = Engine::new(&config).expect("valid config");
//! for _ in 0..1000 {
//!     engine.cycle();
//! }
//! assert_eq!(engine.cycle_count(), 1000);
//! assert_eq!(engine.core(0).unwrap().evo_calls(), 2000);
//! ```

/// Engine construction parameters.
pub mod config;
/// The engine clock and per-core views.
pub mod engine;
/// Error types.
pub mod error;
/// The per-core mutation engine.
pub mod evolver;
/// Organism execution.
pub mod interpreter;
/// The circular memory arena.
pub mod memory;
/// Logging setup and metrics snapshots.
pub mod metrics;
/// Organisms and the population arena.
pub mod population;

pub use config::EngineConfig;
pub use engine::{Core, Engine, MAX_ORDER, MIN_ORDER};
pub use error::EngineError;
pub use evolver::{Evolver, STATE_WORDS};
pub use memory::{MemoryCore, ALLOC_FLAG, BLOCK_START_FLAG, INST_MASK, WORMHOLE_FLAG};
pub use metrics::{init_logging, Metrics};
pub use population::{MemBlock, OrgId, Organism, Population};
