//! Error types for engine construction and indexed accessors.

use thiserror::Error;

/// Main error type for `vivarium_core` operations.
///
/// Construction errors are all-or-nothing: a failed [`crate::Engine::new`]
/// never leaves a partially built engine behind. Index errors report caller
/// mistakes instead of clamping. Once an engine exists, `cycle()` and all
/// address-taking accessors are total.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Core order outside the supported range.
    #[error("unsupported memory order {order} (must be within {min}..={max})", min = crate::engine::MIN_ORDER, max = crate::engine::MAX_ORDER)]
    InvalidOrder { order: u32 },

    /// An engine needs at least one core.
    #[error("core count must be non-zero")]
    NoCores,

    /// Ancestor genome does not fit the per-core allocation capacity.
    #[error("ancestor genome of {len} cells exceeds core capacity {cap}")]
    AncestorTooLong { len: usize, cap: u32 },

    /// Ancestor text contained a character outside the glyph table.
    #[error("unknown genome glyph {glyph:?}")]
    UnknownGlyph { glyph: char },

    /// Raw ancestor byte outside the opcode range.
    #[error("opcode value {value} out of range (must be below {max})", max = vivarium_data::INST_COUNT)]
    BadOpcode { value: u8 },

    /// Core index out of range.
    #[error("core index {cidx} out of range ({cores} cores)")]
    CoreIndex { cidx: usize, cores: usize },

    /// Evolver state word index out of range.
    #[error("evolver state index {sidx} out of range ({words} words)", words = crate::evolver::STATE_WORDS)]
    StateIndex { sidx: usize },

    /// Configuration file could not be parsed.
    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),
}
