//! Engine configuration.
//!
//! A small serde-backed parameter block, loadable from TOML:
//!
//! ```toml
//! seed = 123456
//! order = 8
//! cores = 2
//! ancestor = "abcdefg.:.:"
//! ```
//!
//! The ancestor is authored as glyph text (one character per opcode, see
//! [`vivarium_data::Inst::glyph`]) and decoded at construction time.

use serde::{Deserialize, Serialize};
use vivarium_data::Inst;

use crate::error::EngineError;

/// Construction parameters for an [`crate::Engine`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Master seed. Everything deterministic derives from it.
    pub seed: u64,
    /// log2 of the per-core memory size.
    pub order: u32,
    /// Number of independent cores.
    pub cores: usize,
    /// Optional ancestor genome, as glyph text.
    pub ancestor: Option<String>,
    /// Optional ancestor genome, as raw opcode values. Glyph text wins when
    /// both are present.
    pub ancestor_bytes: Option<Vec<u8>>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            order: 16,
            cores: 2,
            ancestor: None,
            ancestor_bytes: None,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn new(seed: u64, order: u32, cores: usize) -> Self {
        Self {
            seed,
            order,
            cores,
            ancestor: None,
            ancestor_bytes: None,
        }
    }

    #[must_use]
    pub fn with_ancestor(mut self, glyphs: &str) -> Self {
        self.ancestor = Some(glyphs.to_string());
        self
    }

    #[must_use]
    pub fn with_ancestor_bytes(mut self, bytes: &[u8]) -> Self {
        self.ancestor_bytes = Some(bytes.to_vec());
        self
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, EngineError> {
        Ok(toml::from_str(text)?)
    }

    /// Decodes the ancestor into raw opcode values, from glyph text or from
    /// the raw byte form.
    pub(crate) fn genome(&self) -> Result<Option<Vec<u8>>, EngineError> {
        if let Some(glyphs) = &self.ancestor {
            let genome = glyphs
                .chars()
                .map(|glyph| {
                    Inst::from_glyph(glyph)
                        .map(|inst| inst as u8)
                        .ok_or(EngineError::UnknownGlyph { glyph })
                })
                .collect::<Result<Vec<u8>, EngineError>>()?;
            return Ok(Some(genome));
        }
        if let Some(bytes) = &self.ancestor_bytes {
            for &value in bytes {
                if Inst::from_u8(value).is_none() {
                    return Err(EngineError::BadOpcode { value });
                }
            }
            return Ok(Some(bytes.clone()));
        }
        Ok(None)
    }
}
