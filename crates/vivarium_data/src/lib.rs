//! Shared data definitions for the Vivarium engine.
//!
//! This crate holds the pure data layer: the 32-opcode instruction set that
//! organisms execute, its five-family grouping, and the glyph table used to
//! author and render genomes as text. Nothing here carries simulation
//! semantics; the engine lives in `vivarium_core`.

pub mod inst;

pub use inst::{parse_glyphs, render_glyphs, Inst, InstFamily, INST_COUNT};
