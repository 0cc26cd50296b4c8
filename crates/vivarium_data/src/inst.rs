//! The instruction set organisms are built from.
//!
//! Thirty-two opcodes in five families. The numeric order is part of the
//! engine's contract: memory cells store the opcode in their low five bits,
//! and the evolver derives opcodes as `word % 32`, so reordering variants
//! would change every evolutionary trajectory.

use serde::{Deserialize, Serialize};

/// Number of opcodes in the instruction set.
pub const INST_COUNT: u8 = 32;

/// One opcode of the organism instruction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Inst {
    // No-ops. Nop0/Nop1 double as the binary template alphabet.
    Nop0,
    Nop1,
    NopA,
    NopB,
    NopC,
    NopD,
    NopE,
    NopF,
    NopG,

    // Control
    Adrb,
    Adrf,
    Jmpb,
    Jmpf,
    Whle,
    Endw,

    // Biology
    Malb,
    Malf,
    Splt,
    Bswp,
    Eatb,
    Eatf,

    // Memory
    Push,
    Pull,
    Copy,
    Wrmh,

    // Math
    Zero,
    Incr,
    Decr,
    Shfl,
    Shfr,
    Nand,
    Ntor,
}

/// The five behavioral families of the instruction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstFamily {
    NoOp,
    Control,
    Biology,
    Memory,
    Math,
}

const ALL: [Inst; INST_COUNT as usize] = [
    Inst::Nop0,
    Inst::Nop1,
    Inst::NopA,
    Inst::NopB,
    Inst::NopC,
    Inst::NopD,
    Inst::NopE,
    Inst::NopF,
    Inst::NopG,
    Inst::Adrb,
    Inst::Adrf,
    Inst::Jmpb,
    Inst::Jmpf,
    Inst::Whle,
    Inst::Endw,
    Inst::Malb,
    Inst::Malf,
    Inst::Splt,
    Inst::Bswp,
    Inst::Eatb,
    Inst::Eatf,
    Inst::Push,
    Inst::Pull,
    Inst::Copy,
    Inst::Wrmh,
    Inst::Zero,
    Inst::Incr,
    Inst::Decr,
    Inst::Shfl,
    Inst::Shfr,
    Inst::Nand,
    Inst::Ntor,
];

impl Inst {
    /// Decodes an opcode value. Values at or above [`INST_COUNT`] are not
    /// opcodes and yield `None`.
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Inst> {
        ALL.get(value as usize).copied()
    }

    /// All opcodes in numeric order.
    #[must_use]
    pub fn all() -> &'static [Inst] {
        &ALL
    }

    /// The single-character glyph used to render this opcode.
    #[must_use]
    pub fn glyph(self) -> char {
        match self {
            Inst::Nop0 => '.',
            Inst::Nop1 => ':',
            Inst::NopA => 'a',
            Inst::NopB => 'b',
            Inst::NopC => 'c',
            Inst::NopD => 'd',
            Inst::NopE => 'e',
            Inst::NopF => 'f',
            Inst::NopG => 'g',
            Inst::Adrb => '[',
            Inst::Adrf => ']',
            Inst::Jmpb => '(',
            Inst::Jmpf => ')',
            Inst::Whle => '?',
            Inst::Endw => '_',
            Inst::Malb => '{',
            Inst::Malf => '}',
            Inst::Splt => '$',
            Inst::Bswp => '%',
            Inst::Eatb => 'E',
            Inst::Eatf => '3',
            Inst::Push => '#',
            Inst::Pull => '~',
            Inst::Copy => 'x',
            Inst::Wrmh => 'w',
            Inst::Zero => 'z',
            Inst::Incr => '^',
            Inst::Decr => 'v',
            Inst::Shfl => '<',
            Inst::Shfr => '>',
            Inst::Nand => '&',
            Inst::Ntor => '|',
        }
    }

    /// Decodes a glyph back into its opcode. Inverse of [`Inst::glyph`].
    #[must_use]
    pub fn from_glyph(glyph: char) -> Option<Inst> {
        ALL.iter().copied().find(|inst| inst.glyph() == glyph)
    }

    /// Which behavioral family this opcode belongs to.
    #[must_use]
    pub fn family(self) -> InstFamily {
        match self as u8 {
            0..=8 => InstFamily::NoOp,
            9..=14 => InstFamily::Control,
            15..=20 => InstFamily::Biology,
            21..=24 => InstFamily::Memory,
            _ => InstFamily::Math,
        }
    }

    /// Whether this opcode is a template symbol (`Nop0` or `Nop1`).
    #[must_use]
    pub fn is_template(self) -> bool {
        matches!(self, Inst::Nop0 | Inst::Nop1)
    }

    /// The template complement: `Nop0` ↔ `Nop1`. Identity for everything
    /// else.
    #[must_use]
    pub fn complement(self) -> Inst {
        match self {
            Inst::Nop0 => Inst::Nop1,
            Inst::Nop1 => Inst::Nop0,
            other => other,
        }
    }
}

/// Parses glyph text into raw opcode values. Returns `None` if any character
/// is outside the glyph table.
#[must_use]
pub fn parse_glyphs(text: &str) -> Option<Vec<u8>> {
    text.chars()
        .map(|glyph| Inst::from_glyph(glyph).map(|inst| inst as u8))
        .collect()
}

/// Renders a genome (raw opcode values) as a glyph string. Returns `None` if
/// any byte is not a valid opcode.
#[must_use]
pub fn render_glyphs(genome: &[u8]) -> Option<String> {
    genome
        .iter()
        .map(|&byte| Inst::from_u8(byte).map(Inst::glyph))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn opcode_values_are_dense_and_stable() {
        assert_eq!(ALL.len(), INST_COUNT as usize);
        for (value, inst) in ALL.iter().enumerate() {
            assert_eq!(*inst as u8, value as u8);
            assert_eq!(Inst::from_u8(value as u8), Some(*inst));
        }
        assert_eq!(Inst::from_u8(INST_COUNT), None);
        assert_eq!(Inst::from_u8(0xff), None);
    }

    #[test]
    fn glyph_table_is_a_bijection() {
        let glyphs: HashSet<char> = ALL.iter().map(|inst| inst.glyph()).collect();
        assert_eq!(glyphs.len(), INST_COUNT as usize);
        for inst in Inst::all() {
            assert_eq!(Inst::from_glyph(inst.glyph()), Some(*inst));
        }
        assert_eq!(Inst::from_glyph('@'), None);
    }

    #[test]
    fn families_cover_the_set() {
        let noops = ALL.iter().filter(|i| i.family() == InstFamily::NoOp);
        assert_eq!(noops.count(), 9);
        assert_eq!(Inst::Whle.family(), InstFamily::Control);
        assert_eq!(Inst::Splt.family(), InstFamily::Biology);
        assert_eq!(Inst::Wrmh.family(), InstFamily::Memory);
        assert_eq!(Inst::Ntor.family(), InstFamily::Math);
    }

    #[test]
    fn template_complement_swaps_nops() {
        assert_eq!(Inst::Nop0.complement(), Inst::Nop1);
        assert_eq!(Inst::Nop1.complement(), Inst::Nop0);
        assert_eq!(Inst::Copy.complement(), Inst::Copy);
        assert!(Inst::Nop0.is_template());
        assert!(!Inst::NopA.is_template());
    }

    #[test]
    fn renders_genomes_as_glyphs() {
        let genome = [2u8, 3, 4, 0, 1];
        assert_eq!(render_glyphs(&genome).as_deref(), Some("abc.:"));
        assert_eq!(render_glyphs(&[0, 99]), None);
    }

    #[test]
    fn parses_glyph_text() {
        assert_eq!(parse_glyphs("abc.:"), Some(vec![2, 3, 4, 0, 1]));
        assert_eq!(parse_glyphs(""), Some(vec![]));
        assert_eq!(parse_glyphs("a@"), None);
    }

    #[test]
    fn serde_roundtrip() {
        let json = serde_json::to_string(&Inst::Splt).unwrap();
        let back: Inst = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Inst::Splt);
    }
}
