//! Circular, flag-annotated memory arena, one per core.
//!
//! Every cell is a single byte: the low five bits hold an opcode, the high
//! three bits hold independent flags. All addressing goes through one
//! wrapping accessor, so any `i64` (negative, or many laps beyond the arena)
//! names a valid cell. Flag counters are adjusted on the same code path
//! that flips the bits; [`MemoryCore::recount`] exists only to check that
//! invariant in tests and diagnostics.

use serde::{Deserialize, Serialize};
use vivarium_data::INST_COUNT;

/// Cell flag: part of a living organism's allocated block.
pub const ALLOC_FLAG: u8 = 1 << 5;
/// Cell flag: first cell of an allocated block.
pub const BLOCK_START_FLAG: u8 = 1 << 6;
/// Cell flag: wormhole-linked cell.
pub const WORMHOLE_FLAG: u8 = 1 << 7;
/// Low bits holding the opcode value.
pub const INST_MASK: u8 = 0x1f;

const FLAG_MASK: u8 = ALLOC_FLAG | BLOCK_START_FLAG | WORMHOLE_FLAG;

/// One core's memory: a fixed-size circular tape of flag-annotated cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryCore {
    cells: Vec<u8>,
    size: u32,
    flagged_alloc: u32,
    flagged_block_start: u32,
    flagged_wormhole: u32,
}

impl MemoryCore {
    /// Creates an all-zero arena of `1 << order` cells. Order validation is
    /// the engine's job.
    #[must_use]
    pub(crate) fn new(order: u32) -> Self {
        let size = 1u32 << order;
        Self {
            cells: vec![0; size as usize],
            size,
            flagged_alloc: 0,
            flagged_block_start: 0,
            flagged_wormhole: 0,
        }
    }

    /// Number of cells in the arena.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Normalizes any integer address onto the tape.
    #[inline]
    fn index(&self, addr: i64) -> usize {
        addr.rem_euclid(i64::from(self.size)) as usize
    }

    /// Raw cell byte (opcode bits plus flag bits).
    #[must_use]
    pub fn byte_at(&self, addr: i64) -> u8 {
        self.cells[self.index(addr)]
    }

    /// Decoded opcode value, always in `[0, 32)`.
    #[must_use]
    pub fn inst_at(&self, addr: i64) -> u8 {
        self.byte_at(addr) & INST_MASK
    }

    #[must_use]
    pub fn is_alloc_at(&self, addr: i64) -> bool {
        self.byte_at(addr) & ALLOC_FLAG != 0
    }

    #[must_use]
    pub fn is_block_start_at(&self, addr: i64) -> bool {
        self.byte_at(addr) & BLOCK_START_FLAG != 0
    }

    #[must_use]
    pub fn is_wormhole_at(&self, addr: i64) -> bool {
        self.byte_at(addr) & WORMHOLE_FLAG != 0
    }

    /// Cells currently flagged allocated.
    #[must_use]
    pub fn flagged_alloc(&self) -> u32 {
        self.flagged_alloc
    }

    /// Cells currently flagged block-start.
    #[must_use]
    pub fn flagged_block_start(&self) -> u32 {
        self.flagged_block_start
    }

    /// Cells currently flagged wormhole.
    #[must_use]
    pub fn flagged_wormhole(&self) -> u32 {
        self.flagged_wormhole
    }

    /// Overwrites the opcode bits of a cell, leaving its flags alone.
    pub(crate) fn set_inst_at(&mut self, addr: i64, inst: u8) {
        debug_assert!(inst < INST_COUNT);
        let idx = self.index(addr);
        self.cells[idx] = (self.cells[idx] & FLAG_MASK) | (inst & INST_MASK);
    }

    pub(crate) fn set_alloc_at(&mut self, addr: i64) {
        let idx = self.index(addr);
        debug_assert_eq!(self.cells[idx] & ALLOC_FLAG, 0);
        self.cells[idx] |= ALLOC_FLAG;
        self.flagged_alloc += 1;
        debug_assert!(self.flagged_alloc <= self.size);
    }

    pub(crate) fn clear_alloc_at(&mut self, addr: i64) {
        let idx = self.index(addr);
        debug_assert_ne!(self.cells[idx] & ALLOC_FLAG, 0);
        self.cells[idx] &= !ALLOC_FLAG;
        self.flagged_alloc -= 1;
    }

    pub(crate) fn set_block_start_at(&mut self, addr: i64) {
        let idx = self.index(addr);
        debug_assert_eq!(self.cells[idx] & BLOCK_START_FLAG, 0);
        self.cells[idx] |= BLOCK_START_FLAG;
        self.flagged_block_start += 1;
        debug_assert!(self.flagged_block_start <= self.size);
    }

    pub(crate) fn clear_block_start_at(&mut self, addr: i64) {
        let idx = self.index(addr);
        debug_assert_ne!(self.cells[idx] & BLOCK_START_FLAG, 0);
        self.cells[idx] &= !BLOCK_START_FLAG;
        self.flagged_block_start -= 1;
    }

    pub(crate) fn set_wormhole_at(&mut self, addr: i64) {
        let idx = self.index(addr);
        debug_assert_eq!(self.cells[idx] & WORMHOLE_FLAG, 0);
        self.cells[idx] |= WORMHOLE_FLAG;
        self.flagged_wormhole += 1;
        debug_assert!(self.flagged_wormhole <= self.size);
    }

    /// Full-scan recount of the three flag counters, as
    /// `(alloc, block_start, wormhole)`. Diagnostic only: too costly for the
    /// per-cycle path, where the incremental counters are authoritative.
    #[must_use]
    pub fn recount(&self) -> (u32, u32, u32) {
        let mut alloc = 0;
        let mut block_start = 0;
        let mut wormhole = 0;
        for &cell in &self.cells {
            alloc += u32::from(cell & ALLOC_FLAG != 0);
            block_start += u32::from(cell & BLOCK_START_FLAG != 0);
            wormhole += u32::from(cell & WORMHOLE_FLAG != 0);
        }
        (alloc, block_start, wormhole)
    }
}
