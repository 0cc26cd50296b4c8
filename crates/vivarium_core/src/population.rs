//! Organism state and the per-core population arena.
//!
//! Organisms live in slab slots keyed by a stable handle: killing one frees
//! its slot without renumbering the rest, so a handle identifies the same
//! organism for its whole lifetime. Execution and reaping both follow spawn
//! order (oldest first), which keeps every pass reproducible.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Depth of an organism's data stack.
pub const STACK_DEPTH: usize = 8;

/// Number of general-purpose registers per organism.
pub const REG_COUNT: usize = 4;

/// A contiguous run of cells claimed by an organism.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemBlock {
    pub addr: u32,
    pub len: u32,
}

impl MemBlock {
    /// Whether `addr` falls inside the block on a tape of `size` cells,
    /// wrapping included.
    #[must_use]
    pub fn contains(&self, addr: u32, size: u32) -> bool {
        addr.wrapping_sub(self.addr) % size < self.len
    }
}

/// One living organism: an instruction pointer plus its private CPU state
/// and the memory block(s) it claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organism {
    pub ip: u32,
    pub regs: [u32; REG_COUNT],
    pub stack: [u32; STACK_DEPTH],
    pub sp: usize,
    /// Owned program block.
    pub mb0: MemBlock,
    /// Child allocation, pending a split.
    pub mb1: Option<MemBlock>,
}

impl Organism {
    #[must_use]
    pub fn new(ip: u32, mb0: MemBlock) -> Self {
        Self {
            ip,
            regs: [0; REG_COUNT],
            stack: [0; STACK_DEPTH],
            sp: 0,
            mb0,
            mb1: None,
        }
    }
}

/// Stable handle to an organism slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrgId(usize);

/// Slab arena of organisms with spawn-order bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Population {
    slots: Vec<Option<Organism>>,
    spawn_order: VecDeque<OrgId>,
    free: Vec<usize>,
}

impl Population {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Number of living organisms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spawn_order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spawn_order.is_empty()
    }

    /// Adds an organism, reusing a freed slot when one exists.
    pub(crate) fn spawn(&mut self, organism: Organism) -> OrgId {
        let id = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(organism);
                OrgId(slot)
            }
            None => {
                self.slots.push(Some(organism));
                OrgId(self.slots.len() - 1)
            }
        };
        self.spawn_order.push_back(id);
        id
    }

    /// Removes and returns the oldest organism.
    pub(crate) fn kill_oldest(&mut self) -> Option<Organism> {
        let id = self.spawn_order.pop_front()?;
        let organism = self.slots[id.0].take();
        debug_assert!(organism.is_some());
        self.free.push(id.0);
        organism
    }

    #[must_use]
    pub fn get(&self, id: OrgId) -> Option<&Organism> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub(crate) fn get_mut(&mut self, id: OrgId) -> Option<&mut Organism> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Handles of everything alive right now, oldest first. Snapshotting
    /// this before an interpreter pass keeps newborns out of the pass that
    /// created them.
    #[must_use]
    pub fn handles(&self) -> Vec<OrgId> {
        self.spawn_order.iter().copied().collect()
    }

    /// Living organisms in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = (OrgId, &Organism)> {
        self.spawn_order.iter().map(move |&id| {
            let organism = self.slots[id.0]
                .as_ref()
                .unwrap_or_else(|| unreachable!("spawn_order tracks live slots"));
            (id, organism)
        })
    }
}
