//! Per-core mutation engine: the "cosmic ray" source.
//!
//! The evolver owns a four-word xorshift state and strikes its core's memory
//! exactly twice per cycle, whatever the organisms are doing. Mutation
//! pressure is constant and a pure function of the construction parameters
//! and the call count (never of wall-clock time or population state), so a
//! given seed replays the same perturbation stream bit for bit.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use vivarium_data::INST_COUNT;

use crate::memory::MemoryCore;

/// Width of the evolver state vector.
pub const STATE_WORDS: usize = 4;

/// Deterministic per-core mutation state.
///
/// The state vector doubles as the decoded outcome of the latest strike:
/// after any completed cycle, `state[0] % 32` is the instruction it wrote
/// and `state[1] % size` the address it wrote to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evolver {
    state: [u32; STATE_WORDS],
    calls: u64,
    last_write: u64,
    last_address: u32,
    last_inst: u8,
    wrote_last_cycle: bool,
}

impl Evolver {
    /// A dormant evolver. All-zero xorshift state is a fixed point, so an
    /// empty-genesis core keeps writing opcode 0 at address 0 until
    /// something perturbs it.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// An evolver seeded for ancestor genesis, derived from the engine seed,
    /// the core index, and the genome itself. The state is re-drawn until
    /// non-zero, which distinguishes ancestor genesis from empty genesis.
    #[must_use]
    pub(crate) fn seeded(seed: u64, cidx: usize, genome: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(seed.to_le_bytes());
        hasher.update((cidx as u64).to_le_bytes());
        hasher.update(genome);
        let mut rng = ChaCha8Rng::from_seed(hasher.finalize().into());

        let mut state = [0u32; STATE_WORDS];
        while state.iter().all(|&word| word == 0) {
            for word in &mut state {
                *word = rng.next_u32();
            }
        }

        Self {
            state,
            ..Self::default()
        }
    }

    /// One xorshift128 step (Marsaglia). Every advance counts as one call.
    fn next(&mut self) -> u32 {
        let mut t = self.state[3];
        t ^= t << 11;
        t ^= t >> 8;
        self.state[3] = self.state[2];
        self.state[2] = self.state[1];
        self.state[1] = self.state[0];
        let s = self.state[0];
        t ^= s;
        t ^= s >> 19;
        self.state[0] = t;
        self.calls += 1;
        t
    }

    /// One mutation strike: advance the state, derive a target, overwrite
    /// the opcode there. Flags are left alone, so a strike inside an
    /// allocated block mutates the organism in place.
    pub(crate) fn strike(&mut self, mem: &mut MemoryCore, cycle: u64) {
        self.next();

        let addr = self.state[1] % mem.size();
        let inst = (self.state[0] % u32::from(INST_COUNT)) as u8;

        // TODO: eventually spawn a new organism when a strike lands inside
        // an allocated block; for now the flags and population are
        // deliberately left untouched.
        mem.set_inst_at(i64::from(addr), inst);

        self.last_write = cycle;
        self.last_address = addr;
        self.last_inst = inst;
        self.wrote_last_cycle = true;
    }

    /// One state word, by index.
    #[must_use]
    pub fn state_word(&self, sidx: usize) -> Option<u32> {
        self.state.get(sidx).copied()
    }

    /// Total xorshift advances so far. Always `2 * cycles`.
    #[must_use]
    pub fn calls(&self) -> u64 {
        self.calls
    }

    /// Cycle index of the most recent write.
    #[must_use]
    pub fn last_write(&self) -> u64 {
        self.last_write
    }

    /// Address of the most recent write.
    #[must_use]
    pub fn last_address(&self) -> u32 {
        self.last_address
    }

    /// Opcode of the most recent write.
    #[must_use]
    pub fn last_inst(&self) -> u8 {
        self.last_inst
    }

    /// Whether the most recently completed cycle wrote to memory.
    #[must_use]
    pub fn wrote_last_cycle(&self) -> bool {
        self.wrote_last_cycle
    }
}
