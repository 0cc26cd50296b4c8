//! The engine clock: owns every core and advances them on one shared cycle
//! counter.
//!
//! `cycle()` is the only way to advance simulation time. Each cycle runs,
//! per core, the interpreter pass first and then exactly two evolver
//! strikes, so a mutation written in a cycle is never executed by an
//! organism in that same cycle. Cores are fully independent, which lets the
//! per-core work fan out across threads; the global counter moves once,
//! after every core has finished both passes.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::evolver::Evolver;
use crate::interpreter;
use crate::memory::MemoryCore;
use crate::population::{MemBlock, Organism, Population};

/// Smallest supported order (size 2).
pub const MIN_ORDER: u32 = 1;
/// Largest supported order (4 GiCell cores are out of scope).
pub const MAX_ORDER: u32 = 30;

/// One independent simulation core: memory arena, evolver, population.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Core {
    mem: MemoryCore,
    evo: Evolver,
    pop: Population,
}

impl Core {
    fn genesis(config: &EngineConfig, cidx: usize, genome: Option<&[u8]>) -> Self {
        let mut mem = MemoryCore::new(config.order);
        let mut pop = Population::new();
        let evo = match genome {
            Some(genome) => {
                for (addr, &inst) in genome.iter().enumerate() {
                    mem.set_alloc_at(addr as i64);
                    mem.set_inst_at(addr as i64, inst);
                }
                mem.set_block_start_at(0);
                pop.spawn(Organism::new(
                    0,
                    MemBlock {
                        addr: 0,
                        len: genome.len() as u32,
                    },
                ));
                Evolver::seeded(config.seed, cidx, genome)
            }
            None => Evolver::new(),
        };
        Self { mem, evo, pop }
    }

    // Memory accessors. All addresses wrap.

    #[must_use]
    pub fn byte_at(&self, addr: i64) -> u8 {
        self.mem.byte_at(addr)
    }

    #[must_use]
    pub fn inst_at(&self, addr: i64) -> u8 {
        self.mem.inst_at(addr)
    }

    #[must_use]
    pub fn is_alloc_at(&self, addr: i64) -> bool {
        self.mem.is_alloc_at(addr)
    }

    #[must_use]
    pub fn is_block_start_at(&self, addr: i64) -> bool {
        self.mem.is_block_start_at(addr)
    }

    #[must_use]
    pub fn is_wormhole_at(&self, addr: i64) -> bool {
        self.mem.is_wormhole_at(addr)
    }

    #[must_use]
    pub fn flagged_alloc(&self) -> u32 {
        self.mem.flagged_alloc()
    }

    #[must_use]
    pub fn flagged_block_start(&self) -> u32 {
        self.mem.flagged_block_start()
    }

    #[must_use]
    pub fn flagged_wormhole(&self) -> u32 {
        self.mem.flagged_wormhole()
    }

    /// Diagnostic full-scan recount, `(alloc, block_start, wormhole)`.
    #[must_use]
    pub fn recount(&self) -> (u32, u32, u32) {
        self.mem.recount()
    }

    // Evolver accessors.

    #[must_use]
    pub fn evo_calls(&self) -> u64 {
        self.evo.calls()
    }

    #[must_use]
    pub fn evo_last_write(&self) -> u64 {
        self.evo.last_write()
    }

    #[must_use]
    pub fn evo_last_address(&self) -> u32 {
        self.evo.last_address()
    }

    #[must_use]
    pub fn evo_last_inst(&self) -> u8 {
        self.evo.last_inst()
    }

    #[must_use]
    pub fn evo_wrote_last_cycle(&self) -> bool {
        self.evo.wrote_last_cycle()
    }

    /// One evolver state word, by index.
    pub fn evo_state_word(&self, sidx: usize) -> Result<u32, EngineError> {
        self.evo
            .state_word(sidx)
            .ok_or(EngineError::StateIndex { sidx })
    }

    /// Read-only view of this core's organisms.
    #[must_use]
    pub fn organisms(&self) -> &Population {
        &self.pop
    }
}

/// The whole simulation: N cores advancing on one global clock.
#[derive(Debug, Clone)]
pub struct Engine {
    seed: u64,
    order: u32,
    size: u32,
    cap: u32,
    cycle: u64,
    cores: Vec<Core>,
}

impl Engine {
    /// Builds an engine from its configuration. All-or-nothing: any invalid
    /// parameter fails before a single core is allocated.
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        if !(MIN_ORDER..=MAX_ORDER).contains(&config.order) {
            return Err(EngineError::InvalidOrder {
                order: config.order,
            });
        }
        if config.cores == 0 {
            return Err(EngineError::NoCores);
        }

        let size = 1u32 << config.order;
        let cap = size / 2;
        let genome = config.genome()?;
        if let Some(genome) = &genome {
            if genome.len() > cap as usize {
                return Err(EngineError::AncestorTooLong {
                    len: genome.len(),
                    cap,
                });
            }
        }

        let cores = (0..config.cores)
            .map(|cidx| Core::genesis(config, cidx, genome.as_deref()))
            .collect();

        tracing::info!(
            seed = config.seed,
            order = config.order,
            cores = config.cores,
            ancestor = genome.as_ref().map_or(0, Vec::len),
            "engine created"
        );

        Ok(Self {
            seed: config.seed,
            order: config.order,
            size,
            cap,
            cycle: 0,
            cores,
        })
    }

    /// Advances the whole simulation by one step: per core, one interpreter
    /// pass then two evolver strikes. The global counter moves only after
    /// every core is done.
    pub fn cycle(&mut self) {
        let cycle = self.cycle;
        let cap = self.cap;

        self.cores.par_iter_mut().for_each(|core| {
            interpreter::run_pass(&mut core.mem, &mut core.pop, cap);
            core.evo.strike(&mut core.mem, cycle);
            core.evo.strike(&mut core.mem, cycle);
        });

        self.cycle += 1;
        if self.cycle % 10_000 == 0 {
            tracing::info!(cycle = self.cycle, "simulation progress");
        }
    }

    #[must_use]
    pub fn cycle_count(&self) -> u64 {
        self.cycle
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn order(&self) -> u32 {
        self.order
    }

    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    #[must_use]
    pub fn cap(&self) -> u32 {
        self.cap
    }

    #[must_use]
    pub fn core_count(&self) -> usize {
        self.cores.len()
    }

    /// Borrows one core for inspection.
    pub fn core(&self, cidx: usize) -> Result<&Core, EngineError> {
        self.cores.get(cidx).ok_or(EngineError::CoreIndex {
            cidx,
            cores: self.cores.len(),
        })
    }

    pub(crate) fn cores(&self) -> &[Core] {
        &self.cores
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_parameters() {
        assert!(matches!(
            Engine::new(&EngineConfig::new(0, 0, 2)),
            Err(EngineError::InvalidOrder { order: 0 })
        ));
        assert!(matches!(
            Engine::new(&EngineConfig::new(0, 31, 2)),
            Err(EngineError::InvalidOrder { order: 31 })
        ));
        assert!(matches!(
            Engine::new(&EngineConfig::new(0, 8, 0)),
            Err(EngineError::NoCores)
        ));
    }

    #[test]
    fn rejects_oversized_ancestor() {
        // Order 3 -> size 8, cap 4; five cells is one too many.
        let config = EngineConfig::new(0, 3, 1).with_ancestor("abcde");
        assert!(matches!(
            Engine::new(&config),
            Err(EngineError::AncestorTooLong { len: 5, cap: 4 })
        ));
        let config = EngineConfig::new(0, 3, 1).with_ancestor("abcd");
        assert!(Engine::new(&config).is_ok());
    }

    #[test]
    fn core_and_state_indices_are_checked() {
        let engine = Engine::new(&EngineConfig::new(0, 4, 2)).expect("engine");
        assert!(engine.core(1).is_ok());
        assert!(matches!(
            engine.core(2),
            Err(EngineError::CoreIndex { cidx: 2, cores: 2 })
        ));
        let core = engine.core(0).expect("core");
        assert!(core.evo_state_word(3).is_ok());
        assert!(matches!(
            core.evo_state_word(4),
            Err(EngineError::StateIndex { sidx: 4 })
        ));
    }

    #[test]
    fn interpreter_runs_before_the_strikes() {
        // The ancestor's first instruction executes on cycle one even though
        // both strikes land somewhere in memory the same cycle: the
        // interpreter pass always comes first.
        let config = EngineConfig::new(7, 4, 1).with_ancestor("^");
        let mut engine = Engine::new(&config).expect("engine");
        engine.cycle();
        let core = engine.core(0).expect("core");
        let (_, org) = core.organisms().iter().next().expect("organism");
        assert_eq!(org.regs[0], 1);
        assert_eq!(org.ip, 1);
        assert_eq!(core.evo_calls(), 2);
        assert!(core.evo_wrote_last_cycle());
    }
}
