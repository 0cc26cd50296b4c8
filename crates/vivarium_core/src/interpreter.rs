//! Organism execution: the per-cycle interpreter pass.
//!
//! Each pass runs exactly one instruction for every organism alive when the
//! pass began, oldest first, then lets the reaper trim the population while
//! the allocated-cell count sits above the core's capacity. All memory
//! access goes through the core's own wrapping arena; an organism can never
//! touch another core.
//!
//! Failure is always silent: an instruction whose preconditions don't hold
//! (empty template, full stack, no free gap, foreign destination) degrades
//! to a no-op and the instruction pointer moves on. Organisms don't fault.

use vivarium_data::Inst;

use crate::memory::MemoryCore;
use crate::population::{MemBlock, Organism, Population, STACK_DEPTH};

/// Longest `Nop0`/`Nop1` run an addressing instruction will read.
pub const TEMPLATE_MAX: usize = 8;

/// Runs one interpreter pass over `pop`, then the reaper.
///
/// Children spawned by `Splt` join the population immediately but execute
/// only from the next pass on: the pass iterates a snapshot of the handles
/// that were alive when it started.
pub(crate) fn run_pass(mem: &mut MemoryCore, pop: &mut Population, cap: u32) {
    for id in pop.handles() {
        let child = match pop.get_mut(id) {
            Some(organism) => step(mem, organism, cap),
            None => None,
        };
        if let Some(child) = child {
            tracing::debug!(ip = child.ip, len = child.mb0.len, "organism split");
            pop.spawn(child);
        }
    }
    reap(mem, pop, cap);
}

/// Kills oldest-first while the core is over capacity, releasing the dead
/// organism's flags through the counted mutation path. Cells stolen by an
/// `Eat*` in the meantime may already be claimed elsewhere, so every clear
/// is guarded by a flag check. A lone survivor is never reaped.
fn reap(mem: &mut MemoryCore, pop: &mut Population, cap: u32) {
    while mem.flagged_alloc() > cap && pop.len() > 1 {
        let Some(dead) = pop.kill_oldest() else {
            break;
        };
        release_block(mem, dead.mb0);
        if let Some(mb1) = dead.mb1 {
            release_block(mem, mb1);
            if mem.is_block_start_at(i64::from(mb1.addr)) {
                mem.clear_block_start_at(i64::from(mb1.addr));
            }
        }
        if mem.is_block_start_at(i64::from(dead.mb0.addr)) {
            mem.clear_block_start_at(i64::from(dead.mb0.addr));
        }
        tracing::debug!(addr = dead.mb0.addr, len = dead.mb0.len, "organism reaped");
    }
}

fn release_block(mem: &mut MemoryCore, block: MemBlock) {
    for offset in 0..block.len {
        let addr = i64::from(block.addr) + i64::from(offset);
        if mem.is_alloc_at(addr) {
            mem.clear_alloc_at(addr);
        }
    }
}

/// Executes one instruction for one organism. Returns a child organism when
/// the instruction was a successful `Splt`.
fn step(mem: &mut MemoryCore, org: &mut Organism, cap: u32) -> Option<Organism> {
    let size = mem.size();
    // inst_at masks to five bits, so the decode is total.
    let inst = Inst::from_u8(mem.inst_at(i64::from(org.ip))).unwrap_or(Inst::Nop0);

    let mut next_ip = wrap(size, org.ip, 1);
    let mut child = None;

    match inst {
        Inst::Nop0
        | Inst::Nop1
        | Inst::NopA
        | Inst::NopB
        | Inst::NopC
        | Inst::NopD
        | Inst::NopE
        | Inst::NopF
        | Inst::NopG => {}

        Inst::Adrb | Inst::Adrf | Inst::Jmpb | Inst::Jmpf => {
            let template = read_template(mem, org.ip);
            next_ip = wrap(size, org.ip, 1 + template.len() as u32);
            if !template.is_empty() {
                let backward = matches!(inst, Inst::Adrb | Inst::Jmpb);
                let origin = if backward {
                    org.ip
                } else {
                    wrap(size, org.ip, template.len() as u32)
                };
                if let Some(found) = find_complement(mem, &template, origin, backward) {
                    match inst {
                        Inst::Adrb | Inst::Adrf => org.regs[0] = found,
                        _ => next_ip = found,
                    }
                }
            }
        }
        Inst::Whle => {
            if org.regs[0] == 0 {
                if let Some(endw) = matching_endw(mem, org.ip) {
                    next_ip = wrap(size, endw, 1);
                }
            }
        }
        Inst::Endw => {
            if let Some(whle) = matching_whle(mem, org.ip) {
                next_ip = whle;
            }
        }

        Inst::Malb | Inst::Malf => {
            let want = org.regs[0];
            if want != 0 && want <= cap && org.mb1.is_none() {
                let found = if inst == Inst::Malf {
                    find_free_run(mem, wrap(size, org.mb0.addr, org.mb0.len), want, false)
                } else {
                    find_free_run(mem, org.mb0.addr, want, true)
                };
                if let Some(start) = found {
                    for offset in 0..want {
                        mem.set_alloc_at(i64::from(start) + i64::from(offset));
                    }
                    org.mb1 = Some(MemBlock {
                        addr: start,
                        len: want,
                    });
                    org.regs[1] = start;
                }
            }
        }
        Inst::Splt => {
            if let Some(mb1) = org.mb1.take() {
                if !mem.is_block_start_at(i64::from(mb1.addr)) {
                    mem.set_block_start_at(i64::from(mb1.addr));
                }
                child = Some(Organism::new(mb1.addr, mb1));
            }
        }
        Inst::Bswp => {
            if let Some(mb1) = org.mb1 {
                org.mb1 = Some(org.mb0);
                org.mb0 = mb1;
            }
        }
        Inst::Eatb => {
            let prev = wrap(size, org.mb0.addr, size - 1);
            if org.mb0.len < size && mem.is_alloc_at(i64::from(prev)) {
                org.mb0.addr = prev;
                org.mb0.len += 1;
            }
        }
        Inst::Eatf => {
            let next = wrap(size, org.mb0.addr, org.mb0.len);
            if org.mb0.len < size && mem.is_alloc_at(i64::from(next)) {
                org.mb0.len += 1;
            }
        }

        Inst::Push => {
            if org.sp < STACK_DEPTH {
                org.stack[org.sp] = org.regs[0];
                org.sp += 1;
            }
        }
        Inst::Pull => {
            if org.sp > 0 {
                org.sp -= 1;
                org.regs[0] = org.stack[org.sp];
            }
        }
        Inst::Copy => {
            let dst = org.regs[1];
            if owns(org, dst, size) {
                let value = mem.inst_at(i64::from(org.regs[0]));
                mem.set_inst_at(i64::from(dst), value);
            }
        }
        Inst::Wrmh => {
            let addr = org.regs[0];
            if owns(org, addr, size) && !mem.is_wormhole_at(i64::from(addr)) {
                mem.set_wormhole_at(i64::from(addr));
            }
        }

        Inst::Zero => org.regs[0] = 0,
        Inst::Incr => org.regs[0] = org.regs[0].wrapping_add(1),
        Inst::Decr => org.regs[0] = org.regs[0].wrapping_sub(1),
        Inst::Shfl => org.regs[0] <<= 1,
        Inst::Shfr => org.regs[0] >>= 1,
        Inst::Nand => org.regs[0] = !(org.regs[0] & org.regs[1]),
        Inst::Ntor => org.regs[0] = !(org.regs[0] | org.regs[1]),
    }

    org.ip = next_ip;
    child
}

#[inline]
fn wrap(size: u32, base: u32, offset: u32) -> u32 {
    base.wrapping_add(offset) % size
}

fn owns(org: &Organism, addr: u32, size: u32) -> bool {
    org.mb0.contains(addr, size) || org.mb1.is_some_and(|mb1| mb1.contains(addr, size))
}

/// The `Nop0`/`Nop1` run immediately following the instruction at `ip`,
/// capped at [`TEMPLATE_MAX`] cells.
fn read_template(mem: &MemoryCore, ip: u32) -> Vec<Inst> {
    let size = mem.size();
    let mut template = Vec::new();
    for offset in 1..=TEMPLATE_MAX.min(size as usize - 1) {
        let addr = wrap(size, ip, offset as u32);
        match Inst::from_u8(mem.inst_at(i64::from(addr))) {
            Some(symbol) if symbol.is_template() => template.push(symbol),
            _ => break,
        }
    }
    template
}

/// Finds the nearest occurrence of the complement of `template`, scanning at
/// most one full lap from `origin` (exclusive). Returns the address just
/// past the match.
fn find_complement(mem: &MemoryCore, template: &[Inst], origin: u32, backward: bool) -> Option<u32> {
    let size = mem.size();
    let complement: Vec<u8> = template.iter().map(|s| s.complement() as u8).collect();
    for lap in 1..=size {
        let start = if backward {
            wrap(size, origin, size - lap % size)
        } else {
            wrap(size, origin, lap)
        };
        let hit = complement
            .iter()
            .enumerate()
            .all(|(offset, &symbol)| mem.inst_at(i64::from(start) + offset as i64) == symbol);
        if hit {
            return Some(wrap(size, start, complement.len() as u32));
        }
    }
    None
}

/// Address of the `Endw` matching the `Whle` at `ip`, nesting-aware, bounded
/// by one lap.
fn matching_endw(mem: &MemoryCore, ip: u32) -> Option<u32> {
    let size = mem.size();
    let mut depth = 0u32;
    for offset in 1..size {
        let addr = wrap(size, ip, offset);
        match Inst::from_u8(mem.inst_at(i64::from(addr))) {
            Some(Inst::Whle) => depth += 1,
            Some(Inst::Endw) if depth == 0 => return Some(addr),
            Some(Inst::Endw) => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Address of the `Whle` matching the `Endw` at `ip`, nesting-aware, bounded
/// by one lap.
fn matching_whle(mem: &MemoryCore, ip: u32) -> Option<u32> {
    let size = mem.size();
    let mut depth = 0u32;
    for offset in 1..size {
        let addr = wrap(size, ip, size - offset % size);
        match Inst::from_u8(mem.inst_at(i64::from(addr))) {
            Some(Inst::Endw) => depth += 1,
            Some(Inst::Whle) if depth == 0 => return Some(addr),
            Some(Inst::Whle) => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Nearest run of `want` consecutive unallocated cells, scanning one lap
/// from `from` (forward: inclusive; backward: exclusive, downward). Returns
/// the run's lowest address.
fn find_free_run(mem: &MemoryCore, from: u32, want: u32, backward: bool) -> Option<u32> {
    let size = mem.size();
    if want > size {
        return None;
    }
    let mut run_len = 0u32;
    let mut run_start = from;
    for lap in 0..size {
        let addr = if backward {
            wrap(size, from, size - (lap + 1) % size)
        } else {
            wrap(size, from, lap)
        };
        if mem.is_alloc_at(i64::from(addr)) {
            run_len = 0;
        } else {
            run_len += 1;
            if backward {
                run_start = addr;
            } else if run_len == 1 {
                run_start = addr;
            }
            if run_len == want {
                return Some(run_start);
            }
        }
    }
    None
}
