use vivarium::{Engine, EngineConfig, Inst, STATE_WORDS};

#[test]
fn empty_genesis_is_all_zero() {
    for (seed, order, cores) in [(0u64, 8u32, 2usize), (42, 4, 1), (123_456, 10, 3)] {
        let engine = Engine::new(&EngineConfig::new(seed, order, cores)).expect("engine");

        assert_eq!(engine.cycle_count(), 0);
        assert_eq!(engine.seed(), seed);
        assert_eq!(engine.order(), order);
        assert_eq!(engine.size(), 1 << order);
        assert_eq!(engine.cap(), (1 << order) / 2);
        assert_eq!(engine.core_count(), cores);

        for cidx in 0..cores {
            let core = engine.core(cidx).expect("core");
            assert_eq!(core.flagged_alloc(), 0);
            assert_eq!(core.flagged_block_start(), 0);
            assert_eq!(core.flagged_wormhole(), 0);
            assert_eq!(core.evo_calls(), 0);
            assert_eq!(core.evo_last_write(), 0);
            assert_eq!(core.evo_last_address(), 0);
            assert_eq!(core.evo_last_inst(), 0);
            assert!(!core.evo_wrote_last_cycle());
            assert!(core.organisms().is_empty());

            for addr in 0..i64::from(engine.size()) {
                assert_eq!(core.byte_at(addr), 0);
                assert_eq!(core.inst_at(addr), 0);
                assert!(!core.is_alloc_at(addr));
                assert!(!core.is_block_start_at(addr));
                assert!(!core.is_wormhole_at(addr));
            }

            for sidx in 0..STATE_WORDS {
                assert_eq!(core.evo_state_word(sidx).expect("state word"), 0);
            }
        }
    }
}

#[test]
fn ancestor_genesis_loads_every_core() {
    let ancestor = "abcdefg.:.:";
    let config = EngineConfig::new(123_456, 8, 2).with_ancestor(ancestor);
    let engine = Engine::new(&config).expect("engine");

    let expected: Vec<u8> = ancestor
        .chars()
        .map(|g| Inst::from_glyph(g).expect("glyph") as u8)
        .collect();

    for cidx in 0..engine.core_count() {
        let core = engine.core(cidx).expect("core");
        assert_eq!(core.flagged_alloc(), ancestor.len() as u32);
        assert_eq!(core.flagged_block_start(), 1);
        assert_eq!(core.flagged_wormhole(), 0);
        assert_eq!(core.evo_calls(), 0);
        assert!(!core.evo_wrote_last_cycle());

        for addr in 0..i64::from(engine.size()) {
            let inside = (addr as usize) < expected.len();
            assert_eq!(core.is_alloc_at(addr), inside);
            assert_eq!(core.is_block_start_at(addr), addr == 0);
            assert!(!core.is_wormhole_at(addr));
            let want = if inside { expected[addr as usize] } else { 0 };
            assert_eq!(core.inst_at(addr), want);
        }

        // Ancestor genesis arms the evolver: its state must be non-zero.
        assert!((0..STATE_WORDS).any(|sidx| core.evo_state_word(sidx).unwrap() != 0));

        // Exactly one organism, owning exactly the ancestor block.
        assert_eq!(core.organisms().len(), 1);
        let (_, org) = core.organisms().iter().next().expect("ancestor");
        assert_eq!(org.ip, 0);
        assert_eq!(org.mb0.addr, 0);
        assert_eq!(org.mb0.len, ancestor.len() as u32);
    }
}

#[test]
fn addresses_wrap_many_laps_in_both_directions() {
    let config = EngineConfig::new(123_456, 8, 2).with_ancestor("abcdefg.:.:");
    let engine = Engine::new(&config).expect("engine");
    let size = i64::from(engine.size());

    for cidx in 0..engine.core_count() {
        let core = engine.core(cidx).expect("core");
        for addr in -5 * size..5 * size {
            assert_eq!(core.byte_at(addr), core.byte_at(addr.rem_euclid(size)));
            assert_eq!(core.inst_at(addr), core.inst_at(addr.rem_euclid(size)));
            assert_eq!(
                core.is_alloc_at(addr),
                core.is_alloc_at(addr.rem_euclid(size))
            );
        }
    }
}

#[test]
fn counters_always_match_a_full_recount() {
    let config = EngineConfig::new(7, 6, 2).with_ancestor("^^^}$.:");
    let mut engine = Engine::new(&config).expect("engine");

    for _ in 0..200 {
        engine.cycle();
        for cidx in 0..engine.core_count() {
            let core = engine.core(cidx).expect("core");
            let (alloc, block_start, wormhole) = core.recount();
            assert_eq!(core.flagged_alloc(), alloc);
            assert_eq!(core.flagged_block_start(), block_start);
            assert_eq!(core.flagged_wormhole(), wormhole);
        }
    }
}
