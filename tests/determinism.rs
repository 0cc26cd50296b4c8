use proptest::prelude::*;
use vivarium::{Engine, EngineConfig};

fn run(config: &EngineConfig, cycles: u64) -> Engine {
    let mut engine = Engine::new(config).expect("engine");
    for _ in 0..cycles {
        engine.cycle();
    }
    engine
}

/// Core equality compares memory bytes (flags included), the full evolver
/// state, and the whole population.
#[test]
fn identical_runs_are_bit_identical() {
    let config = EngineConfig::new(123_456, 8, 4).with_ancestor("abcdefg.:.:");
    let a = run(&config, 500);
    let b = run(&config, 500);
    assert_eq!(a.cycle_count(), b.cycle_count());
    for cidx in 0..a.core_count() {
        assert_eq!(a.core(cidx).expect("core"), b.core(cidx).expect("core"));
    }
}

/// Each core's trajectory is a pure function of (seed, core index, genome):
/// core 0 must not care whether it has one sibling or three.
#[test]
fn a_core_does_not_care_how_many_siblings_it_has() {
    let solo = run(&EngineConfig::new(77, 7, 1).with_ancestor("gfedcba"), 200);
    let crowd = run(&EngineConfig::new(77, 7, 4).with_ancestor("gfedcba"), 200);
    assert_eq!(solo.core(0).expect("core"), crowd.core(0).expect("core"));
}

#[test]
fn different_seeds_diverge() {
    let a = run(&EngineConfig::new(1, 8, 1).with_ancestor("abc"), 100);
    let b = run(&EngineConfig::new(2, 8, 1).with_ancestor("abc"), 100);
    assert_ne!(a.core(0).expect("core"), b.core(0).expect("core"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn determinism_holds_for_arbitrary_parameters(
        seed in any::<u64>(),
        order in 4u32..9,
        cores in 1usize..4,
        cycles in 1u64..64,
        with_ancestor in any::<bool>(),
    ) {
        let mut config = EngineConfig::new(seed, order, cores);
        if with_ancestor {
            config = config.with_ancestor("^^^}$.:");
        }
        let a = run(&config, cycles);
        let b = run(&config, cycles);
        prop_assert_eq!(a.cycle_count(), cycles);
        for cidx in 0..cores {
            prop_assert_eq!(a.core(cidx).unwrap(), b.core(cidx).unwrap());
            prop_assert_eq!(a.core(cidx).unwrap().evo_calls(), cycles * 2);
        }
    }
}
