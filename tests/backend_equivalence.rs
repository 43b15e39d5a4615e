//! Both backends must produce identical results for every operation.

use std::sync::{Arc, OnceLock};

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use sim_engine::{Animated, Backend, ComputeBackend, EngineConfig, GridSimulation, SequenceEngine};

fn high_performance() -> &'static ComputeBackend {
    static COMPUTE: OnceLock<ComputeBackend> = OnceLock::new();
    let compute = COMPUTE.get_or_init(|| ComputeBackend::init_blocking(&EngineConfig::default()));
    assert_eq!(compute.backend(), Backend::HighPerformance, "{:?}", compute.status());
    compute
}

fn sequence_engines() -> (Arc<dyn SequenceEngine>, Arc<dyn SequenceEngine>) {
    (
        high_performance().sequence_engine(),
        ComputeBackend::fallback().sequence_engine(),
    )
}

fn grid_pair(width: usize, height: usize) -> (Box<dyn GridSimulation>, Box<dyn GridSimulation>) {
    let fast = high_performance().create_grid(width, height).unwrap();
    let pure = ComputeBackend::fallback().create_grid(width, height).unwrap();
    assert_eq!(fast.backend(), Backend::HighPerformance);
    assert_eq!(pure.backend(), Backend::Fallback);
    (fast, pure)
}

#[test]
fn sequences_agree_on_first_ten_thousand_seeds() {
    let (fast, pure) = sequence_engines();
    for seed in 1..=10_000i64 {
        assert_eq!(fast.compute_sequence(seed), pure.compute_sequence(seed), "seed {}", seed);
        assert_eq!(fast.sequence_length(seed), pure.sequence_length(seed), "seed {}", seed);
    }
}

#[test]
fn compute_many_agrees() {
    let (fast, pure) = sequence_engines();
    let seeds: Vec<i64> = (-5..2_000).collect();
    assert_eq!(fast.compute_many(&seeds), pure.compute_many(&seeds));
}

#[test]
fn range_results_agree() {
    let (fast, pure) = sequence_engines();
    for limit in [0, 1, 2, 3, 30, 97, 1_000, 10_000, 100_000] {
        assert_eq!(fast.find_max_in_range(limit), pure.find_max_in_range(limit), "limit {}", limit);
    }
}

#[test]
fn seeded_randomize_agrees() {
    let (mut fast, mut pure) = grid_pair(131, 47);
    fast.randomize_with(0.4, &mut StdRng::seed_from_u64(2024));
    pure.randomize_with(0.4, &mut StdRng::seed_from_u64(2024));
    assert!(fast.render().eq(pure.render()));
    assert_eq!(fast.population(), pure.population());
}

#[test]
fn large_grid_evolution_agrees() {
    // Tall enough for the parallel kernel
    let (mut fast, mut pure) = grid_pair(190, 150);
    fast.randomize_with(0.3, &mut StdRng::seed_from_u64(9));
    pure.randomize_with(0.3, &mut StdRng::seed_from_u64(9));
    for generation in 1..=12 {
        fast.tick();
        pure.tick();
        assert!(fast.render().eq(pure.render()), "generation {}", generation);
    }
    assert_eq!(fast.generation(), pure.generation());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn any_seed_agrees(seed in any::<i64>()) {
        let (fast, pure) = sequence_engines();
        prop_assert_eq!(fast.compute_sequence(seed), pure.compute_sequence(seed));
        prop_assert_eq!(fast.sequence_length(seed), pure.sequence_length(seed));
    }

    #[test]
    fn any_range_agrees(limit in 0u64..20_000) {
        let (fast, pure) = sequence_engines();
        prop_assert_eq!(fast.find_max_in_range(limit), pure.find_max_in_range(limit));
    }

    #[test]
    fn any_grid_agrees(
        width in 1usize..140,
        height in 1usize..40,
        density in 0.0f64..=1.0,
        seed in any::<u64>(),
        ticks in 0usize..6,
    ) {
        let (mut fast, mut pure) = grid_pair(width, height);
        fast.randomize_with(density, &mut StdRng::seed_from_u64(seed));
        pure.randomize_with(density, &mut StdRng::seed_from_u64(seed));
        for _ in 0..ticks {
            fast.tick();
            pure.tick();
        }
        prop_assert_eq!(fast.render().to_bytes(), pure.render().to_bytes());
    }
}
