//! Observable grid behaviour, checked on both backends.

use rand::SeedableRng;
use rand::rngs::StdRng;
use sim_engine::{
    Animated, AnimationScheduler, ComputeBackend, EngineConfig, EngineError, GridSimulation, PlaybackState,
    presets,
};

fn grids(width: usize, height: usize) -> Vec<Box<dyn GridSimulation>> {
    let fast = ComputeBackend::init_blocking(&EngineConfig::default());
    let pure = ComputeBackend::fallback();
    vec![
        fast.create_grid(width, height).unwrap(),
        pure.create_grid(width, height).unwrap(),
    ]
}

fn live(grid: &dyn GridSimulation) -> Vec<(usize, usize)> {
    grid.render().live_cells().collect()
}

#[test]
fn dead_grid_stays_dead() {
    for mut grid in grids(70, 70) {
        for _ in 0..5 {
            grid.tick();
        }
        assert_eq!(grid.population(), 0, "{}", grid.backend());
        assert_eq!(grid.generation(), 5);
    }
}

#[test]
fn blinker_has_period_two() {
    for mut grid in grids(5, 5) {
        grid.load_pattern(presets::BLINKER, 1, 2);
        let horizontal = live(grid.as_ref());
        assert_eq!(horizontal, vec![(1, 2), (2, 2), (3, 2)]);

        grid.tick();
        assert_eq!(live(grid.as_ref()), vec![(2, 1), (2, 2), (2, 3)], "{}", grid.backend());

        grid.tick();
        assert_eq!(live(grid.as_ref()), horizontal);
    }
}

#[test]
fn glider_moves_one_cell_diagonally_every_four_ticks() {
    for mut grid in grids(12, 12) {
        grid.load_pattern(presets::GLIDER, 1, 1);
        let start = live(grid.as_ref());
        assert_eq!(start.len(), 5);

        for _ in 0..4 {
            grid.tick();
        }
        let moved: Vec<_> = start.iter().map(|&(x, y)| (x + 1, y + 1)).collect();
        assert_eq!(live(grid.as_ref()), moved, "{}", grid.backend());
    }
}

#[test]
fn glider_dies_into_a_block_at_the_edge() {
    // Bounded edges: a glider hitting the bottom-right corner becomes a block
    for mut grid in grids(6, 6) {
        grid.load_pattern(presets::GLIDER, 0, 0);
        for _ in 0..40 {
            grid.tick();
        }
        assert_eq!(live(grid.as_ref()), vec![(4, 4), (5, 4), (4, 5), (5, 5)], "{}", grid.backend());
    }
}

#[test]
fn randomize_matches_probability() {
    for mut grid in grids(200, 150) {
        for seed in [1, 2, 3] {
            grid.randomize_with(0.3, &mut StdRng::seed_from_u64(seed));
            let fraction = grid.population() as f64 / 30_000.0;
            assert!((fraction - 0.3).abs() < 0.3 * 0.05, "fraction {} on {}", fraction, grid.backend());
        }
    }
}

#[test]
fn out_of_bounds_writes_leave_grid_unchanged() {
    for mut grid in grids(10, 8) {
        grid.load_pattern(presets::BLOCK, 4, 4);
        let before = grid.render().to_bytes();

        grid.set_cell(-1, -1, true);
        grid.set_cell(10, 0, true);
        grid.set_cell(0, 8, true);
        grid.set_cell(i64::MIN, i64::MAX, true);
        grid.load_pattern(presets::GLIDER, 20, 20);
        grid.load_pattern(presets::GLIDER, -10, 2);
        grid.load_pattern(presets::PULSAR, i64::MAX, i64::MAX);

        assert_eq!(grid.render().to_bytes(), before, "{}", grid.backend());
    }
}

#[test]
fn pattern_straddling_edge_is_clipped() {
    for mut grid in grids(5, 5) {
        grid.load_pattern(presets::BLOCK, 4, 4);
        assert_eq!(live(grid.as_ref()), vec![(4, 4)]);
    }
}

#[test]
fn dead_glyphs_overwrite_and_others_skip() {
    for mut grid in grids(4, 1) {
        grid.load_pattern("OOOO", 0, 0);
        grid.load_pattern(".x.", 0, 0);
        assert_eq!(live(grid.as_ref()), vec![(1, 0), (3, 0)]);
    }
}

#[test]
fn every_preset_has_its_population() {
    for pattern in presets::all_patterns() {
        for mut grid in grids(60, 40) {
            pattern.place_on(grid.as_mut(), 5, 5);
            assert_eq!(grid.population(), pattern.cells.len(), "{}", pattern.name);
        }
    }
}

#[test]
fn scheduler_drives_either_backend() {
    for grid in grids(12, 12) {
        let backend = grid.backend();
        let mut scheduler = AnimationScheduler::with_target(grid);
        if let Some(grid) = scheduler.target_mut() {
            grid.load_pattern(presets::GLIDER, 1, 1);
        }

        assert_eq!(scheduler.step().map(|s| s.filter(|&a| a).count()), Ok(5));
        scheduler.play();
        assert_eq!(scheduler.state(), PlaybackState::Playing);
        assert_eq!(scheduler.step().err(), Some(EngineError::StepWhilePlaying));

        for _ in 0..3 {
            assert!(scheduler.on_frame().is_some());
        }
        scheduler.pause();
        assert!(scheduler.on_frame().is_none());

        let grid = scheduler.detach().unwrap();
        assert_eq!(grid.generation(), 4, "{}", backend);
        assert_eq!(
            live(grid.as_ref()),
            vec![(3, 2), (4, 3), (2, 4), (3, 4), (4, 4)],
            "{}",
            backend
        );
    }
}
