use std::sync::Arc;

use macroquad::prelude::*;
use ::rand::SeedableRng;
use ::rand::rngs::StdRng;
use tracing::{debug, error, info};

use sim_engine::{
    Animated, AnimationScheduler, BackgroundSearch, ComputeBackend, EngineConfig, GridSimulation,
    RangeResult, Sequence, SequenceEngine, presets,
    input,
    rendering::{self, PanelInfo, SearchStatus},
    telemetry,
    ui::{self, Action, Layout},
};

fn window_conf() -> Conf {
    Conf {
        window_title: "Life & Collatz".to_owned(),
        window_width: 1100,
        window_height: 800,
        window_resizable: true,
        ..Default::default()
    }
}

/// Outcome of the latest range search, with the winning sequence
enum SearchOutcome {
    Pending(BackgroundSearch),
    Done { limit: u64, best: RangeResult, sequence: Sequence },
    Cancelled { limit: u64 },
}

impl SearchOutcome {
    fn status(&self) -> SearchStatus<'_> {
        match self {
            SearchOutcome::Pending(search) => SearchStatus::Running { limit: search.limit() },
            SearchOutcome::Done { limit, best, sequence } => SearchStatus::Done {
                limit: *limit,
                best: *best,
                sequence,
            },
            SearchOutcome::Cancelled { limit } => SearchStatus::Cancelled { limit: *limit },
        }
    }

    fn poll(&mut self, engine: &dyn SequenceEngine) {
        let SearchOutcome::Pending(search) = self else {
            return;
        };
        let limit = search.limit();
        match search.poll() {
            None => {}
            Some(Ok(best)) => {
                info!(limit, seed = best.number, length = best.length, "Range search finished");
                let sequence = engine.compute_sequence(best.number as i64);
                *self = SearchOutcome::Done { limit, best, sequence };
            }
            Some(Err(err)) => {
                debug!(limit, error = %err, "Range search stopped");
                *self = SearchOutcome::Cancelled { limit };
            }
        }
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let config = EngineConfig::from_env();
    telemetry::init_tracing(&config);

    let compute = ComputeBackend::init(&config).await;
    let grid = match compute.create_grid(config.grid_width, config.grid_height) {
        Ok(grid) => grid,
        Err(err) => {
            error!(error = %err, "Cannot create grid");
            return;
        }
    };
    let engine = compute.sequence_engine();

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut scheduler: AnimationScheduler<Box<dyn GridSimulation>> = AnimationScheduler::with_target(grid);
    if let Some(grid) = scheduler.target_mut() {
        grid.randomize_with(config.density, &mut rng);
    }

    let patterns = presets::all_patterns();
    let mut pattern_index = 0;
    let mut search = SearchOutcome::Pending(BackgroundSearch::start(Arc::clone(&engine), config.range_limit));

    info!(
        backend = %compute.backend(),
        width = config.grid_width,
        height = config.grid_height,
        "Demo started"
    );

    loop {
        let mouse_pos = mouse_position();
        let buttons = ui::create_buttons();

        for action in input::collect_actions(&buttons, mouse_pos) {
            match action {
                Action::TogglePlay => scheduler.toggle(),
                Action::Step => {
                    if let Err(err) = scheduler.step() {
                        debug!(error = %err, "Step ignored");
                    }
                }
                Action::NextPattern => pattern_index = (pattern_index + 1) % patterns.len(),
                Action::SearchRange => {
                    let limit = match &search {
                        SearchOutcome::Pending(running) => running.limit(),
                        SearchOutcome::Done { limit, .. } | SearchOutcome::Cancelled { limit } => *limit,
                    };
                    // Replacing a pending search drops it, which cancels it
                    search = SearchOutcome::Pending(BackgroundSearch::start(
                        Arc::clone(&engine),
                        limit.saturating_mul(2).max(1),
                    ));
                }
                Action::Clear | Action::Randomize | Action::PlacePattern => {
                    let Some(grid) = scheduler.target_mut() else {
                        continue;
                    };
                    match action {
                        Action::Clear => grid.clear(),
                        Action::Randomize => grid.randomize_with(config.density, &mut rng),
                        _ => {
                            let (w, h) = grid.dimensions();
                            patterns[pattern_index].place_centered(&mut **grid, w as i64 / 2, h as i64 / 2);
                        }
                    }
                }
            }
        }

        search.poll(engine.as_ref());

        let dims = scheduler.target().map_or((1, 1), |grid| grid.dimensions());
        let layout = Layout::fit(dims, ui::grid_area());
        if !scheduler.is_playing() {
            if let Some(grid) = scheduler.target_mut() {
                input::paint(&mut **grid, &layout, mouse_pos);
            }
        }

        clear_background(BLACK);
        if let Some(snapshot) = scheduler.on_frame() {
            rendering::draw_grid(snapshot, &layout);
        } else if let Some(grid) = scheduler.target() {
            rendering::draw_grid(grid.render(), &layout);
        }

        if let Some(grid) = scheduler.target() {
            let info = PanelInfo {
                backend: compute.backend(),
                status: compute.status(),
                playback: scheduler.state(),
                stats: scheduler.stats(),
                generation: grid.generation(),
                population: grid.population(),
                grid: dims,
                pattern: patterns[pattern_index].name,
                search: search.status(),
            };
            rendering::draw_panel(&info, &buttons, mouse_pos);
        }

        next_frame().await;
    }
}
