//! Frame-synchronized animation scheduler.
//!
//! The host calls [`AnimationScheduler::on_frame`] once per display refresh.
//! While playing, every call whose pending token is still live runs one
//! tick+render cycle and schedules the next by issuing a fresh token.
//! Pausing, detaching or dropping the scheduler cancels the pending token,
//! so a host holding a clone of it can tell the callback is stale. A host
//! cancelling the token itself stops playback on the next frame.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::cancel::CancelToken;
use crate::domain::simulation::{Animated, Snapshot};
use crate::error::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Paused,
    Playing,
}

/// Throughput of the most recent cycle
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    /// Cycles run since the scheduler was created (play and step)
    pub cycles: u64,
    /// Wall-clock duration of the last tick+render
    pub last_cycle: Duration,
}

impl FrameStats {
    /// Instantaneous rate `1 / elapsed` in cycles per second; None before the
    /// first cycle or when the cycle was too fast to measure
    pub fn rate(&self) -> Option<f64> {
        let secs = self.last_cycle.as_secs_f64();
        (secs > 0.0).then(|| 1.0 / secs)
    }
}

/// Drives tick+render cycles on an attached target at display cadence
pub struct AnimationScheduler<A: Animated> {
    target: Option<A>,
    state: PlaybackState,
    pending: Option<CancelToken>,
    stats: FrameStats,
}

impl<A: Animated> Default for AnimationScheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Animated> AnimationScheduler<A> {
    /// Paused, with nothing attached
    pub fn new() -> Self {
        Self {
            target: None,
            state: PlaybackState::Paused,
            pending: None,
            stats: FrameStats::default(),
        }
    }

    /// Paused, driving `target`
    pub fn with_target(target: A) -> Self {
        let mut scheduler = Self::new();
        scheduler.target = Some(target);
        scheduler
    }

    /// Attach a new target, returning the previous one. Playback is paused.
    pub fn attach(&mut self, target: A) -> Option<A> {
        let previous = self.detach();
        self.target = Some(target);
        previous
    }

    /// Release the target. Any scheduled cycle is cancelled first.
    pub fn detach(&mut self) -> Option<A> {
        self.pause();
        self.target.take()
    }

    pub fn target(&self) -> Option<&A> {
        self.target.as_ref()
    }

    /// Direct access for single operations between frames
    pub fn target_mut(&mut self) -> Option<&mut A> {
        self.target.as_mut()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Token guarding the next scheduled cycle, if any
    pub fn pending_frame(&self) -> Option<CancelToken> {
        self.pending.clone()
    }

    /// Paused -> Playing. The first cycle runs on the next frame.
    pub fn play(&mut self) {
        if self.is_playing() {
            return;
        }
        self.state = PlaybackState::Playing;
        self.schedule_next();
        debug!("Animation playing");
    }

    /// Playing -> Paused. Cancels the scheduled cycle.
    pub fn pause(&mut self) {
        self.cancel_pending();
        if self.is_playing() {
            self.state = PlaybackState::Paused;
            debug!(cycles = self.stats.cycles, "Animation paused");
        }
    }

    pub fn toggle(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// One tick+render while paused, without changing state
    pub fn step(&mut self) -> Result<Snapshot<'_>, EngineError> {
        if self.is_playing() {
            return Err(EngineError::StepWhilePlaying);
        }
        if self.target.is_none() {
            return Err(EngineError::NoTarget);
        }
        self.run_cycle().ok_or(EngineError::NoTarget)
    }

    /// Display-refresh callback. Runs a cycle if one is scheduled and still
    /// live, schedules the next, and returns the rendered snapshot.
    pub fn on_frame(&mut self) -> Option<Snapshot<'_>> {
        let token = self.pending.take()?;
        // Spent either way: a second callback holding this token is stale
        let live = !token.is_cancelled();
        token.cancel();
        if !self.is_playing() {
            return None;
        }
        if !live || self.target.is_none() {
            // Nothing left scheduled, so the loop is no longer playing
            self.state = PlaybackState::Paused;
            debug!(cancelled = !live, "Animation stopped without a cycle");
            return None;
        }
        self.schedule_next();
        self.run_cycle()
    }

    fn schedule_next(&mut self) {
        self.cancel_pending();
        self.pending = Some(CancelToken::new());
    }

    fn cancel_pending(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }

    fn run_cycle(&mut self) -> Option<Snapshot<'_>> {
        let target = self.target.as_mut()?;
        let start = Instant::now();
        target.tick();
        let snapshot = target.render();
        self.stats.last_cycle = start.elapsed();
        self.stats.cycles += 1;
        trace!(cycle = self.stats.cycles, elapsed_us = self.stats.last_cycle.as_micros() as u64, "Cycle");
        Some(snapshot)
    }
}

impl<A: Animated> Drop for AnimationScheduler<A> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::simulation::CellView;

    /// Counts ticks; renders a 1x1 grid alive on odd ticks
    #[derive(Default)]
    struct Counter {
        ticks: u64,
    }

    impl CellView for Counter {
        fn dimensions(&self) -> (usize, usize) {
            (1, 1)
        }

        fn is_alive(&self, _x: usize, _y: usize) -> bool {
            self.ticks % 2 == 1
        }
    }

    impl Animated for Counter {
        fn tick(&mut self) {
            self.ticks += 1;
        }

        fn render(&self) -> Snapshot<'_> {
            Snapshot::new(self)
        }
    }

    fn ticks(scheduler: &AnimationScheduler<Counter>) -> u64 {
        scheduler.target().map_or(0, |c| c.ticks)
    }

    #[test]
    fn test_starts_paused_without_ticking() {
        let mut scheduler = AnimationScheduler::with_target(Counter::default());
        assert_eq!(scheduler.state(), PlaybackState::Paused);
        assert!(scheduler.on_frame().is_none());
        assert!(scheduler.pending_frame().is_none());
        assert_eq!(ticks(&scheduler), 0);
    }

    #[test]
    fn test_play_ticks_once_per_frame() {
        let mut scheduler = AnimationScheduler::with_target(Counter::default());
        scheduler.play();
        assert_eq!(ticks(&scheduler), 0);

        for frame in 1..=5 {
            let rendered: Vec<bool> = scheduler.on_frame().expect("cycle runs").collect();
            assert_eq!(rendered, vec![frame % 2 == 1]);
        }
        assert_eq!(ticks(&scheduler), 5);
        assert_eq!(scheduler.stats().cycles, 5);
    }

    #[test]
    fn test_pause_cancels_scheduled_cycle() {
        let mut scheduler = AnimationScheduler::with_target(Counter::default());
        scheduler.play();
        scheduler.on_frame();
        let pending = scheduler.pending_frame().unwrap();

        scheduler.pause();
        assert!(pending.is_cancelled());
        assert!(scheduler.on_frame().is_none());
        assert_eq!(ticks(&scheduler), 1);
    }

    #[test]
    fn test_each_cycle_issues_a_fresh_token() {
        let mut scheduler = AnimationScheduler::with_target(Counter::default());
        scheduler.play();
        let first = scheduler.pending_frame().unwrap();
        scheduler.on_frame();
        let second = scheduler.pending_frame().unwrap();

        assert!(!first.same_as(&second));
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
    }

    #[test]
    fn test_step_only_while_paused() {
        let mut scheduler = AnimationScheduler::with_target(Counter::default());
        assert_eq!(scheduler.step().unwrap().count(), 1);
        assert_eq!(ticks(&scheduler), 1);
        assert_eq!(scheduler.state(), PlaybackState::Paused);

        scheduler.play();
        assert_eq!(scheduler.step().err(), Some(EngineError::StepWhilePlaying));
        assert_eq!(ticks(&scheduler), 1);
    }

    #[test]
    fn test_step_without_target() {
        let mut scheduler: AnimationScheduler<Counter> = AnimationScheduler::new();
        assert_eq!(scheduler.step().err(), Some(EngineError::NoTarget));
    }

    #[test]
    fn test_detach_cancels_even_when_playing() {
        let mut scheduler = AnimationScheduler::with_target(Counter::default());
        scheduler.play();
        let pending = scheduler.pending_frame().unwrap();

        let released = scheduler.detach().unwrap();
        assert_eq!(released.ticks, 0);
        assert!(pending.is_cancelled());
        assert!(!scheduler.is_playing());
        assert!(scheduler.on_frame().is_none());
    }

    #[test]
    fn test_drop_cancels_pending_cycle() {
        let mut scheduler = AnimationScheduler::with_target(Counter::default());
        scheduler.play();
        let pending = scheduler.pending_frame().unwrap();
        drop(scheduler);
        assert!(pending.is_cancelled());
    }

    #[test]
    fn test_externally_cancelled_token_stops_cycle() {
        let mut scheduler = AnimationScheduler::with_target(Counter::default());
        scheduler.play();
        scheduler.pending_frame().unwrap().cancel();
        assert!(scheduler.on_frame().is_none());
        assert_eq!(ticks(&scheduler), 0);
        assert_eq!(scheduler.state(), PlaybackState::Paused);
        assert!(scheduler.pending_frame().is_none());
    }

    #[test]
    fn test_play_restarts_after_external_cancel() {
        let mut scheduler = AnimationScheduler::with_target(Counter::default());
        scheduler.play();
        scheduler.pending_frame().unwrap().cancel();
        scheduler.on_frame();

        scheduler.play();
        for _ in 0..5 {
            assert!(scheduler.on_frame().is_some());
        }
        assert!(scheduler.is_playing());
        assert!(scheduler.pending_frame().is_some());
        assert_eq!(ticks(&scheduler), 5);
    }

    #[test]
    fn test_frame_without_target_cancels_and_pauses() {
        let mut scheduler: AnimationScheduler<Counter> = AnimationScheduler::new();
        scheduler.play();
        let pending = scheduler.pending_frame().unwrap();

        assert!(scheduler.on_frame().is_none());
        assert!(pending.is_cancelled());
        assert_eq!(scheduler.state(), PlaybackState::Paused);
        assert!(scheduler.pending_frame().is_none());
    }

    #[test]
    fn test_toggle_and_replay() {
        let mut scheduler = AnimationScheduler::with_target(Counter::default());
        scheduler.toggle();
        assert!(scheduler.is_playing());
        scheduler.on_frame();
        scheduler.toggle();
        assert!(!scheduler.is_playing());
        scheduler.toggle();
        scheduler.on_frame();
        assert_eq!(ticks(&scheduler), 2);
    }

    #[test]
    fn test_rate_is_inverse_of_elapsed() {
        let stats = FrameStats { cycles: 1, last_cycle: Duration::from_millis(20) };
        let rate = stats.rate().unwrap();
        assert!((rate - 50.0).abs() < 1e-9);
        assert_eq!(FrameStats::default().rate(), None);
    }
}
