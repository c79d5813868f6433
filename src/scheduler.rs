//! Fixed-timestep scheduler
//!
//! Wall-clock time accumulates between host frames and is spent in whole
//! simulation steps. The leftover fraction becomes the render alpha.
//! Accumulated time is capped, and anything past the cap is dropped, so a long
//! stall costs at most `max_accumulator_ms / step_ms` catch-up steps.

use std::cell::Cell;
use std::rc::Rc;

use crate::consts::{FIXED_STEP_SECONDS, MAX_ACCUMULATOR_MS};
use crate::error::SchedulerError;
use crate::settings::Settings;

/// Monotonic wall clock in milliseconds
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Host hook that arranges for `tick` to be called again
pub trait FrameRequester {
    fn request_frame(&mut self);
}

/// Shared "a frame is already on its way" flag.
///
/// A host requester arms it before scheduling and the frame callback releases
/// it when it fires, so a stop/start before the pending frame runs does not
/// start a second frame chain.
#[derive(Debug, Clone, Default)]
pub struct FrameLatch(Rc<Cell<bool>>);

impl FrameLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when a frame is already pending
    pub fn arm(&self) -> bool {
        !self.0.replace(true)
    }

    pub fn release(&self) {
        self.0.set(false);
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.0.get()
    }
}

/// What the scheduler drives
pub trait FixedStepTarget {
    /// Advance the simulation by exactly `dt` seconds
    fn step(&mut self, dt: f32);
    /// Draw, blending the last two steps by `alpha` in [0, 1)
    fn render(&mut self, alpha: f32);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    #[default]
    Idle,
    Running,
}

/// Outcome of one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub steps: u32,
    pub alpha: f32,
    /// Time thrown away by the accumulator clamp
    pub discarded_ms: f64,
}

#[derive(Debug)]
pub struct FixedStepScheduler<C, F> {
    clock: C,
    frames: F,
    state: SchedulerState,
    step_ms: f64,
    max_accumulator_ms: f64,
    accumulator_ms: f64,
    last_ms: f64,
    total_steps: u64,
}

/// Upper bound on `max_accumulator_ms / step_ms`, the steps one tick may run
pub const MAX_CATCH_UP_STEPS: f64 = 10_000.0;

impl<C: Clock, F: FrameRequester> FixedStepScheduler<C, F> {
    /// 60 Hz with a 200 ms clamp
    pub fn new(clock: C, frames: F) -> Self {
        Self::unchecked(clock, frames, FIXED_STEP_SECONDS * 1000.0, MAX_ACCUMULATOR_MS)
    }

    pub fn from_settings(
        clock: C,
        frames: F,
        settings: &Settings,
    ) -> Result<Self, SchedulerError> {
        Self::with_timing(
            clock,
            frames,
            settings.step_seconds(),
            settings.max_accumulator_ms,
        )
    }

    /// Rejects a step that is not a positive finite length, a clamp that is not
    /// finite, and combinations allowing more than [`MAX_CATCH_UP_STEPS`] per tick
    pub fn with_timing(
        clock: C,
        frames: F,
        step_seconds: f64,
        max_accumulator_ms: f64,
    ) -> Result<Self, SchedulerError> {
        let step_ms = step_seconds * 1000.0;
        let usable = step_ms.is_finite()
            && step_ms > 0.0
            && max_accumulator_ms.is_finite()
            && max_accumulator_ms >= 0.0
            && max_accumulator_ms / step_ms <= MAX_CATCH_UP_STEPS;
        if !usable {
            return Err(SchedulerError::InvalidTiming {
                step_ms,
                max_accumulator_ms,
            });
        }
        Ok(Self::unchecked(clock, frames, step_ms, max_accumulator_ms))
    }

    fn unchecked(clock: C, frames: F, step_ms: f64, max_accumulator_ms: f64) -> Self {
        Self {
            clock,
            frames,
            state: SchedulerState::Idle,
            step_ms,
            max_accumulator_ms,
            accumulator_ms: 0.0,
            last_ms: 0.0,
            total_steps: 0,
        }
    }

    /// Idle -> running. Resets the accumulator and asks for the first frame.
    pub fn start(&mut self) -> Result<(), SchedulerError> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }
        self.state = SchedulerState::Running;
        self.accumulator_ms = 0.0;
        self.last_ms = self.clock.now_ms();
        log::info!(
            "scheduler started: step {:.3} ms, clamp {} ms",
            self.step_ms,
            self.max_accumulator_ms
        );
        self.frames.request_frame();
        Ok(())
    }

    /// Running -> idle. Frames already requested will find the scheduler idle and do nothing.
    pub fn stop(&mut self) -> Result<(), SchedulerError> {
        if !self.is_running() {
            return Err(SchedulerError::NotRunning);
        }
        self.state = SchedulerState::Idle;
        log::info!("scheduler stopped after {} steps", self.total_steps);
        Ok(())
    }

    /// One host frame: run zero or more steps, render once, request the next frame
    pub fn tick(
        &mut self,
        target: &mut impl FixedStepTarget,
    ) -> Result<TickReport, SchedulerError> {
        if !self.is_running() {
            return Err(SchedulerError::NotRunning);
        }

        let now = self.clock.now_ms();
        // A clock that steps backwards contributes nothing
        let delta = (now - self.last_ms).max(0.0);
        self.last_ms = now;

        self.accumulator_ms += delta;
        let mut discarded_ms = 0.0;
        if self.accumulator_ms > self.max_accumulator_ms {
            discarded_ms = self.accumulator_ms - self.max_accumulator_ms;
            self.accumulator_ms = self.max_accumulator_ms;
            log::debug!("frame stalled, dropping {discarded_ms:.1} ms");
        }

        let dt = (self.step_ms / 1000.0) as f32;
        let mut steps = 0;
        while self.accumulator_ms >= self.step_ms {
            target.step(dt);
            self.accumulator_ms -= self.step_ms;
            steps += 1;
        }
        self.total_steps += u64::from(steps);

        let alpha = (self.accumulator_ms / self.step_ms) as f32;
        target.render(alpha);
        self.frames.request_frame();

        Ok(TickReport {
            steps,
            alpha,
            discarded_ms,
        })
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    #[inline]
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    #[inline]
    pub fn step_ms(&self) -> f64 {
        self.step_ms
    }

    #[inline]
    pub fn accumulator_ms(&self) -> f64 {
        self.accumulator_ms
    }

    #[inline]
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn frames(&self) -> &F {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut F {
        &mut self.frames
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::{FixedRateFrames, SystemClock};

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::time::{Duration, Instant};

    use super::{Clock, FrameRequester};

    /// Milliseconds since construction
    #[derive(Debug, Clone, Copy)]
    pub struct SystemClock {
        origin: Instant,
    }

    impl Default for SystemClock {
        fn default() -> Self {
            Self {
                origin: Instant::now(),
            }
        }
    }

    impl SystemClock {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl Clock for SystemClock {
        fn now_ms(&self) -> f64 {
            self.origin.elapsed().as_secs_f64() * 1000.0
        }
    }

    /// Timer-based frame source for hosts without a display refresh callback
    #[derive(Debug, Clone)]
    pub struct FixedRateFrames {
        interval: Duration,
        next: Option<Instant>,
    }

    impl FixedRateFrames {
        pub fn new(hz: f64) -> Self {
            Self {
                interval: Duration::from_secs_f64(1.0 / hz.max(1.0)),
                next: None,
            }
        }

        #[inline]
        pub fn is_requested(&self) -> bool {
            self.next.is_some()
        }

        /// Sleep until the requested frame is due. Returns `false` if no frame was requested.
        pub fn wait(&mut self) -> bool {
            let Some(due) = self.next.take() else {
                return false;
            };
            let now = Instant::now();
            if due > now {
                std::thread::sleep(due - now);
            }
            true
        }
    }

    impl Default for FixedRateFrames {
        fn default() -> Self {
            Self::new(60.0)
        }
    }

    impl FrameRequester for FixedRateFrames {
        fn request_frame(&mut self) {
            if self.next.is_none() {
                self.next = Some(Instant::now() + self.interval);
            }
        }
    }
}
