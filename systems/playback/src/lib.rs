#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure playback state machine driving the replay cursor.
//!
//! The machine owns the current step index and transport state. Transport
//! operations mutate it directly; timed advancement happens through
//! [`Playback::tick`], which accumulates simulated time and emits one step
//! per `1 / steps_per_second` seconds, so the frame loop can call it with
//! whatever frame delta the rendering backend reports. No operation ever
//! moves the index outside `0..total`; manual steps saturate at the
//! boundaries instead of erroring.

use std::time::Duration;

use antcode_core::TransportState;

/// Configuration snapshot consulted by transport operations.
///
/// Captured from the settings store at dispatch time so the machine itself
/// stays independent of the configuration store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackPolicy {
    /// Manual step and skip operations pause the transport.
    pub pause_on_step: bool,
    /// Reaching the final step during timed playback pauses the transport.
    pub stop_on_last_step: bool,
    /// Timed playback rate; one step per `1 / steps_per_second` seconds.
    pub steps_per_second: u32,
}

impl Default for PlaybackPolicy {
    fn default() -> Self {
        Self {
            pause_on_step: true,
            stop_on_last_step: true,
            steps_per_second: 5,
        }
    }
}

/// Cursor and transport state over a loaded replay.
#[derive(Debug)]
pub struct Playback {
    state: TransportState,
    index: usize,
    total: usize,
    accumulator: Duration,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new()
    }
}

impl Playback {
    /// Creates a machine with no replay loaded.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: TransportState::Stopped,
            index: 0,
            total: 0,
            accumulator: Duration::ZERO,
        }
    }

    /// Installs a freshly loaded replay: cursor at step zero, transport stopped.
    pub fn load(&mut self, total: usize) {
        self.state = TransportState::Stopped;
        self.index = 0;
        self.total = total;
        self.accumulator = Duration::ZERO;
    }

    /// Discards the loaded replay, returning to the empty stopped state.
    pub fn unload(&mut self) {
        self.load(0);
    }

    /// Whether a replay is currently loaded.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.total > 0
    }

    /// Current transport state.
    #[must_use]
    pub const fn state(&self) -> TransportState {
        self.state
    }

    /// Zero-based index of the step the cursor points at.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Total number of steps in the loaded replay, zero when none is loaded.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Resumes timed playback.
    pub fn play(&mut self) {
        if !self.is_loaded() {
            return;
        }
        self.set_state(TransportState::Playing);
    }

    /// Suspends timed playback.
    pub fn pause(&mut self) {
        if !self.is_loaded() {
            return;
        }
        self.set_state(TransportState::Paused);
    }

    /// Flips between playing and paused; a stopped transport starts playing.
    pub fn toggle(&mut self) {
        if !self.is_loaded() {
            return;
        }
        match self.state {
            TransportState::Playing => self.set_state(TransportState::Paused),
            TransportState::Paused | TransportState::Stopped => {
                self.set_state(TransportState::Playing);
            }
        }
    }

    /// Advances the cursor one step, saturating at the final index.
    pub fn step_forward(&mut self, policy: &PlaybackPolicy) {
        if !self.is_loaded() {
            return;
        }
        self.index = (self.index + 1).min(self.total - 1);
        self.pause_for_manual_step(policy);
    }

    /// Retreats the cursor one step, saturating at index zero.
    pub fn step_backward(&mut self, policy: &PlaybackPolicy) {
        if !self.is_loaded() {
            return;
        }
        self.index = self.index.saturating_sub(1);
        self.pause_for_manual_step(policy);
    }

    /// Jumps the cursor to the first step.
    pub fn skip_to_start(&mut self, policy: &PlaybackPolicy) {
        if !self.is_loaded() {
            return;
        }
        self.index = 0;
        self.pause_for_manual_step(policy);
    }

    /// Jumps the cursor to the final step.
    pub fn skip_to_end(&mut self, policy: &PlaybackPolicy) {
        if !self.is_loaded() {
            return;
        }
        self.index = self.total - 1;
        self.pause_for_manual_step(policy);
    }

    /// Accumulates simulated time and advances the cursor while playing.
    ///
    /// Reaching the final index with `stop_on_last_step` set pauses the
    /// transport and discards leftover time; without it, timed playback
    /// wraps around to step zero and keeps running.
    pub fn tick(&mut self, dt: Duration, policy: &PlaybackPolicy) {
        if self.state != TransportState::Playing || !self.is_loaded() {
            return;
        }

        let interval = Duration::from_secs(1) / policy.steps_per_second.max(1);
        self.accumulator += dt;

        while self.accumulator >= interval {
            self.accumulator -= interval;

            if self.index + 1 < self.total {
                self.index += 1;
            } else {
                self.index = 0;
            }

            if self.index + 1 == self.total && policy.stop_on_last_step {
                self.set_state(TransportState::Paused);
                break;
            }
        }
    }

    fn pause_for_manual_step(&mut self, policy: &PlaybackPolicy) {
        if policy.pause_on_step {
            self.set_state(TransportState::Paused);
        }
    }

    fn set_state(&mut self, state: TransportState) {
        if self.state != state {
            self.state = state;
            self.accumulator = Duration::ZERO;
        }
    }
}
