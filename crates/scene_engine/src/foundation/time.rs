//! Time management utilities
//!
//! [`Timeline`] tracks frame boundaries for the frame loop. Time is read
//! through the [`Clock`] trait so tests can drive frames deterministically
//! with a [`ManualClock`].

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use thiserror::Error;

/// Source of monotonic time
pub trait Clock {
    /// Current instant
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
///
/// Clones share the same underlying instant, so a test can keep one handle
/// and hand another to a [`Timeline`].
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    /// Create a manual clock frozen at the current instant
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, duration: Duration) {
        self.now.set(self.now.get() + duration);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Timeline errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineError {
    /// `next_frame` was called on a stopped timeline
    #[error("Timeline has not been started")]
    NotStarted,
}

#[derive(Debug, Clone, Copy)]
enum TimelineState {
    Stopped,
    Running {
        start: Instant,
        previous_frame: Instant,
    },
}

/// Frame timing tracker for the main loop
///
/// The timeline starts stopped. [`Timeline::start`] records the start and
/// previous-frame instants; each [`Timeline::next_frame`] measures the time
/// since the previous frame boundary and moves the boundary to now.
pub struct Timeline {
    clock: Box<dyn Clock>,
    state: TimelineState,
    previous_frame_duration: Duration,
    frame_count: u64,
}

impl std::fmt::Debug for Timeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timeline")
            .field("state", &self.state)
            .field("previous_frame_duration", &self.previous_frame_duration)
            .field("frame_count", &self.frame_count)
            .finish_non_exhaustive()
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline {
    /// Create a stopped timeline reading the system clock
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemClock))
    }

    /// Create a stopped timeline reading the given clock
    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        Self {
            clock,
            state: TimelineState::Stopped,
            previous_frame_duration: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Start (or restart) the timeline.
    ///
    /// Resets the frame duration and frame count.
    pub fn start(&mut self) {
        let now = self.clock.now();
        self.state = TimelineState::Running {
            start: now,
            previous_frame: now,
        };
        self.previous_frame_duration = Duration::ZERO;
        self.frame_count = 0;
        log::debug!("Timeline started");
    }

    /// Stop the timeline. The last measured duration is kept.
    pub fn stop(&mut self) {
        self.state = TimelineState::Stopped;
    }

    /// Whether [`Timeline::start`] has been called since the last stop
    pub fn is_running(&self) -> bool {
        matches!(self.state, TimelineState::Running { .. })
    }

    /// Advance to the next frame boundary
    pub fn next_frame(&mut self) -> Result<(), TimelineError> {
        let TimelineState::Running { start, previous_frame } = self.state else {
            return Err(TimelineError::NotStarted);
        };

        let now = self.clock.now();
        // Durations are clamped at zero
        self.previous_frame_duration = now.saturating_duration_since(previous_frame);
        self.state = TimelineState::Running {
            start,
            previous_frame: now,
        };
        self.frame_count += 1;

        log::trace!(
            "Frame {} took {:.3} ms",
            self.frame_count,
            self.previous_frame_duration.as_secs_f64() * 1000.0
        );
        Ok(())
    }

    /// Duration of the previous frame in seconds
    pub fn previous_frame_duration(&self) -> f32 {
        self.previous_frame_duration.as_secs_f32()
    }

    /// Duration of the previous frame
    pub fn previous_frame_elapsed(&self) -> Duration {
        self.previous_frame_duration
    }

    /// Seconds from start to the previous frame boundary. Zero when stopped.
    pub fn previous_frame_time(&self) -> f32 {
        match self.state {
            TimelineState::Running { start, previous_frame } => {
                previous_frame.saturating_duration_since(start).as_secs_f32()
            }
            TimelineState::Stopped => 0.0,
        }
    }

    /// Number of completed frames since start
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
