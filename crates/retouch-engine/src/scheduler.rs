//! Render throttling.
//!
//! At most one render starts per interval. A request inside the interval is
//! deferred to `last_render + interval`; further requests while pending fold
//! into the same deferred render, which then sees the latest stack. Nothing
//! queues and the last state of a burst is always rendered.
//!
//! ```text
//! Idle ── request, interval elapsed ──► RenderNow
//!  │
//!  │ request, too soon
//!  ▼
//! Pending{due} ── poll or request, now >= due ──► RenderNow
//!
//! RenderNow ─► begin ─► Rendering ─► finish ─► Idle
//! ```
//!
//! Time comes from a [`Clock`]; tests drive a [`ManualClock`].

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Source of the current time.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset: Rc<Cell<Duration>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    /// Starts at the current instant.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    /// Moves time forward.
    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }

    /// Sets the time elapsed since creation.
    pub fn set(&self, elapsed: Duration) {
        self.offset.set(elapsed);
    }

    /// Time elapsed since creation.
    pub fn elapsed(&self) -> Duration {
        self.offset.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.offset.get()
    }
}

/// Scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Nothing to do.
    Idle,
    /// A render is owed at `due`.
    Pending {
        /// When the deferred render may start.
        due: Instant,
    },
    /// A render is in progress.
    Rendering,
}

/// Answer to a render request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Render immediately.
    RenderNow,
    /// A render is owed at `due`; call [`RenderScheduler::poll`] until then.
    Deferred {
        /// When the deferred render may start.
        due: Instant,
    },
}

/// Throttle state machine.
#[derive(Debug, Clone)]
pub struct RenderScheduler {
    interval: Duration,
    state: SchedulerState,
    last_render: Option<Instant>,
}

impl RenderScheduler {
    /// Scheduler allowing one render per `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            state: SchedulerState::Idle,
            last_render: None,
        }
    }

    /// Minimum spacing between render starts.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Current state.
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Start time of the last render, if any.
    pub fn last_render(&self) -> Option<Instant> {
        self.last_render
    }

    /// Due time of the owed render, if pending.
    pub fn next_due(&self) -> Option<Instant> {
        match self.state {
            SchedulerState::Pending { due } => Some(due),
            _ => None,
        }
    }

    fn earliest_start(&self) -> Option<Instant> {
        self.last_render.map(|t| t + self.interval)
    }

    /// Records that the output is stale.
    pub fn request(&mut self, now: Instant) -> Decision {
        if let SchedulerState::Pending { due } = self.state {
            // An owed render that is already due runs with this request.
            if now >= due {
                return Decision::RenderNow;
            }
            return Decision::Deferred { due };
        }
        match self.earliest_start() {
            Some(due) if self.state == SchedulerState::Rendering || now < due => {
                let in_ms = due.saturating_duration_since(now).as_millis() as u64;
                debug!(in_ms, "render deferred");
                self.state = SchedulerState::Pending { due };
                Decision::Deferred { due }
            }
            _ => Decision::RenderNow,
        }
    }

    /// True when a deferred render is due.
    pub fn poll(&self, now: Instant) -> bool {
        matches!(self.state, SchedulerState::Pending { due } if now >= due)
    }

    /// Marks a render as started at `now`.
    pub fn begin(&mut self, now: Instant) {
        self.state = SchedulerState::Rendering;
        self.last_render = Some(now);
    }

    /// Marks the render as done.
    ///
    /// A request that arrived during the render stays pending.
    pub fn finish(&mut self) {
        if self.state == SchedulerState::Rendering {
            self.state = SchedulerState::Idle;
        }
    }

    /// Drops any owed render.
    pub fn cancel_pending(&mut self) {
        if matches!(self.state, SchedulerState::Pending { .. }) {
            self.state = SchedulerState::Idle;
        }
    }
}

impl Default for RenderScheduler {
    fn default() -> Self {
        Self::new(Duration::from_millis(crate::config::DEFAULT_RENDER_INTERVAL_MS))
    }
}
