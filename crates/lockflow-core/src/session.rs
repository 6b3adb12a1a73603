#![forbid(unsafe_code)]

//! Gesture session state machine: one lock attempt from touch to outcome.
//!
//! [`PatternLockEngine`] drives `Idle → Active → Resolved → Idle`. Call
//! [`handle`](PatternLockEngine::handle) for each pointer event and
//! [`tick`](PatternLockEngine::tick) once per animation frame; both take the
//! current [`Instant`] so the engine owns no clock and stays deterministic
//! under test.
//!
//! # Invariants
//!
//! 1. A new pointer-down always wins: it resets any in-flight or resolved
//!    state synchronously before seeding the new path.
//! 2. Two gestures are never concurrently active.
//! 3. The failure callback fires at resolution; the success callback fires
//!    only after the flourish animation completes, and exactly once.
//! 4. After `reset()`, the path is empty and the phase is `Idle`, from any
//!    starting phase.
//! 5. `Cancel` finalizes the accumulated attempt exactly like `Up`; it never
//!    silently discards it.
//!
//! # Failure Modes
//!
//! - A mismatched pattern is the expected `Fail` outcome, not an error; the
//!   session auto-resets `fail_reset_delay` later.
//! - A tap without drag submits a single-node path, which fails unless the
//!   secret also has length 1.

use std::fmt;
use std::time::Duration;

use web_time::Instant;

use crate::event::{LockEvent, PointerEvent};
use crate::feedback::{FeedbackCoordinator, HapticDriver, VisualState};
use crate::geometry::{GRID_NODES, GridSpec, PointF, nearest_any, nearest_within};
use crate::path::{AttemptPath, Pattern};
use crate::verify::{Outcome, verify};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Session configuration supplied by the hosting screen at construction.
#[derive(Debug, Clone)]
pub struct LockConfig {
    /// The registered secret an attempt must match exactly.
    pub secret: Pattern,
    /// Grid sizing; overrides the default 300/48/24/12 geometry.
    pub grid: GridSpec,
    /// Delay before a failed attempt auto-resets to idle (default: 600ms).
    pub fail_reset_delay: Duration,
}

impl LockConfig {
    /// Configuration with default geometry and reset delay.
    #[must_use]
    pub fn new(secret: Pattern) -> Self {
        Self {
            secret,
            grid: GridSpec::default(),
            fail_reset_delay: Duration::from_millis(600),
        }
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Lifecycle phase of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No gesture in progress.
    Idle,
    /// A pointer is down and the path is growing.
    Active,
    /// The gesture ended and the attempt was classified.
    Resolved(Outcome),
}

// ---------------------------------------------------------------------------
// PatternLockEngine
// ---------------------------------------------------------------------------

type Callback = Box<dyn FnMut()>;

/// The pattern-lock engine: converts a pointer gesture over the 3×3 grid
/// into an ordered node sequence, verifies it, and drives feedback.
///
/// All state is instance-owned; construct one engine per lock surface.
pub struct PatternLockEngine {
    config: LockConfig,
    centers: [PointF; GRID_NODES],
    path: AttemptPath,
    cursor: Option<PointF>,
    phase: SessionPhase,
    feedback: FeedbackCoordinator,
    fail_deadline: Option<Instant>,
    last_tick: Option<Instant>,
    on_success: Option<Callback>,
    on_fail: Option<Callback>,
}

impl fmt::Debug for PatternLockEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternLockEngine")
            .field("phase", &self.phase)
            .field("path_len", &self.path.len())
            .finish()
    }
}

impl PatternLockEngine {
    /// Create an engine for the given configuration.
    #[must_use]
    pub fn new(config: LockConfig) -> Self {
        let centers = config.grid.centers();
        Self {
            config,
            centers,
            path: AttemptPath::new(),
            cursor: None,
            phase: SessionPhase::Idle,
            feedback: FeedbackCoordinator::new(),
            fail_deadline: None,
            last_tick: None,
            on_success: None,
            on_fail: None,
        }
    }

    /// Replace the haptic driver (builder form, before first use).
    #[must_use]
    pub fn with_haptics(mut self, haptics: Box<dyn HapticDriver>) -> Self {
        self.feedback = FeedbackCoordinator::with_haptics(haptics);
        self
    }

    /// Register the success callback, invoked once the flourish completes.
    pub fn set_on_success(&mut self, callback: impl FnMut() + 'static) {
        self.on_success = Some(Box::new(callback));
    }

    /// Register the failure callback, invoked immediately on mismatch.
    pub fn set_on_fail(&mut self, callback: impl FnMut() + 'static) {
        self.on_fail = Some(Box::new(callback));
    }

    // -- event processing ---------------------------------------------------

    /// Process one pointer event, returning the semantic events produced.
    pub fn handle(&mut self, event: PointerEvent, now: Instant) -> Vec<LockEvent> {
        let mut out = Vec::with_capacity(2);
        match event {
            PointerEvent::Down(pos) => self.on_down(pos, &mut out),
            PointerEvent::Move(pos) => self.on_move(pos, &mut out),
            PointerEvent::Up | PointerEvent::Cancel => self.on_release(now, &mut out),
        }
        out
    }

    /// Advance animations and deferred transitions to `now`.
    ///
    /// Call once per animation frame. Fires the success callback when the
    /// flourish reaches its terminal state and performs the post-failure
    /// auto-reset once its deadline passes.
    pub fn tick(&mut self, now: Instant) -> Vec<LockEvent> {
        let mut out = Vec::with_capacity(1);

        let dt = self
            .last_tick
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.last_tick = Some(now);

        if self.feedback.tick(dt) && self.phase == SessionPhase::Resolved(Outcome::Success) {
            #[cfg(feature = "tracing")]
            tracing::debug!("flourish complete, announcing success");
            if let Some(callback) = self.on_success.as_mut() {
                callback();
            }
            out.push(LockEvent::SuccessComplete);
        }

        if let Some(deadline) = self.fail_deadline
            && now >= deadline
        {
            self.clear_session();
            out.push(LockEvent::AutoReset);
        }

        out
    }

    /// Reset to `Idle` with an empty path. Idempotent from any phase.
    pub fn reset(&mut self) {
        self.clear_session();
    }

    // -- observables --------------------------------------------------------

    /// The current attempt path, in traced order.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &[u8] {
        self.path.as_slice()
    }

    /// The live cursor position, present only while a pointer is down.
    #[inline]
    #[must_use]
    pub fn cursor(&self) -> Option<PointF> {
        self.cursor
    }

    /// Current lifecycle phase.
    #[inline]
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Coarse visual state for the connecting line.
    #[inline]
    #[must_use]
    pub fn visual_state(&self) -> VisualState {
        self.feedback.visual_state()
    }

    /// Pop-in progress for one node marker.
    #[must_use]
    pub fn node_progress(&self, index: u8) -> f32 {
        self.feedback.node_progress(index)
    }

    /// Pop-in progress for all nine markers.
    #[must_use]
    pub fn node_progress_all(&self) -> [f32; GRID_NODES] {
        self.feedback.node_progress_all()
    }

    /// Current success-flourish transform, while it runs.
    #[must_use]
    pub fn flourish_frame(&self) -> Option<crate::animation::flourish::FlourishFrame> {
        self.feedback.flourish_frame()
    }

    /// The node centers the engine hit-tests against.
    #[inline]
    #[must_use]
    pub fn centers(&self) -> &[PointF; GRID_NODES] {
        &self.centers
    }

    /// The session configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &LockConfig {
        &self.config
    }

    // -- internals ----------------------------------------------------------

    fn on_down(&mut self, pos: PointF, out: &mut Vec<LockEvent>) {
        // A new touch always wins, even over an unfinished gesture or a
        // lingering resolved state.
        self.clear_session();
        self.phase = SessionPhase::Active;

        let start = nearest_any(pos, &self.centers);
        self.path.begin_at(start);
        self.feedback.node_activated(start);
        self.cursor = Some(pos);

        #[cfg(feature = "tracing")]
        tracing::trace!(node = start, "gesture started");
        out.push(LockEvent::NodeAdded { index: start });
    }

    fn on_move(&mut self, pos: PointF, out: &mut Vec<LockEvent>) {
        if self.phase != SessionPhase::Active {
            return;
        }
        self.cursor = Some(pos);
        self.accept_at(pos, out);
    }

    fn on_release(&mut self, now: Instant, out: &mut Vec<LockEvent>) {
        if self.phase != SessionPhase::Active {
            return;
        }

        // Capture a node the user lifted on without an intervening move.
        if let Some(pos) = self.cursor {
            self.accept_at(pos, out);
        }

        let outcome = verify(self.path.as_slice(), self.config.secret.as_slice());
        self.phase = SessionPhase::Resolved(outcome);
        self.cursor = None;
        self.feedback.resolve(outcome);

        #[cfg(feature = "tracing")]
        tracing::debug!(?outcome, path_len = self.path.len(), "attempt resolved");

        if outcome == Outcome::Fail {
            if let Some(callback) = self.on_fail.as_mut() {
                callback();
            }
            self.fail_deadline = Some(now + self.config.fail_reset_delay);
        }

        out.push(LockEvent::AttemptResolved { outcome });
    }

    fn accept_at(&mut self, pos: PointF, out: &mut Vec<LockEvent>) {
        let Some(candidate) = nearest_within(pos, &self.centers, self.config.grid.hit_radius)
        else {
            return;
        };
        for index in self.path.try_extend(candidate) {
            self.feedback.node_activated(index);
            #[cfg(feature = "tracing")]
            tracing::trace!(node = index, "node accepted");
            out.push(LockEvent::NodeAdded { index });
        }
    }

    fn clear_session(&mut self) {
        self.path.clear();
        self.cursor = None;
        self.phase = SessionPhase::Idle;
        self.fail_deadline = None;
        self.feedback.reset();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
