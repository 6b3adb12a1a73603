#![forbid(unsafe_code)]

//! Feedback coordination: per-node springs, visual state, flourish, haptics.
//!
//! The coordinator translates session transitions into animation and haptic
//! triggers. It never decides pass/fail itself; it only animates what the
//! session tells it.
//!
//! # Invariants
//!
//! 1. Each engine instance owns its own 9 progress springs; no shared or
//!    static animation state.
//! 2. The flourish runs at most once per resolved attempt; its completion
//!    is reported exactly once.
//! 3. Haptic pulse failures are swallowed, never propagated.

use std::fmt;
use std::time::Duration;

use crate::animation::Animation;
use crate::animation::flourish::{Flourish, FlourishFrame};
use crate::animation::spring::Spring;
use crate::geometry::GRID_NODES;
use crate::verify::Outcome;

// ---------------------------------------------------------------------------
// Visual state
// ---------------------------------------------------------------------------

/// Coarse session-level visual state, used by the host to color the
/// connecting path line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisualState {
    /// No resolved attempt; neutral styling.
    #[default]
    Idle,
    /// Last attempt succeeded.
    Ok,
    /// Last attempt failed.
    Fail,
}

// ---------------------------------------------------------------------------
// Haptics
// ---------------------------------------------------------------------------

/// Opaque haptic driver failure. Best-effort only; never surfaced to the
/// lock operation.
#[derive(Debug, Clone)]
pub struct HapticError {
    detail: String,
}

impl HapticError {
    /// Wrap a platform failure message.
    #[must_use]
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

impl fmt::Display for HapticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "haptic pulse failed: {}", self.detail)
    }
}

impl std::error::Error for HapticError {}

/// Platform vibration hook.
///
/// Implemented by the host; the engine calls [`pulse`](Self::pulse) once per
/// failed attempt and ignores the result beyond optional logging.
pub trait HapticDriver {
    /// Emit one short failure pulse.
    fn pulse(&mut self) -> Result<(), HapticError>;
}

/// Default driver for platforms without vibration.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHaptics;

impl HapticDriver for NoopHaptics {
    fn pulse(&mut self) -> Result<(), HapticError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FeedbackCoordinator
// ---------------------------------------------------------------------------

/// Owns the animation and haptic side of one lock session.
pub struct FeedbackCoordinator {
    springs: [Spring; GRID_NODES],
    visual: VisualState,
    flourish: Option<Flourish>,
    flourish_reported: bool,
    haptics: Box<dyn HapticDriver>,
}

impl fmt::Debug for FeedbackCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedbackCoordinator")
            .field("visual", &self.visual)
            .field("flourish_running", &self.flourish.is_some())
            .finish()
    }
}

impl FeedbackCoordinator {
    /// Create a coordinator with the no-op haptic driver.
    #[must_use]
    pub fn new() -> Self {
        Self::with_haptics(Box::new(NoopHaptics))
    }

    /// Create a coordinator with a host-supplied haptic driver.
    #[must_use]
    pub fn with_haptics(haptics: Box<dyn HapticDriver>) -> Self {
        Self {
            springs: std::array::from_fn(|_| Spring::settled(0.0)),
            visual: VisualState::Idle,
            flourish: None,
            flourish_reported: false,
            haptics,
        }
    }

    /// Start the pop-in animation for a node that newly entered the path.
    pub fn node_activated(&mut self, index: u8) {
        self.springs[usize::from(index)] = Spring::pop();
    }

    /// React to a resolved attempt.
    ///
    /// Success starts the flourish; failure colors the line and fires the
    /// haptic pulse (errors swallowed).
    pub fn resolve(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Success => {
                self.visual = VisualState::Ok;
                self.flourish = Some(Flourish::new());
                self.flourish_reported = false;
            }
            Outcome::Fail => {
                self.visual = VisualState::Fail;
                if let Err(_err) = self.haptics.pulse() {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(error = %_err, "haptic pulse unavailable");
                }
            }
        }
    }

    /// Advance all animations by `dt`.
    ///
    /// Returns `true` the first time the flourish reaches its terminal
    /// state; `false` on every other call.
    pub fn tick(&mut self, dt: Duration) -> bool {
        for spring in &mut self.springs {
            spring.tick(dt);
        }
        if let Some(flourish) = &mut self.flourish {
            flourish.tick(dt);
            if flourish.is_complete() && !self.flourish_reported {
                self.flourish_reported = true;
                return true;
            }
        }
        false
    }

    /// Return to the idle visual state and zero all progress.
    pub fn reset(&mut self) {
        for spring in &mut self.springs {
            spring.snap(0.0);
        }
        self.visual = VisualState::Idle;
        self.flourish = None;
        self.flourish_reported = false;
    }

    /// Animation progress of one node marker, `0.0..=1.0`.
    #[must_use]
    pub fn node_progress(&self, index: u8) -> f32 {
        self.springs[usize::from(index)].value()
    }

    /// All nine marker progress values, indexed by node.
    #[must_use]
    pub fn node_progress_all(&self) -> [f32; GRID_NODES] {
        std::array::from_fn(|i| self.springs[i].value())
    }

    /// Coarse visual state for the path line.
    #[inline]
    #[must_use]
    pub fn visual_state(&self) -> VisualState {
        self.visual
    }

    /// Current flourish transform, while the success animation runs.
    #[must_use]
    pub fn flourish_frame(&self) -> Option<FlourishFrame> {
        self.flourish.as_ref().map(Flourish::frame)
    }
}

impl Default for FeedbackCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    /// Driver that counts pulses and optionally fails.
    struct CountingHaptics {
        pulses: std::rc::Rc<std::cell::Cell<u32>>,
        fail: bool,
    }

    impl HapticDriver for CountingHaptics {
        fn pulse(&mut self) -> Result<(), HapticError> {
            self.pulses.set(self.pulses.get() + 1);
            if self.fail {
                Err(HapticError::new("no vibration motor"))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn starts_idle_with_zero_progress() {
        let fb = FeedbackCoordinator::new();
        assert_eq!(fb.visual_state(), VisualState::Idle);
        assert_eq!(fb.node_progress_all(), [0.0; GRID_NODES]);
        assert!(fb.flourish_frame().is_none());
    }

    #[test]
    fn node_activation_drives_progress_toward_one() {
        let mut fb = FeedbackCoordinator::new();
        fb.node_activated(4);
        for _ in 0..200 {
            fb.tick(FRAME);
        }
        assert_eq!(fb.node_progress(4), 1.0);
        assert_eq!(fb.node_progress(0), 0.0);
    }

    #[test]
    fn fail_pulses_haptics_and_colors_line() {
        let pulses = std::rc::Rc::new(std::cell::Cell::new(0));
        let mut fb = FeedbackCoordinator::with_haptics(Box::new(CountingHaptics {
            pulses: pulses.clone(),
            fail: false,
        }));
        fb.resolve(Outcome::Fail);
        assert_eq!(fb.visual_state(), VisualState::Fail);
        assert_eq!(pulses.get(), 1);
    }

    #[test]
    fn haptic_failure_is_swallowed() {
        let pulses = std::rc::Rc::new(std::cell::Cell::new(0));
        let mut fb = FeedbackCoordinator::with_haptics(Box::new(CountingHaptics {
            pulses: pulses.clone(),
            fail: true,
        }));
        // Must not panic or change the outcome handling.
        fb.resolve(Outcome::Fail);
        assert_eq!(fb.visual_state(), VisualState::Fail);
        assert_eq!(pulses.get(), 1);
    }

    #[test]
    fn success_starts_flourish_and_reports_completion_once() {
        let mut fb = FeedbackCoordinator::new();
        fb.resolve(Outcome::Success);
        assert_eq!(fb.visual_state(), VisualState::Ok);
        assert!(fb.flourish_frame().is_some());

        let mut completions = 0;
        for _ in 0..100 {
            if fb.tick(FRAME) {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
    }

    #[test]
    fn fail_does_not_start_flourish() {
        let mut fb = FeedbackCoordinator::new();
        fb.resolve(Outcome::Fail);
        assert!(fb.flourish_frame().is_none());
        assert!(!fb.tick(FRAME));
    }

    #[test]
    fn reset_clears_everything() {
        let mut fb = FeedbackCoordinator::new();
        fb.node_activated(2);
        fb.resolve(Outcome::Success);
        for _ in 0..10 {
            fb.tick(FRAME);
        }

        fb.reset();
        assert_eq!(fb.visual_state(), VisualState::Idle);
        assert_eq!(fb.node_progress_all(), [0.0; GRID_NODES]);
        assert!(fb.flourish_frame().is_none());
        // No stale completion report after reset.
        assert!(!fb.tick(FRAME));
    }

    #[test]
    fn reactivation_restarts_marker() {
        let mut fb = FeedbackCoordinator::new();
        fb.node_activated(1);
        for _ in 0..200 {
            fb.tick(FRAME);
        }
        assert_eq!(fb.node_progress(1), 1.0);

        fb.reset();
        fb.node_activated(1);
        assert!(fb.node_progress(1) < 1.0);
    }
}
