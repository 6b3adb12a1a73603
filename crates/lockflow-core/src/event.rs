#![forbid(unsafe_code)]

//! Canonical input and output event types.
//!
//! [`PointerEvent`] is what the host input system feeds the engine;
//! [`LockEvent`] is the semantic output the engine emits back. Positions are
//! in the same local coordinate space as the rendered grid.
//!
//! # Design Notes
//!
//! - A `Cancel` (pointer leaves the surface, platform revokes the gesture)
//!   is handled identically to `Up`: the attempt is finalized with whatever
//!   path was accumulated, never silently discarded.
//! - `LockEvent::SuccessComplete` fires only after the flourish animation
//!   reaches its terminal state, never at verification time.

use crate::geometry::PointF;
use crate::verify::Outcome;

/// A raw pointer/touch event from the host platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Pointer touched down at a position.
    Down(PointF),
    /// Pointer moved while down.
    Move(PointF),
    /// Pointer was released.
    Up,
    /// The gesture was revoked by the platform. Treated as a release.
    Cancel,
}

/// Semantic events emitted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockEvent {
    /// A node entered the attempt path (including auto-filled midpoints).
    NodeAdded {
        /// Grid index of the accepted node.
        index: u8,
    },

    /// The gesture ended and the attempt was verified.
    ///
    /// For [`Outcome::Fail`] the failure callback has already fired and the
    /// haptic pulse has been issued by the time this event is observed.
    AttemptResolved {
        /// Result of comparing the frozen path against the secret.
        outcome: Outcome,
    },

    /// The success flourish finished; the success callback has fired.
    SuccessComplete,

    /// The post-failure delay elapsed and the session returned to idle.
    AutoReset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_event_is_copy() {
        let down = PointerEvent::Down(PointF::new(1.0, 2.0));
        let copy = down;
        assert_eq!(down, copy);
    }

    #[test]
    fn lock_event_matches() {
        let ev = LockEvent::NodeAdded { index: 4 };
        assert!(matches!(ev, LockEvent::NodeAdded { index: 4 }));
        assert!(matches!(
            LockEvent::AttemptResolved {
                outcome: Outcome::Fail
            },
            LockEvent::AttemptResolved {
                outcome: Outcome::Fail
            }
        ));
    }
}
