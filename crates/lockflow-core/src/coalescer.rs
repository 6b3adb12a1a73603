#![forbid(unsafe_code)]

//! Coalescing for high-frequency pointer-move events.
//!
//! Touch hardware reports moves far faster than a display refreshes. Feeding
//! every move to the engine is correct but wasteful: only the latest position
//! matters for path acceptance between two frames. [`PointerCoalescer`]
//! collapses a burst of moves into one, so the host can process input once
//! per animation frame.
//!
//! This is a performance throttle, not a correctness mechanism: `Down`,
//! `Up`, and `Cancel` always pass through immediately, and the caller must
//! flush any pending move *before* processing a pass-through event so the
//! engine sees positions in temporal order.
//!
//! # Usage
//!
//! ```
//! use lockflow_core::coalescer::PointerCoalescer;
//! use lockflow_core::event::PointerEvent;
//! use lockflow_core::geometry::PointF;
//!
//! let mut coalescer = PointerCoalescer::new();
//!
//! // Moves coalesce: latest position wins.
//! assert!(coalescer.push(PointerEvent::Move(PointF::new(10.0, 10.0))).is_none());
//! assert!(coalescer.push(PointerEvent::Move(PointF::new(20.0, 20.0))).is_none());
//!
//! // A release passes through; flush the pending move first.
//! let pending = coalescer.flush();
//! assert_eq!(pending, Some(PointerEvent::Move(PointF::new(20.0, 20.0))));
//! let up = coalescer.push(PointerEvent::Up);
//! assert_eq!(up, Some(PointerEvent::Up));
//! ```

use crate::event::PointerEvent;
use crate::geometry::PointF;

/// Collapses bursts of pointer moves into the most recent one.
///
/// Not thread-safe; use from the single input-event thread. All operations
/// are O(1) and at most one move is ever pending.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerCoalescer {
    pending_move: Option<PointF>,
}

impl PointerCoalescer {
    /// Create an empty coalescer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an event.
    ///
    /// Returns `Some(event)` when it should be processed immediately
    /// (`Down`, `Up`, `Cancel`), or `None` when a move was absorbed. The
    /// caller is responsible for calling [`flush`](Self::flush) before
    /// processing a returned event.
    pub fn push(&mut self, event: PointerEvent) -> Option<PointerEvent> {
        match event {
            PointerEvent::Move(pos) => {
                self.pending_move = Some(pos);
                None
            }
            other => Some(other),
        }
    }

    /// Take the pending coalesced move, if any.
    #[must_use]
    pub fn flush(&mut self) -> Option<PointerEvent> {
        self.pending_move.take().map(PointerEvent::Move)
    }

    /// Whether a move is waiting to be flushed.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending_move.is_some()
    }

    /// Discard any pending move without processing it.
    pub fn clear(&mut self) {
        self.pending_move = None;
    }
}
