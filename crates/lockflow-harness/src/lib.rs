#![forbid(unsafe_code)]

//! Scripted gesture harness for deterministic engine testing.
//!
//! A [`GestureScript`] is a recorded pointer gesture: downs, moves, frame
//! boundaries, and waits. A [`ScriptRunner`] replays it against a
//! [`PatternLockEngine`] under a synthetic 16ms-per-frame clock, routing raw
//! moves through a [`PointerCoalescer`] exactly the way a real host would:
//! moves coalesce within a frame, the pending move is flushed at every frame
//! boundary and before any non-move event.
//!
//! # Determinism
//!
//! The runner owns the clock. Time advances only at frame boundaries and
//! waits, so replaying the same script against the same configuration yields
//! the same event stream every run.

use std::time::Duration;

use lockflow_core::geometry::GridSpec;
use lockflow_core::{LockEvent, PatternLockEngine, PointF, PointerCoalescer, PointerEvent};
use web_time::Instant;

/// Synthetic frame interval used by the runner's clock.
pub const FRAME: Duration = Duration::from_millis(16);

// ============================================================================
// GestureScript
// ============================================================================

/// One step of a scripted gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScriptStep {
    /// Pointer down at a position.
    Down(PointF),
    /// Raw pointer move; coalesced until the next frame boundary.
    Move(PointF),
    /// Advance one frame: flush the pending move, then tick the engine.
    Frame,
    /// Pointer up.
    Up,
    /// Gesture cancellation.
    Cancel,
    /// Let the given duration elapse, frame by frame.
    Wait(Duration),
}

/// A recorded pointer gesture, built fluently and replayed by a
/// [`ScriptRunner`].
#[derive(Debug, Clone, Default)]
pub struct GestureScript {
    steps: Vec<ScriptStep>,
    grid: GridSpec,
}

impl GestureScript {
    /// An empty script over the default grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty script over a custom grid, so node-indexed helpers land on
    /// the same centers the engine under test uses.
    #[must_use]
    pub fn with_grid(grid: GridSpec) -> Self {
        Self {
            steps: Vec::new(),
            grid,
        }
    }

    /// The recorded steps.
    #[must_use]
    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }

    /// Pointer down at an arbitrary position.
    #[must_use]
    pub fn down(mut self, pos: impl Into<PointF>) -> Self {
        self.steps.push(ScriptStep::Down(pos.into()));
        self
    }

    /// Pointer down on a node's center.
    #[must_use]
    pub fn down_on(self, node: u8) -> Self {
        let center = self.center(node);
        self.down(center)
    }

    /// Raw move to an arbitrary position. Coalesced: only the last move
    /// before a frame boundary (or release) reaches the engine.
    #[must_use]
    pub fn move_to(mut self, pos: impl Into<PointF>) -> Self {
        self.steps.push(ScriptStep::Move(pos.into()));
        self
    }

    /// Drag onto a node's center and commit the frame, so the move is
    /// guaranteed to be delivered.
    #[must_use]
    pub fn drag_to(self, node: u8) -> Self {
        let center = self.center(node);
        self.move_to(center).frame()
    }

    /// Advance one 16ms frame.
    #[must_use]
    pub fn frame(mut self) -> Self {
        self.steps.push(ScriptStep::Frame);
        self
    }

    /// Pointer up.
    #[must_use]
    pub fn up(mut self) -> Self {
        self.steps.push(ScriptStep::Up);
        self
    }

    /// Cancel the gesture.
    #[must_use]
    pub fn cancel(mut self) -> Self {
        self.steps.push(ScriptStep::Cancel);
        self
    }

    /// Let `duration` elapse under the frame clock.
    #[must_use]
    pub fn wait(mut self, duration: Duration) -> Self {
        self.steps.push(ScriptStep::Wait(duration));
        self
    }

    fn center(&self, node: u8) -> PointF {
        self.grid.centers()[usize::from(node)]
    }
}

// ============================================================================
// ScriptRunner
// ============================================================================

/// Replays [`GestureScript`]s against an engine under a synthetic clock.
#[derive(Debug)]
pub struct ScriptRunner {
    engine: PatternLockEngine,
    coalescer: PointerCoalescer,
    now: Instant,
    events: Vec<LockEvent>,
}

impl ScriptRunner {
    /// Wrap an engine. The clock starts at construction time and advances
    /// only through script frames and waits.
    #[must_use]
    pub fn new(engine: PatternLockEngine) -> Self {
        Self {
            engine,
            coalescer: PointerCoalescer::new(),
            now: Instant::now(),
            events: Vec::new(),
        }
    }

    /// Replay a script, appending the engine's output to the collected
    /// event stream.
    pub fn run(&mut self, script: &GestureScript) {
        for step in script.steps() {
            match *step {
                ScriptStep::Down(pos) => self.deliver(PointerEvent::Down(pos)),
                ScriptStep::Move(pos) => {
                    // Absorbed until the next flush; nothing reaches the
                    // engine yet.
                    let passthrough = self.coalescer.push(PointerEvent::Move(pos));
                    debug_assert!(passthrough.is_none());
                }
                ScriptStep::Frame => self.advance_frame(),
                ScriptStep::Up => self.deliver(PointerEvent::Up),
                ScriptStep::Cancel => self.deliver(PointerEvent::Cancel),
                ScriptStep::Wait(duration) => {
                    let mut remaining = duration;
                    while remaining > Duration::ZERO {
                        self.advance_frame();
                        remaining = remaining.saturating_sub(FRAME);
                    }
                }
            }
        }
    }

    /// All engine events collected so far, in emission order.
    #[must_use]
    pub fn events(&self) -> &[LockEvent] {
        &self.events
    }

    /// How many times an event matching `predicate` was emitted.
    #[must_use]
    pub fn count(&self, predicate: impl Fn(&LockEvent) -> bool) -> usize {
        self.events.iter().filter(|event| predicate(event)).count()
    }

    /// The engine under test.
    #[must_use]
    pub fn engine(&self) -> &PatternLockEngine {
        &self.engine
    }

    /// Mutable access, for wiring callbacks before running a script.
    pub fn engine_mut(&mut self) -> &mut PatternLockEngine {
        &mut self.engine
    }

    fn deliver(&mut self, event: PointerEvent) {
        // Pending moves are flushed before any non-move event so the engine
        // sees the cursor where the gesture actually was.
        self.flush_pending();
        tracing::trace!(?event, "deliver");
        let out = self.engine.handle(event, self.now);
        self.events.extend(out);
    }

    fn advance_frame(&mut self) {
        self.flush_pending();
        self.now += FRAME;
        let out = self.engine.tick(self.now);
        self.events.extend(out);
    }

    fn flush_pending(&mut self) {
        if let Some(event) = self.coalescer.flush() {
            let out = self.engine.handle(event, self.now);
            self.events.extend(out);
        }
    }
}
