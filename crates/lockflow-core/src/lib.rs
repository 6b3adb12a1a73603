#![forbid(unsafe_code)]

//! Core: pattern-lock geometry, path capture, verification, and feedback.
//!
//! # Role in Lockflow
//! `lockflow-core` is the gesture engine. It owns the 3×3 grid model, the
//! adjacency rules for growing an attempt path, the session state machine,
//! and the animation/haptic feedback that accompanies an attempt.
//!
//! # Primary responsibilities
//! - **Geometry**: node layout, hit testing, and the adjacency/skip rules.
//! - **PatternLockEngine**: the `Idle → Active → Resolved` session machine.
//! - **Verification**: exact ordered comparison against the registered secret.
//! - **Feedback**: spring pop-ins, the success flourish, and haptic pulses.
//!
//! # How it fits in the system
//! The host platform feeds normalized [`event::PointerEvent`]s (optionally
//! through [`coalescer::PointerCoalescer`]) into the engine and drives
//! [`session::PatternLockEngine::tick`] once per frame. The engine is
//! platform-free: it holds no clock, no threads, and no render state, so the
//! same core runs identically under test harnesses and real UIs.

pub mod animation;
pub mod coalescer;
pub mod event;
pub mod feedback;
pub mod geometry;
pub mod path;
pub mod session;
pub mod verify;

pub use coalescer::PointerCoalescer;
pub use event::{LockEvent, PointerEvent};
pub use feedback::{HapticDriver, HapticError, NoopHaptics, VisualState};
pub use geometry::{GridSpec, PointF};
pub use path::{AttemptPath, Pattern, PatternError};
pub use session::{LockConfig, PatternLockEngine, SessionPhase};
pub use verify::{Outcome, verify};
