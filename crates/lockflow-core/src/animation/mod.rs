#![forbid(unsafe_code)]

//! Animation primitives driving the lock's feedback.
//!
//! Two animatables exist: a damped [`spring::Spring`] per node marker and
//! the success [`flourish::Flourish`] sequence. Both are advanced by
//! explicit `tick(dt)` calls from the session's frame tick; nothing here
//! owns a clock or a thread.

use std::time::Duration;

pub mod flourish;
pub mod spring;

/// A time-driven value in `[0.0, 1.0]`.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Current normalized value, clamped to `[0.0, 1.0]`.
    fn value(&self) -> f32;

    /// Whether the animation has reached its terminal state.
    fn is_complete(&self) -> bool;
}

/// Cubic ease-out: fast start, gentle arrival.
#[inline]
#[must_use]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

/// Hermite smoothstep: eases both ends.
#[inline]
#[must_use]
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
