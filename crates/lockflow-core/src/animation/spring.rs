#![forbid(unsafe_code)]

//! Damped harmonic oscillator for node marker pop-in.
//!
//! The restoring force is `-stiffness * (position - target)`, the drag is
//! `-damping * velocity`. Integrated with semi-implicit Euler; large `dt`
//! values are subdivided so high stiffness stays numerically stable.
//!
//! # Invariants
//!
//! 1. `value()` is clamped to `[0.0, 1.0]`.
//! 2. A spring at rest stays put until `set_target` or `retrigger` wakes it.
//! 3. Rest snaps position exactly onto the target and zeroes velocity.

use std::time::Duration;

use super::Animation;

/// Upper bound per integration step. Larger deltas are subdivided.
const MAX_STEP_SECS: f64 = 0.004;

/// Position delta below which the spring may come to rest.
const REST_THRESHOLD: f64 = 0.001;

/// Velocity magnitude below which the spring may come to rest.
const VELOCITY_THRESHOLD: f64 = 0.01;

/// A damped spring interpolating toward a target value.
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    stiffness: f64,
    damping: f64,
    at_rest: bool,
}

impl Spring {
    /// A spring starting at `initial`, moving toward `target`.
    ///
    /// Defaults to a critically damped response (no overshoot), which is the
    /// feel the node markers want: a quick approach that settles cleanly.
    #[must_use]
    pub fn new(initial: f64, target: f64) -> Self {
        let stiffness = 220.0_f64;
        Self {
            position: initial,
            velocity: 0.0,
            target,
            stiffness,
            damping: 2.0 * stiffness.sqrt(),
            at_rest: false,
        }
    }

    /// A spring already settled at `value`.
    #[must_use]
    pub fn settled(value: f64) -> Self {
        let mut spring = Self::new(value, value);
        spring.at_rest = true;
        spring
    }

    /// The marker pop-in: 0 → 1, critically damped.
    #[must_use]
    pub fn pop() -> Self {
        Self::new(0.0, 1.0)
    }

    /// Override stiffness. The damping is re-derived to stay critical.
    #[must_use]
    pub fn with_stiffness(mut self, stiffness: f64) -> Self {
        self.stiffness = stiffness.max(0.1);
        self.damping = 2.0 * self.stiffness.sqrt();
        self
    }

    /// Override damping independently of stiffness.
    #[must_use]
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping.max(0.0);
        self
    }

    /// Raw (unclamped) position.
    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Current velocity.
    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Current target.
    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Whether the spring has settled.
    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Retarget the spring, waking it if the target actually moved.
    pub fn set_target(&mut self, target: f64) {
        if (self.target - target).abs() > REST_THRESHOLD {
            self.target = target;
            self.at_rest = false;
        }
    }

    /// Restart the motion from zero toward the current target.
    pub fn retrigger(&mut self) {
        self.position = 0.0;
        self.velocity = 0.0;
        self.at_rest = false;
    }

    /// Snap instantly to `value` and rest there.
    pub fn snap(&mut self, value: f64) {
        self.position = value;
        self.target = value;
        self.velocity = 0.0;
        self.at_rest = true;
    }

    fn step(&mut self, dt: f64) {
        let acceleration =
            -self.stiffness * (self.position - self.target) - self.damping * self.velocity;
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }

    /// Advance by `dt`, subdividing for stability.
    pub fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }
        let mut remaining = dt.as_secs_f64();
        if remaining <= 0.0 {
            return;
        }
        while remaining > 0.0 {
            let step = remaining.min(MAX_STEP_SECS);
            self.step(step);
            remaining -= step;
        }

        if (self.position - self.target).abs() < REST_THRESHOLD
            && self.velocity.abs() < VELOCITY_THRESHOLD
        {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }
}

impl Animation for Spring {
    fn tick(&mut self, dt: Duration) {
        self.advance(dt);
    }

    fn value(&self) -> f32 {
        (self.position as f32).clamp(0.0, 1.0)
    }

    fn is_complete(&self) -> bool {
        self.at_rest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn run(spring: &mut Spring, frames: usize) {
        for _ in 0..frames {
            spring.tick(FRAME);
        }
    }

    #[test]
    fn pop_converges_to_one() {
        let mut spring = Spring::pop();
        run(&mut spring, 200);
        assert!(spring.is_at_rest());
        assert!((spring.position() - 1.0).abs() < f64::EPSILON);
        assert_eq!(spring.value(), 1.0);
    }

    #[test]
    fn critically_damped_never_overshoots() {
        let mut spring = Spring::pop();
        let mut max = 0.0_f64;
        for _ in 0..300 {
            spring.tick(FRAME);
            max = max.max(spring.position());
        }
        assert!(max <= 1.0 + 1e-6, "overshoot: {max}");
    }

    #[test]
    fn settled_spring_does_not_move() {
        let mut spring = Spring::settled(0.0);
        run(&mut spring, 10);
        assert_eq!(spring.position(), 0.0);
        assert!(spring.is_at_rest());
    }

    #[test]
    fn set_target_wakes() {
        let mut spring = Spring::settled(0.0);
        spring.set_target(1.0);
        assert!(!spring.is_at_rest());
        run(&mut spring, 200);
        assert!((spring.position() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn set_target_same_value_stays_asleep() {
        let mut spring = Spring::settled(1.0);
        spring.set_target(1.0);
        assert!(spring.is_at_rest());
    }

    #[test]
    fn retrigger_restarts_from_zero() {
        let mut spring = Spring::pop();
        run(&mut spring, 200);
        assert!(spring.is_at_rest());

        spring.retrigger();
        assert!(!spring.is_at_rest());
        assert_eq!(spring.position(), 0.0);
        run(&mut spring, 200);
        assert!((spring.position() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn snap_settles_immediately() {
        let mut spring = Spring::pop();
        spring.snap(0.0);
        assert!(spring.is_at_rest());
        assert_eq!(spring.value(), 0.0);
    }

    #[test]
    fn large_dt_is_subdivided() {
        let mut spring = Spring::pop();
        spring.tick(Duration::from_secs(5));
        assert!((spring.position() - 1.0).abs() < 0.01);
    }

    #[test]
    fn zero_dt_is_noop() {
        let mut spring = Spring::pop();
        spring.tick(Duration::ZERO);
        assert_eq!(spring.position(), 0.0);
    }

    #[test]
    fn value_is_clamped() {
        let mut spring = Spring::new(0.0, 5.0);
        run(&mut spring, 300);
        assert!(spring.position() > 1.0);
        assert_eq!(spring.value(), 1.0);
    }

    #[test]
    fn deterministic_across_runs() {
        let trace = || {
            let mut spring = Spring::pop();
            (0..50)
                .map(|_| {
                    spring.tick(FRAME);
                    spring.position()
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(trace(), trace());
    }

    #[test]
    fn stiffer_spring_settles_faster() {
        let mut quick = Spring::pop().with_stiffness(500.0);
        let mut lazy = Spring::pop().with_stiffness(80.0);
        run(&mut quick, 20);
        run(&mut lazy, 20);
        assert!((quick.position() - 1.0).abs() < (lazy.position() - 1.0).abs());
    }

    #[test]
    fn underdamped_overshoots() {
        let mut spring = Spring::pop().with_damping(6.0);
        let mut max = 0.0_f64;
        for _ in 0..300 {
            spring.tick(FRAME);
            max = max.max(spring.position());
        }
        assert!(max > 1.0, "expected overshoot, max {max}");
    }
}
