#![forbid(unsafe_code)]

//! The success flourish: a fixed two-phase scale/opacity sequence.
//!
//! Phase one grows the pattern to 108% (ease-out). Phase two collapses it
//! through 82% while opacity fades to zero. A halo ring scales from 100% to
//! 160% across the whole sequence. The terminal state of this animation is
//! what gates the external success callback: the session announces success
//! only once the flourish completes, never at verification time.

use std::time::Duration;

use super::{Animation, ease_out_cubic, smoothstep};

/// Duration of the grow phase.
const GROW: Duration = Duration::from_millis(220);

/// Duration of the collapse-and-fade phase.
const COLLAPSE: Duration = Duration::from_millis(260);

/// Peak scale reached at the end of the grow phase.
const PEAK_SCALE: f32 = 1.08;

/// Final scale at the end of the collapse.
const FINAL_SCALE: f32 = 0.82;

/// Final halo scale (starts at 1.0).
const HALO_END: f32 = 1.6;

/// Transform values for one frame of the flourish.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlourishFrame {
    /// Uniform scale applied to the pattern markers.
    pub scale: f32,
    /// Opacity of the pattern markers, 1.0 → 0.0.
    pub opacity: f32,
    /// Scale of the halo ring, 1.0 → 1.6.
    pub halo_scale: f32,
}

/// The running success animation.
#[derive(Debug, Clone)]
pub struct Flourish {
    elapsed: Duration,
}

impl Flourish {
    /// Start the flourish from its first frame.
    #[must_use]
    pub fn new() -> Self {
        Self {
            elapsed: Duration::ZERO,
        }
    }

    /// Total sequence duration.
    #[must_use]
    pub fn duration() -> Duration {
        GROW + COLLAPSE
    }

    /// Current transform values.
    #[must_use]
    pub fn frame(&self) -> FlourishFrame {
        let halo_progress = ease_out_cubic(fraction(self.elapsed, Self::duration()));
        let halo_scale = 1.0 + (HALO_END - 1.0) * halo_progress;

        if self.elapsed < GROW {
            let p = ease_out_cubic(fraction(self.elapsed, GROW));
            FlourishFrame {
                scale: 1.0 + (PEAK_SCALE - 1.0) * p,
                opacity: 1.0,
                halo_scale,
            }
        } else {
            let p = smoothstep(fraction(self.elapsed - GROW, COLLAPSE));
            FlourishFrame {
                scale: PEAK_SCALE + (FINAL_SCALE - PEAK_SCALE) * p,
                opacity: 1.0 - p,
                halo_scale,
            }
        }
    }
}

impl Default for Flourish {
    fn default() -> Self {
        Self::new()
    }
}

impl Animation for Flourish {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = (self.elapsed + dt).min(Self::duration());
    }

    /// Overall sequence progress.
    fn value(&self) -> f32 {
        fraction(self.elapsed, Self::duration())
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= Self::duration()
    }
}

fn fraction(elapsed: Duration, total: Duration) -> f32 {
    (elapsed.as_secs_f32() / total.as_secs_f32()).clamp(0.0, 1.0)
}
