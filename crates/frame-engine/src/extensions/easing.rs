// extensions/easing.rs
//
// Easing curves over normalised time. Particle velocity decay and the wipe
// transition both read their shape from here.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

/// Easing function type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant velocity (no easing).
    #[default]
    Linear,
    /// Slow start.
    QuadIn,
    /// Slow end.
    QuadOut,
    /// Stronger slow end.
    CubicOut,
    /// Slow start and end.
    SineInOut,
    /// Dramatic slow end.
    ExpoOut,
}

impl Easing {
    /// Apply the curve to `t`, clamped to [0, 1]. Every curve maps 0 to 0 and 1 to 1.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            Easing::ExpoOut => {
                if t == 1.0 { 1.0 } else { 1.0 - 2.0_f32.powf(-10.0 * t) }
            }
        }
    }

    /// Fraction of the initial value that remains at progress `t`.
    /// Bounded in [0, 1] and reaching 0 at `t = 1`.
    #[inline]
    pub fn remaining(self, t: f32) -> f32 {
        1.0 - self.apply(t)
    }
}

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
