//! Frame-rate-independent easing.
//!
//! The gesture pipeline's blend factors were tuned as *per-tick* lerp
//! amounts at roughly 60 Hz, which ties the visual response to the frame
//! rate. A [`Rate`] keeps the tuned per-tick value but applies it as an
//! exponential decay in time:
//!
//! ```text
//! τ     = -dt_ref / ln(1 - α)
//! blend = 1 - exp(-dt / τ)
//! ```
//!
//! At `dt == dt_ref` the blend is exactly `α`, so behaviour at the
//! reference rate is unchanged. At other rates this is an approximation of
//! the tuned feel, not a new set of time constants.

use serde::{Deserialize, Serialize};

pub const REFERENCE_HZ: f32 = 60.0;
pub const MAX_DT: f32 = 0.25;

// ════════════════════════════════════════════════════════════════════════════
// Rate
// ════════════════════════════════════════════════════════════════════════════

/// A blend factor expressed as "fraction of the remaining gap closed per
/// reference tick".
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rate(f32);

impl Rate {
    pub const fn per_tick(alpha: f32) -> Self {
        Rate(alpha)
    }

    pub fn alpha(self) -> f32 { self.0 }

    /// Equivalent time constant in seconds. `0.0` for an instant rate,
    /// infinite for a rate that never moves.
    pub fn time_constant(self, reference_hz: f32) -> f32 {
        let alpha = self.0.clamp(0.0, 1.0);
        if alpha >= 1.0 {
            0.0
        } else if alpha <= 0.0 {
            f32::INFINITY
        } else {
            -(1.0 / reference_hz) / (1.0 - alpha).ln()
        }
    }

    /// Blend amount for a tick of `dt` seconds.
    pub fn blend(self, dt: f32, reference_hz: f32) -> f32 {
        if !(dt > 0.0) || !dt.is_finite() {
            return 0.0;
        }
        let tau = self.time_constant(reference_hz);
        if tau == 0.0 {
            1.0
        } else if tau.is_infinite() {
            0.0
        } else {
            1.0 - (-dt / tau).exp()
        }
    }

    pub fn is_valid(self) -> bool {
        (0.0..=1.0).contains(&self.0)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Timing
// ════════════════════════════════════════════════════════════════════════════

/// Reference tick rate and the longest tick the easing will honour.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// Tick rate at which every [`Rate`] equals its tuned per-tick value.
    pub reference_hz: f32,
    /// Longer ticks (window drags, debugger pauses) are clamped to this.
    pub max_dt: f32,
}

impl Default for Timing {
    fn default() -> Self {
        Timing { reference_hz: REFERENCE_HZ, max_dt: MAX_DT }
    }
}

impl Timing {
    /// Duration of one reference tick in seconds.
    pub fn reference_dt(&self) -> f32 {
        1.0 / self.reference_hz
    }

    /// Non-finite or negative `dt` becomes 0; long ticks are clamped.
    pub fn clamp_dt(&self, dt: f32) -> f32 {
        if dt.is_finite() && dt > 0.0 { dt.min(self.max_dt) } else { 0.0 }
    }

    pub fn blend(&self, rate: Rate, dt: f32) -> f32 {
        rate.blend(self.clamp_dt(dt), self.reference_hz)
    }

    pub fn validate(&self) -> Result<(), crate::SignalError> {
        if !(self.reference_hz > 0.0) || !self.reference_hz.is_finite() {
            return Err(crate::SignalError::Config(format!(
                "reference_hz must be positive, got {}", self.reference_hz
            )));
        }
        if !(self.max_dt > 0.0) {
            return Err(crate::SignalError::Config(format!(
                "max_dt must be positive, got {}", self.max_dt
            )));
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helpers
// ════════════════════════════════════════════════════════════════════════════

/// Move `current` toward `target` by `blend` of the remaining gap.
pub fn ease(current: f32, target: f32, blend: f32) -> f32 {
    current + (target - current) * blend
}

/// Clamp into `[0, 1]`, mapping NaN to 0.
pub fn unit_clamp(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn blend_at_reference_rate_is_legacy_alpha() {
        for alpha in [0.05, 0.1, 0.15, 0.2] {
            let b = Rate::per_tick(alpha).blend(DT, REFERENCE_HZ);
            assert!((b - alpha).abs() < 1e-5, "alpha {} gave {}", alpha, b);
        }
    }

    #[test]
    fn two_half_ticks_equal_one_full_tick() {
        let rate = Rate::per_tick(0.15);
        let one = ease(0.0, 1.0, rate.blend(DT, REFERENCE_HZ));
        let half = rate.blend(DT / 2.0, REFERENCE_HZ);
        let two = ease(ease(0.0, 1.0, half), 1.0, half);
        assert!((one - two).abs() < 1e-5);
    }

    #[test]
    fn zero_or_bad_dt_does_not_move() {
        let rate = Rate::per_tick(0.15);
        assert_eq!(rate.blend(0.0, REFERENCE_HZ), 0.0);
        assert_eq!(rate.blend(-1.0, REFERENCE_HZ), 0.0);
        assert_eq!(rate.blend(f32::NAN, REFERENCE_HZ), 0.0);
        assert_eq!(rate.blend(f32::INFINITY, REFERENCE_HZ), 0.0);
    }

    #[test]
    fn extreme_rates() {
        assert_eq!(Rate::per_tick(1.0).blend(DT, REFERENCE_HZ), 1.0);
        assert_eq!(Rate::per_tick(0.0).blend(DT, REFERENCE_HZ), 0.0);
    }

    #[test]
    fn timing_clamps_long_ticks() {
        let t = Timing::default();
        assert_eq!(t.clamp_dt(3.0), MAX_DT);
        assert_eq!(t.clamp_dt(f32::NAN), 0.0);
        assert_eq!(t.clamp_dt(DT), DT);
    }

    #[test]
    fn unit_clamp_handles_nan() {
        assert_eq!(unit_clamp(f32::NAN), 0.0);
        assert_eq!(unit_clamp(1.7), 1.0);
        assert_eq!(unit_clamp(-0.2), 0.0);
    }
}
