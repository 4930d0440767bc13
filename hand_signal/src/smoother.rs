//! Temporal smoother: runs once per render tick.
//!
//! The detector delivers samples at its own, usually slower, cadence and
//! sometimes not at all. Each tick the smoother eases its state toward the
//! latest sample, channel by channel:
//!
//! | Channel | Hand present | No hand |
//! |---|---|---|
//! | x, y, z       | ease, `position_rate` (0.15) | frozen |
//! | openness      | ease, `openness_rate` (0.15) | ease toward `idle_openness` (0.2), `idle_openness_rate` (0.05) |
//! | pinch         | ease, `pinch_rate` (0.20)    | ease toward 0, `idle_pinch_rate` (0.1) |
//! | velocity      | `velocity_gain` × smoothed xy displacement since last tick | frozen |
//!
//! Rates are per reference tick and applied through [`Timing::blend`], so
//! the response is the same at any frame rate.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SignalError;
use crate::interpreter::GestureSample;
use crate::rate::{ease, unit_clamp, Rate, Timing};

// ════════════════════════════════════════════════════════════════════════════
// SmootherConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmootherConfig {
    pub position_rate:      Rate,
    pub openness_rate:      Rate,
    /// Faster than the others: pinch drives a discrete trigger downstream.
    pub pinch_rate:         Rate,
    pub idle_openness:      f32,
    pub idle_openness_rate: Rate,
    pub idle_pinch_rate:    Rate,
    pub velocity_gain:      f32,
}

impl Default for SmootherConfig {
    fn default() -> Self {
        SmootherConfig {
            position_rate:      Rate::per_tick(0.15),
            openness_rate:      Rate::per_tick(0.15),
            pinch_rate:         Rate::per_tick(0.20),
            idle_openness:      0.2,
            idle_openness_rate: Rate::per_tick(0.05),
            idle_pinch_rate:    Rate::per_tick(0.1),
            velocity_gain:      10.0,
        }
    }
}

impl SmootherConfig {
    pub fn validate(&self) -> Result<(), SignalError> {
        let rates = [
            ("position_rate",      self.position_rate),
            ("openness_rate",      self.openness_rate),
            ("pinch_rate",         self.pinch_rate),
            ("idle_openness_rate", self.idle_openness_rate),
            ("idle_pinch_rate",    self.idle_pinch_rate),
        ];
        for (name, rate) in rates {
            if !rate.is_valid() {
                return Err(SignalError::Config(format!(
                    "{} must be in [0, 1], got {}", name, rate.alpha()
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.idle_openness) {
            return Err(SignalError::Config(format!(
                "idle_openness must be in [0, 1], got {}", self.idle_openness
            )));
        }
        if !(self.velocity_gain >= 0.0) {
            return Err(SignalError::Config(format!(
                "velocity_gain must be non-negative, got {}", self.velocity_gain
            )));
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureState
// ════════════════════════════════════════════════════════════════════════════

/// Smoothed gesture, the snapshot downstream consumers read each tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureState {
    pub x:        f32,
    pub y:        f32,
    pub z:        f32,
    pub openness: f32,
    pub pinch:    f32,
    pub velocity: f32,
    pub active:   bool,
}

// ════════════════════════════════════════════════════════════════════════════
// TemporalSmoother
// ════════════════════════════════════════════════════════════════════════════

pub struct TemporalSmoother {
    config:  SmootherConfig,
    timing:  Timing,
    state:   GestureState,
    /// Smoothed x/y from the previous active tick.
    prev_xy: (f32, f32),
}

impl TemporalSmoother {
    pub fn new(config: SmootherConfig, timing: Timing) -> Self {
        TemporalSmoother {
            config,
            timing,
            state:   GestureState::default(),
            prev_xy: (0.0, 0.0),
        }
    }

    pub fn state(&self) -> &GestureState { &self.state }

    pub fn config(&self) -> &SmootherConfig { &self.config }

    pub fn timing(&self) -> &Timing { &self.timing }

    /// Back to the neutral startup state.
    pub fn reset(&mut self) {
        self.state = GestureState::default();
        self.prev_xy = (0.0, 0.0);
    }

    /// Advance one tick of `dt` seconds toward `sample`.
    pub fn update(&mut self, sample: &GestureSample, dt: f32) -> &GestureState {
        if sample.active != self.state.active {
            debug!(active = sample.active, "hand presence changed");
        }
        if sample.active {
            self.track(sample, dt);
        } else {
            self.idle(dt);
        }
        &self.state
    }

    fn track(&mut self, sample: &GestureSample, dt: f32) {
        let cfg = &self.config;
        let pos   = self.timing.blend(cfg.position_rate, dt);
        let open  = self.timing.blend(cfg.openness_rate, dt);
        let pinch = self.timing.blend(cfg.pinch_rate, dt);

        let s = &mut self.state;
        s.x        = ease(s.x, sample.x, pos);
        s.y        = ease(s.y, sample.y, pos);
        s.z        = ease(s.z, sample.z, pos);
        s.openness = unit_clamp(ease(s.openness, sample.openness, open));
        s.pinch    = unit_clamp(ease(s.pinch, sample.pinch, pinch));

        let (px, py) = self.prev_xy;
        s.velocity = cfg.velocity_gain * (s.x - px).hypot(s.y - py);
        self.prev_xy = (s.x, s.y);
        s.active = true;
    }

    fn idle(&mut self, dt: f32) {
        let cfg = &self.config;
        let open  = self.timing.blend(cfg.idle_openness_rate, dt);
        let pinch = self.timing.blend(cfg.idle_pinch_rate, dt);

        let s = &mut self.state;
        s.openness = unit_clamp(ease(s.openness, cfg.idle_openness, open));
        s.pinch    = unit_clamp(ease(s.pinch, 0.0, pinch));
        s.active   = false;
    }
}

impl Default for TemporalSmoother {
    fn default() -> Self {
        TemporalSmoother::new(SmootherConfig::default(), Timing::default())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn hand(x: f32, y: f32, openness: f32, pinch: f32) -> GestureSample {
        GestureSample { x, y, z: 0.0, openness, pinch, active: true }
    }

    fn close(a: f32, b: f32, tol: f32) -> bool { (a - b).abs() < tol }

    #[test]
    fn starts_neutral() {
        let s = TemporalSmoother::default();
        assert_eq!(*s.state(), GestureState::default());
    }

    #[test]
    fn exponential_convergence_matches_closed_form() {
        let mut s = TemporalSmoother::default();
        let target = hand(1.0, 0.0, 0.0, 0.0);
        for _ in 0..10 { s.update(&target, DT); }
        let expected = 1.0 - 0.85f32.powi(10);
        assert!(close(s.state().x, expected, 1e-4), "x = {}", s.state().x);
        assert!(close(expected, 0.8031, 1e-4));
    }

    #[test]
    fn pinch_converges_faster_than_position() {
        let mut s = TemporalSmoother::default();
        let target = hand(1.0, 0.0, 0.0, 1.0);
        for _ in 0..5 { s.update(&target, DT); }
        assert!(close(s.state().pinch, 1.0 - 0.8f32.powi(5), 1e-4));
        assert!(s.state().pinch > s.state().x);
    }

    #[test]
    fn idle_relaxes_monotonically_and_freezes_position() {
        let mut s = TemporalSmoother::default();
        for _ in 0..30 { s.update(&hand(0.6, -0.4, 0.9, 0.9), DT); }
        let before = *s.state();

        let absent = GestureSample { active: false, ..hand(0.6, -0.4, 0.9, 0.9) };
        let mut last = before;
        for _ in 0..200 {
            let now = *s.update(&absent, DT);
            assert!(!now.active);
            assert_eq!((now.x, now.y, now.z), (before.x, before.y, before.z));
            assert_eq!(now.velocity, before.velocity);
            assert!(now.openness <= last.openness && now.openness >= 0.2);
            assert!(now.pinch <= last.pinch && now.pinch >= 0.0);
            last = now;
        }
        assert!(close(last.openness, 0.2, 1e-3));
        assert!(close(last.pinch, 0.0, 1e-3));
    }

    #[test]
    fn idle_openness_rises_toward_baseline_from_below() {
        let mut s = TemporalSmoother::default();
        let absent = GestureSample::default();
        let mut last = 0.0;
        for _ in 0..100 {
            let now = s.update(&absent, DT).openness;
            assert!(now >= last && now <= 0.2);
            last = now;
        }
    }

    #[test]
    fn velocity_zero_when_smoothed_xy_unchanged() {
        let mut s = TemporalSmoother::default();
        let still = hand(0.0, 0.0, 0.5, 0.0);
        for _ in 0..5 {
            assert_eq!(s.update(&still, DT).velocity, 0.0);
        }
    }

    #[test]
    fn velocity_tracks_smoothed_step() {
        let mut s = TemporalSmoother::default();
        let v = s.update(&hand(1.0, 0.0, 0.0, 0.0), DT).velocity;
        // first step: smoothed x moves 0 → 0.15
        assert!(close(v, 1.5, 1e-3), "v = {}", v);
    }

    #[test]
    fn end_to_end_twenty_ticks() {
        let mut s = TemporalSmoother::default();
        let target = hand(1.0, 0.0, 0.9, 0.0);
        let mut prev_v = f32::INFINITY;
        for _ in 0..20 {
            let st = *s.update(&target, DT);
            assert!(st.active);
            assert!(st.velocity >= 0.0 && st.velocity < prev_v);
            prev_v = st.velocity;
        }
        assert!(close(s.state().x, 1.0 - 0.85f32.powi(20), 1e-4));
        assert!(close(s.state().x, 0.9612, 1e-3));
    }

    #[test]
    fn frame_rate_independent() {
        let target = hand(1.0, 0.5, 1.0, 1.0);
        let mut fast = TemporalSmoother::default();
        let mut slow = TemporalSmoother::default();
        for _ in 0..120 { fast.update(&target, DT / 2.0); }
        for _ in 0..60  { slow.update(&target, DT); }
        assert!(close(fast.state().x, slow.state().x, 1e-3));
        assert!(close(fast.state().pinch, slow.state().pinch, 1e-3));
    }

    #[test]
    fn outputs_stay_in_unit_range() {
        let mut s = TemporalSmoother::default();
        let wild = hand(3.0, -3.0, 1.0, 1.0);
        for _ in 0..500 {
            let st = s.update(&wild, 0.25);
            assert!((0.0..=1.0).contains(&st.openness));
            assert!((0.0..=1.0).contains(&st.pinch));
            assert!(st.velocity >= 0.0);
        }
    }

    #[test]
    fn reset_returns_to_neutral() {
        let mut s = TemporalSmoother::default();
        s.update(&hand(1.0, 1.0, 1.0, 1.0), DT);
        s.reset();
        assert_eq!(*s.state(), GestureState::default());
    }

    #[test]
    fn config_validation() {
        assert!(SmootherConfig::default().validate().is_ok());
        let bad = SmootherConfig { pinch_rate: Rate::per_tick(1.5), ..Default::default() };
        assert!(bad.validate().is_err());
        let bad = SmootherConfig { idle_openness: -0.1, ..Default::default() };
        assert!(bad.validate().is_err());
    }
}
