//! Landmark interpretation: one detection in, one raw gesture sample out.
//!
//! Everything here is geometry on a single frame; there is no smoothing and
//! no notion of time. See [`crate::smoother`] for that.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::SignalError;
use crate::landmarks::{LandmarkSet, FINGERTIPS, INDEX_TIP, PALM, THUMB_TIP, WRIST};
use crate::rate::unit_clamp;

// ════════════════════════════════════════════════════════════════════════════
// InterpreterConfig
// ════════════════════════════════════════════════════════════════════════════

/// Geometry constants for openness and pinch.
///
/// The defaults assume a hand at a typical webcam distance; they are not
/// derived from anything and should be retuned for other setups.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Mean wrist→fingertip distance read as a closed fist.
    pub openness_min: f32,
    /// Mean wrist→fingertip distance read as a fully open hand.
    pub openness_max: f32,
    /// Thumb-tip to index-tip distance at which pinch reaches 0.
    pub pinch_distance: f32,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            openness_min:   0.1,
            openness_max:   0.35,
            pinch_distance: 0.08,
        }
    }
}

impl InterpreterConfig {
    pub fn validate(&self) -> Result<(), SignalError> {
        if !(self.openness_max > self.openness_min) {
            return Err(SignalError::Config(format!(
                "openness_max ({}) must exceed openness_min ({})",
                self.openness_max, self.openness_min
            )));
        }
        if !(self.pinch_distance > 0.0) {
            return Err(SignalError::Config(format!(
                "pinch_distance must be positive, got {}", self.pinch_distance
            )));
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureSample
// ════════════════════════════════════════════════════════════════════════════

/// Raw, unsmoothed gesture features for one detector frame.
///
/// `x`/`y` are in scene-normalized space (roughly `[-1, 1]`, `y` up).
/// When `active` is false the remaining fields are whatever the last hand
/// produced.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureSample {
    pub x:        f32,
    pub y:        f32,
    pub z:        f32,
    pub openness: f32,
    pub pinch:    f32,
    pub active:   bool,
}

// ════════════════════════════════════════════════════════════════════════════
// Features
// ════════════════════════════════════════════════════════════════════════════

/// Mean of wrist, index base and pinky base in image coordinates.
pub fn palm_center(hand: &LandmarkSet) -> (f32, f32) {
    let (sx, sy) = PALM.iter()
        .fold((0.0, 0.0), |(sx, sy), &i| (sx + hand[i].x, sy + hand[i].y));
    let n = PALM.len() as f32;
    (sx / n, sy / n)
}

/// Image coordinates → scene-normalized, with `y` flipped to point up.
pub fn to_scene(cx: f32, cy: f32) -> (f32, f32) {
    ((cx - 0.5) * 2.0, -(cy - 0.5) * 2.0)
}

/// Mean wrist→fingertip reach rescaled into `[0, 1]`.
pub fn openness(hand: &LandmarkSet, cfg: &InterpreterConfig) -> f32 {
    let wrist = hand[WRIST];
    let reach = FINGERTIPS.iter()
        .map(|&i| wrist.planar_distance(&hand[i]))
        .sum::<f32>() / FINGERTIPS.len() as f32;
    unit_clamp((reach - cfg.openness_min) / (cfg.openness_max - cfg.openness_min))
}

/// 1 when thumb and index tips touch, 0 at `pinch_distance` or beyond.
pub fn pinch(hand: &LandmarkSet, cfg: &InterpreterConfig) -> f32 {
    let gap = hand[THUMB_TIP].planar_distance(&hand[INDEX_TIP]);
    unit_clamp(1.0 - gap / cfg.pinch_distance)
}

/// Interpret one detection.
///
/// `None` means the detector found no hand: the result is `previous` with
/// `active` cleared, so stale features are left for the smoother to decide
/// what to do with.
pub fn interpret(
    frame: Option<&LandmarkSet>,
    previous: &GestureSample,
    cfg: &InterpreterConfig,
) -> GestureSample {
    let Some(hand) = frame else {
        return GestureSample { active: false, ..*previous };
    };

    let (cx, cy) = palm_center(hand);
    let (x, y) = to_scene(cx, cy);

    GestureSample {
        x,
        y,
        z:        hand.wrist().z,
        openness: openness(hand, cfg),
        pinch:    pinch(hand, cfg),
        active:   true,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Interpreter: detector-side wrapper that remembers the last sample
// ════════════════════════════════════════════════════════════════════════════

pub struct Interpreter {
    config: InterpreterConfig,
    last:   GestureSample,
}

impl Interpreter {
    pub fn new(config: InterpreterConfig) -> Self {
        Interpreter { config, last: GestureSample::default() }
    }

    pub fn config(&self) -> &InterpreterConfig { &self.config }

    pub fn last(&self) -> GestureSample { self.last }

    /// Interpret the next detector result and remember it.
    pub fn observe(&mut self, frame: Option<&LandmarkSet>) -> GestureSample {
        let sample = interpret(frame, &self.last, &self.config);
        trace!(
            active = sample.active, x = sample.x, y = sample.y,
            openness = sample.openness, pinch = sample.pinch,
            "interpreted detection"
        );
        self.last = sample;
        sample
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new(InterpreterConfig::default())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{Landmark, LANDMARK_COUNT, INDEX_MCP, PINKY_MCP};

    fn approx(a: f32, b: f32) -> bool { (a - b).abs() < 1e-5 }

    /// Every point at `(x, y)`: fully degenerate, all distances zero.
    fn collapsed(x: f32, y: f32) -> LandmarkSet {
        LandmarkSet::new([Landmark::new(x, y, 0.0); LANDMARK_COUNT])
    }

    /// Fingertips at `reach` from the wrist, thumb `gap` away from index tip.
    fn hand(reach: f32, gap: f32) -> LandmarkSet {
        let mut pts = [Landmark::new(0.5, 0.5, 0.0); LANDMARK_COUNT];
        pts[WRIST] = Landmark::new(0.5, 0.8, -0.02);
        for &tip in FINGERTIPS.iter() {
            pts[tip] = Landmark::new(0.5, 0.8 - reach, 0.0);
        }
        pts[THUMB_TIP] = Landmark::new(0.5 + gap, 0.8 - reach, 0.0);
        LandmarkSet::new(pts)
    }

    #[test]
    fn palm_center_maps_to_scene_with_y_up() {
        let mut pts = [Landmark::default(); LANDMARK_COUNT];
        pts[WRIST]     = Landmark::new(0.9, 0.1, 0.0);
        pts[INDEX_MCP] = Landmark::new(0.9, 0.1, 0.0);
        pts[PINKY_MCP] = Landmark::new(0.9, 0.1, 0.0);
        let s = interpret(Some(&LandmarkSet::new(pts)), &GestureSample::default(), &Default::default());
        assert!(approx(s.x, 0.8));
        assert!(approx(s.y, 0.8));
        assert!(s.active);
    }

    #[test]
    fn depth_is_wrist_z_unmodified() {
        let s = interpret(Some(&hand(0.2, 0.0)), &GestureSample::default(), &Default::default());
        assert!(approx(s.z, -0.02));
    }

    #[test]
    fn openness_rescales_reach() {
        let cfg = InterpreterConfig::default();
        assert!(approx(openness(&hand(0.1, 0.2), &cfg), 0.0));
        assert!(approx(openness(&hand(0.225, 0.2), &cfg), 0.5));
        assert!(approx(openness(&hand(0.35, 0.2), &cfg), 1.0));
        assert!(approx(openness(&hand(0.6, 0.2), &cfg), 1.0));
    }

    #[test]
    fn pinch_is_one_when_tips_coincide() {
        assert!(approx(pinch(&hand(0.3, 0.0), &InterpreterConfig::default()), 1.0));
    }

    #[test]
    fn pinch_is_zero_at_or_beyond_threshold() {
        let cfg = InterpreterConfig::default();
        assert!(approx(pinch(&hand(0.3, 0.08), &cfg), 0.0));
        assert_eq!(pinch(&hand(0.3, 0.5), &cfg), 0.0);
        assert!(approx(pinch(&hand(0.3, 0.04), &cfg), 0.5));
    }

    #[test]
    fn degenerate_hand_stays_in_unit_range() {
        let s = interpret(Some(&collapsed(0.5, 0.5)), &GestureSample::default(), &Default::default());
        assert_eq!(s.openness, 0.0);
        assert_eq!(s.pinch, 1.0);

        let far = collapsed(-40.0, 90.0);
        let s = interpret(Some(&far), &GestureSample::default(), &Default::default());
        assert!((0.0..=1.0).contains(&s.openness));
        assert!((0.0..=1.0).contains(&s.pinch));
    }

    #[test]
    fn absence_keeps_previous_features() {
        let prev = GestureSample { x: 0.3, y: -0.2, z: 0.1, openness: 0.7, pinch: 0.4, active: true };
        let s = interpret(None, &prev, &Default::default());
        assert!(!s.active);
        assert_eq!(GestureSample { active: true, ..s }, prev);
    }

    #[test]
    fn interpreter_remembers_last_hand_through_absence() {
        let mut it = Interpreter::default();
        let seen = it.observe(Some(&hand(0.35, 0.0)));
        let gone = it.observe(None);
        assert!(!gone.active);
        assert_eq!(gone.openness, seen.openness);
        assert_eq!(gone.x, seen.x);
    }

    #[test]
    fn config_validation() {
        assert!(InterpreterConfig::default().validate().is_ok());
        let bad = InterpreterConfig { openness_min: 0.4, ..Default::default() };
        assert!(bad.validate().is_err());
        let bad = InterpreterConfig { pinch_distance: 0.0, ..Default::default() };
        assert!(bad.validate().is_err());
    }
}
