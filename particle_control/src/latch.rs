//! Pinch latch: a two-state hysteresis switch.
//!
//! ```text
//!            pinch > lock_above
//!   Armed ───────────────────────▶ Locked      (fires once: mode advances)
//!     ▲                               │
//!     └───────────────────────────────┘
//!            pinch < release_below
//! ```
//!
//! Values inside `[release_below, lock_above]` never change state, so a
//! pinch hovering around the trigger can't chatter.

use serde::{Deserialize, Serialize};

use hand_signal::SignalError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatchThresholds {
    pub lock_above:    f32,
    pub release_below: f32,
}

impl Default for LatchThresholds {
    fn default() -> Self {
        LatchThresholds { lock_above: 0.8, release_below: 0.5 }
    }
}

impl LatchThresholds {
    pub fn validate(&self) -> Result<(), SignalError> {
        if !(self.release_below < self.lock_above) {
            return Err(SignalError::Config(format!(
                "release_below ({}) must be below lock_above ({})",
                self.release_below, self.lock_above
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LatchState {
    #[default]
    Armed,
    Locked,
}

#[derive(Clone, Debug, Default)]
pub struct PinchLatch {
    state: LatchState,
}

impl PinchLatch {
    pub fn new() -> Self { Self::default() }

    pub fn state(&self) -> LatchState { self.state }

    pub fn is_locked(&self) -> bool { self.state == LatchState::Locked }

    /// Feed one pinch value. Returns `true` exactly on an Armed → Locked
    /// transition.
    pub fn update(&mut self, pinch: f32, thresholds: &LatchThresholds) -> bool {
        match self.state {
            LatchState::Armed if pinch > thresholds.lock_above => {
                self.state = LatchState::Locked;
                true
            }
            LatchState::Locked if pinch < thresholds.release_below => {
                self.state = LatchState::Armed;
                false
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_crossing() {
        let t = LatchThresholds::default();
        let mut l = PinchLatch::new();
        assert!(l.update(0.85, &t));
        assert!(!l.update(0.95, &t));
        assert!(!l.update(0.9, &t));
        assert!(l.is_locked());
    }

    #[test]
    fn band_holds_state() {
        let t = LatchThresholds::default();
        let mut l = PinchLatch::new();
        for p in [0.5, 0.6, 0.8, 0.7, 0.55] {
            assert!(!l.update(p, &t));
            assert_eq!(l.state(), LatchState::Armed);
        }
        l.update(0.81, &t);
        for p in [0.8, 0.5, 0.65] {
            l.update(p, &t);
            assert_eq!(l.state(), LatchState::Locked);
        }
    }

    #[test]
    fn releases_below_lower_threshold() {
        let t = LatchThresholds::default();
        let mut l = PinchLatch::new();
        l.update(0.9, &t);
        assert!(!l.update(0.49, &t));
        assert_eq!(l.state(), LatchState::Armed);
        assert!(l.update(0.9, &t));
    }

    #[test]
    fn thresholds_must_be_ordered() {
        assert!(LatchThresholds::default().validate().is_ok());
        let bad = LatchThresholds { lock_above: 0.4, release_below: 0.5 };
        assert!(bad.validate().is_err());
    }
}
