//! Particle control state machine: runs once per tick after the smoother.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use hand_signal::{ease, unit_clamp, GestureState, Rate, SignalError, Timing};

use crate::latch::{LatchThresholds, PinchLatch};
use crate::mode::Mode;

// ════════════════════════════════════════════════════════════════════════════
// ControlConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Horizontal stretch from normalized gesture space into the scene.
    pub attractor_scale_x: f32,
    /// Vertical stretch from normalized gesture space into the scene.
    pub attractor_scale_y: f32,
    pub strength_rate:     Rate,
    pub turbulence_rate:   Rate,
    pub mode_rate:         Rate,
    pub latch:             LatchThresholds,
}

impl Default for ControlConfig {
    fn default() -> Self {
        ControlConfig {
            attractor_scale_x: 4.0,
            attractor_scale_y: 2.0,
            strength_rate:     Rate::per_tick(0.1),
            turbulence_rate:   Rate::per_tick(0.1),
            mode_rate:         Rate::per_tick(0.05),
            latch:             LatchThresholds::default(),
        }
    }
}

impl ControlConfig {
    pub fn validate(&self) -> Result<(), SignalError> {
        for (name, rate) in [
            ("strength_rate",   self.strength_rate),
            ("turbulence_rate", self.turbulence_rate),
            ("mode_rate",       self.mode_rate),
        ] {
            if !rate.is_valid() {
                return Err(SignalError::Config(format!(
                    "{} must be in [0, 1], got {}", name, rate.alpha()
                )));
            }
        }
        if !self.attractor_scale_x.is_finite() || !self.attractor_scale_y.is_finite() {
            return Err(SignalError::Config("attractor scale must be finite".to_string()));
        }
        self.latch.validate()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ControlState
// ════════════════════════════════════════════════════════════════════════════

/// Per-tick snapshot handed to the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControlState {
    /// Scene-space point particles are drawn toward.
    pub attractor:          [f32; 3],
    pub attractor_strength: f32,
    pub turbulence:         f32,
    /// Authoritative discrete mode.
    pub mode_target:        Mode,
    /// Continuous value easing toward `mode_target.index()`.
    pub mode_current:       f32,
    /// Seconds of effect time accumulated across ticks.
    pub time:               f32,
}

// ════════════════════════════════════════════════════════════════════════════
// ParticleController
// ════════════════════════════════════════════════════════════════════════════

pub struct ParticleController {
    config: ControlConfig,
    timing: Timing,
    latch:  PinchLatch,
    state:  ControlState,
}

impl ParticleController {
    pub fn new(config: ControlConfig, timing: Timing) -> Self {
        ParticleController {
            config,
            timing,
            latch: PinchLatch::new(),
            state: ControlState::default(),
        }
    }

    pub fn state(&self) -> &ControlState { &self.state }

    pub fn latch(&self) -> &PinchLatch { &self.latch }

    pub fn config(&self) -> &ControlConfig { &self.config }

    /// Advance one tick. Returns the new mode if the pinch latch fired.
    pub fn update(&mut self, gesture: &GestureState, dt: f32) -> Option<Mode> {
        let cfg = &self.config;
        let dt  = self.timing.clamp_dt(dt);
        let s   = &mut self.state;

        s.time += dt;

        s.attractor = [
            gesture.x * cfg.attractor_scale_x,
            gesture.y * cfg.attractor_scale_y,
            0.0,
        ];

        let strength_target = if gesture.active { 1.0 } else { 0.0 };
        s.attractor_strength = unit_clamp(ease(
            s.attractor_strength,
            strength_target,
            self.timing.blend(cfg.strength_rate, dt),
        ));

        s.turbulence = unit_clamp(ease(
            s.turbulence,
            gesture.openness,
            self.timing.blend(cfg.turbulence_rate, dt),
        ));

        let switched = if self.latch.update(gesture.pinch, &cfg.latch) {
            let from = s.mode_target;
            s.mode_target = from.next();
            info!(from = from.name(), to = s.mode_target.name(), "pinch switched mode");
            Some(s.mode_target)
        } else {
            None
        };

        s.mode_current = ease(
            s.mode_current,
            s.mode_target.index() as f32,
            self.timing.blend(cfg.mode_rate, dt),
        );

        debug!(
            strength = s.attractor_strength,
            turbulence = s.turbulence,
            mode = s.mode_current,
            "control tick"
        );
        switched
    }
}

impl Default for ParticleController {
    fn default() -> Self {
        ParticleController::new(ControlConfig::default(), Timing::default())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
