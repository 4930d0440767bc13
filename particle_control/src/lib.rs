//! # particle_control
//!
//! Maps a smoothed [`hand_signal::GestureState`] onto the parameters a
//! particle effect is driven by.
//!
//! ## Gesture → control mapping
//!
//! | Gesture | Control |
//! |---|---|
//! | Palm position | Attractor target `(x·4, y·2, 0)` |
//! | Hand present / absent | Attractor strength eases toward 1 / 0 |
//! | Openness | Turbulence eases toward openness |
//! | Pinch past 0.8 (armed) | Advance mode Orbital → Vortex → Bloom → Orbital |
//! | Pinch below 0.5 | Re-arm the pinch latch |
//!
//! The discrete [`Mode`] is authoritative; [`ControlState::mode_current`] is
//! a continuous value easing toward it so the renderer can cross-fade
//! between modes instead of snapping.

pub mod mode;
pub mod latch;
pub mod control;

pub use mode::{Mode, MODE_COUNT};
pub use latch::{LatchState, LatchThresholds, PinchLatch};
pub use control::{ControlConfig, ControlState, ParticleController};
