//! # hand_signal
//!
//! Turns a noisy, intermittent stream of 21-point hand detections into a
//! temporally stable gesture state.
//!
//! ## Signal path
//!
//! ```text
//! detector thread                         render thread (once per tick)
//! ───────────────                         ─────────────────────────────
//! LandmarkSet ─▶ Interpreter ─▶ SampleSender ══▶ SampleMailbox ─▶ TemporalSmoother ─▶ GestureState
//!     (or none)     (pure)         (whole-value publish)  (last value wins)   (time-scaled easing)
//! ```
//!
//! | Module | Role |
//! |---|---|
//! | [`landmarks`]   | fixed 21-point landmark set and its semantic indices |
//! | [`interpreter`] | palm center, depth, openness and pinch from one landmark set |
//! | [`mailbox`]     | single-slot handoff between the detector and the render tick |
//! | [`smoother`]    | per-channel exponential smoothing, idle fallback, velocity |
//! | [`rate`]        | legacy per-tick blend factors → `1 - exp(-dt/τ)` |
//!
//! Absence of a hand is never an error: it shows up as `active == false`
//! and the smoother relaxes toward an idle baseline.

pub mod error;
pub mod landmarks;
pub mod interpreter;
pub mod mailbox;
pub mod rate;
pub mod smoother;

pub use error::SignalError;
pub use landmarks::{Landmark, LandmarkSet, LANDMARK_COUNT};
pub use interpreter::{interpret, GestureSample, Interpreter, InterpreterConfig};
pub use mailbox::{sample_mailbox, SampleMailbox, SampleSender};
pub use rate::{ease, unit_clamp, Rate, Timing};
pub use smoother::{GestureState, SmootherConfig, TemporalSmoother};
