//! # particle_hands
//!
//! Hand-gesture controller for a real-time particle effect, with a
//! simulated landmark detector and a software-rendered visualizer.
//!
//! ## Gesture → effect mapping
//!
//! | Gesture | Effect |
//! |---|---|
//! | Move hand | Attractor follows the palm |
//! | Hand visible / hidden | Attractor fades in / out |
//! | Open fingers | Turbulence rises |
//! | Pinch (thumb to index) | Next mode: Orbital → Vortex → Bloom |
//!
//! ## Threads
//!
//! The detector runs on its own thread at `detector_hz` and publishes whole
//! samples into a [`hand_signal::SampleMailbox`]. The render loop polls the
//! mailbox once per frame and never waits on the detector.
//!
//! ### Simulation controls
//!
//! | Input | Gesture |
//! |---|---|
//! | Mouse position | Palm position |
//! | Left button held | Pinch |
//! | `O` | Toggle open / closed fingers |
//! | `H` | Hide / show the hand |
//! | `Q` / `Escape` | Quit |

pub mod error;
pub mod config;
pub mod detector;
pub mod particles;
pub mod visualizer;
pub mod app;

pub use error::AppError;
pub use config::AppConfig;
