//! Top-level application loop.
//!
//! `AppState` owns the render side of the pipeline: the sample mailbox,
//! the temporal smoother, the particle controller and the particle field.
//! One [`AppState::tick`] per rendered frame moves all of them forward by
//! the same `dt`.

use std::sync::mpsc;
use std::time::Instant;

use tracing::info;

use hand_signal::{GestureState, SampleMailbox, TemporalSmoother, Timing};
use particle_control::{ControlState, Mode, ParticleController};

use crate::config::AppConfig;
use crate::detector::{spawn_detector, SimDetector, SimInput};
use crate::error::AppError;
use crate::particles::ParticleField;
use crate::visualizer::Visualizer;

/// Fixed seed so every run starts from the same cloud.
const FIELD_SEED: u64 = 0x5EED_F1E1D;

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    mailbox:    SampleMailbox,
    timing:     Timing,
    smoother:   TemporalSmoother,
    controller: ParticleController,
    field:      ParticleField,

    pub status: String,
}

impl AppState {
    pub fn new(cfg: &AppConfig, mailbox: SampleMailbox) -> Self {
        let count = cfg.view.particle_count();
        AppState {
            mailbox,
            timing:     cfg.timing,
            smoother:   TemporalSmoother::new(cfg.smoother.clone(), cfg.timing),
            controller: ParticleController::new(cfg.control.clone(), cfg.timing),
            field:      ParticleField::new(count, FIELD_SEED),
            status:     format!("Ready  {} particles  mode {}", count, Mode::default().name()),
        }
    }

    /// Advance one frame of `dt` seconds. Returns the new mode when a pinch
    /// switched it this frame.
    pub fn tick(&mut self, dt: f32) -> Option<Mode> {
        let dt = self.timing.clamp_dt(dt);
        let sample = self.mailbox.latest();
        let gesture = *self.smoother.update(&sample, dt);
        let switched = self.controller.update(&gesture, dt);
        self.field.step(self.controller.state(), dt);

        if let Some(mode) = switched {
            self.status = format!("Pinch  mode {}", mode.name());
        } else if !self.mailbox.is_connected() {
            self.status = "Detector stopped".to_string();
        }
        switched
    }

    // ── Accessors for the render loop ─────────────────────────────────────

    pub fn gesture(&self) -> &GestureState { self.smoother.state() }
    pub fn control(&self) -> &ControlState { self.controller.state() }
    pub fn field(&self)   -> &ParticleField { &self.field }
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application: simulated detector thread, visualizer window
/// and the per-frame smoothing/control/particle update.
pub fn run(cfg: AppConfig) -> Result<(), AppError> {
    cfg.validate()?;

    // ── Sim detector (runs on its own thread, publishes into a mailbox) ──
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    let mailbox = spawn_detector(SimDetector::new(
        sim_rx,
        cfg.interpreter.clone(),
        cfg.view.detector_hz,
    ));

    // ── Visualizer (owns the window and the sim input sender) ────────────
    let mut vis = Visualizer::new(cfg.view.width, cfg.view.height, sim_tx)?;

    let mut app = AppState::new(&cfg, mailbox);
    info!(
        particles = app.field().len(),
        detector_hz = cfg.view.detector_hz,
        "particle_hands running"
    );

    // ── Main loop ─────────────────────────────────────────────────────────
    let mut last = Instant::now();
    while vis.is_open() {
        if !vis.poll_input() { break; }

        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32();
        last = now;

        app.tick(dt);
        vis.render(app.field(), app.gesture(), app.control(), &app.status)?;
    }

    info!("window closed");
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
