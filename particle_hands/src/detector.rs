//! Hand detection sources.
//!
//! A [`DetectorSource`] runs on its own thread and publishes interpreted
//! [`GestureSample`]s into a mailbox. The render loop only ever sees the
//! mailbox, so it doesn't care whether samples come from a camera model or
//! from the pointer-driven simulator below.
//!
//! [`GestureSample`]: hand_signal::GestureSample

use std::sync::mpsc::{Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use hand_signal::landmarks::*;
use hand_signal::{sample_mailbox, Interpreter, InterpreterConfig, LandmarkSet, SampleMailbox, SampleSender};

// ════════════════════════════════════════════════════════════════════════════
// DetectorSource trait
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver gesture samples from its own thread.
pub trait DetectorSource: Send + 'static {
    fn run(self: Box<Self>, out: SampleSender);
}

/// Spawn a detector on its own thread and return the render-side mailbox.
pub fn spawn_detector<D: DetectorSource>(source: D) -> SampleMailbox {
    let (tx, mailbox) = sample_mailbox();
    thread::spawn(move || Box::new(source).run(tx));
    mailbox
}

// ════════════════════════════════════════════════════════════════════════════
// SimInput / HandPose
// ════════════════════════════════════════════════════════════════════════════

/// Raw input from the visualizer window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Pointer in image coordinates, `[0, 1]` with `y` down.
    Pointer { x: f32, y: f32 },
    Pinch(bool),
    ToggleOpen,
    ToggleVisible,
    Quit,
}

/// What the simulated hand is doing right now.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandPose {
    pub x:        f32,
    pub y:        f32,
    pub open:     bool,
    pub pinching: bool,
    pub visible:  bool,
}

impl Default for HandPose {
    fn default() -> Self {
        HandPose { x: 0.5, y: 0.5, open: true, pinching: false, visible: true }
    }
}

impl HandPose {
    pub fn apply(&mut self, input: SimInput) {
        match input {
            SimInput::Pointer { x, y } => {
                self.x = x;
                self.y = y;
            }
            SimInput::Pinch(down) => self.pinching = down,
            SimInput::ToggleOpen => {
                self.open = !self.open;
                debug!(open = self.open, "sim hand openness toggled");
            }
            SimInput::ToggleVisible => {
                self.visible = !self.visible;
                debug!(visible = self.visible, "sim hand visibility toggled");
            }
            SimInput::Quit => {}
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Synthetic landmarks
// ════════════════════════════════════════════════════════════════════════════

/// Fingertip reach for an open hand (reads as openness 1).
pub const OPEN_REACH:   f32 = 0.35;
/// Fingertip reach for a loose fist (reads as openness ≈ 0.08).
pub const CLOSED_REACH: f32 = 0.12;

/// Finger fan angles (radians from straight up), index → pinky.
const FAN: [f32; 4] = [-0.3, -0.1, 0.1, 0.3];

/// Build a plausible 21-point hand for `pose`, flattened as `[x, y, z, …]`
/// the way a detector hands it over.
///
/// The palm center (mean of wrist, index base, pinky base) sits exactly at
/// the pose position.
pub fn synthesize_flat(pose: &HandPose) -> Vec<f32> {
    let lerp = |a: Landmark, b: Landmark, t: f32| Landmark::new(
        a.x + (b.x - a.x) * t,
        a.y + (b.y - a.y) * t,
        a.z + (b.z - a.z) * t,
    );

    let (px, py) = (pose.x, pose.y);
    let reach = if pose.open { OPEN_REACH } else { CLOSED_REACH };

    let mut pts = [Landmark::default(); LANDMARK_COUNT];
    pts[WRIST]     = Landmark::new(px,        py + 0.08, 0.0);
    pts[INDEX_MCP] = Landmark::new(px - 0.03, py - 0.04, -0.01);
    pts[PINKY_MCP] = Landmark::new(px + 0.03, py - 0.04, -0.01);
    pts[MIDDLE_MCP] = lerp(pts[INDEX_MCP], pts[PINKY_MCP], 1.0 / 3.0);
    pts[RING_MCP]   = lerp(pts[INDEX_MCP], pts[PINKY_MCP], 2.0 / 3.0);

    let wrist = pts[WRIST];
    let fingers = [
        (INDEX_MCP,  INDEX_PIP,  INDEX_DIP,  INDEX_TIP),
        (MIDDLE_MCP, MIDDLE_PIP, MIDDLE_DIP, MIDDLE_TIP),
        (RING_MCP,   RING_PIP,   RING_DIP,   RING_TIP),
        (PINKY_MCP,  PINKY_PIP,  PINKY_DIP,  PINKY_TIP),
    ];
    for (&(mcp, pip, dip, tip), angle) in fingers.iter().zip(FAN) {
        pts[tip] = Landmark::new(
            wrist.x + reach * angle.sin(),
            wrist.y - reach * angle.cos(),
            -0.02,
        );
        pts[pip] = lerp(pts[mcp], pts[tip], 1.0 / 3.0);
        pts[dip] = lerp(pts[mcp], pts[tip], 2.0 / 3.0);
    }

    let index_tip = pts[INDEX_TIP];
    pts[THUMB_TIP] = if pose.pinching {
        index_tip
    } else {
        Landmark::new(index_tip.x - 0.12, index_tip.y + 0.04, -0.02)
    };
    pts[THUMB_CMC] = lerp(wrist, pts[THUMB_TIP], 0.25);
    pts[THUMB_MCP] = lerp(wrist, pts[THUMB_TIP], 0.5);
    pts[THUMB_IP]  = lerp(wrist, pts[THUMB_TIP], 0.75);

    pts.iter().flat_map(|p| [p.x, p.y, p.z]).collect()
}

// ════════════════════════════════════════════════════════════════════════════
// SimDetector
// ════════════════════════════════════════════════════════════════════════════

/// Detector driven by [`SimInput`] events from the visualizer window.
///
/// Runs at its own cadence (usually slower than rendering) and reports "no
/// hand" while the simulated hand is hidden.
pub struct SimDetector {
    rx:          Receiver<SimInput>,
    interpreter: Interpreter,
    period:      Duration,
}

impl SimDetector {
    pub fn new(rx: Receiver<SimInput>, config: InterpreterConfig, detector_hz: f32) -> Self {
        SimDetector {
            rx,
            interpreter: Interpreter::new(config),
            period: Duration::from_secs_f32(1.0 / detector_hz),
        }
    }

    /// One detection for `pose`. A malformed landmark buffer drops the
    /// detection rather than producing a sample.
    pub fn detect(&mut self, pose: &HandPose) -> Option<hand_signal::GestureSample> {
        if !pose.visible {
            return Some(self.interpreter.observe(None));
        }
        match LandmarkSet::from_flat(&synthesize_flat(pose)) {
            Ok(hand) => Some(self.interpreter.observe(Some(&hand))),
            Err(e) => {
                warn!("dropping detection: {}", e);
                None
            }
        }
    }
}

impl DetectorSource for SimDetector {
    fn run(mut self: Box<Self>, out: SampleSender) {
        info!(period_ms = self.period.as_millis() as u64, "sim detector started");
        let mut pose = HandPose::default();
        loop {
            loop {
                match self.rx.try_recv() {
                    Ok(SimInput::Quit) | Err(TryRecvError::Disconnected) => {
                        info!("sim detector stopping");
                        return;
                    }
                    Ok(input) => pose.apply(input),
                    Err(TryRecvError::Empty) => break,
                }
            }

            if let Some(sample) = self.detect(&pose) {
                if !out.publish(sample) { return; }
            }
            thread::sleep(self.period);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
