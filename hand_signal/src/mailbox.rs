//! Single-slot handoff from the detector thread to the render tick.
//!
//! The detector publishes whole [`GestureSample`] values; the render side
//! keeps only the newest one. Samples are `Copy` values moved through a
//! channel, so the render tick can never see a half-written sample and
//! nobody takes a lock.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use tracing::debug;

use crate::interpreter::GestureSample;

/// Create a connected sender/mailbox pair.
pub fn sample_mailbox() -> (SampleSender, SampleMailbox) {
    let (tx, rx) = mpsc::channel();
    (
        SampleSender { tx },
        SampleMailbox { rx, latest: GestureSample::default(), connected: true },
    )
}

// ════════════════════════════════════════════════════════════════════════════
// SampleSender: detector side
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct SampleSender {
    tx: Sender<GestureSample>,
}

impl SampleSender {
    /// Publish a complete sample. Returns `false` once the mailbox is gone,
    /// which is the detector's cue to stop.
    pub fn publish(&self, sample: GestureSample) -> bool {
        self.tx.send(sample).is_ok()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SampleMailbox: render side
// ════════════════════════════════════════════════════════════════════════════

pub struct SampleMailbox {
    rx:        Receiver<GestureSample>,
    latest:    GestureSample,
    connected: bool,
}

impl SampleMailbox {
    /// Newest sample published so far. Never blocks: samples that arrived
    /// since the last call are drained and all but the last are dropped;
    /// with nothing new, the previous sample is returned again.
    pub fn latest(&mut self) -> GestureSample {
        loop {
            match self.rx.try_recv() {
                Ok(sample) => self.latest = sample,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.connected {
                        debug!("detector disconnected; holding last sample");
                        self.connected = false;
                    }
                    break;
                }
            }
        }
        self.latest
    }

    /// Last drained sample, without polling the detector.
    pub fn peek(&self) -> GestureSample { self.latest }

    /// False once every sender has been dropped and the queue drained.
    pub fn is_connected(&self) -> bool { self.connected }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
