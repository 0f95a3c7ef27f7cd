//! Republishes the classified mode for every platform orientation event.
//!
//! Subscribers see the latest mode and are woken on every event. Events that
//! arrive before a subscriber reads are coalesced into the newest mode.

use tokio::sync::{mpsc, watch};

use crate::classify::{classify, OrientationReading};
use crate::mode::OrientationMode;

#[derive(Debug)]
pub struct OrientationMonitor {
    tx: watch::Sender<OrientationMode>,
}

impl OrientationMonitor {
    pub fn new(initial: &OrientationReading) -> Self {
        let (tx, _rx) = watch::channel(classify(initial));
        Self { tx }
    }

    /// Latest classified mode
    pub fn current(&self) -> OrientationMode {
        *self.tx.borrow()
    }

    /// Receiver holding the latest mode, marked changed on every event even when the mode is the same
    pub fn subscribe(&self) -> watch::Receiver<OrientationMode> {
        self.tx.subscribe()
    }

    /// Classify a reading and publish the result
    pub fn handle_event(&self, reading: &OrientationReading) -> OrientationMode {
        let mode = classify(reading);
        tracing::debug!(?reading, %mode, "Orientation event");
        self.tx.send_replace(mode);
        mode
    }

    /// Pump platform readings until the sending side closes
    pub async fn run(&self, mut readings: mpsc::Receiver<OrientationReading>) {
        while let Some(reading) = readings.recv().await {
            self.handle_event(&reading);
        }
        tracing::debug!("Orientation source closed");
    }
}

impl Default for OrientationMonitor {
    fn default() -> Self {
        Self::new(&OrientationReading::Unavailable)
    }
}
