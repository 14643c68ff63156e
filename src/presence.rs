//! Face-presence signal from an external camera and detector pipeline.
//!
//! Detection results only feed the on-screen status; they are not wired into
//! the expression or gaze loops.

use crate::Result;
use log::{debug, error, info};
use tokio::sync::watch;

/// Latest-value face presence flag
#[derive(Debug)]
pub struct FacePresence {
    sender: watch::Sender<bool>,
}

impl Default for FacePresence {
    fn default() -> Self {
        Self::new()
    }
}

impl FacePresence {
    /// Signal starting with no face detected
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self { sender }
    }

    /// Publish a detection result, logging transitions
    pub fn report(&self, detected: bool) {
        let previous = self.sender.send_replace(detected);
        if previous == detected {
            debug!("Face detection result: {}", detected);
        } else {
            info!("Face presence changed: {}", Self::label_for(detected));
        }
    }

    /// Publish the outcome of one detector pass (number of faces found).
    ///
    /// A detector failure counts as no face.
    pub fn report_detection(&self, result: Result<usize>) {
        match result {
            Ok(faces) => self.report(faces > 0),
            Err(e) => {
                error!("Face detection failed: {}", e);
                self.report(false);
            }
        }
    }

    /// Whether a face is currently visible
    #[must_use]
    pub fn is_detected(&self) -> bool {
        *self.sender.borrow()
    }

    /// Receiver observing every future update
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.sender.subscribe()
    }

    /// Status text for display
    #[must_use]
    pub fn label(&self) -> &'static str {
        Self::label_for(self.is_detected())
    }

    const fn label_for(detected: bool) -> &'static str {
        if detected {
            "Face Detected"
        } else {
            "No Face Detected"
        }
    }
}
