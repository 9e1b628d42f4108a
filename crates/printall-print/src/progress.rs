// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Progress reporting from the pipeline worker to whoever is watching.
//
// The worker owns the sending half of an unbounded channel and never waits
// on the receiver. If the receiver is gone, events are dropped; the tracing
// record of each line remains.

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::pipeline::PipelineStage;

/// One message from the pipeline to its observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// The pipeline entered a new stage.
    Stage(PipelineStage),
    /// A human-readable log line.
    Line(String),
}

/// Sending side of the progress channel.
#[derive(Debug, Clone)]
pub struct Progress {
    sender: Option<mpsc::UnboundedSender<ProgressEvent>>,
}

impl Progress {
    /// Create a connected sender/receiver pair.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { sender: Some(tx) }, rx)
    }

    /// A reporter that only logs.
    pub fn silent() -> Self {
        Self { sender: None }
    }

    pub fn stage(&self, stage: PipelineStage) {
        info!(?stage, "Pipeline stage");
        self.send(ProgressEvent::Stage(stage));
    }

    pub fn line(&self, message: impl Into<String>) {
        let message = message.into();
        info!("{message}");
        self.send(ProgressEvent::Line(message));
    }

    /// A line describing something that went wrong for one file.
    pub fn warn(&self, message: impl Into<String>) {
        let message = message.into();
        warn!("{message}");
        self.send(ProgressEvent::Line(message));
    }

    fn send(&self, event: ProgressEvent) {
        if let Some(sender) = &self.sender {
            // The receiver may already be gone.
            let _ = sender.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_arrive_in_order() {
        let (progress, mut rx) = Progress::channel();
        progress.stage(PipelineStage::Scanning);
        progress.line("found 3 files");
        progress.warn("a.pdf: unreadable");

        assert_eq!(rx.try_recv().unwrap(), ProgressEvent::Stage(PipelineStage::Scanning));
        assert_eq!(rx.try_recv().unwrap(), ProgressEvent::Line("found 3 files".into()));
        assert_eq!(rx.try_recv().unwrap(), ProgressEvent::Line("a.pdf: unreadable".into()));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dropped_receiver_does_not_disturb_the_sender() {
        let (progress, rx) = Progress::channel();
        drop(rx);
        progress.line("nobody is listening");
        Progress::silent().line("nor here");
    }
}
