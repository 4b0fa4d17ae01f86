//! Progress event emission over an mpsc channel.
//!
//! The emitter enforces the event contract consumers rely on: overall
//! percentages never decrease, exactly one terminal event is sent per
//! run, and nothing follows the terminal event.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use siteforge_shared::{ProgressError, ProgressEvent, Stage};
use tokio::sync::mpsc;
use tracing::trace;

/// Emits [`ProgressEvent`]s for one run.
///
/// All methods take `&self` so the emitter can be shared with the
/// generation sub-progress adapter.
pub struct ProgressEmitter {
    tx: mpsc::UnboundedSender<ProgressEvent>,
    last: AtomicU8,
    terminal: AtomicBool,
}

impl ProgressEmitter {
    pub fn new(tx: mpsc::UnboundedSender<ProgressEvent>) -> Self {
        Self {
            tx,
            last: AtomicU8::new(0),
            terminal: AtomicBool::new(false),
        }
    }

    /// Emit a stage-transition event.
    pub fn stage(&self, stage: Stage, progress: u8, message: impl Into<String>) {
        self.emit(ProgressEvent {
            stage,
            progress,
            message: message.into(),
            data: None,
            error: None,
        });
    }

    /// Emit a labeled sub-event within a stage (e.g., one generated
    /// section). Subject to the same monotonic clamp.
    pub fn detail(&self, stage: Stage, progress: u8, message: impl Into<String>) {
        self.stage(stage, progress, message);
    }

    /// Emit the successful terminal event.
    pub fn complete(&self, data: serde_json::Value) {
        self.emit_terminal(ProgressEvent {
            stage: Stage::Complete,
            progress: 100,
            message: "website bundle ready".into(),
            data: Some(data),
            error: None,
        });
    }

    /// Emit the cancelled terminal event. The error payload stays
    /// empty; only the error terminal carries one.
    pub fn cancelled(&self, stage: Stage) {
        self.emit_terminal(ProgressEvent {
            stage: Stage::Cancelled,
            progress: 100,
            message: format!("run cancelled during {}", stage.as_str()),
            data: None,
            error: None,
        });
    }

    /// Emit the failed terminal event. `failed_in` is the stage slug
    /// the run died in, or "run" for whole-run failures like timeouts.
    pub fn error(&self, failed_in: &str, message: impl Into<String>) {
        let message = message.into();
        self.emit_terminal(ProgressEvent {
            stage: Stage::Error,
            progress: 100,
            message: message.clone(),
            data: None,
            error: Some(ProgressError {
                message,
                stage: failed_in.to_string(),
            }),
        });
    }

    fn emit(&self, mut event: ProgressEvent) {
        if self.terminal.load(Ordering::SeqCst) {
            trace!(stage = %event.stage, "dropping event after terminal");
            return;
        }
        // Non-decreasing overall percentage regardless of caller order.
        let prev = self.last.fetch_max(event.progress, Ordering::SeqCst);
        event.progress = event.progress.max(prev);
        // Receiver hang-up just means no one is listening anymore.
        let _ = self.tx.send(event);
    }

    fn emit_terminal(&self, event: ProgressEvent) {
        if self.terminal.swap(true, Ordering::SeqCst) {
            trace!(stage = %event.stage, "suppressing second terminal event");
            return;
        }
        self.last.store(100, Ordering::SeqCst);
        let _ = self.tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> (ProgressEmitter, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ProgressEmitter::new(tx), rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<ProgressEvent>) -> Vec<ProgressEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn percentages_never_decrease() {
        let (emitter, mut rx) = channel();
        emitter.stage(Stage::Planning, 20, "planning");
        emitter.stage(Stage::Generating, 50, "generating");
        // A late, lower-numbered event is clamped up, not emitted lower.
        emitter.stage(Stage::Generating, 40, "straggler");
        emitter.stage(Stage::Assembling, 80, "assembling");

        let events = drain(&mut rx);
        let percents: Vec<u8> = events.iter().map(|e| e.progress).collect();
        assert_eq!(percents, vec![20, 50, 50, 80]);
    }

    #[test]
    fn exactly_one_terminal_event() {
        let (emitter, mut rx) = channel();
        emitter.stage(Stage::Scoring, 92, "scoring");
        emitter.complete(serde_json::json!({"pages": 3}));
        emitter.complete(serde_json::json!({"pages": 3}));
        emitter.error("scoring", "too late");

        let events = drain(&mut rx);
        let terminals: Vec<_> = events.iter().filter(|e| e.stage.is_terminal()).collect();
        assert_eq!(terminals.len(), 1);
        assert_eq!(terminals[0].stage, Stage::Complete);
        assert_eq!(terminals[0].progress, 100);
        assert!(terminals[0].data.is_some());
    }

    #[test]
    fn nothing_follows_the_terminal_event() {
        let (emitter, mut rx) = channel();
        emitter.cancelled(Stage::Generating);
        emitter.stage(Stage::Assembling, 80, "should be dropped");

        let events = drain(&mut rx);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].stage, Stage::Cancelled);
        assert!(events[0].error.is_none());
        assert!(events[0].message.contains("generating"));
    }

    #[test]
    fn error_terminal_carries_the_failing_stage() {
        let (emitter, mut rx) = channel();
        emitter.error("assembling", "no pages could be assembled");

        let events = drain(&mut rx);
        assert_eq!(events.len(), 1);
        let error = events[0].error.as_ref().unwrap();
        assert_eq!(error.stage, "assembling");
        assert!(error.message.contains("no pages"));
    }
}
