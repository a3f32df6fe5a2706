use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Point-in-time status snapshot. Steps are emitted in strictly increasing
/// order: one per document, then a final step at `document count` while the
/// output is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub step: usize,
    pub status: String,
}

/// Terminal outcome of a combination run. Produced exactly once, after the
/// last progress event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunReport {
    Succeeded {
        files_combined: usize,
        message: String,
    },
    Cancelled {
        message: String,
    },
    Failed {
        message: String,
    },
}

impl RunReport {
    pub fn message(&self) -> &str {
        match self {
            RunReport::Succeeded { message, .. }
            | RunReport::Cancelled { message }
            | RunReport::Failed { message } => message,
        }
    }
}

/// Push interface for progress delivery. The engine does not care about the
/// transport; any closure works, including one that forwards into a channel
/// sender. A sink must never abort the run, so channel-backed sinks should
/// discard send errors from a disconnected consumer.
pub trait ProgressSink {
    fn emit(&self, event: ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: Fn(ProgressEvent),
{
    fn emit(&self, event: ProgressEvent) {
        self(event);
    }
}

/// Cooperative cancellation flag, set at most once from outside the engine's
/// thread and observed only at document boundaries. An in-progress document
/// is always copied in full or not started.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_observes_cancel_across_clones() {
        let token = CancellationToken::new();
        let observer = token.clone();
        assert!(!observer.is_cancelled());
        token.cancel();
        assert!(observer.is_cancelled());
    }

    #[test]
    fn closure_sink_forwards_into_a_channel() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let sink = move |event: ProgressEvent| {
            let _ = tx.send(event);
        };
        sink.emit(ProgressEvent {
            step: 2,
            status: "Processing".to_string(),
        });
        let event = rx.try_recv().unwrap();
        assert_eq!(event.step, 2);
        assert_eq!(event.status, "Processing");
    }
}
