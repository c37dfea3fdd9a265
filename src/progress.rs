//! Human-readable status updates from a running search.
//!
//! Front-ends implement [`ProgressSink`] to surface status to users. Reporting
//! never blocks and never fails the run.

use tokio::sync::mpsc::UnboundedSender;

pub trait ProgressSink: Send + Sync {
    fn report(&self, message: &str);
}

/// Drops every message.
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn report(&self, _message: &str) {}
}

/// Forwards messages into the log at `info`.
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn report(&self, message: &str) {
        tracing::info!(target: "coursefinder::progress", "{message}");
    }
}

/// Fire-and-forget: a receiver that has gone away is ignored.
impl ProgressSink for UnboundedSender<String> {
    fn report(&self, message: &str) {
        let _ = self.send(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn channel_sink_delivers_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.report("first");
        tx.report("second");

        assert_eq!(rx.try_recv().unwrap(), "first");
        assert_eq!(rx.try_recv().unwrap(), "second");
    }

    #[test]
    fn channel_sink_ignores_closed_receiver() {
        let (tx, rx) = mpsc::unbounded_channel::<String>();
        drop(rx);
        tx.report("nobody listening");
    }
}
