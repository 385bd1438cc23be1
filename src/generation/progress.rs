//! Append-only progress log.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::pipeline::{EventSink, PipelineEvent};

/// Ordered, append-only sequence of status lines.
///
/// Cheap to clone; clones share the same lines. Every append is also
/// forwarded to the event sink so a UI can stream it.
#[derive(Debug, Clone, Default)]
pub struct ProgressLog {
    lines: Arc<Mutex<Vec<String>>>,
    sink: EventSink,
}

impl ProgressLog {
    /// Create a log that forwards lines to `sink`.
    pub fn new(sink: EventSink) -> Self {
        Self { lines: Arc::default(), sink }
    }

    /// Append a line.
    pub fn push(&self, line: impl Into<String>) {
        let line = line.into();
        tracing::info!(line = %line, "Progress");
        self.lines.lock().push(line.clone());
        self.sink.emit(PipelineEvent::Progress(line));
    }

    /// Snapshot of all lines so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Last line, if any.
    pub fn last(&self) -> Option<String> {
        self.lines.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    /// Start a fresh run.
    pub(crate) fn clear(&self) {
        self.lines.lock().clear();
    }
}
