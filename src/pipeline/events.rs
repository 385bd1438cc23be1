//! Pipeline events for streaming UIs.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::Step;
use crate::refine::ChatMessage;

/// Something a UI may want to render as it happens.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// The active step changed.
    StepChanged { from: Step, to: Step },
    /// Cosmetic analysis progress.
    Analysis { percent: u8, status: String },
    /// A progress-log line was appended.
    Progress(String),
    /// A chat message was appended.
    Message(ChatMessage),
    /// The authoritative document was replaced.
    DocumentUpdated,
    /// A mood image finished generating.
    MoodImage(String),
}

/// Optional sending half of the event stream.
///
/// A disconnected sink drops events silently, as does one whose receiver has
/// gone away.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    tx: Option<UnboundedSender<PipelineEvent>>,
}

impl EventSink {
    pub fn new(tx: UnboundedSender<PipelineEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    pub fn emit(&self, event: PipelineEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }
}

/// Create a connected sink and its receiver.
pub fn event_channel() -> (EventSink, UnboundedReceiver<PipelineEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSink::new(tx), rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sink_drops_events() {
        EventSink::default().emit(PipelineEvent::DocumentUpdated);
    }

    #[test]
    fn test_closed_receiver_is_ignored() {
        let (sink, rx) = event_channel();
        drop(rx);
        sink.emit(PipelineEvent::Progress("late".to_string()));
    }

    #[test]
    fn test_events_arrive_in_order() {
        let (sink, mut rx) = event_channel();
        sink.emit(PipelineEvent::Progress("a".to_string()));
        sink.emit(PipelineEvent::Progress("b".to_string()));

        assert_eq!(rx.try_recv().unwrap(), PipelineEvent::Progress("a".to_string()));
        assert_eq!(rx.try_recv().unwrap(), PipelineEvent::Progress("b".to_string()));
    }
}
