use crossbeam_channel::{Receiver, Sender, unbounded};

use assess_core::model::{AssessmentId, AttemptId, QuestionId, SubmissionResult};

use super::engine::AttemptState;

/// Push notifications for the presentation layer.
///
/// Everything observable about an attempt is also available by polling the
/// engine's accessors; the stream exists so a UI can react without polling.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptEvent {
    Started {
        attempt_id: AttemptId,
        assessment_id: AssessmentId,
        total_questions: usize,
        duration_seconds: u32,
    },
    StateChanged {
        from: AttemptState,
        to: AttemptState,
    },
    AnswerRecorded {
        question_id: QuestionId,
    },
    CursorMoved {
        index: usize,
    },
    Tick {
        remaining_seconds: u64,
    },
    Expired,
    Submitted {
        result: SubmissionResult,
    },
    Abandoned,
}

/// Fan-out of engine events to any number of subscribers.
///
/// Channels are unbounded so emitting never blocks the single event-processing
/// sequence; subscribers that dropped their receiver are pruned on the next
/// emit.
#[derive(Debug, Default)]
pub(crate) struct EventBus {
    senders: Vec<Sender<AttemptEvent>>,
}

impl EventBus {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn subscribe(&mut self) -> Receiver<AttemptEvent> {
        let (tx, rx) = unbounded();
        self.senders.push(tx);
        rx
    }

    pub(crate) fn emit(&mut self, event: &AttemptEvent) {
        self.senders.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_subscribers_receive_events() {
        let mut bus = EventBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();

        bus.emit(&AttemptEvent::Expired);

        assert_eq!(a.try_recv().unwrap(), AttemptEvent::Expired);
        assert_eq!(b.try_recv().unwrap(), AttemptEvent::Expired);
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut bus = EventBus::new();
        let keep = bus.subscribe();
        drop(bus.subscribe());

        bus.emit(&AttemptEvent::Abandoned);
        bus.emit(&AttemptEvent::Expired);

        assert_eq!(keep.try_recv().unwrap(), AttemptEvent::Abandoned);
        assert_eq!(keep.try_recv().unwrap(), AttemptEvent::Expired);
        assert_eq!(bus.senders.len(), 1);
    }
}
