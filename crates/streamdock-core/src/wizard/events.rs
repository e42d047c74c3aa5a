//! Events the controller publishes to the presentation layer and sync engine.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use super::types::{Operation, WizardStep};
use crate::registry::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Cancelled,
    /// A stream was created or attached.
    Completed,
    DocumentClosed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    /// A stream was bound to the document.
    StreamAttached { session: Session },
    ValidationFailed { message: String },
    BusyStateChanged { operation: Operation, busy: bool },
    StepChanged { from: WizardStep, to: WizardStep },
    DialogClosed { reason: CloseReason },
}

impl ControllerEvent {
    fn name(&self) -> &'static str {
        match self {
            ControllerEvent::StreamAttached { .. } => "stream_attached",
            ControllerEvent::ValidationFailed { .. } => "validation_failed",
            ControllerEvent::BusyStateChanged { .. } => "busy_state_changed",
            ControllerEvent::StepChanged { .. } => "step_changed",
            ControllerEvent::DialogClosed { .. } => "dialog_closed",
        }
    }
}

/// Fan-out of controller events to any number of subscribers.
///
/// Subscribers whose receiver was dropped are pruned on the next publish.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Mutex<Vec<Sender<ControllerEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Receiver<ControllerEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    pub fn publish(&self, event: ControllerEvent) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        debug!(
            event = "core.events.published",
            kind = event.name(),
            subscriber_count = subscribers.len()
        );
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live_subscribers(bus: &EventBus) -> usize {
        bus.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[test]
    fn test_every_subscriber_receives_event() {
        let bus = EventBus::new();
        let first = bus.subscribe();
        let second = bus.subscribe();

        bus.publish(ControllerEvent::ValidationFailed {
            message: "name too short".to_string(),
        });

        for rx in [first, second] {
            assert_eq!(
                rx.try_recv().unwrap(),
                ControllerEvent::ValidationFailed {
                    message: "name too short".to_string()
                }
            );
        }
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let bus = EventBus::new();
        let kept = bus.subscribe();
        drop(bus.subscribe());
        assert_eq!(live_subscribers(&bus), 2);

        bus.publish(ControllerEvent::DialogClosed {
            reason: CloseReason::Cancelled,
        });

        assert_eq!(live_subscribers(&bus), 1);
        assert!(kept.try_recv().is_ok());
    }

    #[test]
    fn test_publish_without_subscribers_is_noop() {
        let bus = EventBus::new();
        bus.publish(ControllerEvent::BusyStateChanged {
            operation: Operation::Create,
            busy: true,
        });
        assert_eq!(live_subscribers(&bus), 0);
    }
}
