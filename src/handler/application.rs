//! Built-in handler for application command reports.
//!
//! Decodes the report payload into an [`ApplicationEvent`], runs it through
//! the per-node dedup filter, and forwards fresh events to the sink. Stale
//! repeats are dropped without a trace at default log levels.

use tracing::{debug, trace, warn};

use super::registry::FrameHandler;
use crate::dedup::DedupFilter;
use crate::notify::Notifier;
use crate::protocol::{ApplicationEvent, DataFrame};

/// Destination for accepted application events.
///
/// The production sink is [`Notifier`]; tests substitute a recorder.
pub trait EventSink: Send {
    /// Deliver one accepted event.
    fn deliver(&mut self, event: &ApplicationEvent);
}

impl EventSink for Notifier {
    fn deliver(&mut self, event: &ApplicationEvent) {
        self.notify(event);
    }
}

/// Handler wired to the application-command-handler command name.
pub struct ApplicationEventHandler<S> {
    dedup: DedupFilter,
    sink: S,
}

impl<S: EventSink> ApplicationEventHandler<S> {
    /// Create a handler delivering accepted events to `sink`.
    pub fn new(sink: S) -> Self {
        Self {
            dedup: DedupFilter::new(),
            sink,
        }
    }
}

impl<S: EventSink> FrameHandler for ApplicationEventHandler<S> {
    fn on_frame(&mut self, frame: &DataFrame) {
        let event = match ApplicationEvent::from_frame(frame) {
            Some(event) => event,
            None => {
                warn!("application command report with empty payload");
                return;
            }
        };

        if self.dedup.accept(&event) {
            debug!(
                node = event.node,
                sub_node = event.sub_node,
                counter = event.counter,
                "accepted application event"
            );
            self.sink.deliver(&event);
        } else {
            trace!(
                node = event.node,
                counter = event.counter,
                "stale application event dropped"
            );
        }
    }
}
