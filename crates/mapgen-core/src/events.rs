//! Generation events for analytics.
//!
//! The generator reports what it did through an [`EventSink`]. Sinks must
//! return immediately; anything slow (network, aggregation) belongs on the
//! other side of a channel.

use crate::topology::Variant;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationOutcome {
    /// A valid board was found
    Generated,
    /// The attempt budget ran out
    Exhausted,
    /// A board code was decoded
    Decoded,
    /// A board code was rejected
    DecodeFailed,
}

/// One generation or decode call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationEvent {
    /// `None` when a board code matched no variant
    pub variant: Option<Variant>,
    pub outcome: GenerationOutcome,
    /// Candidate boards drawn; zero for decode calls
    pub attempts: u32,
    pub elapsed: Duration,
}

/// Receiver of generation events
pub trait EventSink: Send + Sync {
    fn record(&self, event: GenerationEvent);
}

/// Sink that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn record(&self, _event: GenerationEvent) {}
}

impl<F> EventSink for F
where
    F: Fn(GenerationEvent) + Send + Sync,
{
    fn record(&self, event: GenerationEvent) {
        self(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    #[test]
    fn test_closure_sink() {
        let seen = Mutex::new(Vec::new());
        let sink = |event: GenerationEvent| seen.lock().unwrap().push(event.outcome);

        sink.record(GenerationEvent {
            variant: Some(Variant::Normal),
            outcome: GenerationOutcome::Generated,
            attempts: 12,
            elapsed: Duration::from_millis(3),
        });
        NoopSink.record(GenerationEvent {
            variant: Some(Variant::Large),
            outcome: GenerationOutcome::Exhausted,
            attempts: 5000,
            elapsed: Duration::from_millis(900),
        });

        assert_eq!(*seen.lock().unwrap(), vec![GenerationOutcome::Generated]);
    }
}
