//! Generation statistics.
//!
//! Generation runs on blocking threads and must never wait on analytics, so
//! events go through an unbounded channel to a collector task that owns the
//! aggregation.

use crate::protocol::VariantStats;
use dashmap::DashMap;
use mapgen_core::{EventSink, GenerationEvent, GenerationOutcome, Variant};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Event sink that forwards to the collector task
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<GenerationEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<GenerationEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl EventSink for ChannelSink {
    fn record(&self, event: GenerationEvent) {
        // The collector only goes away at shutdown
        let _ = self.sender.send(event);
    }
}

/// Counters per variant.
#[derive(Debug, Default)]
pub struct GenerationStats {
    variants: DashMap<Variant, VariantStats>,
    unrecognized_codes: AtomicU64,
}

impl GenerationStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: &GenerationEvent) {
        let Some(variant) = event.variant else {
            self.unrecognized_codes.fetch_add(1, Ordering::Relaxed);
            return;
        };
        let mut entry = self.variants.entry(variant).or_insert_with(|| VariantStats {
            variant,
            ..Default::default()
        });

        match event.outcome {
            GenerationOutcome::Generated => {
                entry.generated += 1;
                entry.total_attempts += u64::from(event.attempts);
            }
            GenerationOutcome::Exhausted => {
                entry.exhausted += 1;
                entry.total_attempts += u64::from(event.attempts);
            }
            GenerationOutcome::Decoded => entry.decoded += 1,
            GenerationOutcome::DecodeFailed => entry.decode_failures += 1,
        }
    }

    /// Decode requests whose code length matched no variant
    pub fn unrecognized_codes(&self) -> u64 {
        self.unrecognized_codes.load(Ordering::Relaxed)
    }

    /// Counters for every variant, in variant order
    pub fn snapshot(&self) -> Vec<VariantStats> {
        Variant::ALL
            .into_iter()
            .map(|variant| {
                self.variants
                    .get(&variant)
                    .map(|stats| stats.value().clone())
                    .unwrap_or(VariantStats {
                        variant,
                        ..Default::default()
                    })
            })
            .collect()
    }
}

/// Spawn the task that drains `events` into `stats`.
///
/// The task ends once every sender has been dropped.
pub fn spawn_stats_collector(
    mut events: mpsc::UnboundedReceiver<GenerationEvent>,
    stats: Arc<GenerationStats>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            debug!(
                variant = ?event.variant,
                outcome = ?event.outcome,
                attempts = event.attempts,
                elapsed = ?event.elapsed,
                "generation event"
            );
            stats.record(&event);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn event(variant: Variant, outcome: GenerationOutcome, attempts: u32) -> GenerationEvent {
        GenerationEvent {
            variant: Some(variant),
            outcome,
            attempts,
            elapsed: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_record_and_snapshot() {
        let stats = GenerationStats::new();
        stats.record(&event(Variant::Normal, GenerationOutcome::Generated, 40));
        stats.record(&event(Variant::Normal, GenerationOutcome::Generated, 60));
        stats.record(&event(Variant::Large, GenerationOutcome::Exhausted, 5000));
        stats.record(&event(Variant::Large, GenerationOutcome::DecodeFailed, 0));

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].variant, Variant::Normal);
        assert_eq!(snapshot[0].generated, 2);
        assert_eq!(snapshot[0].average_attempts(), Some(50));
        assert_eq!(snapshot[1].exhausted, 1);
        assert_eq!(snapshot[1].decode_failures, 1);
        assert_eq!(snapshot[1].total_attempts, 5000);
    }

    #[test]
    fn test_unrecognized_codes_are_counted_apart() {
        let stats = GenerationStats::new();
        stats.record(&GenerationEvent {
            variant: None,
            outcome: GenerationOutcome::DecodeFailed,
            attempts: 0,
            elapsed: Duration::from_micros(5),
        });

        assert_eq!(stats.unrecognized_codes(), 1);
        assert!(stats.snapshot().iter().all(|s| s.decode_failures == 0));
    }

    #[test]
    fn test_empty_snapshot_lists_every_variant() {
        let snapshot = GenerationStats::new().snapshot();
        assert_eq!(snapshot.len(), Variant::ALL.len());
        assert!(snapshot.iter().all(|s| s.generated == 0));
    }

    #[tokio::test]
    async fn test_collector_drains_channel() {
        let (sink, events) = ChannelSink::new();
        let stats = Arc::new(GenerationStats::new());
        let collector = spawn_stats_collector(events, Arc::clone(&stats));

        sink.record(event(Variant::Normal, GenerationOutcome::Decoded, 0));
        sink.record(event(Variant::Normal, GenerationOutcome::Generated, 7));
        drop(sink);
        collector.await.unwrap();

        let normal = &stats.snapshot()[0];
        assert_eq!(normal.decoded, 1);
        assert_eq!(normal.generated, 1);
        assert_eq!(normal.total_attempts, 7);
    }
}
