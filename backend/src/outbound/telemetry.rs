//! Broadcast-channel telemetry sink.
//!
//! Every update is wrapped in a Signal K style delta and fanned out to all
//! current subscribers (the WebSocket stream, tests). With no subscribers the
//! delta is dropped.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use crate::domain::ports::{TelemetrySink, TelemetrySinkError, TelemetryUpdate};

/// Context every delta is attributed to.
pub const SELF_CONTEXT: &str = "vessels.self";
/// Source label attached to every delta.
pub const DELTA_SOURCE: &str = "signalk-activecaptain";
/// Deltas buffered per subscriber before the slowest one starts lagging.
pub const DEFAULT_TELEMETRY_CAPACITY: usize = 256;

/// One delta message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryDelta {
    /// Entity the values belong to.
    pub context: String,
    /// Timestamped value groups.
    pub updates: Vec<DeltaUpdate>,
}

/// Values published together from one source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeltaUpdate {
    /// Publishing source.
    #[serde(rename = "$source")]
    pub source: String,
    /// Publication time.
    pub timestamp: DateTime<Utc>,
    /// Path/value pairs.
    pub values: Vec<TelemetryUpdate>,
}

impl TelemetryDelta {
    fn single(update: TelemetryUpdate, timestamp: DateTime<Utc>) -> Self {
        Self {
            context: SELF_CONTEXT.to_owned(),
            updates: vec![DeltaUpdate {
                source: DELTA_SOURCE.to_owned(),
                timestamp,
                values: vec![update],
            }],
        }
    }
}

/// Telemetry sink backed by a tokio broadcast channel.
#[derive(Clone)]
pub struct BroadcastTelemetrySink {
    sender: broadcast::Sender<TelemetryDelta>,
    clock: Arc<dyn Clock>,
}

impl BroadcastTelemetrySink {
    /// Sink buffering up to `capacity` deltas per subscriber.
    pub fn new(capacity: usize, clock: Arc<dyn Clock>) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender, clock }
    }

    /// Receive every delta published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<TelemetryDelta> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[async_trait]
impl TelemetrySink for BroadcastTelemetrySink {
    async fn publish(&self, update: &TelemetryUpdate) -> Result<(), TelemetrySinkError> {
        let delta = TelemetryDelta::single(update.clone(), self.clock.utc());
        if self.sender.send(delta).is_err() {
            debug!(path = %update.path, "no telemetry subscribers; delta dropped");
        }
        Ok(())
    }
}
