//! Shared WebSocket adapter state.

use crate::outbound::telemetry::BroadcastTelemetrySink;

/// Dependency bundle for the telemetry stream.
#[derive(Clone)]
pub struct WsState {
    /// Source of published deltas; each connection subscribes on upgrade.
    pub telemetry: BroadcastTelemetrySink,
}

impl WsState {
    /// Construct state around an existing sink.
    pub fn new(telemetry: BroadcastTelemetrySink) -> Self {
        Self { telemetry }
    }
}
