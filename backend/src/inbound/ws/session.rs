//! Per-connection telemetry stream.
//!
//! Pings every 5s and drops clients that stay silent for 10s. Deltas are
//! forwarded as they arrive; a subscriber that falls behind the broadcast
//! buffer skips the missed deltas and carries on.

use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time;
use tracing::{debug, warn};

use crate::outbound::telemetry::TelemetryDelta;

#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

pub(super) async fn run_telemetry_session(
    deltas: broadcast::Receiver<TelemetryDelta>,
    session: Session,
    stream: MessageStream,
) {
    TelemetrySession { deltas }.run(session, stream).await;
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    FeedClosed,
    HeartbeatTimeout,
    Protocol(ProtocolError),
    Network(Closed),
}

struct TelemetrySession {
    deltas: broadcast::Receiver<TelemetryDelta>,
}

impl TelemetrySession {
    async fn run(mut self, mut session: Session, mut stream: MessageStream) {
        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);

        loop {
            let result = tokio::select! {
                _ = heartbeat.tick() => {
                    handle_heartbeat_tick(&mut session, &last_heartbeat).await
                }
                message = stream.recv() => {
                    handle_stream_message(&mut session, &mut last_heartbeat, message).await
                }
                delta = self.deltas.recv() => {
                    forward_delta(&mut session, delta).await
                }
            };

            if let Err(error) = result {
                log_shutdown_reason(&error);
                if let Some(reason) = close_reason_for(error) {
                    if let Err(error) = session.close(reason).await {
                        warn!(error = %error, "Failed to close telemetry stream");
                    }
                }
                return;
            }
        }
    }
}

async fn handle_heartbeat_tick(
    session: &mut Session,
    last_heartbeat: &Instant,
) -> Result<(), SessionError> {
    if Instant::now().duration_since(*last_heartbeat) > CLIENT_TIMEOUT {
        return Err(SessionError::HeartbeatTimeout);
    }
    session.ping(b"").await.map_err(SessionError::Network)
}

async fn handle_stream_message(
    session: &mut Session,
    last_heartbeat: &mut Instant,
    message: Option<Result<Message, ProtocolError>>,
) -> Result<(), SessionError> {
    let Some(message) = message else {
        return Err(SessionError::StreamClosed);
    };

    match message.map_err(SessionError::Protocol)? {
        Message::Ping(payload) => {
            *last_heartbeat = Instant::now();
            session.pong(&payload).await.map_err(SessionError::Network)
        }
        Message::Close(reason) => Err(SessionError::ClientClosed(reason)),
        Message::Text(_)
        | Message::Binary(_)
        | Message::Pong(_)
        | Message::Continuation(_)
        | Message::Nop => {
            *last_heartbeat = Instant::now();
            Ok(())
        }
    }
}

async fn forward_delta(
    session: &mut Session,
    delta: Result<TelemetryDelta, RecvError>,
) -> Result<(), SessionError> {
    match delta {
        Ok(delta) => match encode_delta(&delta) {
            Ok(frame) => session.text(frame).await.map_err(SessionError::Network),
            Err(error) => {
                warn!(error = %error, "Failed to serialise telemetry delta");
                Ok(())
            }
        },
        Err(RecvError::Lagged(skipped)) => {
            warn!(skipped, "Telemetry stream lagged; dropping missed deltas");
            Ok(())
        }
        Err(RecvError::Closed) => Err(SessionError::FeedClosed),
    }
}

fn encode_delta(delta: &TelemetryDelta) -> Result<String, serde_json::Error> {
    serde_json::to_string(delta)
}

fn log_shutdown_reason(error: &SessionError) {
    match error {
        SessionError::HeartbeatTimeout => {
            warn!("Telemetry stream heartbeat timeout; closing connection");
        }
        SessionError::Protocol(error) => {
            warn!(error = %error, "Telemetry stream protocol error");
        }
        SessionError::Network(error) => {
            warn!(error = %error, "Telemetry stream send failed; closing connection");
        }
        SessionError::FeedClosed => debug!("Telemetry feed closed; ending stream"),
        SessionError::ClientClosed(_) | SessionError::StreamClosed => {
            debug!("Telemetry stream client disconnected");
        }
    }
}

fn close_reason_for(error: SessionError) -> Option<Option<CloseReason>> {
    match error {
        SessionError::HeartbeatTimeout => Some(Some(CloseReason {
            code: CloseCode::Normal,
            description: Some("heartbeat timeout".to_owned()),
        })),
        SessionError::Protocol(_) => Some(Some(CloseReason {
            code: CloseCode::Protocol,
            description: Some("protocol error".to_owned()),
        })),
        SessionError::FeedClosed => Some(Some(CloseReason {
            code: CloseCode::Away,
            description: Some("telemetry feed closed".to_owned()),
        })),
        SessionError::ClientClosed(reason) => Some(reason),
        SessionError::StreamClosed | SessionError::Network(_) => None,
    }
}
