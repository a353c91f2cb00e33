//! WebSocket inbound adapter streaming POI telemetry deltas.
//!
//! Every connection receives the deltas published after it upgraded, one JSON
//! text frame per delta. Client frames only count as liveness traffic.

use actix_web::web::{self, Payload};
use actix_web::{HttpRequest, HttpResponse, get};
use tracing::{debug, error};

mod session;

pub mod state;

/// Handle WebSocket upgrade for the telemetry stream.
#[get("/signalk/v1/stream/pois")]
pub async fn telemetry_stream(
    state: web::Data<state::WsState>,
    req: HttpRequest,
    body: Payload,
) -> actix_web::Result<HttpResponse> {
    let (response, session, stream) = actix_ws::handle(&req, body).map_err(|error| {
        error!(error = %error, "WebSocket upgrade failed");
        error
    })?;

    let deltas = state.telemetry.subscribe();
    debug!(
        subscribers = state.telemetry.subscriber_count(),
        "telemetry stream connected"
    );
    actix_web::rt::spawn(session::run_telemetry_session(deltas, session, stream));
    Ok(response)
}
