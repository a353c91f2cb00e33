//! Inbound adapters (HTTP, WebSocket) that translate external requests into
//! domain calls while keeping framework details at the edge.
//!
//! HTTP handlers live under [`http`]; the live telemetry stream lives under
//! [`ws`].

pub mod http;
pub mod ws;
