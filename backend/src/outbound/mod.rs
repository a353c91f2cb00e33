//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **active_captain**: reqwest client for the remote POI service
//! - **telemetry**: tokio broadcast sink emitting Signal K style deltas
//! - **position**: in-memory latest-fix store fed by the HTTP adapter
//!
//! Adapters are thin translators between domain types and transport
//! representations. They contain no business logic.

pub mod active_captain;
pub mod position;
pub mod telemetry;
