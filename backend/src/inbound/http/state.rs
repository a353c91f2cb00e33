//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ResourceRegistry;
use crate::domain::ports::{PositionCommand, PositionProvider};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registered resource collections.
    pub resources: Arc<ResourceRegistry>,
    /// Reads the latest fix.
    pub position_query: Arc<dyn PositionProvider>,
    /// Records new fixes.
    pub position_command: Arc<dyn PositionCommand>,
}

impl HttpState {
    /// Construct state from explicit port implementations.
    pub fn new(
        resources: Arc<ResourceRegistry>,
        position_query: Arc<dyn PositionProvider>,
        position_command: Arc<dyn PositionCommand>,
    ) -> Self {
        Self {
            resources,
            position_query,
            position_command,
        }
    }
}
