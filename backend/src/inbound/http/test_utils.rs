//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use crate::domain::{PoiState, RegistrationToggles, ResourceRegistry};
use crate::inbound::http::state::HttpState;
use crate::outbound::position::InMemoryPositionProvider;

/// HTTP state over `state`, registering collections per `toggles`, with a
/// fresh in-memory position store.
pub fn http_state_for(state: &Arc<PoiState>, toggles: RegistrationToggles) -> HttpState {
    let positions = Arc::new(InMemoryPositionProvider::default());
    HttpState::new(
        Arc::new(ResourceRegistry::from_toggles(toggles, state)),
        positions.clone(),
        positions,
    )
}
