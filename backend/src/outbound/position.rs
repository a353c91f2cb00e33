//! In-memory position provider fed by the host's navigation data.

use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::domain::Error;
use crate::domain::geo::Position;
use crate::domain::ports::{PositionCommand, PositionProvider};

/// Latest known fix, replaced on every update.
#[derive(Debug, Default)]
pub struct InMemoryPositionProvider {
    latest: RwLock<Option<Position>>,
}

impl InMemoryPositionProvider {
    /// Provider starting from `initial`, or with no fix.
    pub fn new(initial: Option<Position>) -> Self {
        Self {
            latest: RwLock::new(initial),
        }
    }

    /// Replace the current fix.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` when the coordinates are outside WGS84 ranges;
    /// the previous fix is kept.
    pub fn update(&self, position: Position) -> Result<(), Error> {
        if !position.is_valid() {
            return Err(Error::invalid_request(
                "latitude must be within [-90, 90] and longitude within [-180, 180]",
            )
            .with_details(serde_json::json!({
                "latitude": position.latitude,
                "longitude": position.longitude,
            })));
        }
        *self.latest.write().unwrap_or_else(PoisonError::into_inner) = Some(position);
        debug!(
            latitude = position.latitude,
            longitude = position.longitude,
            "position updated"
        );
        Ok(())
    }
}

impl PositionCommand for InMemoryPositionProvider {
    fn update_position(&self, position: Position) -> Result<(), Error> {
        self.update(position)
    }
}

impl PositionProvider for InMemoryPositionProvider {
    fn current_position(&self) -> Option<Position> {
        *self.latest.read().unwrap_or_else(PoisonError::into_inner)
    }
}
