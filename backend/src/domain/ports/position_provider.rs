//! Ports for the vessel's current position: the sync cycle reads it, the
//! host pushes fixes through the command side.

use crate::domain::Error;
use crate::domain::geo::Position;

/// Port for reading the latest position fix (pull API).
#[cfg_attr(test, mockall::automock)]
pub trait PositionProvider: Send + Sync {
    /// Current position, or `None` while there is no fix.
    fn current_position(&self) -> Option<Position>;
}

/// Port through which the host records a new fix.
#[cfg_attr(test, mockall::automock)]
pub trait PositionCommand: Send + Sync {
    /// Replace the current fix.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` when the coordinates are out of range.
    fn update_position(&self, position: Position) -> Result<(), Error>;
}

/// Fixture implementation returning a fixed answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixturePositionProvider {
    /// Position handed to every caller.
    pub position: Option<Position>,
}

impl FixturePositionProvider {
    /// Provider that always reports `position`.
    pub const fn at(position: Position) -> Self {
        Self {
            position: Some(position),
        }
    }
}

impl PositionProvider for FixturePositionProvider {
    fn current_position(&self) -> Option<Position> {
        self.position
    }
}
