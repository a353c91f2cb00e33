//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod poi_source;
mod position_provider;
mod resource_provider;
mod telemetry_sink;

#[cfg(test)]
pub use poi_source::MockPoiSource;
pub use poi_source::{
    DEFAULT_SEARCH_ZOOM_LEVEL, FixturePoiSource, PoiSearchRequest, PoiSource, PoiSourceError,
};
#[cfg(test)]
pub use position_provider::{MockPositionCommand, MockPositionProvider};
pub use position_provider::{FixturePositionProvider, PositionCommand, PositionProvider};
pub use resource_provider::{ResourceListing, ResourceProvider, ResourceQuery};
#[cfg(test)]
pub use telemetry_sink::MockTelemetrySink;
pub use telemetry_sink::{
    FixtureTelemetrySink, POI_TELEMETRY_PREFIX, PoiTelemetryValue, TelemetrySink,
    TelemetrySinkError, TelemetryUpdate,
};
