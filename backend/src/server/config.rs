//! HTTP server configuration object.

use std::net::SocketAddr;

use poi_sync::PoiSyncSettings;

/// Listener configuration for [`super::create_server`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
}

impl ServerConfig {
    /// Configuration binding to `bind_addr`.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self { bind_addr }
    }

    /// Configuration taken from loaded settings.
    #[must_use]
    pub fn from_settings(settings: &PoiSyncSettings) -> Self {
        Self::new(settings.bind_addr())
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
