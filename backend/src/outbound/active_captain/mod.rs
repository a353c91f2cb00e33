//! ActiveCaptain outbound adapters.
//!
//! This module provides a reqwest implementation of the `PoiSource` port.

mod dto;
mod http_source;

pub use http_source::{
    ActiveCaptainHttpSource, ActiveCaptainIdentity, DEFAULT_API_BASE_URL, DEFAULT_POI_PAGE_BASE_URL,
    DEFAULT_USER_AGENT,
};
