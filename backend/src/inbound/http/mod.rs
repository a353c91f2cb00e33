//! HTTP inbound adapter exposing the resource façade, position ingestion and
//! health probes.

pub mod error;
pub mod health;
pub mod position;
pub mod resources;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
