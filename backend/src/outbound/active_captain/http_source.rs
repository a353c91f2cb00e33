//! Reqwest-backed ActiveCaptain source adapter.
//!
//! This adapter owns transport details only: endpoint construction, identity
//! headers, timeout and HTTP error mapping, and JSON decoding into domain
//! records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

use super::dto::{DetailResponseDto, SearchBoxRequestDto, SearchBoxResponseDto};
use crate::domain::poi::{PoiDetailRecord, PoiId, PoiSummary};
use crate::domain::ports::{PoiSearchRequest, PoiSource, PoiSourceError};

/// Default points-of-interest API root. Must end with `/`.
pub const DEFAULT_API_BASE_URL: &str =
    "https://activecaptain.garmin.com/community/api/v1/points-of-interest/";
/// Default root of public POI pages.
pub const DEFAULT_POI_PAGE_BASE_URL: &str = "https://activecaptain.garmin.com/en-US/pois/";
/// Default client identity sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Signal K ActiveCaptain Plugin";

const SEARCH_PATH: &str = "bbox";

/// Outbound identity for ActiveCaptain requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveCaptainIdentity {
    /// HTTP user-agent sent to the service.
    pub user_agent: String,
    /// Root of public POI pages, used to build `url`.
    pub poi_page_base_url: String,
}

impl Default for ActiveCaptainIdentity {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            poi_page_base_url: DEFAULT_POI_PAGE_BASE_URL.to_owned(),
        }
    }
}

/// POI source that talks to the ActiveCaptain community API.
pub struct ActiveCaptainHttpSource {
    client: Client,
    base_url: Url,
    identity: ActiveCaptainIdentity,
}

impl ActiveCaptainHttpSource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    /// ```rust,ignore
    /// let source = ActiveCaptainHttpSource::new(base_url, Duration::from_secs(30));
    /// assert!(source.is_ok() || source.is_err());
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::with_identity(base_url, timeout, ActiveCaptainIdentity::default())
    }

    /// Build an adapter with an explicit outbound identity.
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_identity(
        base_url: Url,
        timeout: Duration,
        identity: ActiveCaptainIdentity,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(identity.user_agent.as_str())
            .build()?;
        Ok(Self {
            client,
            base_url,
            identity,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, PoiSourceError> {
        self.base_url.join(path).map_err(|error| {
            PoiSourceError::transport(format!("invalid endpoint for {path}: {error}"))
        })
    }

    /// `<base>/<id>/summary`, with `id` percent-encoded as one segment.
    fn detail_endpoint(&self, id: &PoiId) -> Result<Url, PoiSourceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                PoiSourceError::transport(format!("base url {} cannot hold a path", self.base_url))
            })?
            .pop_if_empty()
            .push(id.as_str())
            .push("summary");
        Ok(url)
    }

    async fn read_success_body(response: reqwest::Response) -> Result<Vec<u8>, PoiSourceError> {
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        ensure_ok(status, body.as_ref())?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl PoiSource for ActiveCaptainHttpSource {
    async fn search_box(
        &self,
        request: &PoiSearchRequest,
    ) -> Result<Vec<PoiSummary>, PoiSourceError> {
        let response = self
            .client
            .post(self.endpoint(SEARCH_PATH)?)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&SearchBoxRequestDto::new(
                &request.bounding_box,
                request.zoom_level,
            ))
            .send()
            .await
            .map_err(map_transport_error)?;

        let body = Self::read_success_body(response).await?;
        parse_summaries(&body)
    }

    async fn fetch_detail(&self, id: &PoiId) -> Result<PoiDetailRecord, PoiSourceError> {
        let response = self
            .client
            .get(self.detail_endpoint(id)?)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let body = Self::read_success_body(response).await?;
        parse_detail(&body, id, &self.identity.poi_page_base_url)
    }
}

fn parse_summaries(body: &[u8]) -> Result<Vec<PoiSummary>, PoiSourceError> {
    let decoded: SearchBoxResponseDto = serde_json::from_slice(body).map_err(|error| {
        PoiSourceError::decode(format!("invalid search JSON payload: {error}"))
    })?;
    Ok(decoded.into_domain_summaries())
}

fn parse_detail(
    body: &[u8],
    id: &PoiId,
    poi_page_base: &str,
) -> Result<PoiDetailRecord, PoiSourceError> {
    let decoded: DetailResponseDto = serde_json::from_slice(body).map_err(|error| {
        PoiSourceError::decode(format!("invalid detail JSON payload: {error}"))
    })?;
    decoded
        .into_domain_record(id, poi_page_base)
        .map_err(PoiSourceError::decode)
}

// Only 200 carries a payload; other 2xx codes are rejections too.
fn ensure_ok(status: StatusCode, body: &[u8]) -> Result<(), PoiSourceError> {
    if status == StatusCode::OK {
        Ok(())
    } else {
        Err(map_status_error(status, body))
    }
}

fn map_transport_error(error: reqwest::Error) -> PoiSourceError {
    if error.is_timeout() {
        PoiSourceError::timeout(error.to_string())
    } else {
        PoiSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> PoiSourceError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {preview}", status.as_u16())
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            PoiSourceError::timeout(message)
        }
        _ => PoiSourceError::rejected(status.as_u16(), message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
