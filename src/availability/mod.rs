//! Streaming availability lookups
//!
//! The availability provider knows a quality tag (e.g. "HD", "CAM") for
//! titles it can stream, keyed by the metadata provider's identifier. It is
//! a cosmetic dependency: nothing navigational relies on it.

mod moviesapi;

pub(crate) use moviesapi::MoviesApiSource;

use crate::http::{QueryParams, RequestError};
use crate::media::MediaKind;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Trait for sources that can answer raw availability provider requests.
#[async_trait]
pub trait AvailabilitySource: Send + Sync {
    /// Queries the discovery route of one kind.
    async fn fetch(&self, kind: MediaKind, params: &QueryParams) -> Result<Value, RequestError>;
}

/// Envelope of the availability discover route.
#[derive(Debug, Deserialize)]
struct AvailabilityResponse {
    #[serde(default)]
    data: Vec<AvailabilityEntry>,
}

#[derive(Debug, Deserialize)]
struct AvailabilityEntry {
    quality: Option<String>,
}

/// Typed access to the availability provider.
#[derive(Clone)]
pub struct AvailabilityClient {
    source: Arc<dyn AvailabilitySource>,
}

impl AvailabilityClient {
    pub fn new(source: Arc<dyn AvailabilitySource>) -> Self {
        Self { source }
    }

    /// Looks up the quality tag of one title.
    ///
    /// `Ok(None)` means the provider answered but knows no quality for the
    /// title (empty `data` or a blank tag).
    pub async fn quality(&self, kind: MediaKind, id: u64) -> Result<Option<String>, RequestError> {
        let params = QueryParams::new().with("tmdbid", id);
        let value = self.source.fetch(kind, &params).await?;
        let response: AvailabilityResponse =
            serde_json::from_value(value).map_err(|e| RequestError::Parse(e.to_string()))?;

        Ok(response
            .data
            .into_iter()
            .next()
            .and_then(|entry| entry.quality)
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty()))
    }
}
