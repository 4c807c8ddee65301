/// moviesapi.club availability source implementation.
use super::AvailabilitySource;
use crate::config::Config;
use crate::http::{self, QueryParams, RequestError};
use crate::media::MediaKind;
use async_trait::async_trait;
use serde_json::Value;

/// Availability source backed by the moviesapi.club discover endpoint.
///
/// The endpoint needs no credential.
pub(crate) struct MoviesApiSource {
    client: reqwest::Client,
    base_url: String,
}

impl MoviesApiSource {
    pub fn new(config: &Config) -> Result<Self, RequestError> {
        Ok(Self {
            client: http::build_client(config.request_timeout)?,
            base_url: config.availability_base_url.clone(),
        })
    }
}

#[async_trait]
impl AvailabilitySource for MoviesApiSource {
    async fn fetch(&self, kind: MediaKind, params: &QueryParams) -> Result<Value, RequestError> {
        let url = format!("{}/discover/{}", self.base_url, kind);
        http::get_json(&self.client, &url, params).await
    }
}
