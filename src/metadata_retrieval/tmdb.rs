/// TMDB metadata source implementation.
use super::{MetadataRetrievalError, MetadataSource};
use crate::config::Config;
use crate::http::{self, QueryParams, RequestError};
use async_trait::async_trait;
use serde_json::Value;

/// Metadata source for the TMDB v3 API.
///
/// Every request carries the configured API key as the `api_key` query
/// parameter. Without a key no request is ever sent.
pub(crate) struct TmdbSource {
    client: reqwest::Client,
    config: Config,
}

impl TmdbSource {
    /// Creates a new TMDB source from the application configuration.
    pub fn new(config: &Config) -> Result<Self, RequestError> {
        Ok(Self {
            client: http::build_client(config.request_timeout)?,
            config: config.clone(),
        })
    }
}

#[async_trait]
impl MetadataSource for TmdbSource {
    async fn fetch(
        &self,
        path: &str,
        params: &QueryParams,
    ) -> Result<Value, MetadataRetrievalError> {
        let api_key = self.config.require_api_key()?;

        let mut all_params = QueryParams::new().with("api_key", api_key);
        for (key, value) in params.pairs() {
            all_params.push(key, value);
        }

        let url = format!("{}{}", self.config.tmdb_base_url, path);
        Ok(http::get_json(&self.client, &url, &all_params).await?)
    }
}
