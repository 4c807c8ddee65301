//! Shared HTTP plumbing for the provider clients
//!
//! Both providers speak JSON over plain GET requests. This module owns the
//! single failure shape they are normalized into and the query parameter
//! bag routes are built from.

use serde_json::Value;
use std::error::Error as _;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// A non-success outcome of a single provider request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The request never produced an HTTP response
    #[error("Request failed: {0}")]
    Transport(String),

    /// The provider answered with a non-2xx status
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The response body was not the JSON we expected
    #[error("Failed to parse API response: {0}")]
    Parse(String),
}

/// Flat, ordered query parameters for a provider route
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter, builder style
    pub fn with(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: &str, value: impl fmt::Display) {
        self.0.push((key.to_string(), value.to_string()));
    }

    /// Returns the first value stored under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Builds the HTTP client shared by every request of one provider
///
/// Without an explicit timeout the transport default applies.
pub(crate) fn build_client(timeout: Option<Duration>) -> Result<reqwest::Client, RequestError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| RequestError::Transport(format!("Failed to create HTTP client: {}", e)))
}

/// Issues a GET request and returns the parsed JSON body
///
/// Non-success responses are turned into [`RequestError::Status`], using the
/// provider's `status_message` field when the error body carries one.
pub(crate) async fn get_json(
    client: &reqwest::Client,
    url: &str,
    params: &QueryParams,
) -> Result<Value, RequestError> {
    debug!(url = %url, "GET");

    let response = client
        .get(url)
        .query(params.pairs())
        .send()
        .await
        .map_err(|e| RequestError::Transport(describe(e)))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.json::<Value>().await.ok();
        return Err(RequestError::Status {
            status: status.as_u16(),
            message: error_message(status.as_u16(), status.canonical_reason(), body.as_ref()),
        });
    }

    response
        .json()
        .await
        .map_err(|e| RequestError::Parse(describe(e)))
}

/// Renders a transport error with its causes but without the request URL
///
/// Request URLs may carry credentials in their query string.
fn describe(error: reqwest::Error) -> String {
    let error = error.without_url();
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Picks the provider's message from an error body, else a generic one
fn error_message(status: u16, reason: Option<&str>, body: Option<&Value>) -> String {
    body.and_then(|b| b.get("status_message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {} {}", status, reason.unwrap_or("Unknown")))
}
