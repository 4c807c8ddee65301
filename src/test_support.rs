//! In-process fakes for the provider seams

use crate::availability::AvailabilitySource;
use crate::http::{QueryParams, RequestError};
use crate::media::MediaKind;
use crate::metadata_retrieval::{MetadataRetrievalError, MetadataSource};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;
use std::time::Duration;

type MetadataHandler =
    dyn Fn(&str, &QueryParams) -> Result<Value, MetadataRetrievalError> + Send + Sync;

/// Metadata source answering from a closure and recording every call
pub(crate) struct FakeMetadata {
    handler: Box<MetadataHandler>,
    calls: Mutex<Vec<(String, QueryParams)>>,
}

impl FakeMetadata {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&str, &QueryParams) -> Result<Value, MetadataRetrievalError> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<(String, QueryParams)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetadataSource for FakeMetadata {
    async fn fetch(
        &self,
        path: &str,
        params: &QueryParams,
    ) -> Result<Value, MetadataRetrievalError> {
        self.calls
            .lock()
            .unwrap()
            .push((path.to_string(), params.clone()));
        (self.handler)(path, params)
    }
}

type AvailabilityHandler =
    dyn Fn(MediaKind, &QueryParams) -> (Duration, Result<Value, RequestError>) + Send + Sync;

/// Availability source answering from a closure after a per-call delay
///
/// Records the `tmdbid` of every lookup in completion order.
pub(crate) struct FakeAvailability {
    handler: Box<AvailabilityHandler>,
    completed: Mutex<Vec<String>>,
}

impl FakeAvailability {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(MediaKind, &QueryParams) -> (Duration, Result<Value, RequestError>)
            + Send
            + Sync
            + 'static,
    {
        Self {
            handler: Box::new(handler),
            completed: Mutex::new(Vec::new()),
        }
    }

    /// Answers `{"data": [{"quality": tag}]}` for every id in `tags`, fails otherwise
    pub fn with_tags(tags: &[(u64, &str)]) -> Self {
        let tags: Vec<(String, String)> = tags
            .iter()
            .map(|(id, tag)| (id.to_string(), tag.to_string()))
            .collect();
        Self::new(move |_, params| {
            let id = params.get("tmdbid").unwrap_or_default();
            let result = tags
                .iter()
                .find(|(known, _)| known == id)
                .map(|(_, tag)| Ok(serde_json::json!({"data": [{"quality": tag}]})))
                .unwrap_or_else(|| Err(RequestError::Transport("connection reset".into())));
            (Duration::ZERO, result)
        })
    }

    pub fn completion_order(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }
}

#[async_trait]
impl AvailabilitySource for FakeAvailability {
    async fn fetch(&self, kind: MediaKind, params: &QueryParams) -> Result<Value, RequestError> {
        let (delay, result) = (self.handler)(kind, params);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.completed
            .lock()
            .unwrap()
            .push(params.get("tmdbid").unwrap_or_default().to_string());
        result
    }
}

/// A paged metadata response with movie entries `(id, title)`
pub(crate) fn movie_page(entries: &[(u64, &str)], total_pages: u32) -> Value {
    let results: Vec<Value> = entries
        .iter()
        .map(|(id, title)| serde_json::json!({"id": id, "title": title, "vote_average": 7.5}))
        .collect();
    serde_json::json!({"page": 1, "total_pages": total_pages, "results": results})
}
