//! Decoration pipeline
//!
//! Attaches availability quality tags to a page of metadata items. One
//! lookup per item is issued concurrently; every lookup settles on its own
//! and results are zipped back by position, so the output always has the
//! input's length and order.

use crate::availability::AvailabilityClient;
use crate::media::{MediaItem, MediaKind};
use futures::future::join_all;
use tracing::{debug, warn};

/// Settled outcome of one availability lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Tagged(String),
    Untagged,
}

impl Lookup {
    fn into_tag(self) -> Option<String> {
        match self {
            Lookup::Tagged(tag) => Some(tag),
            Lookup::Untagged => None,
        }
    }
}

/// Looks up one item, turning every failure into [`Lookup::Untagged`]
pub async fn lookup(availability: &AvailabilityClient, kind: MediaKind, id: u64) -> Lookup {
    match availability.quality(kind, id).await {
        Ok(Some(tag)) => Lookup::Tagged(tag),
        Ok(None) => Lookup::Untagged,
        Err(e) => {
            warn!(%kind, id, error = %e, "Availability lookup failed");
            Lookup::Untagged
        }
    }
}

/// Decorates a list of items that all share `kind`
///
/// Never fails. Items whose lookup fails or finds nothing keep
/// `quality == None`.
pub async fn decorate(
    availability: &AvailabilityClient,
    kind: MediaKind,
    items: Vec<MediaItem>,
) -> Vec<MediaItem> {
    if items.is_empty() {
        return items;
    }

    let lookups = join_all(items.iter().map(|item| lookup(availability, kind, item.id))).await;
    debug!(%kind, count = items.len(), "Decorated listing");

    items
        .into_iter()
        .zip(lookups)
        .map(|(mut item, lookup)| {
            item.quality = lookup.into_tag();
            item
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::RequestError;
    use crate::test_support::FakeAvailability;
    use proptest::prelude::*;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn items(ids: &[u64]) -> Vec<MediaItem> {
        ids.iter()
            .map(|&id| MediaItem {
                id,
                kind: MediaKind::Movie,
                title: format!("Title {}", id),
                poster_path: None,
                backdrop_path: None,
                rating: None,
                release_date: None,
                overview: None,
                quality: None,
            })
            .collect()
    }

    /// Lookups for item `i` take `delays[i]` ms and tag it with its id
    fn delayed(delays: Vec<u64>, ids: Vec<u64>) -> FakeAvailability {
        FakeAvailability::new(move |_, params| {
            let id: u64 = params.get("tmdbid").unwrap().parse().unwrap();
            let index = ids.iter().position(|&x| x == id).unwrap();
            (
                Duration::from_millis(delays[index]),
                Ok(json!({"data": [{"quality": format!("Q{}", id)}]})),
            )
        })
    }

    proptest! {
        #[test]
        fn test_order_and_length_survive_any_latency(
            lookups in prop::collection::vec((0u64..250, any::<bool>()), 0..16)
        ) {
            let ids: Vec<u64> = (1..=lookups.len() as u64).collect();
            let outcomes = lookups.clone();
            let fake = Arc::new(FakeAvailability::new(move |_, params| {
                let id: u64 = params.get("tmdbid").unwrap().parse().unwrap();
                let (delay, succeeds) = outcomes[(id - 1) as usize];
                let result = if succeeds {
                    Ok(json!({"data": [{"quality": format!("Q{}", id)}]}))
                } else {
                    Err(RequestError::Transport("connection reset".into()))
                };
                (Duration::from_millis(delay), result)
            }));
            let client = AvailabilityClient::new(fake.clone());

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .start_paused(true)
                .build()
                .unwrap();
            let output = runtime.block_on(decorate(&client, MediaKind::Movie, items(&ids)));

            let out_ids: Vec<u64> = output.iter().map(|i| i.id).collect();
            prop_assert_eq!(out_ids, ids);
            for (item, (_, succeeds)) in output.iter().zip(&lookups) {
                let expected = succeeds.then(|| format!("Q{}", item.id));
                prop_assert_eq!(&item.quality, &expected);
            }
            prop_assert_eq!(fake.completion_order().len(), lookups.len());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookups_run_concurrently() {
        let ids = vec![1, 2, 3];
        let fake = Arc::new(delayed(vec![30, 10, 20], ids.clone()));
        let client = AvailabilityClient::new(fake.clone());

        let started = tokio::time::Instant::now();
        decorate(&client, MediaKind::Movie, items(&ids)).await;

        assert!(started.elapsed() < Duration::from_millis(60));
        assert_eq!(fake.completion_order(), vec!["2", "3", "1"]);
    }

    #[tokio::test]
    async fn test_failed_lookup_leaves_item_untagged() {
        let fake = Arc::new(FakeAvailability::with_tags(&[(1, "HD"), (3, "CAM")]));
        let client = AvailabilityClient::new(fake);

        let output = decorate(&client, MediaKind::Movie, items(&[1, 2, 3])).await;

        assert_eq!(output.len(), 3);
        assert_eq!(output[0].quality.as_deref(), Some("HD"));
        assert_eq!(output[1].id, 2);
        assert_eq!(output[1].quality, None);
        assert_eq!(output[2].quality.as_deref(), Some("CAM"));
    }

    #[tokio::test]
    async fn test_all_lookups_failing_still_returns_every_item() {
        let fake = Arc::new(FakeAvailability::new(|_, _| {
            (
                Duration::ZERO,
                Err(RequestError::Status {
                    status: 500,
                    message: "HTTP 500 Internal Server Error".into(),
                }),
            )
        }));
        let client = AvailabilityClient::new(fake);

        let output = decorate(&client, MediaKind::Tv, items(&[7, 8])).await;
        assert_eq!(output, items(&[7, 8]));
    }

    #[tokio::test]
    async fn test_empty_input_issues_no_lookups() {
        let fake = Arc::new(FakeAvailability::with_tags(&[]));
        let client = AvailabilityClient::new(fake.clone());

        assert!(decorate(&client, MediaKind::Movie, Vec::new()).await.is_empty());
        assert!(fake.completion_order().is_empty());
    }
}
