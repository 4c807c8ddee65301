/// Metadata provider access.
///
/// [`MetadataSource`] is the raw seam: one provider-relative route plus
/// parameters in, parsed JSON out. [`MetadataClient`] layers the typed
/// routes of the catalog on top of it and converts provider JSON into the
/// crate's view models.
mod tmdb;
mod tmdb_types;

pub(crate) use tmdb::TmdbSource;

use crate::config::ConfigurationError;
use crate::discover::DiscoverFilters;
use crate::http::{QueryParams, RequestError};
use crate::media::{Country, Genre, MediaDetails, MediaItem, MediaKind, Page, PersonDetails, Season};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tmdb_types::{
    TmdbCombinedCredits, TmdbCountry, TmdbGenreList, TmdbMedia, TmdbPaged, TmdbPerson, TmdbSeason,
};

/// Errors that can occur during metadata retrieval operations.
#[derive(Debug, Error)]
pub enum MetadataRetrievalError {
    /// The client is not configured to talk to the provider
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The provider request failed
    #[error(transparent)]
    Request(#[from] RequestError),
}

/// Trait for sources that can answer raw metadata provider requests.
///
/// Implementors inject whatever credential the provider needs. The JSON is
/// returned as-is; callers check for the fields they need.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Fetches a provider-relative route.
    ///
    /// # Arguments
    ///
    /// * `path` - Route relative to the provider root, e.g. `/movie/603`
    /// * `params` - Query parameters, URL-encoded by the source
    async fn fetch(&self, path: &str, params: &QueryParams)
    -> Result<Value, MetadataRetrievalError>;
}

/// Typed access to the metadata provider routes the catalog uses.
#[derive(Clone)]
pub struct MetadataClient {
    source: Arc<dyn MetadataSource>,
}

impl MetadataClient {
    pub fn new(source: Arc<dyn MetadataSource>) -> Self {
        Self { source }
    }

    /// Raw access for routes without a typed wrapper.
    pub async fn fetch(
        &self,
        path: &str,
        params: &QueryParams,
    ) -> Result<Value, MetadataRetrievalError> {
        self.source.fetch(path, params).await
    }

    async fn fetch_as<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &QueryParams,
    ) -> Result<T, MetadataRetrievalError> {
        let value = self.source.fetch(path, params).await?;
        serde_json::from_value(value)
            .map_err(|e| RequestError::Parse(format!("{}: {}", path, e)).into())
    }

    /// Fetches one page of a listing route whose entries all share `kind`.
    ///
    /// Pass `None` for mixed listings; entries then need an explicit
    /// `media_type`, and entries that are not movies or series are dropped.
    pub async fn listing(
        &self,
        path: &str,
        params: &QueryParams,
        kind: Option<MediaKind>,
    ) -> Result<Page<MediaItem>, MetadataRetrievalError> {
        let paged: TmdbPaged<TmdbMedia> = self.fetch_as(path, params).await?;
        Ok(Page {
            items: paged
                .results
                .iter()
                .filter_map(|entry| entry.resolve_kind(kind).map(|k| entry.to_item(k)))
                .collect(),
            total_pages: paged.total_pages,
        })
    }

    /// Searches titles of one kind by free text.
    pub async fn search(
        &self,
        kind: MediaKind,
        query: &str,
        page: u32,
    ) -> Result<Page<MediaItem>, MetadataRetrievalError> {
        let params = QueryParams::new().with("query", query).with("page", page);
        self.listing(&format!("/search/{}", kind), &params, Some(kind))
            .await
    }

    /// Lists titles of one kind matching a filter set.
    pub async fn discover(
        &self,
        kind: MediaKind,
        filters: &DiscoverFilters,
        page: u32,
    ) -> Result<Page<MediaItem>, MetadataRetrievalError> {
        self.listing(
            &format!("/discover/{}", kind),
            &filters.to_params(kind, page),
            Some(kind),
        )
        .await
    }

    /// Fetches core details with credits, images, videos and watch
    /// providers appended. Recommendations are fetched separately.
    pub async fn details(
        &self,
        kind: MediaKind,
        id: u64,
        region: &str,
    ) -> Result<MediaDetails, MetadataRetrievalError> {
        let params = QueryParams::new().with(
            "append_to_response",
            "credits,images,videos,watch/providers",
        );
        let media: TmdbMedia = self.fetch_as(&format!("/{}/{}", kind, id), &params).await?;
        Ok(media.into_details(kind, region))
    }

    pub async fn recommendations(
        &self,
        kind: MediaKind,
        id: u64,
    ) -> Result<Vec<MediaItem>, MetadataRetrievalError> {
        let page = self
            .listing(
                &format!("/{}/{}/recommendations", kind, id),
                &QueryParams::new().with("page", 1),
                Some(kind),
            )
            .await?;
        Ok(page.items)
    }

    pub async fn season(
        &self,
        series_id: u64,
        season_number: u32,
    ) -> Result<Season, MetadataRetrievalError> {
        let season: TmdbSeason = self
            .fetch_as(
                &format!("/tv/{}/season/{}", series_id, season_number),
                &QueryParams::new(),
            )
            .await?;
        Ok(season.into_season())
    }

    pub async fn genres(&self, kind: MediaKind) -> Result<Vec<Genre>, MetadataRetrievalError> {
        let list: TmdbGenreList = self
            .fetch_as(&format!("/genre/{}/list", kind), &QueryParams::new())
            .await?;
        Ok(list.genres.into_iter().map(|g| g.into_genre()).collect())
    }

    /// Countries known to the provider, sorted by English name.
    pub async fn countries(&self) -> Result<Vec<Country>, MetadataRetrievalError> {
        let countries: Vec<TmdbCountry> = self
            .fetch_as("/configuration/countries", &QueryParams::new())
            .await?;
        let mut countries: Vec<Country> = countries.into_iter().map(|c| c.into_country()).collect();
        countries.sort_by(|a, b| a.english_name.cmp(&b.english_name));
        Ok(countries)
    }

    pub async fn person(&self, id: u64) -> Result<PersonDetails, MetadataRetrievalError> {
        let person: TmdbPerson = self
            .fetch_as(&format!("/person/{}", id), &QueryParams::new())
            .await?;
        Ok(person.into_person())
    }

    /// Movies and series a person appeared in.
    pub async fn person_credits(&self, id: u64) -> Result<Vec<MediaItem>, MetadataRetrievalError> {
        let credits: TmdbCombinedCredits = self
            .fetch_as(
                &format!("/person/{}/combined_credits", id),
                &QueryParams::new(),
            )
            .await?;
        Ok(credits
            .cast
            .iter()
            .filter_map(|entry| entry.resolve_kind(None).map(|k| entry.to_item(k)))
            .collect())
    }

    /// Titles trending this week, movies and series mixed.
    pub async fn trending(&self) -> Result<Vec<MediaItem>, MetadataRetrievalError> {
        let page = self
            .listing("/trending/all/week", &QueryParams::new(), None)
            .await?;
        Ok(page.items)
    }

    pub async fn popular(&self, kind: MediaKind) -> Result<Vec<MediaItem>, MetadataRetrievalError> {
        let page = self
            .listing(&format!("/{}/popular", kind), &QueryParams::new(), Some(kind))
            .await?;
        Ok(page.items)
    }

    pub async fn upcoming_movies(&self) -> Result<Vec<MediaItem>, MetadataRetrievalError> {
        let page = self
            .listing("/movie/upcoming", &QueryParams::new(), Some(MediaKind::Movie))
            .await?;
        Ok(page.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeMetadata;
    use serde_json::json;

    #[tokio::test]
    async fn test_search_builds_route_and_parses_page() {
        let fake = Arc::new(FakeMetadata::new(|path, params| {
            assert_eq!(path, "/search/movie");
            assert_eq!(params.get("query"), Some("matrix"));
            assert_eq!(params.get("page"), Some("1"));
            Ok(json!({
                "page": 1,
                "total_pages": 3,
                "results": [
                    {"id": 603, "title": "The Matrix", "release_date": "1999-03-31"},
                    {"id": 604, "title": "The Matrix Reloaded"}
                ]
            }))
        }));
        let client = MetadataClient::new(fake.clone());

        let page = client.search(MediaKind::Movie, "matrix", 1).await.unwrap();
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].id, 603);
        assert_eq!(page.items[0].kind, MediaKind::Movie);
        assert_eq!(fake.call_count(), 1);
    }

    #[tokio::test]
    async fn test_trending_drops_people() {
        let fake = Arc::new(FakeMetadata::new(|_, _| {
            Ok(json!({"results": [
                {"id": 1, "title": "Dune", "media_type": "movie"},
                {"id": 2, "name": "Zendaya", "media_type": "person"},
                {"id": 3, "name": "Severance", "media_type": "tv"}
            ]}))
        }));
        let items = MetadataClient::new(fake).trending().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].kind, MediaKind::Tv);
        assert_eq!(items[1].title, "Severance");
    }

    #[tokio::test]
    async fn test_countries_sorted_by_name() {
        let fake = Arc::new(FakeMetadata::new(|_, _| {
            Ok(json!([
                {"iso_3166_1": "JP", "english_name": "Japan"},
                {"iso_3166_1": "DE", "english_name": "Germany"},
                {"iso_3166_1": "ID", "english_name": "Indonesia"}
            ]))
        }));
        let countries = MetadataClient::new(fake).countries().await.unwrap();
        let names: Vec<_> = countries.iter().map(|c| c.english_name.as_str()).collect();
        assert_eq!(names, vec!["Germany", "Indonesia", "Japan"]);
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_a_parse_error() {
        let fake = Arc::new(FakeMetadata::new(|_, _| Ok(json!({"genres": "nope"}))));
        let result = MetadataClient::new(fake).genres(MediaKind::Tv).await;
        assert!(matches!(
            result,
            Err(MetadataRetrievalError::Request(RequestError::Parse(_)))
        ));
    }

    #[tokio::test]
    async fn test_provider_errors_pass_through() {
        let fake = Arc::new(FakeMetadata::new(|_, _| {
            Err(RequestError::Status {
                status: 404,
                message: "The resource you requested could not be found.".into(),
            }
            .into())
        }));
        let err = MetadataClient::new(fake).person(1).await.unwrap_err();
        assert_eq!(err.to_string(), "The resource you requested could not be found.");
    }

    #[tokio::test]
    async fn test_season_episode_list() {
        let fake = Arc::new(FakeMetadata::new(|path, _| {
            assert_eq!(path, "/tv/1399/season/1");
            Ok(json!({
                "season_number": 1,
                "name": "Season 1",
                "episodes": [
                    {"episode_number": 1, "name": "Winter Is Coming", "overview": "..."},
                    {"episode_number": 2, "name": "The Kingsroad"}
                ]
            }))
        }));
        let season = MetadataClient::new(fake).season(1399, 1).await.unwrap();
        assert_eq!(season.episodes.len(), 2);
        assert_eq!(season.episodes[1].overview, "");
    }
}
