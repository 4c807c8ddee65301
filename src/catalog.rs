//! Catalog views
//!
//! [`Catalog`] assembles the view models of every page from the two
//! providers. Primary content (a listing, a detail page, a person) reports
//! failures to the caller. Secondary content (quality tags,
//! recommendations, home rows, filter options, a person's credits) falls
//! back to empty and only shows up in the log.

use crate::availability::{AvailabilityClient, MoviesApiSource};
use crate::config::Config;
use crate::decoration::decorate;
use crate::discover::DiscoverFilters;
use crate::http::RequestError;
use crate::media::{Country, Genre, MediaDetails, MediaItem, MediaKind, Page, PersonPage, Season};
use crate::metadata_retrieval::{MetadataClient, MetadataRetrievalError, TmdbSource};
use crate::pagination::{ApplyOutcome, Cursor, LoadTicket};
use crate::preferences::{History, KeyValueStore};
use std::sync::Arc;
use tracing::{debug, warn};

/// Search queries shorter than this return nothing without a request
pub const MIN_QUERY_LEN: usize = 3;

/// What a paged listing shows
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListingContext {
    Discover {
        kind: MediaKind,
        filters: DiscoverFilters,
    },
    Search {
        kind: MediaKind,
        query: String,
    },
}

impl ListingContext {
    pub fn kind(&self) -> MediaKind {
        match self {
            ListingContext::Discover { kind, .. } | ListingContext::Search { kind, .. } => *kind,
        }
    }
}

pub type ListingCursor = Cursor<ListingContext, MediaItem>;

/// Rows of the landing view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeRows {
    pub trending: Vec<MediaItem>,
    pub popular_movies: Vec<MediaItem>,
    pub popular_tv: Vec<MediaItem>,
    pub upcoming_movies: Vec<MediaItem>,
}

/// Choices offered by the discover filter controls
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub genres: Vec<Genre>,
    pub countries: Vec<Country>,
}

#[derive(Clone)]
pub struct Catalog {
    metadata: MetadataClient,
    availability: AvailabilityClient,
    history: History,
    watch_region: String,
}

impl Catalog {
    pub fn new(
        metadata: MetadataClient,
        availability: AvailabilityClient,
        history: History,
        watch_region: impl Into<String>,
    ) -> Self {
        Self {
            metadata,
            availability,
            history,
            watch_region: watch_region.into(),
        }
    }

    /// Wires the catalog to the real providers
    pub fn from_config(
        config: &Config,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, RequestError> {
        Ok(Self::new(
            MetadataClient::new(Arc::new(TmdbSource::new(config)?)),
            AvailabilityClient::new(Arc::new(MoviesApiSource::new(config)?)),
            History::new(store),
            config.watch_region.clone(),
        ))
    }

    pub fn metadata(&self) -> &MetadataClient {
        &self.metadata
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Fetches and decorates one page of a listing
    pub async fn fetch_listing(
        &self,
        context: &ListingContext,
        page: u32,
    ) -> Result<Page<MediaItem>, MetadataRetrievalError> {
        let kind = context.kind();
        let fetched = match context {
            ListingContext::Discover { filters, .. } => {
                self.metadata.discover(kind, filters, page).await?
            }
            ListingContext::Search { query, .. } => {
                let query = query.trim();
                if query.chars().count() < MIN_QUERY_LEN {
                    debug!(query, "Search query too short");
                    return Ok(Page::empty());
                }
                self.metadata.search(kind, query, page).await?
            }
        };

        Ok(Page {
            items: decorate(&self.availability, kind, fetched.items).await,
            total_pages: fetched.total_pages,
        })
    }

    /// Builds a detail page and records the view in the history
    ///
    /// Only the core details request can fail the page. Recommendations are
    /// fetched alongside and fall back to empty.
    pub async fn details(
        &self,
        kind: MediaKind,
        id: u64,
    ) -> Result<MediaDetails, MetadataRetrievalError> {
        let (core, recommendations) = futures::join!(
            self.metadata.details(kind, id, &self.watch_region),
            self.recommendations(kind, id),
        );

        let mut details = core?;
        details.recommendations = recommendations;

        if let Err(e) = self.history.record(&details.item) {
            warn!(%kind, id, error = %e, "Failed to record history entry");
        }

        Ok(details)
    }

    /// Decorated recommendations for a title; empty on failure
    pub async fn recommendations(&self, kind: MediaKind, id: u64) -> Vec<MediaItem> {
        let items = or_empty("recommendations", self.metadata.recommendations(kind, id).await);
        decorate(&self.availability, kind, items).await
    }

    /// Fetches the landing rows concurrently; a failing row stays empty
    pub async fn home(&self) -> HomeRows {
        let (trending, popular_movies, popular_tv, upcoming_movies) = futures::join!(
            self.metadata.trending(),
            self.metadata.popular(MediaKind::Movie),
            self.metadata.popular(MediaKind::Tv),
            self.metadata.upcoming_movies(),
        );

        HomeRows {
            trending: or_empty("trending", trending),
            popular_movies: or_empty("popular movies", popular_movies),
            popular_tv: or_empty("popular tv", popular_tv),
            upcoming_movies: or_empty("upcoming movies", upcoming_movies),
        }
    }

    pub async fn season(
        &self,
        series_id: u64,
        season_number: u32,
    ) -> Result<Season, MetadataRetrievalError> {
        self.metadata.season(series_id, season_number).await
    }

    /// A person and their credits; the credits are optional content
    pub async fn person(&self, id: u64) -> Result<PersonPage, MetadataRetrievalError> {
        let (person, credits) = futures::join!(
            self.metadata.person(id),
            self.metadata.person_credits(id),
        );

        Ok(PersonPage {
            person: person?,
            credits: or_empty("person credits", credits),
        })
    }

    pub async fn filter_options(&self, kind: MediaKind) -> FilterOptions {
        let (genres, countries) =
            futures::join!(self.metadata.genres(kind), self.metadata.countries());

        FilterOptions {
            genres: or_empty("genres", genres),
            countries: or_empty("countries", countries),
        }
    }
}

/// Collapses a failed secondary section into its empty value
fn or_empty<T: Default>(section: &str, result: Result<T, MetadataRetrievalError>) -> T {
    result.unwrap_or_else(|e| {
        warn!(section, error = %e, "Section failed to load");
        T::default()
    })
}

/// A listing that grows page by page
///
/// Wraps a [`ListingCursor`] and runs the fetches it asks for. Opening a
/// new context always starts over.
pub struct ListingFeed {
    catalog: Catalog,
    cursor: ListingCursor,
}

impl ListingFeed {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            cursor: ListingCursor::new(),
        }
    }

    pub fn cursor(&self) -> &ListingCursor {
        &self.cursor
    }

    pub fn items(&self) -> &[MediaItem] {
        self.cursor.items()
    }

    /// Switches to `context` and loads its first page
    pub async fn open(&mut self, context: ListingContext) -> Result<(), MetadataRetrievalError> {
        let ticket = self.cursor.reset(context);
        self.run(ticket).await
    }

    /// Loads the next page; returns `false` without fetching when there is none
    pub async fn load_more(&mut self) -> Result<bool, MetadataRetrievalError> {
        match self.cursor.load_next() {
            Some(ticket) => self.run(ticket).await.map(|_| true),
            None => Ok(false),
        }
    }

    /// Re-fetches the page whose load failed; `false` if nothing failed
    pub async fn retry(&mut self) -> Result<bool, MetadataRetrievalError> {
        match self.cursor.retry() {
            Some(ticket) => self.run(ticket).await.map(|_| true),
            None => Ok(false),
        }
    }

    async fn run(&mut self, ticket: LoadTicket) -> Result<(), MetadataRetrievalError> {
        let Some(context) = self.cursor.context().cloned() else {
            return Ok(());
        };

        let outcome = match self.catalog.fetch_listing(&context, ticket.page()).await {
            Ok(page) => self.cursor.apply_page(ticket, page),
            Err(e) => {
                self.cursor.apply_error(ticket, &e);
                return Err(e);
            }
        };

        if outcome == ApplyOutcome::Stale {
            debug!(?context, page = ticket.page(), "Listing page arrived after context change");
        }
        Ok(())
    }
}
