//! CineScope - Browse a movie and series catalog from the terminal
//!
//! This library provides the core of a catalog front-end: typed access to
//! the metadata and availability providers, concurrent quality decoration
//! of listings, a paged listing cursor that ignores late responses, and
//! the locally persisted history, watchlist and last-watched positions.

mod availability;
mod catalog;
mod config;
mod decoration;
mod discover;
mod http;
mod media;
mod metadata_retrieval;
mod pagination;
mod player;
mod preferences;

#[cfg(test)]
mod test_support;

use std::io;
use thiserror::Error;

// Re-export error types
pub use config::ConfigurationError;
pub use http::RequestError;
pub use metadata_retrieval::MetadataRetrievalError;
pub use preferences::StoreError;

pub use availability::{AvailabilityClient, AvailabilitySource};
pub use catalog::{
    Catalog, FilterOptions, HomeRows, ListingContext, ListingCursor, ListingFeed, MIN_QUERY_LEN,
};
pub use config::Config;
pub use decoration::{Lookup, decorate, lookup};
pub use discover::{DiscoverFilters, SortKey, parse_optional, parse_year};
pub use http::QueryParams;
pub use media::{
    BACKDROP_SIZE, CastMember, Country, Episode, Genre, ImageCollections, MediaDetails, MediaItem,
    MediaKind, POSTER_SIZE, PROFILE_SIZE, Page, PersonDetails, PersonPage, Season, SeasonSummary,
    Video, WatchProvider, WatchProviders, image_url,
};
pub use metadata_retrieval::{MetadataClient, MetadataSource};
pub use pagination::{ApplyOutcome, Cursor, CursorState, LoadTicket, PaginationState};
pub use player::{EmbedServer, PlayerUrls};
pub use preferences::{
    EpisodePosition, FileStore, HISTORY_CAPACITY, HISTORY_KEY, History, HistoryEntry,
    KeyValueStore, LAST_WATCHED_KEY, LastWatched, MemoryStore, WATCHLIST_KEY, Watchlist,
    WatchlistEntry,
};

/// Top-level error type for CineScope operations
#[derive(Debug, Error)]
pub enum CineScopeError {
    /// Error in the runtime configuration
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Error during metadata retrieval
    #[error("Metadata retrieval error: {0}")]
    MetadataRetrieval(#[from] MetadataRetrievalError),

    /// Error while talking to a provider outside of metadata retrieval
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    /// Error in a preference store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
