//! Catalog data model
//!
//! These are the view models every other module works with. Provider JSON
//! is converted into them exactly once, at the client boundary, which is
//! also where the [`MediaKind`] of an item is settled.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Poster size used for grids and detail pages
pub const POSTER_SIZE: &str = "w500";
/// Backdrop size used behind detail pages
pub const BACKDROP_SIZE: &str = "w1280";
/// Headshot size used for cast lists
pub const PROFILE_SIZE: &str = "w185";

/// Discriminates movies from tv series throughout the crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    /// Route segment used by both providers
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" | "movies" => Ok(MediaKind::Movie),
            "tv" | "show" | "series" => Ok(MediaKind::Tv),
            other => Err(format!("unknown media kind '{}' (expected movie or tv)", other)),
        }
    }
}

/// A movie or tv series as it appears in listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Metadata provider identifier, unique within a kind
    pub id: u64,
    pub kind: MediaKind,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    /// Average vote on a 0-10 scale
    pub rating: Option<f64>,
    /// Release or first air date; year-only values are common
    pub release_date: Option<String>,
    pub overview: Option<String>,
    /// Availability tag attached by the decoration pipeline
    pub quality: Option<String>,
}

impl MediaItem {
    /// The leading year of the release date, if any
    pub fn year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|d| d.split('-').next())
            .filter(|y| y.len() == 4 && y.chars().all(|c| c.is_ascii_digit()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// A country as offered by the region filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// ISO 3166-1 alpha-2 code
    pub code: String,
    pub english_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub person_id: u64,
    pub name: String,
    pub character: String,
    pub profile_path: Option<String>,
}

/// Season overview as listed on a series detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub number: u32,
    pub name: String,
    pub episode_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub number: u32,
    pub name: String,
    pub overview: String,
    pub air_date: Option<String>,
    pub still_path: Option<String>,
}

/// A season with its episode list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub number: u32,
    pub name: String,
    pub overview: String,
    pub air_date: Option<String>,
    pub episodes: Vec<Episode>,
}

/// Backdrop and poster galleries, in provider order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageCollections {
    pub backdrops: Vec<String>,
    pub posters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub key: String,
    pub name: String,
    pub site: String,
    pub video_type: String,
}

impl Video {
    pub fn is_youtube_trailer(&self) -> bool {
        self.site == "YouTube" && self.video_type == "Trailer"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchProvider {
    pub id: u64,
    pub name: String,
    pub logo_path: Option<String>,
}

/// Where a title can be watched in one region
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchProviders {
    pub region: String,
    pub flatrate: Vec<WatchProvider>,
    pub rent: Vec<WatchProvider>,
    pub buy: Vec<WatchProvider>,
}

impl WatchProviders {
    pub fn is_empty(&self) -> bool {
        self.flatrate.is_empty() && self.rent.is_empty() && self.buy.is_empty()
    }
}

/// Everything a detail page shows for one title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaDetails {
    pub item: MediaItem,
    /// Minutes; movies only
    pub runtime: Option<u32>,
    pub genres: Vec<Genre>,
    pub cast: Vec<CastMember>,
    /// Tv only
    pub seasons: Vec<SeasonSummary>,
    pub images: ImageCollections,
    pub videos: Vec<Video>,
    pub watch_providers: Option<WatchProviders>,
    pub recommendations: Vec<MediaItem>,
}

impl MediaDetails {
    pub fn trailers(&self) -> impl Iterator<Item = &Video> {
        self.videos.iter().filter(|v| v.is_youtube_trailer())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonDetails {
    pub id: u64,
    pub name: String,
    pub biography: String,
    pub profile_path: Option<String>,
    pub birthday: Option<String>,
    pub place_of_birth: Option<String>,
    pub known_for_department: Option<String>,
}

/// A person together with the titles they appeared in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonPage {
    pub person: PersonDetails,
    pub credits: Vec<MediaItem>,
}

/// One page of a paged listing
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_pages: 0,
        }
    }
}

/// Builds an absolute image URL from a provider-relative path
pub fn image_url(base: &str, size: &str, path: &str) -> String {
    format!("{}/{}{}", base.trim_end_matches('/'), size, path)
}
