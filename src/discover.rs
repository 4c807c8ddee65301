//! Discover feed filters
//!
//! A [`DiscoverFilters`] value is rebuilt whenever a filter control changes
//! and is compared by value to decide whether a feed has to start over.

use crate::http::QueryParams;
use crate::media::MediaKind;
use std::fmt;
use std::str::FromStr;

/// Sort orders offered by the discover feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    #[default]
    Popularity,
    Rating,
    Newest,
}

impl SortKey {
    /// Provider sort expression for the given kind
    ///
    /// Series have no release date, so "newest" sorts by first air date.
    pub fn sort_by(&self, kind: MediaKind) -> &'static str {
        match (self, kind) {
            (SortKey::Popularity, _) => "popularity.desc",
            (SortKey::Rating, _) => "vote_average.desc",
            (SortKey::Newest, MediaKind::Movie) => "primary_release_date.desc",
            (SortKey::Newest, MediaKind::Tv) => "first_air_date.desc",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortKey::Popularity => "popularity",
            SortKey::Rating => "rating",
            SortKey::Newest => "newest",
        })
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "popularity" | "popularity.desc" => Ok(SortKey::Popularity),
            "rating" | "vote_average.desc" => Ok(SortKey::Rating),
            "newest" | "primary_release_date.desc" | "first_air_date.desc" => Ok(SortKey::Newest),
            other => Err(format!(
                "unknown sort key '{}' (expected popularity, rating or newest)",
                other
            )),
        }
    }
}

/// Filter set of one discover request; `None` means "all"
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DiscoverFilters {
    pub genre: Option<u64>,
    pub year: Option<u16>,
    pub sort: SortKey,
    /// ISO 3166-1 alpha-2 origin country
    pub region: Option<String>,
}

impl DiscoverFilters {
    pub fn with_genre(mut self, genre: u64) -> Self {
        self.genre = Some(genre);
        self
    }

    pub fn with_year(mut self, year: u16) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into().to_ascii_uppercase());
        self
    }

    /// Provider parameters for one page of this filter set
    pub fn to_params(&self, kind: MediaKind, page: u32) -> QueryParams {
        let mut params = QueryParams::new()
            .with("sort_by", self.sort.sort_by(kind))
            .with("page", page);

        if let Some(genre) = self.genre {
            params.push("with_genres", genre);
        }
        if let Some(year) = self.year {
            let key = match kind {
                MediaKind::Movie => "primary_release_year",
                MediaKind::Tv => "first_air_date_year",
            };
            params.push(key, year);
        }
        if let Some(region) = &self.region {
            params.push("with_origin_country", region);
        }

        params
    }
}

/// Parses a filter control value where `all` (or nothing) means no filter
pub fn parse_optional<T: FromStr>(value: &str) -> Result<Option<T>, T::Err> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("all") {
        Ok(None)
    } else {
        value.parse().map(Some)
    }
}

/// Parses a release year filter: four digits, or `all`
pub fn parse_year(value: &str) -> Result<Option<u16>, String> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("all") {
        return Ok(None);
    }

    let four_digits = value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit());
    match value.parse::<u16>() {
        Ok(year) if four_digits && (1000..=9999).contains(&year) => Ok(Some(year)),
        _ => Err(format!("invalid year '{}' (expected four digits or all)", value)),
    }
}
