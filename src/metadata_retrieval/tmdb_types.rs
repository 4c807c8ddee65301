/// TMDB API response types for deserialization.
///
/// These structures mirror the subset of the TMDB v3 JSON we consume. Every
/// field the provider may omit is optional or defaulted; conversion into
/// the crate's view models happens here and nowhere else.
use crate::media::{
    CastMember, Country, Episode, Genre, ImageCollections, MediaDetails, MediaItem, MediaKind,
    PersonDetails, Season, SeasonSummary, Video, WatchProvider, WatchProviders,
};
use serde::Deserialize;
use std::collections::HashMap;

/// Envelope of every paged TMDB endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct TmdbPaged<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
}

/// A movie, series or (in mixed listings) person entry.
///
/// Detail endpoints return the same object with extra fields and appended
/// sub-resources, so one type serves both.
#[derive(Debug, Deserialize)]
pub(super) struct TmdbMedia {
    pub id: u64,
    /// Movies only
    pub title: Option<String>,
    /// Series only
    pub name: Option<String>,
    /// Present on trending, multi-search and combined credits
    pub media_type: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: Option<f64>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    pub overview: Option<String>,
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    #[serde(default)]
    pub seasons: Vec<TmdbSeasonSummary>,
    pub credits: Option<TmdbCredits>,
    pub images: Option<TmdbImages>,
    pub videos: Option<TmdbPaged<TmdbVideo>>,
    #[serde(rename = "watch/providers")]
    pub watch_providers: Option<TmdbWatchProviderResults>,
}

impl TmdbMedia {
    /// Settles the kind of this entry.
    ///
    /// An explicit `media_type` wins; entries of other types (people) yield
    /// `None`. Without one, the listing's kind applies, and as a last resort
    /// the presence of the movie-only `title` field decides.
    pub fn resolve_kind(&self, listing_kind: Option<MediaKind>) -> Option<MediaKind> {
        match self.media_type.as_deref() {
            Some("movie") => Some(MediaKind::Movie),
            Some("tv") => Some(MediaKind::Tv),
            Some(_) => None,
            None => Some(listing_kind.unwrap_or(if self.title.is_some() {
                MediaKind::Movie
            } else {
                MediaKind::Tv
            })),
        }
    }

    pub fn to_item(&self, kind: MediaKind) -> MediaItem {
        let (title, other_title, date, other_date) = match kind {
            MediaKind::Movie => (&self.title, &self.name, &self.release_date, &self.first_air_date),
            MediaKind::Tv => (&self.name, &self.title, &self.first_air_date, &self.release_date),
        };

        MediaItem {
            id: self.id,
            kind,
            title: non_empty(title)
                .or_else(|| non_empty(other_title))
                .unwrap_or_else(|| "Untitled".to_string()),
            poster_path: non_empty(&self.poster_path),
            backdrop_path: non_empty(&self.backdrop_path),
            rating: self.vote_average,
            release_date: non_empty(date).or_else(|| non_empty(other_date)),
            overview: non_empty(&self.overview),
            quality: None,
        }
    }

    /// Converts a detail response, picking the watch providers of `region`.
    pub fn into_details(self, kind: MediaKind, region: &str) -> MediaDetails {
        let item = self.to_item(kind);

        let watch_providers = self.watch_providers.and_then(|wp| {
            wp.results
                .into_iter()
                .find(|(code, _)| code.eq_ignore_ascii_case(region))
                .map(|(code, providers)| providers.into_watch_providers(code))
        });

        MediaDetails {
            item,
            runtime: match kind {
                MediaKind::Movie => self.runtime,
                MediaKind::Tv => None,
            },
            genres: self.genres.into_iter().map(TmdbGenre::into_genre).collect(),
            cast: self
                .credits
                .map(|c| c.cast.into_iter().map(TmdbCast::into_cast_member).collect())
                .unwrap_or_default(),
            seasons: match kind {
                MediaKind::Tv => self
                    .seasons
                    .into_iter()
                    .map(TmdbSeasonSummary::into_summary)
                    .collect(),
                MediaKind::Movie => Vec::new(),
            },
            images: self.images.map(TmdbImages::into_collections).unwrap_or_default(),
            videos: self
                .videos
                .map(|v| v.results.into_iter().map(TmdbVideo::into_video).collect())
                .unwrap_or_default(),
            watch_providers,
            recommendations: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct TmdbGenre {
    pub id: u64,
    pub name: String,
}

impl TmdbGenre {
    pub fn into_genre(self) -> Genre {
        Genre {
            id: self.id,
            name: self.name,
        }
    }
}

/// Response of `/genre/{kind}/list`.
#[derive(Debug, Deserialize)]
pub(super) struct TmdbGenreList {
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
}

/// Element of `/configuration/countries`.
#[derive(Debug, Deserialize)]
pub(super) struct TmdbCountry {
    pub iso_3166_1: String,
    pub english_name: String,
}

impl TmdbCountry {
    pub fn into_country(self) -> Country {
        Country {
            code: self.iso_3166_1,
            english_name: self.english_name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct TmdbCredits {
    #[serde(default)]
    pub cast: Vec<TmdbCast>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TmdbCast {
    pub id: u64,
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
}

impl TmdbCast {
    fn into_cast_member(self) -> CastMember {
        CastMember {
            person_id: self.id,
            name: self.name,
            character: self.character.unwrap_or_default(),
            profile_path: self.profile_path,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct TmdbImages {
    #[serde(default)]
    pub backdrops: Vec<TmdbImage>,
    #[serde(default)]
    pub posters: Vec<TmdbImage>,
}

impl TmdbImages {
    fn into_collections(self) -> ImageCollections {
        ImageCollections {
            backdrops: self.backdrops.into_iter().map(|i| i.file_path).collect(),
            posters: self.posters.into_iter().map(|i| i.file_path).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct TmdbImage {
    pub file_path: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct TmdbVideo {
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
}

impl TmdbVideo {
    fn into_video(self) -> Video {
        Video {
            key: self.key,
            name: self.name,
            site: self.site,
            video_type: self.video_type,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct TmdbWatchProviderResults {
    #[serde(default)]
    pub results: HashMap<String, TmdbRegionProviders>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TmdbRegionProviders {
    #[serde(default)]
    pub flatrate: Vec<TmdbProvider>,
    #[serde(default)]
    pub rent: Vec<TmdbProvider>,
    #[serde(default)]
    pub buy: Vec<TmdbProvider>,
}

impl TmdbRegionProviders {
    fn into_watch_providers(self, region: String) -> WatchProviders {
        let convert = |list: Vec<TmdbProvider>| {
            list.into_iter()
                .map(|p| WatchProvider {
                    id: p.provider_id,
                    name: p.provider_name,
                    logo_path: p.logo_path,
                })
                .collect()
        };

        WatchProviders {
            region,
            flatrate: convert(self.flatrate),
            rent: convert(self.rent),
            buy: convert(self.buy),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct TmdbProvider {
    pub provider_id: u64,
    pub provider_name: String,
    pub logo_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TmdbSeasonSummary {
    pub season_number: u32,
    pub name: Option<String>,
    pub episode_count: Option<u32>,
}

impl TmdbSeasonSummary {
    fn into_summary(self) -> SeasonSummary {
        SeasonSummary {
            number: self.season_number,
            name: self
                .name
                .unwrap_or_else(|| format!("Season {}", self.season_number)),
            episode_count: self.episode_count.unwrap_or(0),
        }
    }
}

/// Response of `/tv/{id}/season/{n}`.
#[derive(Debug, Deserialize)]
pub(super) struct TmdbSeason {
    pub season_number: u32,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub air_date: Option<String>,
    #[serde(default)]
    pub episodes: Vec<TmdbEpisode>,
}

impl TmdbSeason {
    pub fn into_season(self) -> Season {
        Season {
            number: self.season_number,
            name: self
                .name
                .unwrap_or_else(|| format!("Season {}", self.season_number)),
            overview: self.overview.unwrap_or_default(),
            air_date: self.air_date,
            episodes: self
                .episodes
                .into_iter()
                .map(|e| Episode {
                    number: e.episode_number,
                    name: e.name.unwrap_or_else(|| "Unknown".to_string()),
                    overview: e.overview.unwrap_or_default(),
                    air_date: e.air_date,
                    still_path: e.still_path,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct TmdbEpisode {
    pub episode_number: u32,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub air_date: Option<String>,
    pub still_path: Option<String>,
}

/// Response of `/person/{id}`.
#[derive(Debug, Deserialize)]
pub(super) struct TmdbPerson {
    pub id: u64,
    pub name: String,
    pub biography: Option<String>,
    pub profile_path: Option<String>,
    pub birthday: Option<String>,
    pub place_of_birth: Option<String>,
    pub known_for_department: Option<String>,
}

impl TmdbPerson {
    pub fn into_person(self) -> PersonDetails {
        PersonDetails {
            id: self.id,
            name: self.name,
            biography: self.biography.unwrap_or_default(),
            profile_path: self.profile_path,
            birthday: self.birthday,
            place_of_birth: self.place_of_birth,
            known_for_department: self.known_for_department,
        }
    }
}

/// Response of `/person/{id}/combined_credits`.
#[derive(Debug, Deserialize)]
pub(super) struct TmdbCombinedCredits {
    #[serde(default)]
    pub cast: Vec<TmdbMedia>,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn media(value: serde_json::Value) -> TmdbMedia {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_explicit_media_type_wins() {
        let entry = media(json!({"id": 1, "name": "Dark", "media_type": "tv"}));
        assert_eq!(entry.resolve_kind(Some(MediaKind::Movie)), Some(MediaKind::Tv));
    }

    #[test]
    fn test_people_have_no_kind() {
        let entry = media(json!({"id": 2, "name": "Keanu Reeves", "media_type": "person"}));
        assert_eq!(entry.resolve_kind(None), None);
    }

    #[test]
    fn test_kind_inferred_from_title_field() {
        let movie = media(json!({"id": 603, "title": "The Matrix"}));
        let series = media(json!({"id": 1399, "name": "Game of Thrones"}));
        assert_eq!(movie.resolve_kind(None), Some(MediaKind::Movie));
        assert_eq!(series.resolve_kind(None), Some(MediaKind::Tv));
        assert_eq!(series.resolve_kind(Some(MediaKind::Movie)), Some(MediaKind::Movie));
    }

    #[test]
    fn test_to_item_picks_kind_specific_fields() {
        let entry = media(json!({
            "id": 1399,
            "name": "Game of Thrones",
            "first_air_date": "2011-04-17",
            "vote_average": 8.4,
            "poster_path": "",
            "overview": "Seven noble families fight for control."
        }));
        let item = entry.to_item(MediaKind::Tv);
        assert_eq!(item.title, "Game of Thrones");
        assert_eq!(item.release_date.as_deref(), Some("2011-04-17"));
        assert_eq!(item.poster_path, None);
        assert_eq!(item.rating, Some(8.4));
        assert_eq!(item.quality, None);
    }

    #[test]
    fn test_into_details_keeps_provider_order_and_region() {
        let entry = media(json!({
            "id": 603,
            "title": "The Matrix",
            "runtime": 136,
            "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}],
            "credits": {"cast": [
                {"id": 6384, "name": "Keanu Reeves", "character": "Neo", "profile_path": "/k.jpg"},
                {"id": 2975, "name": "Laurence Fishburne", "character": null, "profile_path": null}
            ]},
            "images": {
                "backdrops": [{"file_path": "/b1.jpg"}, {"file_path": "/b1.jpg"}],
                "posters": [{"file_path": "/p1.jpg"}]
            },
            "videos": {"results": [
                {"key": "vKQi3bBA1y8", "name": "Trailer", "site": "YouTube", "type": "Trailer"},
                {"key": "abc", "name": "Clip", "site": "YouTube", "type": "Clip"}
            ]},
            "watch/providers": {"results": {
                "US": {"flatrate": [{"provider_id": 8, "provider_name": "Netflix", "logo_path": "/n.jpg"}]},
                "ID": {"rent": [{"provider_id": 2, "provider_name": "Apple TV", "logo_path": null}]}
            }}
        }));

        let details = entry.into_details(MediaKind::Movie, "id");
        assert_eq!(details.runtime, Some(136));
        assert_eq!(details.genres[0].name, "Action");
        assert_eq!(details.genres[1].id, 878);
        assert_eq!(details.cast.len(), 2);
        assert_eq!(details.cast[1].character, "");
        assert_eq!(details.images.backdrops, vec!["/b1.jpg", "/b1.jpg"]);
        assert_eq!(details.trailers().count(), 1);
        let providers = details.watch_providers.unwrap();
        assert_eq!(providers.region, "ID");
        assert_eq!(providers.rent[0].name, "Apple TV");
        assert!(providers.flatrate.is_empty());
        assert!(details.seasons.is_empty());
    }

    #[test]
    fn test_series_details_carry_seasons_without_runtime() {
        let entry = media(json!({
            "id": 1399,
            "name": "Game of Thrones",
            "runtime": 60,
            "seasons": [
                {"season_number": 0, "name": "Specials", "episode_count": 14},
                {"season_number": 1, "episode_count": 10}
            ]
        }));
        let details = entry.into_details(MediaKind::Tv, "US");
        assert_eq!(details.runtime, None);
        assert_eq!(details.seasons.len(), 2);
        assert_eq!(details.seasons[1].name, "Season 1");
        assert!(details.watch_providers.is_none());
    }
}
