//! Embedded player URLs
//!
//! Two interchangeable third-party players can stream a title. Nothing is
//! read back from them; this module only builds the URL to embed.

use crate::config::Config;
use crate::media::MediaKind;
use crate::preferences::EpisodePosition;
use std::fmt;
use std::str::FromStr;

/// Embeddable player origins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmbedServer {
    MoviesApi,
    #[default]
    Vidsrc,
}

impl fmt::Display for EmbedServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EmbedServer::MoviesApi => "moviesapi",
            EmbedServer::Vidsrc => "vidsrc",
        })
    }
}

impl FromStr for EmbedServer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "moviesapi" => Ok(EmbedServer::MoviesApi),
            "vidsrc" => Ok(EmbedServer::Vidsrc),
            other => Err(format!(
                "unknown server '{}' (expected moviesapi or vidsrc)",
                other
            )),
        }
    }
}

/// Builds embed URLs for the configured player origins
#[derive(Debug, Clone)]
pub struct PlayerUrls {
    moviesapi_base: String,
    vidsrc_base: String,
    subtitle_language: String,
}

impl PlayerUrls {
    pub fn new(config: &Config) -> Self {
        Self {
            moviesapi_base: config.moviesapi_embed_url.clone(),
            vidsrc_base: config.vidsrc_embed_url.clone(),
            subtitle_language: config.subtitle_language.clone(),
        }
    }

    /// URL of the player for a movie, or for one episode of a series
    ///
    /// Series without an explicit position start at season 1 episode 1.
    pub fn embed_url(
        &self,
        server: EmbedServer,
        kind: MediaKind,
        id: u64,
        position: Option<EpisodePosition>,
    ) -> String {
        let EpisodePosition { season, episode } = position.unwrap_or_default();

        match (server, kind) {
            (EmbedServer::MoviesApi, MediaKind::Movie) => {
                format!("{}/movie/{}", self.moviesapi_base, id)
            }
            (EmbedServer::MoviesApi, MediaKind::Tv) => {
                format!("{}/tv/{}-{}-{}", self.moviesapi_base, id, season, episode)
            }
            (EmbedServer::Vidsrc, MediaKind::Movie) => format!(
                "{}/movie?tmdb={}&ds_lang={}",
                self.vidsrc_base, id, self.subtitle_language
            ),
            (EmbedServer::Vidsrc, MediaKind::Tv) => format!(
                "{}/tv?tmdb={}&season={}&episode={}&ds_lang={}",
                self.vidsrc_base, id, season, episode, self.subtitle_language
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls() -> PlayerUrls {
        PlayerUrls::new(&Config::default())
    }

    #[test]
    fn test_moviesapi_urls() {
        assert_eq!(
            urls().embed_url(EmbedServer::MoviesApi, MediaKind::Movie, 603, None),
            "https://moviesapi.to/movie/603"
        );
        assert_eq!(
            urls().embed_url(
                EmbedServer::MoviesApi,
                MediaKind::Tv,
                1399,
                Some(EpisodePosition::new(2, 5))
            ),
            "https://moviesapi.to/tv/1399-2-5"
        );
    }

    #[test]
    fn test_vidsrc_urls() {
        assert_eq!(
            urls().embed_url(EmbedServer::Vidsrc, MediaKind::Movie, 603, None),
            "https://vidsrc.xyz/embed/movie?tmdb=603&ds_lang=id"
        );
        assert_eq!(
            urls().embed_url(EmbedServer::Vidsrc, MediaKind::Tv, 1399, None),
            "https://vidsrc.xyz/embed/tv?tmdb=1399&season=1&episode=1&ds_lang=id"
        );
    }

    #[test]
    fn test_movies_ignore_position() {
        assert_eq!(
            urls().embed_url(
                EmbedServer::MoviesApi,
                MediaKind::Movie,
                603,
                Some(EpisodePosition::new(4, 4))
            ),
            "https://moviesapi.to/movie/603"
        );
    }

    #[test]
    fn test_server_parsing() {
        assert_eq!("VidSrc".parse::<EmbedServer>().unwrap(), EmbedServer::Vidsrc);
        assert_eq!(EmbedServer::default(), EmbedServer::Vidsrc);
        assert!("youtube".parse::<EmbedServer>().is_err());
    }
}
