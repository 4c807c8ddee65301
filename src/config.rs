//! Runtime configuration
//!
//! Configuration is gathered from the process environment, optionally
//! seeded from a `.env` file in the working directory. Everything has a
//! sensible default except the TMDB credential, whose absence is only
//! reported once a metadata request is attempted.

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default TMDB v3 API root
pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Default availability provider API root
pub const DEFAULT_AVAILABILITY_BASE_URL: &str = "https://moviesapi.club/api";

/// Default TMDB image CDN root
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Default vidsrc embed root
pub const DEFAULT_VIDSRC_EMBED_URL: &str = "https://vidsrc.xyz/embed";

/// Default moviesapi embed root
pub const DEFAULT_MOVIESAPI_EMBED_URL: &str = "https://moviesapi.to";

/// Errors raised when required configuration is missing or malformed
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// No TMDB credential is configured
    #[error("TMDB API key is not configured (set CINESCOPE_TMDB_API_KEY or TMDB_API_KEY)")]
    MissingCredential,

    /// An environment variable holds a value that cannot be used
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    /// Failed to determine a data directory for the preference stores
    #[error("Failed to determine data directory location")]
    DataDirectoryNotFound,

    /// The `.env` file exists but could not be parsed
    #[error("Failed to load .env file: {0}")]
    EnvFile(#[from] dotenvy::Error),
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// TMDB v3 API key, injected as `api_key` on every metadata call
    pub tmdb_api_key: Option<String>,
    pub tmdb_base_url: String,
    pub availability_base_url: String,
    pub image_base_url: String,
    pub vidsrc_embed_url: String,
    pub moviesapi_embed_url: String,
    /// Subtitle language requested from embed players that support it
    pub subtitle_language: String,
    /// ISO 3166-1 region whose watch providers detail pages show
    pub watch_region: String,
    /// Overall request timeout; `None` keeps the transport default
    pub request_timeout: Option<Duration>,
    /// Directory holding the persisted preference blobs
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tmdb_api_key: None,
            tmdb_base_url: DEFAULT_TMDB_BASE_URL.to_string(),
            availability_base_url: DEFAULT_AVAILABILITY_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            vidsrc_embed_url: DEFAULT_VIDSRC_EMBED_URL.to_string(),
            moviesapi_embed_url: DEFAULT_MOVIESAPI_EMBED_URL.to_string(),
            subtitle_language: "id".to_string(),
            watch_region: "ID".to_string(),
            request_timeout: None,
            data_dir: None,
        }
    }
}

impl Config {
    /// Loads configuration from `.env` (if present) and the environment
    ///
    /// A missing `.env` file is not an error. A malformed one is.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(dotenvy::Error::Io(_)) => {}
            Err(e) => return Err(ConfigurationError::EnvFile(e)),
        }

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        config.tmdb_api_key =
            non_empty("CINESCOPE_TMDB_API_KEY").or_else(|| non_empty("TMDB_API_KEY"));

        if let Some(url) = non_empty("CINESCOPE_TMDB_BASE_URL") {
            config.tmdb_base_url = trim_slash(url);
        }
        if let Some(url) = non_empty("CINESCOPE_AVAILABILITY_BASE_URL") {
            config.availability_base_url = trim_slash(url);
        }
        if let Some(url) = non_empty("CINESCOPE_IMAGE_BASE_URL") {
            config.image_base_url = trim_slash(url);
        }
        if let Some(url) = non_empty("CINESCOPE_VIDSRC_EMBED_URL") {
            config.vidsrc_embed_url = trim_slash(url);
        }
        if let Some(url) = non_empty("CINESCOPE_MOVIESAPI_EMBED_URL") {
            config.moviesapi_embed_url = trim_slash(url);
        }
        if let Some(lang) = non_empty("CINESCOPE_SUBTITLE_LANGUAGE") {
            config.subtitle_language = lang;
        }
        if let Some(region) = non_empty("CINESCOPE_WATCH_REGION") {
            config.watch_region = region.trim().to_ascii_uppercase();
        }
        if let Some(secs) = non_empty("CINESCOPE_REQUEST_TIMEOUT_SECS") {
            let parsed = secs
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigurationError::InvalidValue {
                    name: "CINESCOPE_REQUEST_TIMEOUT_SECS",
                    value: secs.clone(),
                })?;
            config.request_timeout = Some(Duration::from_secs(parsed));
        }
        if let Some(dir) = non_empty("CINESCOPE_DATA_DIR") {
            config.data_dir = Some(PathBuf::from(dir));
        }

        Ok(config)
    }

    /// Returns the credential or fails with [`ConfigurationError::MissingCredential`]
    pub fn require_api_key(&self) -> Result<&str, ConfigurationError> {
        self.tmdb_api_key
            .as_deref()
            .ok_or(ConfigurationError::MissingCredential)
    }

    /// Resolves the directory the preference stores live in
    ///
    /// Falls back to the platform data directory for the application.
    pub fn resolve_data_dir(&self) -> Result<PathBuf, ConfigurationError> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }

        let proj_dirs = directories::ProjectDirs::from("app", "cinescope", "cinescope")
            .ok_or(ConfigurationError::DataDirectoryNotFound)?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }
}

fn trim_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
