//!
//! src/config.rs  Andrew Belles  Oct 2nd, 2025
//!
//! Loads credentials, endpoints, file locations and logger settings
//! from the environment (and .env) at program start
//!

use std::{io::IsTerminal, path::PathBuf, time};
use url::Url;

use crate::errors::EnricherError;

/// Constants for HTTP Config
pub const HTTP_TIMEOUT: u64 = 8000;
pub const HTTP_CONNECT_TIMEOUT: u64 = 2000;
pub const HTTP_POOL_MAX_IDLE: usize = 4;
pub const HTTP_POOL_IDLE_TIMEOUT: u64 = 90000;
pub const HTTP_MAX_REDIRECTS: u8 = 4;

pub const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const SPOTIFY_API_BASE: &str = "https://api.spotify.com/v1/";
pub const SPOTIFY_SEARCH_LIMIT: u32 = 10;
pub const SPOTIFY_SEARCH_LIMIT_MAX: u32 = 50;

pub const DEFAULT_INPUT: &str = "../billboard.csv";
pub const DEFAULT_OUTPUT: &str = "spotify-metadata.csv";
pub const DEFAULT_ARTIST_COLUMN: &str = "artist.inverted";

/// Source of configuration values; the process environment in production
pub type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Returns the value for s, treating blank values as unset
fn env_check(env: Lookup<'_>, s: &str) -> Result<String, EnricherError> {
    match env(s) {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(EnricherError::Config(format!("{s} was not set"))),
    }
}

fn env_or(env: Lookup<'_>, s: &str, default: &str) -> String {
    env(s)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Ensures that url is https
fn ensure_https(url: &Url) -> Result<(), String> {
    if url.scheme() == "https" {
        Ok(())
    } else {
        Err(format!("URL must be https: {url}"))
    }
}

fn ensure_host(url: &Url, expected_host: &str) -> Result<(), String> {
    match url.host_str() {
        Some(h) if h.eq_ignore_ascii_case(expected_host) => Ok(()),
        Some(h) => Err(
            format!("Unexpected host for {url} (got {h}, expected {expected_host})")
        ),
        None => Err(format!("URL missing host: {url}"))
    }
}

fn ensure_trailing_slash(url: &mut Url) {
    if !url.path().ends_with('/') {
        let mut path = url.path().to_string();
        path.push('/');
        url.set_path(&path);
    }
}

/// Configuration that Spotify expects when hitting endpoints
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: Url,
    pub api_base: Url,
    pub search_limit: u32,
}

fn build_spotify(env: Lookup<'_>) -> Result<SpotifyConfig, EnricherError> {
    let client_id     = env_check(env, "SPOTIFY_CLIENT_ID")?;
    let client_secret = env_check(env, "SPOTIFY_CLIENT_SECRET")?;

    // form urls
    let token_url = env_or(env, "SPOTIFY_TOKEN_URL", SPOTIFY_TOKEN_URL);
    let api_base  = env_or(env, "SPOTIFY_API_BASE", SPOTIFY_API_BASE);

    let token_url = Url::parse(&token_url)
        .map_err(|e| EnricherError::Config(
            format!("SPOTIFY_TOKEN_URL invalid {e}")
        ))?;

    let mut api_base = Url::parse(&api_base)
        .map_err(|e| EnricherError::Config(
            format!("SPOTIFY_API_BASE invalid {e}")
        ))?;

    // ensure valid https and hostname for both urls
    ensure_https(&token_url).map_err(EnricherError::Config)?;
    ensure_https(&api_base).map_err(EnricherError::Config)?;
    ensure_host(&token_url, "accounts.spotify.com")
        .map_err(EnricherError::Config)?;
    ensure_host(&api_base, "api.spotify.com")
        .map_err(EnricherError::Config)?;

    ensure_trailing_slash(&mut api_base);

    let search_limit = env("SPOTIFY_SEARCH_LIMIT")
        .and_then(|s| s.trim().parse::<u32>().ok())
        .unwrap_or(SPOTIFY_SEARCH_LIMIT)
        .clamp(1, SPOTIFY_SEARCH_LIMIT_MAX);

    Ok( SpotifyConfig { client_id, client_secret, token_url, api_base, search_limit })
}

///
/// Configuration for Http timeouts, pooling, etc.
///
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: time::Duration,
    pub connect_timeout: time::Duration,
    pub pool_max_idle_per_host: usize,
    pub pool_idle_timeout: time::Duration,
    pub max_redirects: u8,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: time::Duration::from_millis(HTTP_TIMEOUT),
            connect_timeout: time::Duration::from_millis(HTTP_CONNECT_TIMEOUT),
            pool_max_idle_per_host: HTTP_POOL_MAX_IDLE,
            pool_idle_timeout: time::Duration::from_millis(HTTP_POOL_IDLE_TIMEOUT),
            max_redirects: HTTP_MAX_REDIRECTS,
        }
    }
}

///
/// Where the song table is read from and the metadata table is written to
///
#[derive(Debug, Clone)]
pub struct IoConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub artist_column: String,
    pub genre_priority_file: Option<PathBuf>,
}

fn build_io(env: Lookup<'_>) -> IoConfig {
    IoConfig {
        input_path: PathBuf::from(env_or(env, "ENRICH_INPUT", DEFAULT_INPUT)),
        output_path: PathBuf::from(env_or(env, "ENRICH_OUTPUT", DEFAULT_OUTPUT)),
        artist_column: env_or(env, "ENRICH_ARTIST_COLUMN", DEFAULT_ARTIST_COLUMN),
        genre_priority_file: env("GENRE_PRIORITY_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from),
    }
}

///
/// Configuration for Logger
///

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json
}

impl LogFormat {
    pub fn parse(s: &str) -> Option<LogFormat> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Some(LogFormat::Pretty),
            "json"   => Some(LogFormat::Json),
            _ => None
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter_directives: String,
    pub format: LogFormat,
    pub with_ansi: bool,
    pub include_file_line: bool,
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter_directives: "info,artist_enricher=debug,reqwest=warn".to_string(),
            format: LogFormat::Pretty,
            // logs go to stderr, which is often redirected to a file
            with_ansi: std::io::stderr().is_terminal(),
            include_file_line: false,
            include_target: true,
        }
    }
}

fn build_logging(env: Lookup<'_>) -> Result<LoggingConfig, EnricherError> {
    let mut logging = LoggingConfig::default();
    if let Some(raw) = env("LOG_FORMAT").filter(|v| !v.trim().is_empty()) {
        logging.format = LogFormat::parse(&raw).ok_or_else(|| EnricherError::Config(
            format!("LOG_FORMAT must be pretty or json (got {raw})")
        ))?;
    }
    if let Some(raw) = env("LOG_ANSI").filter(|v| !v.trim().is_empty()) {
        logging.with_ansi = match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => true,
            "0" | "false" | "no" => false,
            _ => return Err(EnricherError::Config(
                format!("LOG_ANSI must be true or false (got {raw})")
            ))
        };
    }
    if logging.format == LogFormat::Json {
        logging.include_file_line = true;
        logging.with_ansi = false;
    }
    Ok(logging)
}

///
/// AppConfig which holds everything the enricher needs to run
///
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub spotify: SpotifyConfig,
    pub http: HttpConfig,
    pub io: IoConfig,
    pub logging: LoggingConfig
}

///
/// Return all environment variables to caller at program start.
///
pub fn load_config() -> Result<AppConfig, EnricherError> {
    dotenvy::dotenv().ok();
    load_config_from(&|key: &str| std::env::var(key).ok())
}

pub fn load_config_from(env: Lookup<'_>) -> Result<AppConfig, EnricherError> {
    let spotify = build_spotify(env)?;
    let http    = HttpConfig::default();
    let io      = build_io(env);
    let logging = build_logging(env)?;

    Ok( AppConfig { spotify, http, io, logging } )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn load(map: &HashMap<String, String>) -> Result<AppConfig, EnricherError> {
        load_config_from(&|key: &str| map.get(key).cloned())
    }

    fn credentials() -> Vec<(&'static str, &'static str)> {
        vec![("SPOTIFY_CLIENT_ID", "id"), ("SPOTIFY_CLIENT_SECRET", "secret")]
    }

    #[test]
    fn defaults_apply_with_only_credentials() {
        let cfg = load(&env_of(&credentials())).unwrap();

        assert_eq!(cfg.spotify.client_id, "id");
        assert_eq!(cfg.spotify.token_url.as_str(), SPOTIFY_TOKEN_URL);
        assert_eq!(cfg.spotify.api_base.as_str(), SPOTIFY_API_BASE);
        assert_eq!(cfg.spotify.search_limit, SPOTIFY_SEARCH_LIMIT);
        assert_eq!(cfg.io.input_path, PathBuf::from(DEFAULT_INPUT));
        assert_eq!(cfg.io.output_path, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(cfg.io.artist_column, "artist.inverted");
        assert!(cfg.io.genre_priority_file.is_none());
        assert_eq!(cfg.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn missing_or_blank_secret_is_rejected() {
        let err = load(&env_of(&[("SPOTIFY_CLIENT_ID", "id")])).unwrap_err();
        assert!(matches!(err, EnricherError::Config(ref m) if m.contains("SPOTIFY_CLIENT_SECRET")));

        let err = load(&env_of(&[
            ("SPOTIFY_CLIENT_ID", "id"),
            ("SPOTIFY_CLIENT_SECRET", "   "),
        ])).unwrap_err();
        assert!(matches!(err, EnricherError::Config(_)));
    }

    #[test]
    fn api_base_must_be_https_on_spotify_host() {
        let mut pairs = credentials();
        pairs.push(("SPOTIFY_API_BASE", "http://api.spotify.com/v1/"));
        assert!(matches!(load(&env_of(&pairs)), Err(EnricherError::Config(_))));

        let mut pairs = credentials();
        pairs.push(("SPOTIFY_TOKEN_URL", "https://example.com/api/token"));
        assert!(matches!(load(&env_of(&pairs)), Err(EnricherError::Config(_))));
    }

    #[test]
    fn api_base_gains_trailing_slash() {
        let mut pairs = credentials();
        pairs.push(("SPOTIFY_API_BASE", "https://api.spotify.com/v1"));
        let cfg = load(&env_of(&pairs)).unwrap();
        assert_eq!(cfg.spotify.api_base.as_str(), "https://api.spotify.com/v1/");
        assert_eq!(cfg.spotify.api_base.join("search").unwrap().path(), "/v1/search");
    }

    #[test]
    fn search_limit_is_clamped_and_falls_back() {
        let mut pairs = credentials();
        pairs.push(("SPOTIFY_SEARCH_LIMIT", "500"));
        assert_eq!(load(&env_of(&pairs)).unwrap().spotify.search_limit, 50);

        let mut pairs = credentials();
        pairs.push(("SPOTIFY_SEARCH_LIMIT", "lots"));
        assert_eq!(load(&env_of(&pairs)).unwrap().spotify.search_limit, SPOTIFY_SEARCH_LIMIT);
    }

    #[test]
    fn io_and_logging_overrides() {
        let mut pairs = credentials();
        pairs.extend([
            ("ENRICH_INPUT", "data/songs.csv"),
            ("ENRICH_OUTPUT", "out/meta.csv"),
            ("ENRICH_ARTIST_COLUMN", "artist"),
            ("GENRE_PRIORITY_FILE", "genres.json"),
            ("LOG_FORMAT", "JSON"),
        ]);
        let cfg = load(&env_of(&pairs)).unwrap();
        assert_eq!(cfg.io.input_path, PathBuf::from("data/songs.csv"));
        assert_eq!(cfg.io.output_path, PathBuf::from("out/meta.csv"));
        assert_eq!(cfg.io.artist_column, "artist");
        assert_eq!(cfg.io.genre_priority_file, Some(PathBuf::from("genres.json")));
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert!(cfg.logging.include_file_line);

        assert!(!cfg.logging.with_ansi);

        let mut pairs = credentials();
        pairs.push(("LOG_FORMAT", "xml"));
        assert!(matches!(load(&env_of(&pairs)), Err(EnricherError::Config(_))));
    }

    #[test]
    fn ansi_follows_override() {
        let mut pairs = credentials();
        pairs.push(("LOG_ANSI", "false"));
        assert!(!load(&env_of(&pairs)).unwrap().logging.with_ansi);

        let mut pairs = credentials();
        pairs.push(("LOG_ANSI", "TRUE"));
        assert!(load(&env_of(&pairs)).unwrap().logging.with_ansi);

        let mut pairs = credentials();
        pairs.push(("LOG_ANSI", "maybe"));
        assert!(matches!(load(&env_of(&pairs)), Err(EnricherError::Config(ref m)) if m.contains("LOG_ANSI")));
    }

    #[test]
    fn ansi_defaults_to_stderr_terminal() {
        let cfg = load(&env_of(&credentials())).unwrap();
        assert_eq!(cfg.logging.with_ansi, std::io::stderr().is_terminal());
    }
}
