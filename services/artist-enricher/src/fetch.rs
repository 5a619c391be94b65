//!
//! src/fetch.rs  Andrew Belles  Oct 2nd, 2025
//!
//! Defines methods for hitting spotify endpoints: the client credentials
//! token exchange and the artist search. Every request is one-shot; a
//! failing request is returned to the caller untouched.
//!

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header, redirect, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use tokio::{sync::Mutex, time::Instant};
use tracing::debug;
use url::Url;

use crate::config::{HttpConfig, SpotifyConfig};
use crate::errors::EnricherError;
use crate::resolver::ArtistCatalog;
use crate::types::{ArtistRecord, ArtistSearchResponse};

/// Refresh this long before spotify says the token expires
const TOKEN_EXPIRY_MARGIN: u64 = 60;
const TOKEN_DEFAULT_LIFETIME: u64 = 3600;

/// Client building functionality
fn client_helper(http: &HttpConfig) -> reqwest::ClientBuilder {
    Client::builder()
        .timeout(http.timeout)
        .connect_timeout(http.connect_timeout)
        .pool_max_idle_per_host(http.pool_max_idle_per_host)
        .pool_idle_timeout(Some(http.pool_idle_timeout))
        .redirect(redirect::Policy::limited(http.max_redirects as usize))
}

fn client_with_headers(http: &HttpConfig, headers: header::HeaderMap) ->
    Result<Client, EnricherError> {
    client_helper(http)
        .default_headers(headers)
        .build()
        .map_err(|e| EnricherError::Http(format!("build client: {e}")))
}

pub fn base_client(http: &HttpConfig) -> Result<Client, EnricherError> {
    let mut h = header::HeaderMap::new();
    h.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
    client_with_headers(http, h)
}

/// Sends once and decodes a json body, mapping failure statuses onto errors
pub async fn send_json<T: DeserializeOwned>(request: RequestBuilder) ->
    Result<T, EnricherError> {
    let response = request.send().await?;
    let status = response.status();

    if status.is_success() {
        let body = response.text().await?;
        return Ok(serde_json::from_str(&body)?);
    }

    let retry_after = response.headers()
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response.text().await
        .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
    Err(status_error(status, retry_after, &body))
}

fn status_error(status: StatusCode, retry_after: Option<String>, body: &str) -> EnricherError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN =>
            EnricherError::Auth(format!("{status}: {body}")),
        StatusCode::TOO_MANY_REQUESTS =>
            EnricherError::RateLimited(retry_after.unwrap_or_else(|| "unknown".to_string())),
        _ => EnricherError::Http(format!("{status}: {body}"))
    }
}

#[derive(Clone, Debug)]
pub struct SpotifyClient {
    pub http: Client,
    pub cfg: SpotifyConfig,
    search_url: Url
}

impl SpotifyClient {
    pub fn new(http_config: &HttpConfig, cfg: &SpotifyConfig) ->
        Result<Self, EnricherError> {

        let http = base_client(http_config)?;
        let search_url = cfg.api_base.join("search")
            .map_err(|e| EnricherError::Config(format!("search url: {e}")))?;
        Ok( Self {
            http,
            cfg: cfg.clone(),
            search_url
        })
    }

    /// POST accounts token endpoint with the client credentials grant
    pub fn token_request(&self) -> RequestBuilder {
        self.http
            .post(self.cfg.token_url.clone())
            .basic_auth(&self.cfg.client_id, Some(&self.cfg.client_secret))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
    }

    /// GET /v1/search?type=artist&q=...&limit=
    pub fn search_artists(&self, query: &str, limit: u32, bearer: &str) -> RequestBuilder {
        let limit = limit.to_string();
        self.http.get(self.search_url.clone()).bearer_auth(bearer).query(&[
            ("type", "artist"),
            ("q", query),
            ("limit", limit.as_str())
        ])
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>
}

#[derive(Debug, Clone)]
struct BearerToken {
    access_token: String,
    expires_at: Instant
}

impl BearerToken {
    fn from_response(response: TokenResponse) -> Self {
        let lifetime = response.expires_in
            .unwrap_or(TOKEN_DEFAULT_LIFETIME)
            .saturating_sub(TOKEN_EXPIRY_MARGIN);
        Self {
            access_token: response.access_token,
            expires_at: Instant::now() + Duration::from_secs(lifetime)
        }
    }

    fn is_fresh(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

///
/// Spotify-backed artist catalog. Owns the http client and the cached
/// bearer token; both are released when the catalog is dropped.
///
pub struct SpotifyCatalog {
    client: SpotifyClient,
    token: Mutex<Option<BearerToken>>
}

impl SpotifyCatalog {
    pub fn new(http_config: &HttpConfig, cfg: &SpotifyConfig) -> Result<Self, EnricherError> {
        Ok( Self {
            client: SpotifyClient::new(http_config, cfg)?,
            token: Mutex::new(None)
        })
    }

    async fn refresh_token(&self) -> Result<BearerToken, EnricherError> {
        let response: TokenResponse = send_json(self.client.token_request())
            .await
            .map_err(|e| match e {
                EnricherError::Http(msg) if msg.starts_with("400") =>
                    EnricherError::Auth(format!("token request rejected: {msg}")),
                other => other
            })?;
        let token = BearerToken::from_response(response);
        debug!(expires_at = ?token.expires_at, "spotify.token.refreshed");
        Ok(token)
    }

    async fn bearer(&self) -> Result<String, EnricherError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.access_token.clone());
        }
        let token = self.refresh_token().await?;
        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }
}

#[async_trait]
impl ArtistCatalog for SpotifyCatalog {
    async fn search_artists(&self, query: &str) -> Result<Vec<ArtistRecord>, EnricherError> {
        let bearer = self.bearer().await?;
        let request = self.client.search_artists(query, self.client.cfg.search_limit, &bearer);
        let response: ArtistSearchResponse = send_json(request).await?;
        debug!(query, results = response.artists.items.len(), "spotify.search");
        Ok(response.artists.items)
    }
}
