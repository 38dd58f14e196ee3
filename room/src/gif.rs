//! Gif provider: async lookup of gif payloads by id.
//!
//! A gif relay event carries only an id; the full payload (render URL and
//! dimensions) is resolved out-of-band against the provider before the gif
//! enters the store. Resolution is fire-and-forget and fallible: a failed
//! lookup means a dropped event, never a user-visible error. The trait seam
//! exists so the engine is tested with a mock provider instead of a network.

#[cfg(test)]
#[path = "gif_test.rs"]
mod tests;

use std::time::Duration;

use serde::{Deserialize, Serialize};

const GIPHY_API_URL: &str = "https://api.giphy.com";
const REQUEST_TIMEOUT_SECS: u64 = 15;
const CONNECT_TIMEOUT_SECS: u64 = 5;

// =============================================================================
// ERROR TYPE
// =============================================================================

/// Errors produced by gif lookups.
#[derive(Debug, thiserror::Error)]
pub enum GifError {
    /// The required API key environment variable is not set.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The HTTP request to the provider failed.
    #[error("gif request failed: {0}")]
    Request(String),

    /// The provider returned a non-success HTTP status.
    #[error("gif lookup returned status {status}")]
    Status { status: u16 },

    /// The provider response body could not be deserialized.
    #[error("gif response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

// =============================================================================
// PAYLOAD
// =============================================================================

/// Everything the renderer needs to draw a resolved gif.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GifPayload {
    pub id: String,
    pub title: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
}

// =============================================================================
// PROVIDER SEAM
// =============================================================================

/// External gif-resource provider: `resolve(id) -> payload`, async and
/// fallible, no retry on failure.
#[async_trait::async_trait]
pub trait GifProvider: Send + Sync {
    async fn resolve(&self, id: &str) -> Result<GifPayload, GifError>;
}

// =============================================================================
// GIPHY CLIENT
// =============================================================================

/// Giphy lookup-by-id client.
pub struct GiphyClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GiphyClient {
    /// Build a client with the given API key.
    ///
    /// # Errors
    ///
    /// Returns [`GifError::HttpClientBuild`] if the HTTP client cannot be
    /// constructed.
    pub fn new(api_key: String) -> Result<Self, GifError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| GifError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: GIPHY_API_URL.to_owned(), api_key })
    }

    /// Build a client from `GIPHY_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`GifError::MissingApiKey`] when the variable is unset.
    pub fn from_env() -> Result<Self, GifError> {
        let api_key = std::env::var("GIPHY_API_KEY")
            .map_err(|_| GifError::MissingApiKey { var: "GIPHY_API_KEY".into() })?;
        Self::new(api_key)
    }

    /// Point the client at a different host (tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait::async_trait]
impl GifProvider for GiphyClient {
    async fn resolve(&self, id: &str) -> Result<GifPayload, GifError> {
        let url = format!("{}/v1/gifs/{id}", self.base_url);
        let response = self
            .http
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| GifError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| GifError::Request(e.to_string()))?;

        if status != 200 {
            return Err(GifError::Status { status });
        }

        parse_lookup(&text)
    }
}

// =============================================================================
// WIRE TYPES / PARSING
// =============================================================================

#[derive(Deserialize)]
struct LookupResponse {
    data: LookupData,
}

#[derive(Deserialize)]
struct LookupData {
    id: String,
    #[serde(default)]
    title: String,
    images: LookupImages,
}

#[derive(Deserialize)]
struct LookupImages {
    original: LookupOriginal,
}

/// Giphy serializes dimensions as strings.
#[derive(Deserialize)]
struct LookupOriginal {
    url: String,
    #[serde(default)]
    width: String,
    #[serde(default)]
    height: String,
}

fn parse_lookup(json: &str) -> Result<GifPayload, GifError> {
    let api: LookupResponse = serde_json::from_str(json).map_err(|e| GifError::Parse(e.to_string()))?;

    Ok(GifPayload {
        id: api.data.id,
        title: api.data.title,
        url: api.data.images.original.url,
        width: api.data.images.original.width.parse().unwrap_or(0),
        height: api.data.images.original.height.parse().unwrap_or(0),
    })
}
