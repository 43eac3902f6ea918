//! Client side of the transfer protocol.
//!
//! [`Transfer::submit`] maps to `POST /save` and [`Transfer::retrieve`] to
//! `GET /load/{name}`. Status codes come back as [`TransferError`] variants
//! one-to-one; nothing is retried, since retrying a conflicted save or a
//! consumed load would change what the store guarantees.

use std::time::Duration;

use async_trait::async_trait;
use common::protocol::{is_reserved_name, ErrorResponse, LoadResponse, SaveRequest};
use reqwest::{Client, Response, StatusCode, Url};
use thiserror::Error;
use tracing::debug;

/// Default server base URL.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

/// Default timeout applied to every request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const INVALID_NAME: &str = "Invalid document name";

/// Failures reported by a [`Transfer`].
#[derive(Debug, Error)]
pub enum TransferError {
    /// The store rejected the request as incomplete.
    #[error("rejected by the store: {0}")]
    Validation(String),

    /// A document with this name is already stored.
    #[error("Document already exists")]
    Conflict,

    /// No document with this name is stored (or it was already loaded).
    #[error("Document not found")]
    NotFound,

    /// The store answered with a status outside the protocol.
    #[error("unexpected response from the store ({status}): {message}")]
    Unexpected { status: u16, message: String },

    /// The configured server URL cannot address the protocol routes.
    #[error("invalid server URL: {0}")]
    InvalidUrl(String),

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Save/load operations against a document store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transfer: Send + Sync {
    /// Store `envelope` under `name`.
    ///
    /// # Errors
    ///
    /// [`TransferError::Validation`] for an empty name or envelope, or a name
    /// of `.` or `..`; [`TransferError::Conflict`] if the name is taken.
    async fn submit(&self, name: &str, envelope: &str) -> Result<(), TransferError>;

    /// Fetch the envelope stored under `name`. The store forgets it on success.
    ///
    /// # Errors
    ///
    /// [`TransferError::NotFound`] if nothing is stored under `name`;
    /// [`TransferError::Validation`] for a name of `.` or `..`.
    async fn retrieve(&self, name: &str) -> Result<String, TransferError>;
}

/// [`Transfer`] over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpTransfer {
    client: Client,
    base: Url,
}

impl HttpTransfer {
    /// Create a transfer for the server at `base_url`.
    ///
    /// A path prefix in `base_url` is kept (`http://host/docvault` talks to
    /// `http://host/docvault/save`).
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::InvalidUrl`] if `base_url` is not an absolute
    /// HTTP(S) URL, or [`TransferError::Http`] if the client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, TransferError> {
        let base = Url::parse(base_url).map_err(|e| TransferError::InvalidUrl(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
            return Err(TransferError::InvalidUrl(base_url.to_owned()));
        }
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, base })
    }

    /// Base URL this transfer talks to.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Append `segments` to the base path, percent-encoding each one.
    ///
    /// `.` and `..` are refused: the URL parser would drop them and the
    /// request would address a different route.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, TransferError> {
        if segments.iter().any(|s| is_reserved_name(s)) {
            return Err(TransferError::Validation(INVALID_NAME.into()));
        }
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| TransferError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl Transfer for HttpTransfer {
    async fn submit(&self, name: &str, envelope: &str) -> Result<(), TransferError> {
        // The name travels in the body here but in the path on retrieve.
        if is_reserved_name(name) {
            return Err(TransferError::Validation(INVALID_NAME.into()));
        }
        let url = self.endpoint(&["save"])?;
        let body = SaveRequest {
            name: name.to_owned(),
            content: envelope.to_owned(),
        };
        let resp = self.client.post(url).json(&body).send().await?;
        match resp.status() {
            status if status.is_success() => {
                debug!("envelope submitted");
                Ok(())
            }
            StatusCode::CONFLICT => Err(TransferError::Conflict),
            StatusCode::BAD_REQUEST => Err(TransferError::Validation(error_message(resp).await)),
            status => Err(unexpected(status, resp).await),
        }
    }

    async fn retrieve(&self, name: &str) -> Result<String, TransferError> {
        let url = self.endpoint(&["load", name])?;
        let resp = self.client.get(url).send().await?;
        match resp.status() {
            status if status.is_success() => {
                let body: LoadResponse = resp.json().await?;
                debug!("envelope retrieved");
                Ok(body.content)
            }
            StatusCode::NOT_FOUND => Err(TransferError::NotFound),
            status => Err(unexpected(status, resp).await),
        }
    }
}

async fn unexpected(status: StatusCode, resp: Response) -> TransferError {
    TransferError::Unexpected {
        status: status.as_u16(),
        message: error_message(resp).await,
    }
}

/// The `message` of a JSON error body, or the raw body text.
async fn error_message(resp: Response) -> String {
    let text = resp.text().await.unwrap_or_default();
    serde_json::from_str::<ErrorResponse>(&text)
        .map(|e| e.message)
        .unwrap_or(text)
}
