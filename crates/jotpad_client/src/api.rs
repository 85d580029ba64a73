//! Thin HTTP client for the notes API.
//!
//! # Responsibility
//! - Map the API's endpoints onto typed calls sharing core DTOs.
//! - Surface server error messages without reinterpreting them.
//!
//! # Invariants
//! - Requests time out after 10 seconds.
//! - Non-success responses become [`ClientError::Api`] carrying the
//!   server's `{"error": ...}` message when present.

use jotpad_core::{Note, NoteDraft, NoteId, PageResult};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

use crate::query_state::QueryState;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client-side error for API calls.
#[derive(Debug)]
pub enum ClientError {
    /// Transport-level failure (connect, timeout, decode).
    Http(reqwest::Error),
    /// The server answered with a non-success status.
    Api { status: u16, message: String },
}

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(err) => write!(f, "{err}"),
            Self::Api { status, message } => write!(f, "server error {status}: {message}"),
        }
    }
}

impl Error for ClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            Self::Api { .. } => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

/// Confirmation payload returned by `DELETE /notes/:id`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteConfirmation {
    pub message: String,
}

/// Liveness payload returned by `GET /health`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for one API base URL.
#[derive(Debug, Clone)]
pub struct NotesClient {
    base_url: String,
    http: reqwest::Client,
}

impl NotesClient {
    /// Creates a client for `base_url` (scheme + authority, no trailing
    /// slash required).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Fetches one page of notes for the given query state.
    pub async fn list_notes(&self, state: &QueryState) -> Result<PageResult, ClientError> {
        let response = self
            .http
            .get(self.url("/notes"))
            .query(&state.to_params())
            .send()
            .await?;
        decode(response).await
    }

    /// Fetches a single note by id.
    pub async fn get_note(&self, id: NoteId) -> Result<Note, ClientError> {
        let response = self.http.get(self.url(&format!("/notes/{id}"))).send().await?;
        decode(response).await
    }

    /// Creates a note and returns the stored record.
    pub async fn create_note(&self, draft: &NoteDraft) -> Result<Note, ClientError> {
        let response = self
            .http
            .post(self.url("/notes"))
            .json(draft)
            .send()
            .await?;
        decode(response).await
    }

    /// Replaces a note and returns the stored record.
    pub async fn update_note(&self, id: NoteId, draft: &NoteDraft) -> Result<Note, ClientError> {
        let response = self
            .http
            .put(self.url(&format!("/notes/{id}")))
            .json(draft)
            .send()
            .await?;
        decode(response).await
    }

    /// Deletes a note and returns the server's confirmation message.
    pub async fn delete_note(&self, id: NoteId) -> Result<DeleteConfirmation, ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/notes/{id}")))
            .send()
            .await?;
        decode(response).await
    }

    /// Fetches the sorted list of all known tags.
    pub async fn all_tags(&self) -> Result<Vec<String>, ClientError> {
        let response = self.http.get(self.url("/notes/tags/all")).send().await?;
        decode(response).await
    }

    /// Checks server liveness.
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let response = self.http.get(self.url("/health")).send().await?;
        decode(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    };

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
