//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record and its incoming draft shape.
//! - Enforce title/content validation limits shared by all write paths.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - Persisted `title` and `content` are trimmed and non-empty.
//! - `tags` hold normalized (trimmed, lowercase) names without duplicates.
//! - `created_at` is set once; `updated_at` never moves backwards.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every note.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NoteId = Uuid;

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 200;
/// Maximum content length in characters.
pub const CONTENT_MAX_CHARS: usize = 10_000;

/// Canonical note record as read from storage.
///
/// Serialized with camelCase field names to match the external API schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Stable global ID used for lookup and linking.
    pub id: NoteId,
    /// Trimmed title, never empty.
    pub title: String,
    /// Trimmed body text, never empty.
    pub content: String,
    /// Normalized tag names in lexicographic order.
    pub tags: Vec<String>,
    /// Unix epoch milliseconds, set once at creation.
    pub created_at: i64,
    /// Unix epoch milliseconds, refreshed on every mutation.
    pub updated_at: i64,
}

/// Incoming note payload before validation and normalization.
///
/// Missing JSON fields default to empty values so that validation, not
/// deserialization, decides whether the request is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Field-level validation failure for note writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteValidationError {
    /// Title is empty after trimming.
    EmptyTitle,
    /// Content is empty after trimming.
    EmptyContent,
    /// Title exceeds [`TITLE_MAX_CHARS`].
    TitleTooLong { chars: usize },
    /// Content exceeds [`CONTENT_MAX_CHARS`].
    ContentTooLong { chars: usize },
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title is required"),
            Self::EmptyContent => write!(f, "content is required"),
            Self::TitleTooLong { chars } => write!(
                f,
                "title is {chars} characters, maximum is {TITLE_MAX_CHARS}"
            ),
            Self::ContentTooLong { chars } => write!(
                f,
                "content is {chars} characters, maximum is {CONTENT_MAX_CHARS}"
            ),
        }
    }
}

impl Error for NoteValidationError {}

/// Validates already-trimmed title and content fields.
///
/// Write paths must call this before any SQL mutation; lengths are
/// measured in characters, not bytes.
pub fn validate_fields(title: &str, content: &str) -> Result<(), NoteValidationError> {
    if title.is_empty() {
        return Err(NoteValidationError::EmptyTitle);
    }
    if content.is_empty() {
        return Err(NoteValidationError::EmptyContent);
    }

    let title_chars = title.chars().count();
    if title_chars > TITLE_MAX_CHARS {
        return Err(NoteValidationError::TitleTooLong { chars: title_chars });
    }
    let content_chars = content.chars().count();
    if content_chars > CONTENT_MAX_CHARS {
        return Err(NoteValidationError::ContentTooLong {
            chars: content_chars,
        });
    }

    Ok(())
}
