//! Note use-case service.
//!
//! # Responsibility
//! - Provide note create/update/get/delete/list APIs.
//! - Normalize input (trimmed fields, canonical tags) before persistence.
//! - Delegate filtered reads to the query engine.
//!
//! # Invariants
//! - `update_note` uses full replacement semantics for content and tags.
//! - `created_at` is never touched after creation; `updated_at` is
//!   refreshed by every mutation.
//! - Tag names are normalized to lowercase and deduplicated.

use crate::model::note::{validate_fields, Note, NoteDraft, NoteId, NoteValidationError};
use crate::query::engine::{NoteQuery, PageResult};
use crate::repo::note_repo::{normalize_tags, NoteRepository, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Input failed field validation.
    Validation(NoteValidationError),
    /// Target note does not exist.
    NoteNotFound(NoteId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NoteValidationError> for NoteServiceError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NoteNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one note from a draft payload.
    ///
    /// Title and content are trimmed and validated; tags are normalized.
    /// The stored note is read back so callers get authoritative
    /// timestamps (`created_at == updated_at` on creation).
    pub fn create_note(&mut self, draft: &NoteDraft) -> Result<Note, NoteServiceError> {
        let title = draft.title.trim();
        let content = draft.content.trim();
        validate_fields(title, content)?;
        let tags = normalize_tags(&draft.tags);

        let id = Uuid::new_v4();
        self.repo.create_note(id, title, content, &tags)?;
        self.repo
            .get_note(id)?
            .ok_or(NoteServiceError::InconsistentState(
                "created note not found in read-back",
            ))
    }

    /// Replaces a note's title, content and tag set.
    ///
    /// `created_at` is untouched; `updated_at` is refreshed.
    pub fn update_note(
        &mut self,
        id: NoteId,
        draft: &NoteDraft,
    ) -> Result<Note, NoteServiceError> {
        let title = draft.title.trim();
        let content = draft.content.trim();
        validate_fields(title, content)?;
        let tags = normalize_tags(&draft.tags);

        self.repo.update_note(id, title, content, &tags)?;
        self.repo
            .get_note(id)?
            .ok_or(NoteServiceError::InconsistentState(
                "updated note not found in read-back",
            ))
    }

    /// Gets one note by stable ID.
    pub fn get_note(&self, id: NoteId) -> Result<Note, NoteServiceError> {
        self.repo
            .get_note(id)?
            .ok_or(NoteServiceError::NoteNotFound(id))
    }

    /// Tombstones one note; it disappears from all subsequent reads.
    pub fn delete_note(&mut self, id: NoteId) -> Result<(), NoteServiceError> {
        self.repo.delete_note(id)?;
        Ok(())
    }

    /// Runs the list-query pipeline (search, tag filter, sort, paging).
    pub fn list_notes(&self, query: &NoteQuery) -> Result<PageResult, NoteServiceError> {
        let result = self.repo.query_notes(query)?;
        Ok(result)
    }

    /// Lists distinct normalized tags across live notes, sorted by name.
    pub fn list_tags(&self) -> Result<Vec<String>, NoteServiceError> {
        let tags = self.repo.list_tags()?;
        Ok(tags)
    }
}
