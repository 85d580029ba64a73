//! Core domain logic for jotpad.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{
    validate_fields, Note, NoteDraft, NoteId, NoteValidationError, CONTENT_MAX_CHARS,
    TITLE_MAX_CHARS,
};
pub use query::engine::{
    page_bounds, query_notes, search_terms, NoteQuery, PageInfo, PageResult, QueryError,
    SortDirection, SortField, DEFAULT_PAGE, DEFAULT_PAGE_SIZE, PAGE_SIZE_MAX,
};
pub use repo::note_repo::{
    normalize_tag, normalize_tags, NoteRepository, RepoError, RepoResult, SqliteNoteRepository,
};
pub use service::note_service::{NoteService, NoteServiceError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
