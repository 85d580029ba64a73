//! Request handlers for the notes API.
//!
//! # Responsibility
//! - Parse and validate request-shaped input into typed core structures.
//! - Delegate to the note service and serialize its results.
//!
//! # Invariants
//! - Unknown `sortBy`/`sortOrder` spellings are client errors; numeric
//!   pagination inputs are clamped by the engine instead.
//! - Tag query parameters are comma-separated, trimmed and lowercased
//!   per element.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use jotpad_core::{
    core_version, normalize_tag, NoteDraft, NoteQuery, NoteService, PageResult, SortDirection,
    SortField, SqliteNoteRepository, DEFAULT_PAGE, DEFAULT_PAGE_SIZE,
};
use log::info;
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::json;
use std::sync::MutexGuard;
use uuid::Uuid;

use crate::error::ApiError;
use crate::AppState;

/// Typed query parameters for `GET /notes`.
///
/// The loose request record is parsed into enumerated, validated fields
/// before it reaches the query engine.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotesParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    /// Comma-separated tag filter, case-insensitive per element.
    pub tags: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl ListNotesParams {
    /// Converts the raw parameters into a typed [`NoteQuery`].
    ///
    /// Unknown sort spellings fail with a client error; missing values
    /// fall back to the engine defaults.
    pub fn into_query(self) -> Result<NoteQuery, ApiError> {
        let sort = match self.sort_by.as_deref() {
            None => SortField::default(),
            Some(value) => SortField::parse(value).ok_or_else(|| {
                ApiError::BadRequest(format!(
                    "sortBy must be one of updatedAt|createdAt|title, got `{value}`"
                ))
            })?,
        };
        let direction = match self.sort_order.as_deref() {
            None => SortDirection::default(),
            Some(value) => SortDirection::parse(value).ok_or_else(|| {
                ApiError::BadRequest(format!("sortOrder must be `asc` or `desc`, got `{value}`"))
            })?,
        };
        let tags = self
            .tags
            .map(|raw| raw.split(',').filter_map(normalize_tag).collect())
            .unwrap_or_default();

        Ok(NoteQuery {
            page: self.page.unwrap_or(DEFAULT_PAGE),
            page_size: self.limit.unwrap_or(DEFAULT_PAGE_SIZE),
            search: self.search,
            tags,
            sort,
            direction,
        })
    }
}

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "OK",
        "message": "Notes API is running",
        "version": core_version(),
    }))
}

pub async fn list_notes(
    State(state): State<AppState>,
    Query(params): Query<ListNotesParams>,
) -> Result<Json<PageResult>, ApiError> {
    let query = params.into_query()?;

    let mut conn = lock_db(&state)?;
    let repo = SqliteNoteRepository::try_new(&mut conn)?;
    let service = NoteService::new(repo);
    let result = service.list_notes(&query)?;
    Ok(Json(result))
}

pub async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = lock_db(&state)?;
    let repo = SqliteNoteRepository::try_new(&mut conn)?;
    let service = NoteService::new(repo);
    let note = service.get_note(id)?;
    Ok(Json(note))
}

pub async fn create_note(
    State(state): State<AppState>,
    Json(draft): Json<NoteDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = lock_db(&state)?;
    let repo = SqliteNoteRepository::try_new(&mut conn)?;
    let mut service = NoteService::new(repo);
    let note = service.create_note(&draft)?;

    info!("event=note_create module=api status=ok id={}", note.id);
    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<NoteDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = lock_db(&state)?;
    let repo = SqliteNoteRepository::try_new(&mut conn)?;
    let mut service = NoteService::new(repo);
    let note = service.update_note(id, &draft)?;

    info!("event=note_update module=api status=ok id={id}");
    Ok(Json(note))
}

pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = lock_db(&state)?;
    let repo = SqliteNoteRepository::try_new(&mut conn)?;
    let mut service = NoteService::new(repo);
    service.delete_note(id)?;

    info!("event=note_delete module=api status=ok id={id}");
    Ok(Json(json!({ "message": "Note deleted successfully" })))
}

pub async fn list_all_tags(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let mut conn = lock_db(&state)?;
    let repo = SqliteNoteRepository::try_new(&mut conn)?;
    let service = NoteService::new(repo);
    let tags = service.list_tags()?;
    Ok(Json(tags))
}

fn lock_db(state: &AppState) -> Result<MutexGuard<'_, Connection>, ApiError> {
    state
        .db
        .lock()
        .map_err(|_| ApiError::Internal("storage lock poisoned".to_string()))
}
