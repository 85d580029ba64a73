//! Combined search/filter/sort/pagination pipeline over the note store.
//!
//! # Responsibility
//! - Turn a [`NoteQuery`] into a deterministic page of notes plus
//!   pagination metadata.
//! - Keep SQL predicate construction and page arithmetic in one place.
//!
//! # Invariants
//! - Only non-deleted notes are visible to queries.
//! - Queries read live store state; there is no snapshotting.
//! - Result ordering is deterministic: sort field, then insertion order.
//! - Out-of-range numeric parameters are clamped, never errors.
//!
//! Search is plain substring matching: the search text is split on
//! whitespace and a note matches when every term occurs in its title or
//! content. Matching is monotonic (every substring occurrence is found)
//! and case-insensitive with ASCII folding, per SQLite `lower()`.
//! Relevance ranking is deliberately absent: [`SortField`] has no rank
//! member, so a rank could never be observed in the output order.

use crate::db::DbError;
use crate::model::note::{Note, NoteId};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Default page number for list queries.
pub const DEFAULT_PAGE: u32 = 1;
/// Default page size for list queries.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Upper bound for caller-provided page sizes.
pub const PAGE_SIZE_MAX: u32 = 100;

/// Result type for query APIs.
pub type QueryResult<T> = Result<T, QueryError>;

/// Query-layer error for DB interaction and result decoding.
#[derive(Debug)]
pub enum QueryError {
    Db(DbError),
    InvalidData(String),
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid query row: {message}"),
        }
    }
}

impl Error for QueryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for QueryError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for QueryError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Sortable note fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    UpdatedAt,
    CreatedAt,
    Title,
}

impl SortField {
    /// Parses the external spelling used by the HTTP API.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "updatedAt" => Some(Self::UpdatedAt),
            "createdAt" => Some(Self::CreatedAt),
            "title" => Some(Self::Title),
            _ => None,
        }
    }

    /// External spelling, the inverse of [`SortField::parse`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UpdatedAt => "updatedAt",
            Self::CreatedAt => "createdAt",
            Self::Title => "title",
        }
    }

    fn column(self) -> &'static str {
        match self {
            Self::UpdatedAt => "updated_at",
            Self::CreatedAt => "created_at",
            Self::Title => "title",
        }
    }
}

/// Sort direction for the primary sort field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    /// Parses the external spelling used by the HTTP API.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(Self::Ascending),
            "desc" => Some(Self::Descending),
            _ => None,
        }
    }

    /// External spelling, the inverse of [`SortDirection::parse`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// Query options for note list use-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteQuery {
    /// 1-based page number. Zero clamps to 1.
    pub page: u32,
    /// Rows per page. Defaults to 10 and clamps to [1, 100].
    pub page_size: u32,
    /// Optional search text; blank means no constraint.
    pub search: Option<String>,
    /// Tag filter with OR semantics; empty means no constraint.
    pub tags: Vec<String>,
    /// Primary sort field.
    pub sort: SortField,
    /// Sort direction for the primary field.
    pub direction: SortDirection,
}

impl Default for NoteQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            search: None,
            tags: Vec::new(),
            sort: SortField::default(),
            direction: SortDirection::default(),
        }
    }
}

/// Pagination metadata returned alongside every page.
///
/// Serialized with the external API's field names
/// (`current`/`pages`/`total`/`hasNext`/`hasPrev`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Effective (clamped) page number of this result.
    pub current: u32,
    /// Total page count; at least 1 even for an empty match set.
    pub pages: u32,
    /// Total number of matching notes across all pages.
    pub total: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

/// One page of query output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    pub notes: Vec<Note>,
    pub pagination: PageInfo,
}

/// Page arithmetic for a known match count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
    /// Total page count, minimum 1.
    pub pages: u32,
    /// Row offset of the requested page.
    pub offset: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Computes pagination bounds for a match count and clamped page inputs.
///
/// A page beyond the last yields an offset past the end (an empty slice),
/// never an error.
pub fn page_bounds(total: u64, page: u32, page_size: u32) -> PageBounds {
    let size = u64::from(page_size.max(1));
    let page = page.max(1);
    let pages_raw = ((total + size - 1) / size).max(1);
    let pages = pages_raw.min(u64::from(u32::MAX)) as u32;
    let offset = u64::from(page - 1) * size;

    PageBounds {
        pages,
        offset,
        has_next: page < pages,
        has_prev: page > 1,
    }
}

/// Clamps a caller-provided page number.
pub fn normalize_page(page: u32) -> u32 {
    page.max(DEFAULT_PAGE)
}

/// Clamps a caller-provided page size according to the notes contract.
pub fn normalize_page_size(page_size: u32) -> u32 {
    match page_size {
        0 => DEFAULT_PAGE_SIZE,
        value if value > PAGE_SIZE_MAX => PAGE_SIZE_MAX,
        value => value,
    }
}

/// Splits search text into lowercased whitespace-separated terms.
pub fn search_terms(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|term| term.to_lowercase())
        .collect()
}

/// Runs the full filter/sort/pagination pipeline against the live store.
///
/// Purely a read operation; never mutates.
pub fn query_notes(conn: &Connection, query: &NoteQuery) -> QueryResult<PageResult> {
    let page = normalize_page(query.page);
    let page_size = normalize_page_size(query.page_size);
    let (filter_sql, filter_binds) = build_filter(query);

    let count_sql = format!("SELECT COUNT(*) FROM notes{filter_sql};");
    let total: i64 = conn.query_row(
        &count_sql,
        params_from_iter(filter_binds.iter().cloned()),
        |row| row.get(0),
    )?;
    let total = total.max(0) as u64;

    let bounds = page_bounds(total, page, page_size);

    let select_sql = format!(
        "SELECT uuid, title, content, created_at, updated_at
         FROM notes{filter_sql}
         ORDER BY {} {}, rowid ASC
         LIMIT ? OFFSET ?;",
        query.sort.column(),
        query.direction.keyword()
    );
    let mut binds = filter_binds;
    binds.push(Value::Integer(i64::from(page_size)));
    binds.push(Value::Integer(bounds.offset.min(i64::MAX as u64) as i64));

    let mut stmt = conn.prepare(&select_sql)?;
    let mut rows = stmt.query(params_from_iter(binds))?;
    let mut notes = Vec::new();
    while let Some(row) = rows.next()? {
        let mut note = parse_query_row(row)?;
        note.tags = load_note_tags(conn, note.id)?;
        notes.push(note);
    }

    Ok(PageResult {
        notes,
        pagination: PageInfo {
            current: page,
            pages: bounds.pages,
            total,
            has_next: bounds.has_next,
            has_prev: bounds.has_prev,
        },
    })
}

/// Builds the WHERE clause and bind values for a query's filter criteria.
///
/// Absence of a criterion adds no constraint; the base predicate only
/// excludes tombstoned rows.
fn build_filter(query: &NoteQuery) -> (String, Vec<Value>) {
    let mut sql = String::from(" WHERE is_deleted = 0");
    let mut binds: Vec<Value> = Vec::new();

    if let Some(search) = query.search.as_deref() {
        for term in search_terms(search) {
            sql.push_str(" AND (instr(lower(title), ?) > 0 OR instr(lower(content), ?) > 0)");
            binds.push(Value::Text(term.clone()));
            binds.push(Value::Text(term));
        }
    }

    let tags: Vec<String> = query
        .tags
        .iter()
        .filter_map(|tag| {
            let trimmed = tag.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_lowercase())
            }
        })
        .collect();
    if !tags.is_empty() {
        let placeholders = vec!["?"; tags.len()].join(", ");
        sql.push_str(&format!(
            " AND EXISTS (
                SELECT 1
                FROM note_tags nt
                INNER JOIN tags t ON t.id = nt.tag_id
                WHERE nt.note_uuid = notes.uuid
                  AND t.name COLLATE NOCASE IN ({placeholders})
            )"
        ));
        for tag in tags {
            binds.push(Value::Text(tag));
        }
    }

    (sql, binds)
}

fn parse_query_row(row: &Row<'_>) -> QueryResult<Note> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text)
        .map_err(|_| QueryError::InvalidData(format!("invalid uuid `{uuid_text}`")))?;

    Ok(Note {
        id,
        title: row.get("title")?,
        content: row.get("content")?,
        tags: Vec::new(),
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn load_note_tags(conn: &Connection, id: NoteId) -> QueryResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT t.name
         FROM note_tags nt
         INNER JOIN tags t ON t.id = nt.tag_id
         WHERE nt.note_uuid = ?1
         ORDER BY t.name COLLATE NOCASE ASC;",
    )?;
    let mut rows = stmt.query([id.to_string()])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        tags.push(value.to_lowercase());
    }
    Ok(tags)
}
