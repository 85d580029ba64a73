//! Note/tag repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide note persistence APIs over the `notes` table.
//! - Own tag-link replacement logic with atomic semantics.
//!
//! # Invariants
//! - All note reads are constrained to `is_deleted = 0`.
//! - Create/update replace the whole tag set in a single transaction.
//! - Tag names are normalized to lowercase before persistence.

use crate::db::DbError;
use crate::model::note::{validate_fields, Note, NoteId, NoteValidationError};
use crate::query::engine::{self, NoteQuery, PageResult, QueryError};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    content,
    created_at,
    updated_at
FROM notes";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(NoteValidationError),
    Db(DbError),
    NotFound(NoteId),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NoteValidationError> for RepoError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<QueryError> for RepoError {
    fn from(value: QueryError) -> Self {
        match value {
            QueryError::Db(err) => Self::Db(err),
            QueryError::InvalidData(message) => Self::InvalidData(message),
        }
    }
}

/// Repository interface for note CRUD and filtered reads.
pub trait NoteRepository {
    /// Creates one note with its tag links in a single transaction.
    fn create_note(
        &mut self,
        id: NoteId,
        title: &str,
        content: &str,
        tags: &[String],
    ) -> RepoResult<()>;
    /// Replaces title, content and the full tag set; refreshes `updated_at`.
    fn update_note(
        &mut self,
        id: NoteId,
        title: &str,
        content: &str,
        tags: &[String],
    ) -> RepoResult<()>;
    /// Gets one live note by id.
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Tombstones one note; subsequent reads no longer see it.
    fn delete_note(&mut self, id: NoteId) -> RepoResult<()>;
    /// Runs the query engine's filter/sort/pagination pipeline.
    fn query_notes(&self, query: &NoteQuery) -> RepoResult<PageResult>;
    /// Returns distinct tags across live notes, sorted by name.
    fn list_tags(&self) -> RepoResult<Vec<String>>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_note_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(
        &mut self,
        id: NoteId,
        title: &str,
        content: &str,
        tags: &[String],
    ) -> RepoResult<()> {
        validate_fields(title, content)?;

        let uuid = id.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        // Both timestamps come from the same statement, so SQLite evaluates
        // them against the same 'now' and created_at == updated_at holds.
        tx.execute(
            "INSERT INTO notes (uuid, title, content, created_at, updated_at)
             VALUES (?1, ?2, ?3, strftime('%s', 'now') * 1000, strftime('%s', 'now') * 1000);",
            params![uuid.as_str(), title, content],
        )?;
        replace_tags_in_tx(&tx, uuid.as_str(), tags)?;
        tx.commit()?;

        Ok(())
    }

    fn update_note(
        &mut self,
        id: NoteId,
        title: &str,
        content: &str,
        tags: &[String],
    ) -> RepoResult<()> {
        validate_fields(title, content)?;

        let uuid = id.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE notes
             SET
                title = ?2,
                content = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1
               AND is_deleted = 0;",
            params![uuid.as_str(), title, content],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        replace_tags_in_tx(&tx, uuid.as_str(), tags)?;
        tx.commit()?;

        Ok(())
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let uuid = id.to_string();
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE uuid = ?1
               AND is_deleted = 0;"
        ))?;

        let mut rows = stmt.query([uuid.as_str()])?;
        if let Some(row) = rows.next()? {
            let mut note = parse_note_row(row)?;
            note.tags = load_tags_for_note(self.conn, uuid.as_str())?;
            return Ok(Some(note));
        }

        Ok(None)
    }

    fn delete_note(&mut self, id: NoteId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE notes
             SET
                is_deleted = 1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1
               AND is_deleted = 0;",
            [id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn query_notes(&self, query: &NoteQuery) -> RepoResult<PageResult> {
        let result = engine::query_notes(self.conn, query)?;
        Ok(result)
    }

    fn list_tags(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT t.name
             FROM tags t
             INNER JOIN note_tags nt ON nt.tag_id = t.id
             INNER JOIN notes n ON n.uuid = nt.note_uuid
             WHERE n.is_deleted = 0
             ORDER BY t.name COLLATE NOCASE ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut tags = Vec::new();
        while let Some(row) = rows.next()? {
            let value: String = row.get("name")?;
            tags.push(value.to_lowercase());
        }
        Ok(tags)
    }
}

/// Normalizes one tag value according to the notes contract.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Normalizes and deduplicates tag values, case-insensitively.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut unique = BTreeSet::new();
    for tag in tags {
        if let Some(value) = normalize_tag(tag) {
            unique.insert(value);
        }
    }
    unique.into_iter().collect()
}

fn replace_tags_in_tx(tx: &Transaction<'_>, note_uuid: &str, tags: &[String]) -> RepoResult<()> {
    tx.execute(
        "DELETE FROM note_tags WHERE note_uuid = ?1;",
        [note_uuid],
    )?;

    for tag in tags {
        tx.execute(
            "INSERT OR IGNORE INTO tags (name) VALUES (?1);",
            [tag.as_str()],
        )?;
        tx.execute(
            "INSERT INTO note_tags (note_uuid, tag_id)
             SELECT ?1, id
             FROM tags
             WHERE name = ?2 COLLATE NOCASE;",
            params![note_uuid, tag.as_str()],
        )?;
    }

    Ok(())
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in notes.uuid"))
    })?;

    Ok(Note {
        id,
        title: row.get("title")?,
        content: row.get("content")?,
        tags: Vec::new(),
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn load_tags_for_note(conn: &Connection, note_uuid: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT t.name
         FROM note_tags nt
         INNER JOIN tags t ON t.id = nt.tag_id
         WHERE nt.note_uuid = ?1
         ORDER BY t.name COLLATE NOCASE ASC;",
    )?;
    let mut rows = stmt.query([note_uuid])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        tags.push(value.to_lowercase());
    }
    Ok(tags)
}

fn ensure_note_connection_ready(conn: &Connection) -> RepoResult<()> {
    for table in ["notes", "tags", "note_tags"] {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    for column in ["uuid", "title", "content", "created_at", "updated_at"] {
        if !table_has_column(conn, "notes", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "notes",
                column,
            });
        }
    }

    for column in ["note_uuid", "tag_id"] {
        if !table_has_column(conn, "note_tags", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "note_tags",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
