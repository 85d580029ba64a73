//! HTTP surface for the jotpad note service.
//!
//! # Responsibility
//! - Translate HTTP requests into note service / query engine calls.
//! - Map domain errors onto HTTP statuses with JSON error bodies.
//!
//! # Invariants
//! - Handlers never touch SQL; all persistence goes through
//!   `jotpad_core` services.
//! - Each request runs to completion under the connection lock, so no
//!   partial write is ever observable.

use axum::routing::get;
use axum::Router;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

pub mod config;
pub mod error;
pub mod handlers;

/// Shared application state.
///
/// rusqlite connections are not `Sync`; the mutex serializes operations,
/// which is exactly the single-process request/response model the service
/// is specified against.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Wraps a migrated connection for handler use.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }
}

/// Builds the application router.
///
/// The static `/notes/tags/all` route coexists with `/notes/:id`; axum
/// gives static segments priority over captures.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/notes",
            get(handlers::list_notes).post(handlers::create_note),
        )
        .route("/notes/tags/all", get(handlers::list_all_tags))
        .route(
            "/notes/:id",
            get(handlers::get_note)
                .put(handlers::update_note)
                .delete(handlers::delete_note),
        )
        .with_state(state)
}
