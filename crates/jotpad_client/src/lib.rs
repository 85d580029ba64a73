//! Client state layer for the jotpad API.
//!
//! # Responsibility
//! - Hold the current list-view state as an immutable value object.
//! - Debounce search dispatches without leaking timers.
//! - Talk to the HTTP surface and surface its errors verbatim.
//!
//! # Invariants
//! - State transitions never mutate in place; callers thread new values.
//! - A failed mutation leaves the caller's state untouched.

pub mod api;
pub mod debounce;
pub mod query_state;

pub use api::{ClientError, DeleteConfirmation, HealthStatus, NotesClient};
pub use debounce::{Debouncer, DEFAULT_DEBOUNCE};
pub use query_state::QueryState;
