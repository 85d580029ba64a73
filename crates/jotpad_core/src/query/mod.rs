//! List-query entry points.
//!
//! # Responsibility
//! - Expose the filter/sort/pagination pipeline over the note store.
//! - Keep result shaping (page metadata) inside core.

pub mod engine;
