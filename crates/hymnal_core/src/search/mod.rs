//! Hymn filtering and search entry points.
//!
//! # Responsibility
//! - Filter hymns by section and by free text across number, title, refrain,
//!   verses and section title.
//! - Keep result shaping (counts, summary text, highlight hints) inside core.
//!
//! # Invariants
//! - Filtering is stable: results keep dataset order, never re-sorted.
//! - Section and text filters compose as an intersection.

pub mod filter;
pub mod index;
