//! Hymnal domain model.
//!
//! # Responsibility
//! - Define the canonical hymn and section records used by lookup and search.
//! - Keep one typed shape regardless of how the bundled dataset spells fields.
//!
//! # Invariants
//! - Every `HymnRecord` carries a positive `number` and a non-empty `title`.
//! - Verses are stored canonically as exactly `VERSE_COUNT` slots.

pub mod hymn;
pub mod section;
