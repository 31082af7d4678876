//! Mobile UI bindings for the hymnal core.

pub mod api;
