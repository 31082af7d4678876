//! Repository layer for the local hymn store.
//!
//! # Responsibility
//! - Define hymn persistence contracts.
//! - Keep SQL details out of service and search code.
//!
//! # Invariants
//! - Reads return hymns in import order, matching dataset order.
//! - Repository APIs return semantic errors (`NotFound`) alongside DB errors.

pub mod hymn_repo;
