//! Hymnal use-case services.
//!
//! # Responsibility
//! - Orchestrate dataset import and index loading over a repository.
//! - Keep CLI/FFI layers decoupled from storage details.

pub mod hymnal_service;
