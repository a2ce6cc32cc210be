//! Repository layer: data access contracts and SQLite implementation.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes enforce `validate_title()` before persistence.
//! - "Not found" is reported through affected-row counts, not errors.

pub mod note_repo;
