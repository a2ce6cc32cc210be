//! Domain model for persisted notes.
//!
//! # Responsibility
//! - Define canonical data structures used by the store and its callers.
//!
//! # Invariants
//! - Every note is identified by a storage-assigned `NoteId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod note;
