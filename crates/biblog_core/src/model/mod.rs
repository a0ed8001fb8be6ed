//! Bibliography catalogue domain model.
//!
//! # Responsibility
//! - Define the canonical records persisted by the flat-file tables.
//! - Keep identifiers stable and opaque across the whole catalogue.
//!
//! # Invariants
//! - Every entity is identified by a process-generated UUID that is never
//!   reassigned once persisted.
//! - Entities are only created or (for reviews) updated; nothing is deleted.

pub mod bibliography;
pub mod classification;
pub mod review;
