//! Review domain model.
//!
//! # Responsibility
//! - Hold free-text reading notes attached to exactly one bibliography.
//! - Own the timestamp rules for review edits.
//!
//! # Invariants
//! - `book_id` referenced an existing bibliography when the review was created.
//! - `goals` is never blank; `goals`/`summary` are stored untrimmed.
//! - `created_at` never changes; `updated_at` never moves backwards.

use crate::model::bibliography::BibliographyId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a review record.
pub type ReviewId = Uuid;

/// Reading review for one bibliography.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub book_id: BibliographyId,
    /// Why the work is being read. Required.
    pub goals: String,
    /// Optional free-form summary; empty when not written yet.
    pub summary: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Review {
    /// Creates a review stamped with `now` for both timestamps.
    pub fn new(
        book_id: BibliographyId,
        goals: impl Into<String>,
        summary: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            book_id,
            goals: goals.into(),
            summary: summary.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Advances `updated_at` to `now`, never earlier than the current value.
    ///
    /// A wall clock stepping backwards must not make an edit look older than
    /// the state it replaced.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.updated_at {
            self.updated_at = now;
        }
    }
}
