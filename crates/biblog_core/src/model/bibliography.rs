//! Bibliography domain model.
//!
//! # Responsibility
//! - Describe one published work as stored in the bibliography table.
//!
//! # Invariants
//! - `code` is the uppercased first letter of `kind` followed by the
//!   classification code number (`Book` + `56` -> `B56`).
//! - `bib_index` is immutable once assigned, whether derived or supplied.
//! - `title`/`author` keep the caller's original script; English overrides
//!   only influence `bib_index` and are not stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a bibliography record.
pub type BibliographyId = Uuid;

/// Canonical record for a published work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bibliography {
    pub id: BibliographyId,
    /// Human-readable catalogue key, e.g. `B56EE03DDD`.
    pub bib_index: String,
    /// Type prefix plus classification code, e.g. `B56`.
    pub code: String,
    /// Serialized as `type` to match the table column naming.
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub isbn: String,
    pub published_date: DateTime<Utc>,
}
