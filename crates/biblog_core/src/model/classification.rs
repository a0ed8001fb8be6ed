//! Classification domain model.
//!
//! # Invariants
//! - `code_num` is positive and unique across the classification table.
//! - `name` is never blank.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a classification record.
pub type ClassificationId = Uuid;

/// A named category with a unique numeric code, e.g. `56 Technology`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub id: ClassificationId,
    /// Numeric code embedded in every bibliography code, e.g. `56`.
    pub code_num: u32,
    pub name: String,
}

impl Classification {
    /// Creates a classification with a freshly generated ID.
    pub fn new(code_num: u32, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            code_num,
            name: name.into(),
        }
    }
}
