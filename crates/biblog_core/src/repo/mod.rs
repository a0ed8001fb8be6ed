//! Repository layer: entity codecs, the generic CSV table adapter and the
//! per-entity capability traits.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts per entity type.
//! - Implement all of them with one generic flat-file adapter.
//!
//! # Invariants
//! - `save` is an upsert keyed by entity ID.
//! - A malformed data row is skipped and reported, never fatal to a scan.
//! - Lookups return `Ok(None)` for absence; callers decide if that is an error.

use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod bibliography_repo;
pub mod classification_repo;
pub mod codec;
pub mod csv_repo;
pub mod review_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for table access.
#[derive(Debug)]
pub enum RepoError {
    Store(StoreError),
    /// The first row of an existing table is not the expected header.
    HeaderMismatch {
        path: PathBuf,
        expected: &'static [&'static str],
        found: Vec<String>,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::HeaderMismatch {
                path,
                expected,
                found,
            } => write!(
                f,
                "table `{}` has header `{}`, expected `{}`",
                path.display(),
                found.join(","),
                expected.join(",")
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::HeaderMismatch { .. } => None,
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Pagination options for list scans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Maximum rows to return. `None` or `Some(0)` means unbounded.
    pub limit: Option<u32>,
    /// Number of data rows to skip.
    pub offset: u32,
}

impl ListQuery {
    /// Query returning every row.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn page(limit: u32, offset: u32) -> Self {
        Self {
            limit: Some(limit),
            offset,
        }
    }

    pub(crate) fn cursor_bounds(&self) -> (i64, i64) {
        (
            self.limit.map_or(0, i64::from),
            i64::from(self.offset),
        )
    }
}
