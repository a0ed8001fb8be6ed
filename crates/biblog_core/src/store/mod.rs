//! Flat-file table storage and row pagination.
//!
//! # Responsibility
//! - Read and write whole delimited-text tables as rows of string fields.
//! - Provide one windowed cursor shared by every entity repository.
//!
//! # Invariants
//! - A missing table file reads as zero rows, never as an error.
//! - Writes replace the whole file; readers never observe a partial table.
//! - There is no inter-process lock: concurrent writers race and the last
//!   rename wins. Single-operator use only.

use std::borrow::Cow;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod cursor;
mod table;

pub use cursor::RecordCursor;
pub use table::{read_all, write_all};

/// One table row: ordered string fields exactly as stored.
pub type Row = Vec<String>;

/// A row as read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredRow {
    Text(Row),
    /// At least one field is not UTF-8. The raw bytes are kept so the row
    /// can be written back unchanged.
    Bytes {
        fields: Vec<Vec<u8>>,
        /// Index of the first field that failed UTF-8 decoding.
        invalid_field: usize,
    },
}

impl StoredRow {
    pub fn text(&self) -> Option<&Row> {
        match self {
            Self::Text(fields) => Some(fields),
            Self::Bytes { .. } => None,
        }
    }

    /// Fields as text; invalid bytes become U+FFFD in `Bytes` rows.
    pub fn fields(&self) -> Cow<'_, [String]> {
        match self {
            Self::Text(fields) => Cow::Borrowed(fields.as_slice()),
            Self::Bytes { fields, .. } => Cow::Owned(
                fields
                    .iter()
                    .map(|field| String::from_utf8_lossy(field).into_owned())
                    .collect(),
            ),
        }
    }
}

impl From<Row> for StoredRow {
    fn from(value: Row) -> Self {
        Self::Text(value)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Transport-level failure while reading or writing a table file.
#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Csv {
        path: PathBuf,
        source: csv::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "table `{}`: {source}", path.display()),
            Self::Csv { path, source } => {
                write!(f, "table `{}` is not valid csv: {source}", path.display())
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
        }
    }
}
