//! Generic flat-file repository shared by every entity table.
//!
//! # Responsibility
//! - Compose table store, record codec and cursor into upsert/scan/lookup.
//! - Report malformed rows out-of-band instead of failing the operation.
//!
//! # Invariants
//! - Every `upsert` is a full read-modify-write of the table file; there is
//!   no lock, so concurrent writers lose updates (last rename wins).
//! - Rows that do not decode, including non-UTF-8 rows, are written back
//!   untouched by `upsert`.
//! - Nothing is cached; every call reflects the file at call time.

use crate::repo::codec::{header_row, row_id, CsvRecord, DecodeError};
use crate::repo::{ListQuery, RepoError, RepoResult};
use crate::store::{read_all, write_all, RecordCursor, StoredRow};
use log::{debug, warn};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A data row that was skipped during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based position among data rows (header excluded).
    pub row_number: usize,
    pub error: DecodeError,
}

/// Result of a scan: decoded entities plus the rows that were skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scan<T> {
    pub items: Vec<T>,
    pub skipped: Vec<SkippedRow>,
}

/// CSV table adapter for entity type `T`.
pub struct CsvRepository<T> {
    path: PathBuf,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for CsvRepository<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            _record: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for CsvRepository<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvRepository")
            .field("path", &self.path)
            .finish()
    }
}

impl<T: CsvRecord> CsvRepository<T> {
    /// Creates a repository over the table file at `path`.
    ///
    /// The file does not need to exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Inserts `record`, or replaces the row carrying the same ID.
    ///
    /// # Errors
    /// - `RepoError::HeaderMismatch` when the existing table has a foreign header.
    /// - `RepoError::Store` when reading or rewriting the file fails.
    pub fn upsert(&self, record: &T) -> RepoResult<()> {
        let mut rows = self.load_rows()?;
        let id = record.id();
        let encoded = record.to_row();

        let mode = match rows.iter().position(|row| row_id(&*row.fields()) == Some(id)) {
            Some(index) => {
                rows[index] = StoredRow::Text(encoded);
                "update"
            }
            None => {
                rows.push(StoredRow::Text(encoded));
                "insert"
            }
        };

        rows.insert(0, StoredRow::Text(header_row::<T>()));
        write_all(&self.path, &rows)?;
        debug!(
            "event=record_save module=repo status=ok table={} mode={} id={}",
            T::TABLE,
            mode,
            id
        );
        Ok(())
    }

    /// Decodes the rows inside the `query` window.
    pub fn scan(&self, query: &ListQuery) -> RepoResult<Scan<T>> {
        let rows = self.load_rows()?;
        let (limit, offset) = query.cursor_bounds();
        let mut cursor = RecordCursor::new(&rows, limit, offset);

        let mut scan = Scan {
            items: Vec::with_capacity(cursor.len()),
            skipped: Vec::new(),
        };
        while cursor.advance() {
            let (Some(index), Some(row)) = (cursor.position(), cursor.record()) else {
                break;
            };
            match decode::<T>(row) {
                Ok(record) => scan.items.push(record),
                Err(error) => scan.skipped.push(self.report_skipped(index, error)),
            }
        }
        Ok(scan)
    }

    /// Returns the entity whose ID column equals `id`.
    pub fn get(&self, id: Uuid) -> RepoResult<Option<T>> {
        self.find_first(|row| row_id(row) == Some(id))
    }

    /// Returns the first decodable row accepted by `matches`.
    ///
    /// `matches` sees the raw row, so only candidate rows are decoded.
    /// Non-UTF-8 rows are matched on their lossy text.
    pub fn find_first<P>(&self, matches: P) -> RepoResult<Option<T>>
    where
        P: Fn(&[String]) -> bool,
    {
        let rows = self.load_rows()?;
        for (index, row) in rows.iter().enumerate() {
            if !matches(&*row.fields()) {
                continue;
            }
            match decode::<T>(row) {
                Ok(record) => return Ok(Some(record)),
                Err(error) => {
                    self.report_skipped(index, error);
                }
            }
        }
        Ok(None)
    }

    /// Returns every decodable row accepted by `matches`, in table order.
    pub fn find_where<P>(&self, matches: P) -> RepoResult<Vec<T>>
    where
        P: Fn(&[String]) -> bool,
    {
        let rows = self.load_rows()?;
        let mut found = Vec::new();
        for (index, row) in rows.iter().enumerate() {
            if !matches(&*row.fields()) {
                continue;
            }
            match decode::<T>(row) {
                Ok(record) => found.push(record),
                Err(error) => {
                    self.report_skipped(index, error);
                }
            }
        }
        Ok(found)
    }

    /// Reads the table and strips its header.
    fn load_rows(&self) -> RepoResult<Vec<StoredRow>> {
        let mut rows = read_all(&self.path)?;
        if rows.is_empty() {
            return Ok(rows);
        }

        let header = rows.remove(0);
        let matches_header = header
            .text()
            .is_some_and(|header| header.iter().map(String::as_str).eq(T::HEADER.iter().copied()));
        if !matches_header {
            warn!(
                "event=table_header module=repo status=error table={} path={}",
                T::TABLE,
                self.path.display()
            );
            return Err(RepoError::HeaderMismatch {
                path: self.path.clone(),
                expected: T::HEADER,
                found: header.fields().into_owned(),
            });
        }
        Ok(rows)
    }

    fn report_skipped(&self, index: usize, error: DecodeError) -> SkippedRow {
        let skipped = SkippedRow {
            row_number: index + 1,
            error,
        };
        warn!(
            "event=row_skipped module=repo status=skipped table={} row={} error={}",
            T::TABLE,
            skipped.row_number,
            skipped.error
        );
        skipped
    }
}

fn decode<T: CsvRecord>(row: &StoredRow) -> Result<T, DecodeError> {
    match row {
        StoredRow::Text(fields) => T::from_row(fields),
        StoredRow::Bytes { invalid_field, .. } => Err(DecodeError::InvalidUtf8 {
            column: T::HEADER.get(*invalid_field).copied().unwrap_or("extra"),
        }),
    }
}
