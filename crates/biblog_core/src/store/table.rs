//! Whole-table read/write over the `csv` codec.
//!
//! # Invariants
//! - Rows may have differing field counts; shape checks belong to callers.
//! - A row that is not UTF-8 is returned as `StoredRow::Bytes`, never as an
//!   error for the whole table.
//! - `write_all` goes through a sibling temp file and an atomic rename that
//!   keeps the permissions of the file it replaces.

use super::{StoreError, StoreResult, StoredRow};
use log::{error, info, warn};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::time::Instant;
use tempfile::NamedTempFile;

/// Reads every row of the table at `path`, header included.
///
/// Returns an empty vector when the file does not exist.
///
/// # Errors
/// - `StoreError::Io` when the file exists but cannot be opened.
/// - `StoreError::Csv` when the content cannot be tokenized.
pub fn read_all(path: &Path) -> StoreResult<Vec<StoredRow>> {
    let started_at = Instant::now();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!(
                "event=table_read module=store status=ok path={} rows=0 missing=true",
                path.display()
            );
            return Ok(Vec::new());
        }
        Err(err) => {
            error!(
                "event=table_read module=store status=error path={} error_code=open_failed error={}",
                path.display(),
                err
            );
            return Err(StoreError::io(path, err));
        }
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record.map_err(|err| {
            error!(
                "event=table_read module=store status=error path={} error_code=decode_failed error={}",
                path.display(),
                err
            );
            StoreError::csv(path, err)
        })?;
        let row = match csv::StringRecord::from_byte_record(record) {
            Ok(record) => StoredRow::Text(record.iter().map(str::to_owned).collect()),
            Err(err) => {
                let invalid_field = err.utf8_error().field();
                warn!(
                    "event=table_read module=store status=degraded path={} record={} field={} error_code=invalid_utf8",
                    path.display(),
                    rows.len(),
                    invalid_field
                );
                StoredRow::Bytes {
                    fields: err.into_byte_record().iter().map(<[u8]>::to_vec).collect(),
                    invalid_field,
                }
            }
        };
        rows.push(row);
    }

    info!(
        "event=table_read module=store status=ok path={} rows={} duration_ms={}",
        path.display(),
        rows.len(),
        started_at.elapsed().as_millis()
    );
    Ok(rows)
}

/// Replaces the table at `path` with `rows`.
///
/// Callers pass the header as the first row. The parent directory must
/// already exist.
///
/// # Side effects
/// - Creates a temp file next to `path`, then renames it over `path`.
pub fn write_all(path: &Path, rows: &[StoredRow]) -> StoreResult<()> {
    let started_at = Instant::now();
    match write_via_temp(path, rows) {
        Ok(()) => {
            info!(
                "event=table_write module=store status=ok path={} rows={} duration_ms={}",
                path.display(),
                rows.len(),
                started_at.elapsed().as_millis()
            );
            Ok(())
        }
        Err(err) => {
            error!(
                "event=table_write module=store status=error path={} duration_ms={} error={}",
                path.display(),
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn write_via_temp(path: &Path, rows: &[StoredRow]) -> StoreResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir).map_err(|err| StoreError::io(path, err))?;

    {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(temp.as_file_mut());
        for row in rows {
            let written = match row {
                StoredRow::Text(fields) => writer.write_record(fields),
                StoredRow::Bytes { fields, .. } => writer.write_record(fields),
            };
            written.map_err(|err| StoreError::csv(path, err))?;
        }
        writer.flush().map_err(|err| StoreError::io(path, err))?;
    }

    temp.as_file_mut()
        .flush()
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|err| StoreError::io(path, err))?;
    keep_permissions(path, temp.as_file())?;
    temp.persist(path)
        .map_err(|err| StoreError::io(path, err.error))?;
    Ok(())
}

/// Copies the mode of an existing table onto its replacement.
fn keep_permissions(path: &Path, replacement: &File) -> StoreResult<()> {
    let permissions = match fs::metadata(path) {
        Ok(metadata) => metadata.permissions(),
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(StoreError::io(path, err)),
    };
    replacement
        .set_permissions(permissions)
        .map_err(|err| StoreError::io(path, err))
}
