//! Catalogue data-directory configuration.
//!
//! # Responsibility
//! - Resolve where the three table files live.
//! - Build repositories bound to those files.
//!
//! # Invariants
//! - Resolution order: explicit path, then `BIBLOG_DATA_DIR`, then `data`.
//! - `ensure_data_dir` creates the data directory; logging creates only
//!   its `logs` subdirectory, after the data directory exists.

use crate::repo::bibliography_repo::CsvBibliographyRepository;
use crate::repo::classification_repo::CsvClassificationRepository;
use crate::repo::review_repo::CsvReviewRepository;
use crate::store::{StoreError, StoreResult};
use log::info;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable overriding the default data directory.
pub const DATA_DIR_ENV: &str = "BIBLOG_DATA_DIR";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const BIBLIOGRAPHY_FILE_NAME: &str = "bibliographies.csv";
pub const CLASSIFICATION_FILE_NAME: &str = "classifications.csv";
pub const REVIEW_FILE_NAME: &str = "reviews.csv";
const LOG_DIR_NAME: &str = "logs";

/// Location of the catalogue tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    data_dir: PathBuf,
}

impl CatalogConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Resolves the data directory from `explicit` or the process environment.
    pub fn resolve(explicit: Option<PathBuf>) -> Self {
        Self::resolve_from(explicit, std::env::var_os(DATA_DIR_ENV))
    }

    fn resolve_from(explicit: Option<PathBuf>, env_value: Option<OsString>) -> Self {
        let data_dir = explicit
            .or_else(|| {
                env_value
                    .filter(|value| !value.is_empty())
                    .map(PathBuf::from)
            })
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn bibliography_path(&self) -> PathBuf {
        self.data_dir.join(BIBLIOGRAPHY_FILE_NAME)
    }

    pub fn classification_path(&self) -> PathBuf {
        self.data_dir.join(CLASSIFICATION_FILE_NAME)
    }

    pub fn review_path(&self) -> PathBuf {
        self.data_dir.join(REVIEW_FILE_NAME)
    }

    /// Absolute log directory below the data directory.
    pub fn log_dir(&self) -> StoreResult<PathBuf> {
        let dir = self.data_dir.join(LOG_DIR_NAME);
        if dir.is_absolute() {
            return Ok(dir);
        }
        std::env::current_dir()
            .map(|cwd| cwd.join(&dir))
            .map_err(|err| StoreError::io(&dir, err))
    }

    /// Creates the data directory when it does not exist yet.
    pub fn ensure_data_dir(&self) -> StoreResult<()> {
        if self.data_dir.is_dir() {
            return Ok(());
        }
        std::fs::create_dir_all(&self.data_dir)
            .map_err(|err| StoreError::io(&self.data_dir, err))?;
        info!(
            "event=data_dir_create module=config status=ok path={}",
            self.data_dir.display()
        );
        Ok(())
    }

    pub fn bibliography_repository(&self) -> CsvBibliographyRepository {
        CsvBibliographyRepository::new(self.bibliography_path())
    }

    pub fn classification_repository(&self) -> CsvClassificationRepository {
        CsvClassificationRepository::new(self.classification_path())
    }

    pub fn review_repository(&self) -> CsvReviewRepository {
        CsvReviewRepository::new(self.review_path())
    }
}
