//! Core domain logic for the biblog bibliography catalogue.
//! This crate is the single source of truth for catalogue invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::CatalogConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::bibliography::{Bibliography, BibliographyId};
pub use model::classification::{Classification, ClassificationId};
pub use model::review::{Review, ReviewId};
pub use repo::bibliography_repo::{BibliographyRepository, CsvBibliographyRepository};
pub use repo::classification_repo::{ClassificationRepository, CsvClassificationRepository};
pub use repo::codec::{CsvRecord, DecodeError};
pub use repo::csv_repo::{CsvRepository, Scan, SkippedRow};
pub use repo::review_repo::{CsvReviewRepository, ReviewRepository};
pub use repo::{ListQuery, RepoError, RepoResult};
pub use service::bib_index::{contains_japanese, generate_bib_index, BibIndexInput};
pub use service::bibliography_service::{
    BibliographyService, BibliographyServiceError, NewBibliography,
};
pub use service::review_service::{ReviewService, ReviewServiceError, ReviewUpdate};
pub use store::{StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
