//! CLI application wiring.
//!
//! # Responsibility
//! - Bind core services to the CSV tables of one data directory.
//! - Turn validated CLI requests into service calls.
//!
//! # Invariants
//! - `App::open` is the only place that creates the data directory.
//! - Output formatting stays in `main`; this module returns entities.

use crate::prompt::PromptError;
use crate::requests::{
    AddBibliographyRequest, AddClassificationRequest, AddReviewRequest, ListRequest,
    RequestError, UpdateReviewRequest,
};
use biblog_core::{
    Bibliography, BibliographyService, BibliographyServiceError, CatalogConfig, Classification,
    CsvBibliographyRepository, CsvClassificationRepository, CsvReviewRepository, RepoError,
    Review, ReviewService, ReviewServiceError, StoreError,
};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum AppError {
    Store(StoreError),
    Repo(RepoError),
    Prompt(PromptError),
    Request(RequestError),
    Bibliography(BibliographyServiceError),
    Review(ReviewServiceError),
    Json(serde_json::Error),
    /// No bibliography carries this BibIndex.
    UnknownBibIndex(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Prompt(err) => write!(f, "{err}"),
            Self::Request(err) => write!(f, "{err}"),
            Self::Bibliography(err) => write!(f, "{err}"),
            Self::Review(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "failed to encode JSON: {err}"),
            Self::UnknownBibIndex(bib_index) => {
                write!(f, "bibliography with BibIndex {bib_index} not found")
            }
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Prompt(err) => Some(err),
            Self::Request(err) => Some(err),
            Self::Bibliography(err) => Some(err),
            Self::Review(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::UnknownBibIndex(_) => None,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<RepoError> for AppError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<PromptError> for AppError {
    fn from(value: PromptError) -> Self {
        Self::Prompt(value)
    }
}

impl From<RequestError> for AppError {
    fn from(value: RequestError) -> Self {
        Self::Request(value)
    }
}

impl From<BibliographyServiceError> for AppError {
    fn from(value: BibliographyServiceError) -> Self {
        Self::Bibliography(value)
    }
}

impl From<ReviewServiceError> for AppError {
    fn from(value: ReviewServiceError) -> Self {
        Self::Review(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

pub type AppResult<T> = Result<T, AppError>;

pub struct App {
    bibliographies: BibliographyService<CsvBibliographyRepository, CsvClassificationRepository>,
    reviews: ReviewService<CsvReviewRepository, CsvBibliographyRepository>,
}

impl App {
    /// Creates the data directory if needed and wires the services.
    pub fn open(config: &CatalogConfig) -> AppResult<Self> {
        config.ensure_data_dir()?;
        let bibliography_repo = config.bibliography_repository();
        Ok(Self {
            bibliographies: BibliographyService::new(
                bibliography_repo.clone(),
                config.classification_repository(),
            ),
            reviews: ReviewService::new(config.review_repository(), bibliography_repo),
        })
    }

    pub fn add_classification(
        &self,
        request: &AddClassificationRequest,
    ) -> AppResult<Classification> {
        let (code, name) = request.validate()?;
        Ok(self.bibliographies.add_classification(code, name)?)
    }

    pub fn add_bibliography(&self, request: &AddBibliographyRequest) -> AppResult<Bibliography> {
        let new = request.to_new_bibliography()?;
        Ok(self.bibliographies.add_bibliography(&new)?)
    }

    /// Resolves the reviewed work by BibIndex, then adds the review to it.
    pub fn add_review(&self, request: &AddReviewRequest) -> AppResult<Review> {
        let (bib_index, goals, summary) = request.validate()?;
        let bibliography = self.resolve_bib_index(bib_index)?;
        Ok(self.reviews.add_review(bibliography.id, goals, summary)?)
    }

    pub fn update_review(&self, request: &UpdateReviewRequest) -> AppResult<Review> {
        let (id, update) = request.validate()?;
        Ok(self.reviews.update_review(id, &update)?)
    }

    pub fn list_bibliographies(&self, request: &ListRequest) -> AppResult<Vec<Bibliography>> {
        Ok(self.bibliographies.list_bibliographies(&request.query())?)
    }

    pub fn list_classifications(&self, request: &ListRequest) -> AppResult<Vec<Classification>> {
        Ok(self
            .bibliographies
            .list_classifications(&request.query())?)
    }

    /// Returns the work behind `bib_index` with all of its reviews.
    pub fn reviews_for(&self, bib_index: &str) -> AppResult<(Bibliography, Vec<Review>)> {
        let bibliography = self.resolve_bib_index(bib_index)?;
        let reviews = self.reviews.list_reviews_for(bibliography.id)?;
        Ok((bibliography, reviews))
    }

    fn resolve_bib_index(&self, bib_index: &str) -> AppResult<Bibliography> {
        let bib_index = bib_index.trim();
        self.bibliographies
            .find_by_bib_index(bib_index)?
            .ok_or_else(|| AppError::UnknownBibIndex(bib_index.to_string()))
    }
}
