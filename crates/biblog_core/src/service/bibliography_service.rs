//! Bibliography and classification use-case service.
//!
//! # Responsibility
//! - Register classifications with unique positive codes.
//! - Register bibliographies, deriving `code` and `bib_index`.
//!
//! # Invariants
//! - Required text fields are non-blank after trim and stored trimmed.
//! - Japanese title/author requires an English override unless a manual
//!   BibIndex is supplied; a manual BibIndex is used verbatim.
//! - BibIndex uniqueness is not enforced.

use crate::model::bibliography::{Bibliography, BibliographyId};
use crate::model::classification::Classification;
use crate::repo::bibliography_repo::BibliographyRepository;
use crate::repo::classification_repo::ClassificationRepository;
use crate::repo::{ListQuery, RepoError, RepoResult};
use crate::service::bib_index::{
    classification_code, contains_japanese, generate_bib_index, BibIndexInput,
};
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Smallest accepted classification code.
pub const MIN_CLASSIFICATION_CODE: i64 = 1;
/// Largest accepted classification code.
pub const MAX_CLASSIFICATION_CODE: i64 = 99_999;

/// Errors from bibliography/classification use-cases.
#[derive(Debug)]
pub enum BibliographyServiceError {
    /// Required field is blank after trim.
    BlankField(&'static str),
    /// Classification code is outside `MIN..=MAX_CLASSIFICATION_CODE`.
    CodeOutOfRange(i64),
    /// A classification with this code already exists.
    DuplicateClassification(u32),
    /// No classification with this code exists.
    ClassificationNotFound(u32),
    /// Field contains Japanese text and no English override was given.
    MissingTranslation(&'static str),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for BibliographyServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "{field} is required and cannot be empty"),
            Self::CodeOutOfRange(code) => write!(
                f,
                "classification code {code} must be between {MIN_CLASSIFICATION_CODE} and {MAX_CLASSIFICATION_CODE}"
            ),
            Self::DuplicateClassification(code) => {
                write!(f, "classification with code {code} already exists")
            }
            Self::ClassificationNotFound(code) => {
                write!(f, "classification with code {code} not found")
            }
            Self::MissingTranslation(field) => write!(
                f,
                "{field} contains Japanese characters; provide an English {field} or a manual bib index"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BibliographyServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for BibliographyServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Request model for registering a bibliography.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBibliography {
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub isbn: String,
    /// Work type such as `Book` or `Essay`.
    pub kind: String,
    /// Code number of an existing classification.
    pub classification_code: u32,
    pub published_date: DateTime<Utc>,
    /// English title used for initials instead of `title`.
    pub title_en: Option<String>,
    /// English author used for initials instead of `author`.
    pub author_en: Option<String>,
    /// Manual BibIndex; bypasses synthesis and the translation check.
    pub bib_index: Option<String>,
}

/// Bibliography service facade over repository implementations.
pub struct BibliographyService<B: BibliographyRepository, C: ClassificationRepository> {
    bibliographies: B,
    classifications: C,
}

impl<B: BibliographyRepository, C: ClassificationRepository> BibliographyService<B, C> {
    /// Creates a service using the provided repository implementations.
    pub fn new(bibliographies: B, classifications: C) -> Self {
        Self {
            bibliographies,
            classifications,
        }
    }

    /// Registers a new classification.
    ///
    /// # Errors
    /// - `BlankField("name")`, `CodeOutOfRange` on invalid input.
    /// - `DuplicateClassification` when the code is taken; nothing is written.
    pub fn add_classification(
        &self,
        code_num: i64,
        name: &str,
    ) -> Result<Classification, BibliographyServiceError> {
        let result = self.try_add_classification(code_num, name);
        match &result {
            Ok(classification) => info!(
                "event=classification_add module=service status=ok id={} code_num={}",
                classification.id, classification.code_num
            ),
            Err(err) => warn!(
                "event=classification_add module=service status=rejected code_num={} error={}",
                code_num, err
            ),
        }
        result
    }

    fn try_add_classification(
        &self,
        code_num: i64,
        name: &str,
    ) -> Result<Classification, BibliographyServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BibliographyServiceError::BlankField("name"));
        }
        let code_num = validate_code(code_num)?;

        if self.classifications.find_by_code_num(code_num)?.is_some() {
            return Err(BibliographyServiceError::DuplicateClassification(code_num));
        }

        let classification = Classification::new(code_num, name);
        self.classifications.save(&classification)?;
        Ok(classification)
    }

    /// Lists classifications in table order.
    pub fn list_classifications(&self, query: &ListQuery) -> RepoResult<Vec<Classification>> {
        self.classifications.find_all(query)
    }

    /// Registers a new bibliography and returns the persisted record.
    ///
    /// # Errors
    /// - `BlankField` for blank title, author or type.
    /// - `MissingTranslation` for Japanese text without English override.
    /// - `ClassificationNotFound` when the classification code is unknown.
    pub fn add_bibliography(
        &self,
        request: &NewBibliography,
    ) -> Result<Bibliography, BibliographyServiceError> {
        let result = self.try_add_bibliography(request);
        match &result {
            Ok(bibliography) => info!(
                "event=bibliography_add module=service status=ok id={} bib_index={} code={}",
                bibliography.id, bibliography.bib_index, bibliography.code
            ),
            Err(err) => warn!(
                "event=bibliography_add module=service status=rejected error={}",
                err
            ),
        }
        result
    }

    fn try_add_bibliography(
        &self,
        request: &NewBibliography,
    ) -> Result<Bibliography, BibliographyServiceError> {
        let title = require("title", &request.title)?;
        let author = require("author", &request.author)?;
        let kind = require("type", &request.kind)?;
        let title_en = optional(request.title_en.as_deref());
        let author_en = optional(request.author_en.as_deref());
        let manual_index = optional(request.bib_index.as_deref());

        if manual_index.is_none() {
            if contains_japanese(title) && title_en.is_none() {
                return Err(BibliographyServiceError::MissingTranslation("title"));
            }
            if contains_japanese(author) && author_en.is_none() {
                return Err(BibliographyServiceError::MissingTranslation("author"));
            }
        }

        let classification = self
            .classifications
            .find_by_code_num(request.classification_code)?
            .ok_or(BibliographyServiceError::ClassificationNotFound(
                request.classification_code,
            ))?;

        let bib_index = match manual_index {
            Some(index) => index.to_string(),
            None => generate_bib_index(&BibIndexInput {
                kind,
                classification_code: classification.code_num,
                author,
                title,
                published_date: request.published_date,
                author_en,
                title_en,
            }),
        };

        let bibliography = Bibliography {
            id: Uuid::new_v4(),
            bib_index,
            code: classification_code(kind, classification.code_num),
            kind: kind.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            publisher: request.publisher.trim().to_string(),
            isbn: request.isbn.trim().to_string(),
            published_date: request.published_date,
        };
        self.bibliographies.save(&bibliography)?;
        Ok(bibliography)
    }

    /// Lists bibliographies in table order.
    pub fn list_bibliographies(&self, query: &ListQuery) -> RepoResult<Vec<Bibliography>> {
        self.bibliographies.find_all(query)
    }

    /// Gets the first bibliography carrying `bib_index`.
    pub fn find_by_bib_index(&self, bib_index: &str) -> RepoResult<Option<Bibliography>> {
        self.bibliographies.find_by_bib_index(bib_index.trim())
    }

    /// Gets one bibliography by stable ID.
    pub fn get_bibliography(&self, id: BibliographyId) -> RepoResult<Option<Bibliography>> {
        self.bibliographies.find_by_id(id)
    }
}

fn validate_code(code_num: i64) -> Result<u32, BibliographyServiceError> {
    if !(MIN_CLASSIFICATION_CODE..=MAX_CLASSIFICATION_CODE).contains(&code_num) {
        return Err(BibliographyServiceError::CodeOutOfRange(code_num));
    }
    u32::try_from(code_num).map_err(|_| BibliographyServiceError::CodeOutOfRange(code_num))
}

fn require<'a>(field: &'static str, value: &'a str) -> Result<&'a str, BibliographyServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BibliographyServiceError::BlankField(field));
    }
    Ok(trimmed)
}

fn optional(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{optional, require, validate_code, BibliographyServiceError};

    #[test]
    fn code_range_is_inclusive() {
        assert_eq!(validate_code(1).unwrap(), 1);
        assert_eq!(validate_code(99_999).unwrap(), 99_999);
        assert!(matches!(
            validate_code(0),
            Err(BibliographyServiceError::CodeOutOfRange(0))
        ));
        assert!(matches!(
            validate_code(-4),
            Err(BibliographyServiceError::CodeOutOfRange(-4))
        ));
        assert!(validate_code(100_000).is_err());
    }

    #[test]
    fn blank_overrides_count_as_absent() {
        assert_eq!(optional(Some("  ")), None);
        assert_eq!(optional(Some(" Title ")), Some("Title"));
        assert_eq!(optional(None), None);
        assert!(matches!(
            require("title", " \t"),
            Err(BibliographyServiceError::BlankField("title"))
        ));
    }
}
