//! Review use-case service.
//!
//! # Responsibility
//! - Create reviews for existing bibliographies.
//! - Apply partial edits to goals and/or summary.
//!
//! # Invariants
//! - Goals are non-blank after trim but stored exactly as given.
//! - `created_at` is set once; `updated_at` is refreshed on every edit and
//!   never moves backwards.

use crate::model::bibliography::BibliographyId;
use crate::model::review::{Review, ReviewId};
use crate::repo::bibliography_repo::BibliographyRepository;
use crate::repo::review_repo::ReviewRepository;
use crate::repo::{ListQuery, RepoError, RepoResult};
use chrono::Utc;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from review use-cases.
#[derive(Debug)]
pub enum ReviewServiceError {
    /// Goals are blank after trim.
    BlankGoals,
    /// Referenced bibliography does not exist.
    BibliographyNotFound(BibliographyId),
    /// Target review does not exist.
    ReviewNotFound(ReviewId),
    /// Update request carries neither goals nor summary.
    EmptyUpdate,
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ReviewServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankGoals => write!(f, "goals are required and cannot be empty"),
            Self::BibliographyNotFound(id) => write!(f, "bibliography with ID {id} not found"),
            Self::ReviewNotFound(id) => write!(f, "review with ID {id} not found"),
            Self::EmptyUpdate => write!(
                f,
                "at least one field to update (goals or summary) is required"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ReviewServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ReviewServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Partial edit of a review. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewUpdate {
    /// New goals; must be non-blank when present.
    pub goals: Option<String>,
    /// New summary; may be empty to clear it.
    pub summary: Option<String>,
}

impl ReviewUpdate {
    pub fn is_empty(&self) -> bool {
        self.goals.is_none() && self.summary.is_none()
    }
}

/// Review service facade over repository implementations.
pub struct ReviewService<R: ReviewRepository, B: BibliographyRepository> {
    reviews: R,
    bibliographies: B,
}

impl<R: ReviewRepository, B: BibliographyRepository> ReviewService<R, B> {
    /// Creates a service using the provided repository implementations.
    pub fn new(reviews: R, bibliographies: B) -> Self {
        Self {
            reviews,
            bibliographies,
        }
    }

    /// Creates a review for bibliography `book_id`.
    ///
    /// # Errors
    /// - `BlankGoals` when goals are blank.
    /// - `BibliographyNotFound` when `book_id` is unknown.
    pub fn add_review(
        &self,
        book_id: BibliographyId,
        goals: impl Into<String>,
        summary: impl Into<String>,
    ) -> Result<Review, ReviewServiceError> {
        let goals = goals.into();
        let result = self.try_add_review(book_id, goals, summary.into());
        match &result {
            Ok(review) => info!(
                "event=review_add module=service status=ok id={} book_id={}",
                review.id, review.book_id
            ),
            Err(err) => warn!(
                "event=review_add module=service status=rejected book_id={} error={}",
                book_id, err
            ),
        }
        result
    }

    fn try_add_review(
        &self,
        book_id: BibliographyId,
        goals: String,
        summary: String,
    ) -> Result<Review, ReviewServiceError> {
        if goals.trim().is_empty() {
            return Err(ReviewServiceError::BlankGoals);
        }
        if self.bibliographies.find_by_id(book_id)?.is_none() {
            return Err(ReviewServiceError::BibliographyNotFound(book_id));
        }

        let review = Review::new(book_id, goals, summary, Utc::now());
        self.reviews.save(&review)?;
        Ok(review)
    }

    /// Applies `update` to review `id` and returns the stored result.
    ///
    /// # Errors
    /// - `EmptyUpdate` when neither field is present.
    /// - `ReviewNotFound` when `id` is unknown.
    /// - `BlankGoals` when goals are present but blank.
    pub fn update_review(
        &self,
        id: ReviewId,
        update: &ReviewUpdate,
    ) -> Result<Review, ReviewServiceError> {
        let result = self.try_update_review(id, update);
        match &result {
            Ok(review) => info!(
                "event=review_update module=service status=ok id={} goals={} summary={}",
                review.id,
                update.goals.is_some(),
                update.summary.is_some()
            ),
            Err(err) => warn!(
                "event=review_update module=service status=rejected id={} error={}",
                id, err
            ),
        }
        result
    }

    fn try_update_review(
        &self,
        id: ReviewId,
        update: &ReviewUpdate,
    ) -> Result<Review, ReviewServiceError> {
        if update.is_empty() {
            return Err(ReviewServiceError::EmptyUpdate);
        }
        let mut review = self
            .reviews
            .find_by_id(id)?
            .ok_or(ReviewServiceError::ReviewNotFound(id))?;

        if let Some(goals) = &update.goals {
            if goals.trim().is_empty() {
                return Err(ReviewServiceError::BlankGoals);
            }
            review.goals = goals.clone();
        }
        if let Some(summary) = &update.summary {
            review.summary = summary.clone();
        }

        review.touch(Utc::now());
        self.reviews.save(&review)?;
        Ok(review)
    }

    /// Gets one review by stable ID.
    pub fn get_review(&self, id: ReviewId) -> RepoResult<Option<Review>> {
        self.reviews.find_by_id(id)
    }

    /// Lists every review of bibliography `book_id`.
    pub fn list_reviews_for(&self, book_id: BibliographyId) -> RepoResult<Vec<Review>> {
        self.reviews.find_by_book_id(book_id)
    }

    /// Lists reviews in table order.
    pub fn list_reviews(&self, query: &ListQuery) -> RepoResult<Vec<Review>> {
        self.reviews.find_all(query)
    }
}
