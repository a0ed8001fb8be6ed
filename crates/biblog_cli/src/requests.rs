//! Command request models.
//!
//! # Responsibility
//! - Collect command arguments, prompting for the missing ones.
//! - Reject incomplete requests before any service call.
//!
//! # Invariants
//! - Validation here only checks presence and shape; business rules stay in
//!   `biblog_core` services.

use crate::prompt::{PromptError, Prompter};
use biblog_core::{ListQuery, NewBibliography, ReviewId, ReviewUpdate};
use chrono::{DateTime, TimeZone, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{BufRead, Write};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    Missing(&'static str),
    InvalidReviewId(String),
    InvalidYear(i32),
}

impl Display for RequestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(field) => write!(f, "{field} is required"),
            Self::InvalidReviewId(value) => write!(f, "invalid review ID `{value}`"),
            Self::InvalidYear(year) => write!(f, "invalid published year {year}"),
        }
    }
}

impl Error for RequestError {}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddClassificationRequest {
    pub code: Option<i64>,
    pub name: Option<String>,
}

impl AddClassificationRequest {
    pub fn prompt_missing<R: BufRead, W: Write>(
        &mut self,
        prompter: &mut Prompter<R, W>,
    ) -> Result<(), PromptError> {
        if self.code.is_none() {
            self.code = prompter.number("Classification Code Number", true)?;
        }
        if is_blank(&self.name) {
            self.name = prompter.text("Classification Name", true)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(i64, &str), RequestError> {
        let code = self.code.ok_or(RequestError::Missing("classification code"))?;
        let name = present(&self.name).ok_or(RequestError::Missing("classification name"))?;
        Ok((code, name))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddBibliographyRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub kind: Option<String>,
    pub class_code: Option<u32>,
    pub year: Option<i32>,
    pub isbn: Option<String>,
    pub title_en: Option<String>,
    pub author_en: Option<String>,
    pub bib_index: Option<String>,
}

impl AddBibliographyRequest {
    /// Returns whether any required argument is absent.
    pub fn is_incomplete(&self) -> bool {
        is_blank(&self.title)
            || is_blank(&self.author)
            || is_blank(&self.kind)
            || self.class_code.is_none()
            || self.year.is_none()
    }

    /// Prompts for every absent field, optional ones included, once any
    /// required field is missing.
    pub fn prompt_missing<R: BufRead, W: Write>(
        &mut self,
        prompter: &mut Prompter<R, W>,
    ) -> Result<(), PromptError> {
        if !self.is_incomplete() {
            return Ok(());
        }
        if is_blank(&self.title) {
            self.title = prompter.text("Title", true)?;
        }
        if is_blank(&self.author) {
            self.author = prompter.text("Author", true)?;
        }
        if self.publisher.is_none() {
            self.publisher = prompter.text("Publisher", false)?;
        }
        if is_blank(&self.kind) {
            self.kind = prompter.text("Type", true)?;
        }
        if self.class_code.is_none() {
            self.class_code = prompter.number("Classification Code Number", true)?;
        }
        if self.year.is_none() {
            self.year = prompter.number("Published Year", true)?;
        }
        if self.isbn.is_none() {
            self.isbn = prompter.text("ISBN", false)?;
        }
        if self.bib_index.is_none() {
            self.bib_index = prompter.text("BibIndex", false)?;
        }
        Ok(())
    }

    pub fn to_new_bibliography(&self) -> Result<NewBibliography, RequestError> {
        let title = present(&self.title).ok_or(RequestError::Missing("title"))?;
        let author = present(&self.author).ok_or(RequestError::Missing("author"))?;
        let kind = present(&self.kind).ok_or(RequestError::Missing("type"))?;
        let classification_code = self
            .class_code
            .ok_or(RequestError::Missing("classification code"))?;
        let year = self.year.ok_or(RequestError::Missing("published year"))?;

        Ok(NewBibliography {
            title: title.to_string(),
            author: author.to_string(),
            publisher: self.publisher.clone().unwrap_or_default(),
            isbn: self.isbn.clone().unwrap_or_default(),
            kind: kind.to_string(),
            classification_code,
            published_date: published_date(year)?,
            title_en: self.title_en.clone(),
            author_en: self.author_en.clone(),
            bib_index: self.bib_index.clone(),
        })
    }
}

/// Publication years are stored as January 1st, 00:00 UTC.
pub fn published_date(year: i32) -> Result<DateTime<Utc>, RequestError> {
    if year <= 0 {
        return Err(RequestError::InvalidYear(year));
    }
    Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .single()
        .ok_or(RequestError::InvalidYear(year))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddReviewRequest {
    pub bib_index: Option<String>,
    pub goals: Option<String>,
    pub summary: Option<String>,
}

impl AddReviewRequest {
    pub fn prompt_missing<R: BufRead, W: Write>(
        &mut self,
        prompter: &mut Prompter<R, W>,
    ) -> Result<(), PromptError> {
        if !is_blank(&self.bib_index) && !is_blank(&self.goals) {
            return Ok(());
        }
        if is_blank(&self.bib_index) {
            self.bib_index = prompter.text("BibIndex", true)?;
        }
        if is_blank(&self.goals) {
            self.goals = prompter.text("Goals", true)?;
        }
        if self.summary.is_none() {
            self.summary = prompter.text("Summary", false)?;
        }
        Ok(())
    }

    /// Returns `(bib_index, goals, summary)`; goals are passed on untrimmed.
    pub fn validate(&self) -> Result<(&str, &str, &str), RequestError> {
        let bib_index = present(&self.bib_index).ok_or(RequestError::Missing("bib-index"))?;
        if is_blank(&self.goals) {
            return Err(RequestError::Missing("goals"));
        }
        let goals = self.goals.as_deref().unwrap_or_default();
        Ok((bib_index, goals, self.summary.as_deref().unwrap_or_default()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReviewRequest {
    pub review_id: Option<String>,
    pub goals: Option<String>,
    pub summary: Option<String>,
}

impl UpdateReviewRequest {
    pub fn prompt_missing<R: BufRead, W: Write>(
        &mut self,
        prompter: &mut Prompter<R, W>,
    ) -> Result<(), PromptError> {
        if is_blank(&self.review_id) {
            self.review_id = prompter.text("Review UUID", true)?;
        }
        if self.goals.is_none() && self.summary.is_none() {
            self.goals = prompter.text("New goals", false)?;
            self.summary = prompter.text("New summary", false)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(ReviewId, ReviewUpdate), RequestError> {
        let raw_id = present(&self.review_id).ok_or(RequestError::Missing("review-id"))?;
        let id = Uuid::parse_str(raw_id)
            .map_err(|_| RequestError::InvalidReviewId(raw_id.to_string()))?;
        let update = ReviewUpdate {
            goals: self.goals.clone(),
            summary: self.summary.clone(),
        };
        if update.is_empty() {
            return Err(RequestError::Missing("goals or summary"));
        }
        Ok((id, update))
    }
}

/// Default page size of the `list` command.
pub const DEFAULT_LIST_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListRequest {
    /// `0` lists every row.
    pub limit: u32,
    pub offset: u32,
}

impl Default for ListRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIST_LIMIT,
            offset: 0,
        }
    }
}

impl ListRequest {
    pub fn query(&self) -> ListQuery {
        if self.limit == 0 {
            ListQuery {
                limit: None,
                offset: self.offset,
            }
        } else {
            ListQuery::page(self.limit, self.offset)
        }
    }

    /// Whether a result of `shown` rows may have more rows after it.
    pub fn page_is_full(&self, shown: usize) -> bool {
        self.limit > 0 && shown == self.limit as usize
    }
}

fn is_blank(value: &Option<String>) -> bool {
    present(value).is_none()
}

fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
