//! Entity <-> table row mapping.
//!
//! # Responsibility
//! - Fix the header and column order of each table.
//! - Encode identifiers as canonical UUID text and timestamps as RFC 3339.
//!
//! # Invariants
//! - `from_row(to_row(x)) == x` for every entity.
//! - Column 0 of every table is the entity ID.

use crate::model::bibliography::Bibliography;
use crate::model::classification::Classification;
use crate::model::review::Review;
use crate::store::Row;
use chrono::{DateTime, SecondsFormat, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Why a single row could not be turned into an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    TooFewFields { expected: usize, actual: usize },
    InvalidId { column: &'static str, value: String },
    InvalidTimestamp { column: &'static str, value: String },
    InvalidInteger { column: &'static str, value: String },
    InvalidUtf8 { column: &'static str },
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooFewFields { expected, actual } => {
                write!(f, "row has {actual} fields, expected {expected}")
            }
            Self::InvalidId { column, value } => {
                write!(f, "invalid uuid `{value}` in column {column}")
            }
            Self::InvalidTimestamp { column, value } => {
                write!(f, "invalid timestamp `{value}` in column {column}")
            }
            Self::InvalidInteger { column, value } => {
                write!(f, "invalid integer `{value}` in column {column}")
            }
            Self::InvalidUtf8 { column } => write!(f, "column {column} is not valid UTF-8"),
        }
    }
}

impl Error for DecodeError {}

/// A persistable entity with a fixed table layout.
pub trait CsvRecord: Sized {
    /// Short table name used in diagnostics.
    const TABLE: &'static str;
    /// Header row, which also fixes the expected field count.
    const HEADER: &'static [&'static str];

    fn id(&self) -> Uuid;
    fn to_row(&self) -> Row;
    fn from_row(row: &[String]) -> Result<Self, DecodeError>;
}

/// Returns the header of `T` as an owned row.
pub fn header_row<T: CsvRecord>() -> Row {
    T::HEADER.iter().map(|column| (*column).to_string()).collect()
}

/// Parses the ID column of a raw row without decoding the rest.
pub fn row_id(row: &[String]) -> Option<Uuid> {
    row.first().and_then(|value| Uuid::parse_str(value).ok())
}

pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn ensure_width<T: CsvRecord>(row: &[String]) -> Result<(), DecodeError> {
    if row.len() < T::HEADER.len() {
        return Err(DecodeError::TooFewFields {
            expected: T::HEADER.len(),
            actual: row.len(),
        });
    }
    Ok(())
}

fn parse_id(column: &'static str, value: &str) -> Result<Uuid, DecodeError> {
    Uuid::parse_str(value).map_err(|_| DecodeError::InvalidId {
        column,
        value: value.to_string(),
    })
}

fn parse_timestamp(column: &'static str, value: &str) -> Result<DateTime<Utc>, DecodeError> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| DecodeError::InvalidTimestamp {
            column,
            value: value.to_string(),
        })
}

impl CsvRecord for Bibliography {
    const TABLE: &'static str = "bibliographies";
    const HEADER: &'static [&'static str] = &[
        "ID",
        "BibIndex",
        "Code",
        "Type",
        "Title",
        "Author",
        "Publisher",
        "ISBN",
        "PublishedDate",
    ];

    fn id(&self) -> Uuid {
        self.id
    }

    fn to_row(&self) -> Row {
        vec![
            self.id.to_string(),
            self.bib_index.clone(),
            self.code.clone(),
            self.kind.clone(),
            self.title.clone(),
            self.author.clone(),
            self.publisher.clone(),
            self.isbn.clone(),
            format_timestamp(&self.published_date),
        ]
    }

    fn from_row(row: &[String]) -> Result<Self, DecodeError> {
        ensure_width::<Self>(row)?;
        Ok(Self {
            id: parse_id("ID", &row[0])?,
            bib_index: row[1].clone(),
            code: row[2].clone(),
            kind: row[3].clone(),
            title: row[4].clone(),
            author: row[5].clone(),
            publisher: row[6].clone(),
            isbn: row[7].clone(),
            published_date: parse_timestamp("PublishedDate", &row[8])?,
        })
    }
}

impl CsvRecord for Classification {
    const TABLE: &'static str = "classifications";
    const HEADER: &'static [&'static str] = &["ID", "CodeNum", "Name"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn to_row(&self) -> Row {
        vec![
            self.id.to_string(),
            self.code_num.to_string(),
            self.name.clone(),
        ]
    }

    fn from_row(row: &[String]) -> Result<Self, DecodeError> {
        ensure_width::<Self>(row)?;
        let code_num = row[1]
            .parse::<u32>()
            .map_err(|_| DecodeError::InvalidInteger {
                column: "CodeNum",
                value: row[1].clone(),
            })?;
        Ok(Self {
            id: parse_id("ID", &row[0])?,
            code_num,
            name: row[2].clone(),
        })
    }
}

impl CsvRecord for Review {
    const TABLE: &'static str = "reviews";
    const HEADER: &'static [&'static str] =
        &["ID", "BookID", "Goals", "Summary", "CreatedAt", "UpdatedAt"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn to_row(&self) -> Row {
        vec![
            self.id.to_string(),
            self.book_id.to_string(),
            self.goals.clone(),
            self.summary.clone(),
            format_timestamp(&self.created_at),
            format_timestamp(&self.updated_at),
        ]
    }

    fn from_row(row: &[String]) -> Result<Self, DecodeError> {
        ensure_width::<Self>(row)?;
        Ok(Self {
            id: parse_id("ID", &row[0])?,
            book_id: parse_id("BookID", &row[1])?,
            goals: row[2].clone(),
            summary: row[3].clone(),
            created_at: parse_timestamp("CreatedAt", &row[4])?,
            updated_at: parse_timestamp("UpdatedAt", &row[5])?,
        })
    }
}
