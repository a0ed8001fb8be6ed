//! Review repository contract and CSV implementation.

use crate::model::bibliography::BibliographyId;
use crate::model::review::{Review, ReviewId};
use crate::repo::csv_repo::CsvRepository;
use crate::repo::{ListQuery, RepoResult};
use uuid::Uuid;

/// CSV-backed review table.
pub type CsvReviewRepository = CsvRepository<Review>;

const BOOK_ID_COLUMN: usize = 1;

/// Repository interface for review records.
pub trait ReviewRepository {
    fn save(&self, review: &Review) -> RepoResult<()>;
    fn find_all(&self, query: &ListQuery) -> RepoResult<Vec<Review>>;
    fn find_by_id(&self, id: ReviewId) -> RepoResult<Option<Review>>;
    /// All reviews of one bibliography, in table order.
    fn find_by_book_id(&self, book_id: BibliographyId) -> RepoResult<Vec<Review>>;
}

impl ReviewRepository for CsvRepository<Review> {
    fn save(&self, review: &Review) -> RepoResult<()> {
        self.upsert(review)
    }

    fn find_all(&self, query: &ListQuery) -> RepoResult<Vec<Review>> {
        Ok(self.scan(query)?.items)
    }

    fn find_by_id(&self, id: ReviewId) -> RepoResult<Option<Review>> {
        self.get(id)
    }

    fn find_by_book_id(&self, book_id: BibliographyId) -> RepoResult<Vec<Review>> {
        self.find_where(|row| {
            row.get(BOOK_ID_COLUMN)
                .and_then(|value| Uuid::parse_str(value).ok())
                == Some(book_id)
        })
    }
}
