//! Bibliography repository contract and CSV implementation.

use crate::model::bibliography::{Bibliography, BibliographyId};
use crate::repo::csv_repo::CsvRepository;
use crate::repo::{ListQuery, RepoResult};

/// CSV-backed bibliography table.
pub type CsvBibliographyRepository = CsvRepository<Bibliography>;

const BIB_INDEX_COLUMN: usize = 1;

/// Repository interface for bibliography records.
pub trait BibliographyRepository {
    fn save(&self, bibliography: &Bibliography) -> RepoResult<()>;
    fn find_all(&self, query: &ListQuery) -> RepoResult<Vec<Bibliography>>;
    fn find_by_id(&self, id: BibliographyId) -> RepoResult<Option<Bibliography>>;
    /// First record carrying `bib_index`. Uniqueness is not enforced.
    fn find_by_bib_index(&self, bib_index: &str) -> RepoResult<Option<Bibliography>>;
}

impl BibliographyRepository for CsvRepository<Bibliography> {
    fn save(&self, bibliography: &Bibliography) -> RepoResult<()> {
        self.upsert(bibliography)
    }

    fn find_all(&self, query: &ListQuery) -> RepoResult<Vec<Bibliography>> {
        Ok(self.scan(query)?.items)
    }

    fn find_by_id(&self, id: BibliographyId) -> RepoResult<Option<Bibliography>> {
        self.get(id)
    }

    fn find_by_bib_index(&self, bib_index: &str) -> RepoResult<Option<Bibliography>> {
        self.find_first(|row| {
            row.get(BIB_INDEX_COLUMN)
                .is_some_and(|value| value == bib_index)
        })
    }
}
