//! Classification repository contract and CSV implementation.

use crate::model::classification::Classification;
use crate::repo::csv_repo::CsvRepository;
use crate::repo::{ListQuery, RepoResult};

/// CSV-backed classification table.
pub type CsvClassificationRepository = CsvRepository<Classification>;

const CODE_NUM_COLUMN: usize = 1;

/// Repository interface for classification records.
pub trait ClassificationRepository {
    fn save(&self, classification: &Classification) -> RepoResult<()>;
    fn find_all(&self, query: &ListQuery) -> RepoResult<Vec<Classification>>;
    fn find_by_code_num(&self, code_num: u32) -> RepoResult<Option<Classification>>;
}

impl ClassificationRepository for CsvRepository<Classification> {
    fn save(&self, classification: &Classification) -> RepoResult<()> {
        self.upsert(classification)
    }

    fn find_all(&self, query: &ListQuery) -> RepoResult<Vec<Classification>> {
        Ok(self.scan(query)?.items)
    }

    fn find_by_code_num(&self, code_num: u32) -> RepoResult<Option<Classification>> {
        // Compared as stored text so only the matching row is decoded.
        let needle = code_num.to_string();
        self.find_first(|row| row.get(CODE_NUM_COLUMN).is_some_and(|value| *value == needle))
    }
}
