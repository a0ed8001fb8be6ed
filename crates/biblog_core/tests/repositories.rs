use biblog_core::{
    Bibliography, BibliographyRepository, Classification, ClassificationRepository,
    CsvBibliographyRepository, CsvClassificationRepository, CsvRecord, CsvReviewRepository,
    DecodeError, ListQuery, RepoError, Review, ReviewRepository,
};
use chrono::{TimeZone, Utc};
use uuid::Uuid;

fn bibliography(bib_index: &str, title: &str) -> Bibliography {
    Bibliography {
        id: Uuid::new_v4(),
        bib_index: bib_index.to_string(),
        code: "B56".to_string(),
        kind: "Book".to_string(),
        title: title.to_string(),
        author: "Eric Evans".to_string(),
        publisher: "Addison-Wesley".to_string(),
        isbn: String::new(),
        published_date: Utc.with_ymd_and_hms(2003, 1, 1, 0, 0, 0).unwrap(),
    }
}

fn line_count(path: &std::path::Path) -> usize {
    biblog_core::store::read_all(path).unwrap().len()
}

#[test]
fn save_is_an_upsert_by_id() {
    let dir = tempfile::tempdir().unwrap();
    let repo = CsvBibliographyRepository::new(dir.path().join("bibliographies.csv"));

    let mut first = bibliography("B56EE03DDD", "Domain Driven Design");
    repo.save(&first).unwrap();
    repo.save(&bibliography("B56EE03IDD", "Implementing DDD")).unwrap();
    assert_eq!(line_count(repo.path()), 3);

    first.publisher = "Pearson".to_string();
    repo.save(&first).unwrap();
    repo.save(&first).unwrap();
    assert_eq!(line_count(repo.path()), 3);

    let loaded = repo.find_by_id(first.id).unwrap().unwrap();
    assert_eq!(loaded, first);
    let all = repo.find_all(&ListQuery::all()).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, first.id, "replaced row keeps its position");
}

#[test]
fn table_file_starts_with_fixed_header() {
    let dir = tempfile::tempdir().unwrap();
    let repo = CsvClassificationRepository::new(dir.path().join("classifications.csv"));
    repo.save(&Classification::new(56, "Technology")).unwrap();

    let content = std::fs::read_to_string(repo.path()).unwrap();
    assert!(content.starts_with("ID,CodeNum,Name\n"));
    assert!(content.contains(",56,Technology"));
}

#[test]
fn find_all_honors_limit_and_offset() {
    let dir = tempfile::tempdir().unwrap();
    let repo = CsvClassificationRepository::new(dir.path().join("classifications.csv"));
    for code in 1..=5 {
        repo.save(&Classification::new(code, format!("class {code}")))
            .unwrap();
    }

    let codes = |query: ListQuery| -> Vec<u32> {
        repo.find_all(&query)
            .unwrap()
            .into_iter()
            .map(|class| class.code_num)
            .collect()
    };
    assert_eq!(codes(ListQuery::all()), [1, 2, 3, 4, 5]);
    assert_eq!(codes(ListQuery::page(2, 0)), [1, 2]);
    assert_eq!(codes(ListQuery::page(2, 3)), [4, 5]);
    assert_eq!(codes(ListQuery::page(10, 4)), [5]);
    assert_eq!(codes(ListQuery::page(0, 2)), [3, 4, 5]);
    assert!(codes(ListQuery::page(3, 5)).is_empty());
    assert!(codes(ListQuery::page(3, 50)).is_empty());
}

#[test]
fn missing_file_scans_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let repo = CsvReviewRepository::new(dir.path().join("reviews.csv"));
    assert!(repo.find_all(&ListQuery::all()).unwrap().is_empty());
    assert!(repo.find_by_id(Uuid::new_v4()).unwrap().is_none());
    assert!(!repo.path().exists());
}

#[test]
fn malformed_rows_are_skipped_and_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("classifications.csv");
    let good = Classification::new(7, "Philosophy");
    let content = format!(
        "ID,CodeNum,Name\nnot-a-uuid,3,Broken\n{},seven,Bad code\nshort\n{}\n",
        Uuid::new_v4(),
        good.to_row().join(",")
    );
    std::fs::write(&path, content).unwrap();
    let repo = CsvClassificationRepository::new(&path);

    let scan = repo.scan(&ListQuery::all()).unwrap();
    assert_eq!(scan.items, vec![good.clone()]);
    assert_eq!(scan.skipped.len(), 3);
    assert_eq!(scan.skipped[0].row_number, 1);
    assert!(matches!(scan.skipped[0].error, DecodeError::InvalidId { .. }));
    assert!(matches!(
        scan.skipped[1].error,
        DecodeError::InvalidInteger { .. }
    ));
    assert!(matches!(
        scan.skipped[2].error,
        DecodeError::TooFewFields {
            expected: 3,
            actual: 1
        }
    ));

    assert_eq!(repo.find_by_code_num(7).unwrap(), Some(good));
    assert_eq!(repo.find_by_code_num(3).unwrap(), None);
}

#[test]
fn upsert_keeps_rows_it_cannot_decode() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("classifications.csv");
    std::fs::write(&path, "ID,CodeNum,Name\nbroken-row,1,Kept\n").unwrap();
    let repo = CsvClassificationRepository::new(&path);

    repo.save(&Classification::new(2, "Added")).unwrap();

    let rows = biblog_core::store::read_all(&path).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1].fields()[0], "broken-row");
}

#[test]
fn foreign_header_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reviews.csv");
    std::fs::write(&path, "uuid,content\n").unwrap();
    let repo = CsvReviewRepository::new(&path);

    let err = repo.find_all(&ListQuery::all()).unwrap_err();
    assert!(matches!(err, RepoError::HeaderMismatch { .. }));
    assert!(err.to_string().contains("expected `ID,BookID"));
}

#[test]
fn bibliography_lookup_by_bib_index() {
    let dir = tempfile::tempdir().unwrap();
    let repo = CsvBibliographyRepository::new(dir.path().join("bibliographies.csv"));
    let ddd = bibliography("B56EE03DDD", "Domain Driven Design");
    repo.save(&ddd).unwrap();
    repo.save(&bibliography("B56MK17DDA", "Designing Data-Intensive Applications"))
        .unwrap();

    assert_eq!(repo.find_by_bib_index("B56EE03DDD").unwrap(), Some(ddd));
    assert_eq!(repo.find_by_bib_index("B56XX00XXX").unwrap(), None);
}

#[test]
fn reviews_are_found_by_book_id() {
    let dir = tempfile::tempdir().unwrap();
    let repo = CsvReviewRepository::new(dir.path().join("reviews.csv"));
    let book = Uuid::new_v4();
    let other = Uuid::new_v4();
    let now = Utc::now();

    let first = Review::new(book, "learn modeling", "", now);
    let second = Review::new(book, "re-read", "better the second time", now);
    repo.save(&first).unwrap();
    repo.save(&Review::new(other, "unrelated", "", now)).unwrap();
    repo.save(&second).unwrap();

    let found = repo.find_by_book_id(book).unwrap();
    assert_eq!(found, vec![first, second]);
    assert!(repo.find_by_book_id(Uuid::new_v4()).unwrap().is_empty());
}

#[test]
fn non_utf8_row_is_skipped_without_blocking_the_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("classifications.csv");
    let good = Classification::new(7, "Philosophy");
    let mut content = format!("ID,CodeNum,Name\n{},3,Bad", Uuid::new_v4()).into_bytes();
    content.extend_from_slice(b"\xFFname\n");
    content.extend_from_slice(format!("{}\n", good.to_row().join(",")).as_bytes());
    std::fs::write(&path, &content).unwrap();
    let repo = CsvClassificationRepository::new(&path);

    let scan = repo.scan(&ListQuery::all()).unwrap();
    assert_eq!(scan.items, vec![good.clone()]);
    assert_eq!(scan.skipped.len(), 1);
    assert_eq!(scan.skipped[0].row_number, 1);
    assert_eq!(
        scan.skipped[0].error,
        DecodeError::InvalidUtf8 { column: "Name" }
    );
    assert_eq!(repo.find_by_code_num(7).unwrap(), Some(good));
    assert_eq!(repo.find_by_code_num(3).unwrap(), None);

    let added = Classification::new(8, "Religion");
    repo.save(&added).unwrap();
    assert_eq!(repo.find_by_code_num(8).unwrap(), Some(added));

    let written = std::fs::read(&path).unwrap();
    assert!(written
        .windows(b"Bad\xFFname".len())
        .any(|window| window == b"Bad\xFFname"));
}
