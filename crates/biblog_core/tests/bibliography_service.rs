use biblog_core::{
    BibliographyService, BibliographyServiceError, CatalogConfig, CsvBibliographyRepository,
    CsvClassificationRepository, ListQuery, NewBibliography,
};
use chrono::{TimeZone, Utc};
use tempfile::TempDir;

type Service = BibliographyService<CsvBibliographyRepository, CsvClassificationRepository>;

fn service(dir: &TempDir) -> Service {
    let config = CatalogConfig::new(dir.path());
    BibliographyService::new(
        config.bibliography_repository(),
        config.classification_repository(),
    )
}

fn request(title: &str, author: &str, code: u32, year: i32) -> NewBibliography {
    NewBibliography {
        title: title.to_string(),
        author: author.to_string(),
        publisher: String::new(),
        isbn: String::new(),
        kind: "Book".to_string(),
        classification_code: code,
        published_date: Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap(),
        title_en: None,
        author_en: None,
        bib_index: None,
    }
}

#[test]
fn add_bibliography_derives_code_and_bib_index() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(&dir);
    service.add_classification(56, "Technology").unwrap();

    let mut req = request("  Domain Driven Design ", "Eric Evans", 56, 2003);
    req.publisher = " Addison-Wesley ".to_string();
    let created = service.add_bibliography(&req).unwrap();

    assert_eq!(created.bib_index, "B56EE03DDD");
    assert_eq!(created.code, "B56");
    assert_eq!(created.title, "Domain Driven Design");
    assert_eq!(created.publisher, "Addison-Wesley");

    let stored = service.find_by_bib_index("B56EE03DDD").unwrap().unwrap();
    assert_eq!(stored, created);
    assert_eq!(service.get_bibliography(created.id).unwrap(), Some(created));
}

#[test]
fn japanese_text_uses_english_overrides_for_initials_only() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(&dir);
    service.add_classification(16, "Management").unwrap();

    let mut req = request("マネジメント神話", "マシュー・スチュワート", 16, 2024);
    req.title_en = Some("The Management Myth".to_string());
    req.author_en = Some("Matthew Stewart".to_string());
    let created = service.add_bibliography(&req).unwrap();

    assert_eq!(created.bib_index, "B16MS24TMM");
    assert_eq!(created.title, "マネジメント神話");
    assert_eq!(created.author, "マシュー・スチュワート");
}

#[test]
fn japanese_text_without_translation_is_rejected_before_any_write() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(&dir);
    service.add_classification(16, "Management").unwrap();

    let title_only = request("マネジメント神話", "Matthew Stewart", 16, 2024);
    let err = service.add_bibliography(&title_only).unwrap_err();
    assert!(matches!(err, BibliographyServiceError::MissingTranslation("title")));
    assert!(err.to_string().contains("Japanese"));

    let mut author_only = request("The Management Myth", "マシュー・スチュワート", 16, 2024);
    author_only.title_en = Some("ignored".to_string());
    let err = service.add_bibliography(&author_only).unwrap_err();
    assert!(matches!(err, BibliographyServiceError::MissingTranslation("author")));

    let mut blank_override = request("漢字", "Someone", 16, 2024);
    blank_override.title_en = Some("   ".to_string());
    assert!(matches!(
        service.add_bibliography(&blank_override),
        Err(BibliographyServiceError::MissingTranslation("title"))
    ));

    assert!(service
        .list_bibliographies(&ListQuery::all())
        .unwrap()
        .is_empty());
    assert!(!dir.path().join("bibliographies.csv").exists());
}

#[test]
fn manual_bib_index_bypasses_synthesis_and_translation_check() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(&dir);
    service.add_classification(16, "Management").unwrap();

    let mut req = request("マネジメント神話", "マシュー・スチュワート", 16, 2024);
    req.bib_index = Some(" CUSTOM-001 ".to_string());
    let created = service.add_bibliography(&req).unwrap();

    assert_eq!(created.bib_index, "CUSTOM-001");
    assert_eq!(created.code, "B16");
}

#[test]
fn add_bibliography_validates_required_fields_and_classification() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(&dir);
    service.add_classification(56, "Technology").unwrap();

    let blank_title = request("  ", "Eric Evans", 56, 2003);
    assert!(matches!(
        service.add_bibliography(&blank_title),
        Err(BibliographyServiceError::BlankField("title"))
    ));

    let blank_author = request("DDD", "", 56, 2003);
    assert!(matches!(
        service.add_bibliography(&blank_author),
        Err(BibliographyServiceError::BlankField("author"))
    ));

    let mut blank_type = request("DDD", "Eric Evans", 56, 2003);
    blank_type.kind = "\t".to_string();
    assert!(matches!(
        service.add_bibliography(&blank_type),
        Err(BibliographyServiceError::BlankField("type"))
    ));

    let unknown_class = request("DDD", "Eric Evans", 99, 2003);
    let err = service.add_bibliography(&unknown_class).unwrap_err();
    assert!(matches!(
        err,
        BibliographyServiceError::ClassificationNotFound(99)
    ));
    assert_eq!(err.to_string(), "classification with code 99 not found");
}

#[test]
fn duplicate_classification_leaves_table_unmodified() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(&dir);
    let original = service.add_classification(56, "Technology").unwrap();
    let path = dir.path().join("classifications.csv");
    let before = std::fs::read_to_string(&path).unwrap();

    let err = service.add_classification(56, "Other").unwrap_err();
    assert!(matches!(
        err,
        BibliographyServiceError::DuplicateClassification(56)
    ));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    assert_eq!(
        service.list_classifications(&ListQuery::all()).unwrap(),
        vec![original]
    );
}

#[test]
fn add_classification_validates_name_and_code() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(&dir);

    assert!(matches!(
        service.add_classification(1, "   "),
        Err(BibliographyServiceError::BlankField("name"))
    ));
    assert!(matches!(
        service.add_classification(0, "Zero"),
        Err(BibliographyServiceError::CodeOutOfRange(0))
    ));
    assert!(matches!(
        service.add_classification(100_000, "Huge"),
        Err(BibliographyServiceError::CodeOutOfRange(100_000))
    ));

    let created = service.add_classification(99_999, "  Edge  ").unwrap();
    assert_eq!(created.name, "Edge");
}

#[test]
fn list_bibliographies_pages_in_insertion_order() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(&dir);
    service.add_classification(1, "General").unwrap();
    for title in ["Alpha Book", "Beta Book", "Gamma Book"] {
        service
            .add_bibliography(&request(title, "Ann Author", 1, 2020))
            .unwrap();
    }

    let titles = |query: ListQuery| -> Vec<String> {
        service
            .list_bibliographies(&query)
            .unwrap()
            .into_iter()
            .map(|bib| bib.title)
            .collect()
    };
    assert_eq!(titles(ListQuery::page(2, 0)), ["Alpha Book", "Beta Book"]);
    assert_eq!(titles(ListQuery::page(2, 2)), ["Gamma Book"]);
    assert!(titles(ListQuery::page(2, 3)).is_empty());
}
