use biblog_core::{
    Bibliography, BibliographyRepository, CatalogConfig, CsvBibliographyRepository,
    CsvReviewRepository, ListQuery, ReviewService, ReviewServiceError, ReviewUpdate,
};
use chrono::{TimeZone, Utc};
use tempfile::TempDir;
use uuid::Uuid;

type Service = ReviewService<CsvReviewRepository, CsvBibliographyRepository>;

fn setup(dir: &TempDir) -> (Service, Bibliography) {
    let config = CatalogConfig::new(dir.path());
    let bibliographies = config.bibliography_repository();
    let book = Bibliography {
        id: Uuid::new_v4(),
        bib_index: "B56EE03DDD".to_string(),
        code: "B56".to_string(),
        kind: "Book".to_string(),
        title: "Domain Driven Design".to_string(),
        author: "Eric Evans".to_string(),
        publisher: String::new(),
        isbn: String::new(),
        published_date: Utc.with_ymd_and_hms(2003, 1, 1, 0, 0, 0).unwrap(),
    };
    bibliographies.save(&book).unwrap();
    (
        ReviewService::new(config.review_repository(), bibliographies),
        book,
    )
}

#[test]
fn add_review_stores_untrimmed_text_and_timestamps() {
    let dir = tempfile::tempdir().unwrap();
    let (service, book) = setup(&dir);

    let review = service
        .add_review(book.id, "  learn bounded contexts\n", "")
        .unwrap();
    assert_eq!(review.goals, "  learn bounded contexts\n");
    assert_eq!(review.summary, "");
    assert_eq!(review.created_at, review.updated_at);

    let stored = service.get_review(review.id).unwrap().unwrap();
    assert_eq!(stored, review);
    assert_eq!(service.list_reviews_for(book.id).unwrap(), vec![review]);
}

#[test]
fn add_review_requires_goals_and_existing_bibliography() {
    let dir = tempfile::tempdir().unwrap();
    let (service, book) = setup(&dir);

    assert!(matches!(
        service.add_review(book.id, " \n ", "summary"),
        Err(ReviewServiceError::BlankGoals)
    ));

    let missing = Uuid::new_v4();
    let err = service.add_review(missing, "goals", "").unwrap_err();
    assert!(matches!(err, ReviewServiceError::BibliographyNotFound(id) if id == missing));
    assert!(service.list_reviews(&ListQuery::all()).unwrap().is_empty());
}

#[test]
fn update_with_only_summary_keeps_goals() {
    let dir = tempfile::tempdir().unwrap();
    let (service, book) = setup(&dir);
    let review = service.add_review(book.id, "original goals", "").unwrap();

    let updated = service
        .update_review(
            review.id,
            &ReviewUpdate {
                goals: None,
                summary: Some("great read".to_string()),
            },
        )
        .unwrap();

    assert_eq!(updated.goals, "original goals");
    assert_eq!(updated.summary, "great read");
    assert_eq!(updated.created_at, review.created_at);
    assert!(updated.updated_at >= review.updated_at);
    assert_eq!(service.get_review(review.id).unwrap(), Some(updated));
}

#[test]
fn update_with_only_goals_keeps_summary_and_can_clear_summary() {
    let dir = tempfile::tempdir().unwrap();
    let (service, book) = setup(&dir);
    let review = service.add_review(book.id, "first", "kept summary").unwrap();

    let goals_only = service
        .update_review(
            review.id,
            &ReviewUpdate {
                goals: Some("second".to_string()),
                summary: None,
            },
        )
        .unwrap();
    assert_eq!(goals_only.goals, "second");
    assert_eq!(goals_only.summary, "kept summary");

    let cleared = service
        .update_review(
            review.id,
            &ReviewUpdate {
                goals: None,
                summary: Some(String::new()),
            },
        )
        .unwrap();
    assert_eq!(cleared.summary, "");
    assert_eq!(cleared.goals, "second");
    assert_eq!(cleared.created_at, review.created_at);
    assert!(cleared.updated_at >= goals_only.updated_at);
    assert_eq!(service.list_reviews(&ListQuery::all()).unwrap().len(), 1);
}

#[test]
fn update_rejects_empty_request_blank_goals_and_unknown_review() {
    let dir = tempfile::tempdir().unwrap();
    let (service, book) = setup(&dir);
    let review = service.add_review(book.id, "goals", "summary").unwrap();

    assert!(matches!(
        service.update_review(review.id, &ReviewUpdate::default()),
        Err(ReviewServiceError::EmptyUpdate)
    ));

    let blank = ReviewUpdate {
        goals: Some("   ".to_string()),
        summary: Some("would change".to_string()),
    };
    assert!(matches!(
        service.update_review(review.id, &blank),
        Err(ReviewServiceError::BlankGoals)
    ));
    assert_eq!(service.get_review(review.id).unwrap(), Some(review));

    let unknown = Uuid::new_v4();
    let err = service
        .update_review(
            unknown,
            &ReviewUpdate {
                goals: Some("x".to_string()),
                summary: None,
            },
        )
        .unwrap_err();
    assert!(matches!(err, ReviewServiceError::ReviewNotFound(id) if id == unknown));
}
