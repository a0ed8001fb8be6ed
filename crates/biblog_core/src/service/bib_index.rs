//! BibIndex synthesis.
//!
//! # Responsibility
//! - Derive the human-readable catalogue key of a bibliography.
//! - Detect Japanese script that cannot produce Latin initials.
//!
//! # Invariants
//! - Synthesis is pure: identical inputs always yield the identical key.
//! - Key layout is `code + author initials + 2-digit year + title initials`.
//! - Title initials take the first letter of the first three words; stop
//!   words such as "The" or "A" are not skipped.

use chrono::{DateTime, Datelike, Utc};

/// Inputs of BibIndex synthesis.
///
/// `author_en`/`title_en` replace `author`/`title` for initials when present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BibIndexInput<'a> {
    pub kind: &'a str,
    pub classification_code: u32,
    pub author: &'a str,
    pub title: &'a str,
    pub published_date: DateTime<Utc>,
    pub author_en: Option<&'a str>,
    pub title_en: Option<&'a str>,
}

/// Builds the full BibIndex, e.g. `B56EE03DDD`.
pub fn generate_bib_index(input: &BibIndexInput<'_>) -> String {
    let author = input.author_en.unwrap_or(input.author);
    let title = input.title_en.unwrap_or(input.title);

    format!(
        "{}{}{}{}",
        classification_code(input.kind, input.classification_code),
        author_initials(author),
        year_suffix(&input.published_date),
        title_initials(title)
    )
}

/// Type prefix plus classification number: `("Book", 56)` -> `B56`.
pub fn classification_code(kind: &str, code_num: u32) -> String {
    let prefix: String = kind
        .trim()
        .chars()
        .next()
        .map(|first| first.to_uppercase().collect())
        .unwrap_or_default();
    format!("{prefix}{code_num}")
}

/// Two-letter author key.
///
/// - no words: `XX`
/// - one word: its first two letters, or the letter plus `X`
/// - several words: first letter of the first and of the last word
pub fn author_initials(author: &str) -> String {
    let words: Vec<&str> = author.split_whitespace().collect();
    let initials = match words.as_slice() {
        [] => "XX".to_string(),
        [single] => {
            let mut letters: String = single.chars().take(2).collect();
            if letters.chars().count() < 2 {
                letters.push('X');
            }
            letters
        }
        [first, .., last] => {
            let mut letters = String::with_capacity(2);
            letters.push(first.chars().next().unwrap_or('X'));
            letters.push(last.chars().next().unwrap_or('X'));
            letters
        }
    };
    initials.to_uppercase()
}

/// Uppercased first letters of the first three words of `title`.
pub fn title_initials(title: &str) -> String {
    title
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(3)
        .collect::<String>()
        .to_uppercase()
}

/// Last two digits of the publication year, zero padded.
pub fn year_suffix(published_date: &DateTime<Utc>) -> String {
    format!("{:02}", published_date.year().rem_euclid(100))
}

/// Returns whether `text` contains Hiragana, Katakana or CJK ideographs.
pub fn contains_japanese(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(c,
            '\u{3040}'..='\u{309F}'
            | '\u{30A0}'..='\u{30FF}'
            | '\u{4E00}'..='\u{9FAF}')
    })
}
