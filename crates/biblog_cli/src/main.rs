//! `biblog` command-line entry point.
//!
//! # Responsibility
//! - Parse subcommands, prompt for missing arguments and print results.
//! - Start file logging under the data directory before touching tables.
//!
//! # Invariants
//! - Every failure ends with a non-zero exit code and a message on stderr.
//! - Prompts only run when a subcommand is missing required arguments.

mod app;
mod prompt;
mod requests;

use crate::app::{App, AppError, AppResult};
use crate::prompt::Prompter;
use crate::requests::{
    AddBibliographyRequest, AddClassificationRequest, AddReviewRequest, ListRequest,
    UpdateReviewRequest, DEFAULT_LIST_LIMIT,
};
use biblog_core::{default_log_level, init_logging, Bibliography, CatalogConfig, Review};
use clap::{Parser, Subcommand};
use log::error;
use serde::Serialize;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "biblog", version, about = "Bibliography catalogue and reading log")]
struct Cli {
    /// Directory holding the CSV tables (default: $BIBLOG_DATA_DIR or ./data)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Register a classification
    AddClass {
        /// Classification code number (e.g. 56)
        #[arg(long)]
        code: Option<i64>,
        /// Classification name (e.g. Technology)
        #[arg(long)]
        name: Option<String>,
    },
    /// Register a bibliography
    AddBib {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        publisher: Option<String>,
        /// Work type (Book, Essay, Video, ...)
        #[arg(long = "type", value_name = "TYPE")]
        kind: Option<String>,
        /// Classification code number
        #[arg(long = "class", value_name = "CODE")]
        class_code: Option<u32>,
        /// Published year (e.g. 2024)
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        isbn: Option<String>,
        /// English title, required when the title contains Japanese
        #[arg(long)]
        title_en: Option<String>,
        /// English author, required when the author contains Japanese
        #[arg(long)]
        author_en: Option<String>,
        /// Manual BibIndex; skips generation and the English requirement
        #[arg(long)]
        bib_index: Option<String>,
    },
    /// Add a review to the bibliography with the given BibIndex
    AddReview {
        #[arg(long)]
        bib_index: Option<String>,
        #[arg(long)]
        goals: Option<String>,
        #[arg(long)]
        summary: Option<String>,
    },
    /// Change the goals and/or summary of a review
    UpdateReview {
        /// Review UUID
        #[arg(long)]
        review_id: Option<String>,
        #[arg(long)]
        goals: Option<String>,
        #[arg(long)]
        summary: Option<String>,
    },
    /// List bibliographies
    List {
        /// Maximum rows to show, 0 for all
        #[arg(long, default_value_t = DEFAULT_LIST_LIMIT)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
        /// Print one JSON object per line
        #[arg(long)]
        json: bool,
    },
    /// List classifications
    ListClasses {
        #[arg(long, default_value_t = 0)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
        #[arg(long)]
        json: bool,
    },
    /// Show the reviews of one bibliography
    Reviews {
        #[arg(long)]
        bib_index: String,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = CatalogConfig::resolve(cli.data_dir);

    let result = prepare(&config, cli.log_level.as_deref()).and_then(|()| {
        let stdin = std::io::stdin();
        let mut prompter = Prompter::new(stdin.lock(), std::io::stdout());
        run(cli.command, &config, &mut prompter)
    });
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=command module=cli status=error error={err}");
            report_failure(&err, &mut std::io::stderr());
            ExitCode::FAILURE
        }
    }
}

/// Creates the data directory, then starts logging below it.
fn prepare(config: &CatalogConfig, level: Option<&str>) -> AppResult<()> {
    config.ensure_data_dir()?;
    start_logging(config, level);
    Ok(())
}

/// The only line a failed command writes to stderr.
fn report_failure<W: Write>(err: &AppError, out: &mut W) {
    // Nothing sensible remains to do when stderr itself fails.
    let _ = writeln!(out, "Error: {err}");
}

fn start_logging(config: &CatalogConfig, level: Option<&str>) {
    let level = level.unwrap_or_else(|| default_log_level());
    let result = config
        .log_dir()
        .map_err(|err| err.to_string())
        .and_then(|log_dir| init_logging(level, &log_dir));
    if let Err(err) = result {
        eprintln!("Warning: file logging disabled: {err}");
    }
}

fn run<R: BufRead, W: Write>(
    command: Command,
    config: &CatalogConfig,
    prompter: &mut Prompter<R, W>,
) -> AppResult<()> {
    let app = App::open(config)?;
    match command {
        Command::AddClass { code, name } => {
            let mut request = AddClassificationRequest { code, name };
            request.prompt_missing(prompter)?;
            let classification = app.add_classification(&request)?;
            println!(
                "Classification added: {} {} (ID: {})",
                classification.code_num, classification.name, classification.id
            );
        }
        Command::AddBib {
            title,
            author,
            publisher,
            kind,
            class_code,
            year,
            isbn,
            title_en,
            author_en,
            bib_index,
        } => {
            let mut request = AddBibliographyRequest {
                title,
                author,
                publisher,
                kind,
                class_code,
                year,
                isbn,
                title_en,
                author_en,
                bib_index,
            };
            request.prompt_missing(prompter)?;
            let bibliography = app.add_bibliography(&request)?;
            println!(
                "Bibliography added: {} (ID: {})",
                describe_bibliography(&bibliography),
                bibliography.id
            );
        }
        Command::AddReview {
            bib_index,
            goals,
            summary,
        } => {
            let mut request = AddReviewRequest {
                bib_index,
                goals,
                summary,
            };
            request.prompt_missing(prompter)?;
            let review = app.add_review(&request)?;
            println!("Review added: {}", review.id);
        }
        Command::UpdateReview {
            review_id,
            goals,
            summary,
        } => {
            let mut request = UpdateReviewRequest {
                review_id,
                goals,
                summary,
            };
            request.prompt_missing(prompter)?;
            let review = app.update_review(&request)?;
            println!(
                "Review updated: {} (updated at {})",
                review.id,
                review.updated_at.to_rfc3339()
            );
        }
        Command::List {
            limit,
            offset,
            json,
        } => {
            let request = ListRequest { limit, offset };
            let bibliographies = app.list_bibliographies(&request)?;
            if json {
                return print_json_lines(&bibliographies);
            }
            println!("Bibliographies:");
            for bibliography in &bibliographies {
                println!("{}", describe_bibliography(bibliography));
            }
            if request.page_is_full(bibliographies.len()) {
                println!(
                    "\nShowing {} items (use --limit and --offset to see more)",
                    bibliographies.len()
                );
            }
        }
        Command::ListClasses {
            limit,
            offset,
            json,
        } => {
            let classifications = app.list_classifications(&ListRequest { limit, offset })?;
            if json {
                return print_json_lines(&classifications);
            }
            println!("Classifications:");
            for classification in &classifications {
                println!("{:>5} {}", classification.code_num, classification.name);
            }
        }
        Command::Reviews { bib_index, json } => {
            let (bibliography, reviews) = app.reviews_for(&bib_index)?;
            if json {
                return print_json_lines(&reviews);
            }
            println!("Reviews of {}:", describe_bibliography(&bibliography));
            for review in &reviews {
                print_review(review);
            }
        }
    }
    Ok(())
}

fn describe_bibliography(bibliography: &Bibliography) -> String {
    format!(
        "[{}] {} by {} (BibIndex: {})",
        bibliography.kind, bibliography.title, bibliography.author, bibliography.bib_index
    )
}

fn print_review(review: &Review) {
    println!("- {} (updated {})", review.id, review.updated_at.to_rfc3339());
    println!("  goals: {}", review.goals);
    if !review.summary.is_empty() {
        println!("  summary: {}", review.summary);
    }
}

fn print_json_lines<T: Serialize>(items: &[T]) -> AppResult<()> {
    for item in items {
        println!("{}", serde_json::to_string(item)?);
    }
    Ok(())
}
