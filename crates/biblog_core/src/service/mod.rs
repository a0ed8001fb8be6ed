//! Catalogue use-case services.
//!
//! # Responsibility
//! - Validate requests and enrich them with IDs, derived keys and timestamps.
//! - Keep CLI callers decoupled from table storage details.
//!
//! # Invariants
//! - A request that fails validation never reaches a repository write.

pub mod bib_index;
pub mod bibliography_service;
pub mod review_service;
