//! Static catalogs consumed by the interpretation core.
//!
//! - [`genes`]: monitored genes per category (inheritance mode, phenotype,
//!   disorder reference)
//! - [`pgx`]: pharmacogenomic marker sites, keyed by variant
//! - [`rules`]: the declarative diplotype rule set. A default rule set is
//!   compiled into the binary and validated by `build.rs`; a JSON file of the
//!   same shape can replace it.
//! - [`phenotypes`]: diplotype to phenotype/activity-score table
//!
//! ## Example
//!
//! ```rust,no_run
//! use secondary_findings::catalog::genes::GeneCatalog;
//! use secondary_findings::catalog::rules::DiplotypeRuleSet;
//! use std::path::Path;
//!
//! let genes = GeneCatalog::load_from_file(Path::new("PR/pr_risk_genes.json")).unwrap();
//! println!("{} genes", genes.len());
//!
//! let rules = DiplotypeRuleSet::load_embedded().unwrap();
//! for gene in rules.genes() {
//!     println!("{}", gene.gene);
//! }
//! ```

use thiserror::Error;

pub mod genes;
pub mod pgx;
pub mod phenotypes;
pub mod rules;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Failed to parse catalog table: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Invalid catalog: {0}")]
    Invalid(String),
}
