//! Readers for the tables produced by the external collaborators.
//!
//! This module provides parsers for:
//!
//! - **Overlap VCF**: the category's normalized variants restricted to its regions, read with noodles
//! - **Classifier reports**: the tab-separated pathogenicity classifier output
//! - **Database tables**: the variant-summary table of the public significance database
//! - **Phenotype ontology**: the gene/term annotation table and patient term lists
//!
//! Malformed records are logged and skipped. Unreadable inputs, missing
//! columns, a missing VCF header and oversized inputs are errors.
//!
//! ## Example
//!
//! ```rust,no_run
//! use secondary_findings::parsing::vcf::parse_overlap_vcf;
//! use std::path::Path;
//!
//! let variants = parse_overlap_vcf(Path::new("sample_pr_intersection.vcf")).unwrap();
//! println!("{} variants in the personal-risk regions", variants.len());
//! ```

pub mod classifier;
pub mod database;
pub mod hpo;
pub mod vcf;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::bufread::MultiGzDecoder;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    #[error("Too many records: {0} exceeds maximum allowed")]
    TooManyRecords(usize),
}

/// Open a text file, decompressing it when the name ends in `.gz`
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened.
pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn BufRead>, ParseError> {
    let file = BufReader::new(File::open(path)?);
    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        tracing::trace!("Opening {:?} as gzip for reading", path);
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        tracing::trace!("Opening {:?} as plain text for reading", path);
        Ok(Box::new(file))
    }
}
