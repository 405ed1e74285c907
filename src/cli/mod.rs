//! Command-line interface for secondary-findings.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **run**: Run the full pipeline for one sample from a JSON configuration
//! - **diplotype**: Call pharmacogenomic diplotypes from an overlap VCF
//! - **normalize**: Convert a variant key between VCF and trimmed conventions
//! - **catalog**: List the genes of a category catalog
//!
//! ## Usage
//!
//! ```text
//! # Full run, overriding the output directory
//! secondary-findings run --config NA12878.json --out-dir results
//!
//! # Only the reproductive-risk and pharmacogenomic categories, basic mode
//! secondary-findings run --config NA12878.json --categories rr,fg --mode basic
//!
//! # Diplotypes as JSON
//! secondary-findings diplotype NA12878_fg_intersection.vcf \
//!     --variants categories/FG/fg_risk_variants_grch37.json --format json
//!
//! # Key conventions
//! secondary-findings normalize chr1:97915614:C:CAT
//! secondary-findings normalize 1:97915614:-:AT --reverse --anchor C
//! ```

use clap::{Parser, Subcommand};

use crate::core::types::{Assembly, Category};

pub mod catalog;
pub mod diplotype;
pub mod normalize;
pub mod run;

#[derive(Parser)]
#[command(name = "secondary-findings")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Report secondary findings and pharmacogenomic diplotypes from annotated variant calls")]
#[command(
    long_about = "secondary-findings interprets a sample's variants in personal-risk, reproductive-risk and pharmacogenomic genes.\n\nIt consumes the overlap VCFs and annotation tables produced upstream and:\n- Reconciles classifier and database evidence into one verdict per variant\n- Applies inheritance-aware reporting, pairing compound heterozygotes\n- Calls star-allele diplotypes with an explicit ambiguous outcome"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline for one sample
    Run(run::RunArgs),

    /// Call pharmacogenomic diplotypes from an overlap VCF
    Diplotype(diplotype::DiplotypeArgs),

    /// Convert a variant key between conventions
    Normalize(normalize::NormalizeArgs),

    /// List the genes of a category catalog
    Catalog(catalog::CatalogArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

pub(crate) fn parse_category(s: &str) -> Result<Category, String> {
    Category::parse(s).ok_or_else(|| format!("unknown category '{s}' (expected pr, rr or fg)"))
}

pub(crate) fn parse_assembly(s: &str) -> Result<Assembly, String> {
    Assembly::parse(s).ok_or_else(|| format!("unknown assembly '{s}' (expected 37 or 38)"))
}
