//! # secondary-findings
//!
//! A library for interpreting a sample's variant calls for secondary findings.
//!
//! Sequencing done for one clinical question also reveals variants in genes
//! unrelated to it. Guidelines list the genes whose pathogenic variants should
//! be reported anyway: genes of personal risk, genes of reproductive (carrier)
//! risk and pharmacogenes that change drug response.
//!
//! `secondary-findings` takes the overlap of a sample's normalized variants
//! with each category's regions, plus the output of a pathogenicity classifier
//! and a public significance database, and decides what is reportable.
//!
//! ## Features
//!
//! - **Key normalization**: Translates indel keys between VCF and trimmed conventions
//! - **Evidence reconciliation**: Merges two sources into one verdict with fixed precedence
//! - **Inheritance-aware reporting**: Recessive genes need two hits; compound heterozygotes are paired
//! - **Diplotype calling**: Declarative star-allele rules with an explicit ambiguous outcome
//! - **Phenotype correlation**: Flags reported genes annotated to the patient's phenotype terms
//!
//! ## Example
//!
//! ```rust
//! use secondary_findings::{EvidenceStore, OverlapVariant, ReconciliationEngine};
//! use secondary_findings::core::types::Zygosity;
//! use secondary_findings::core::verdict::ClassifierAnnotation;
//!
//! // The classifier keys indels without the anchor base
//! let mut store = EvidenceStore::new();
//! store.insert_classifier(
//!     &"chr1:97915614:-:AT".parse().unwrap(),
//!     ClassifierAnnotation {
//!         gene: "DPYD".to_string(),
//!         classification: "Pathogenic".to_string(),
//!         rs_id: None,
//!         disease_xref: None,
//!         genotype: Zygosity::Heterozygous,
//!     },
//! );
//!
//! // The overlap VCF keeps it
//! let variant = OverlapVariant::new("chr1:97915614:C:CAT".parse().unwrap(), "0/1");
//! let verdict = ReconciliationEngine::new(&store).reconcile(&variant).unwrap();
//! assert_eq!(verdict.gene, "DPYD");
//! assert_eq!(verdict.database_significance, None);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Variant keys, the normalizer and the shared data model
//! - [`catalog`]: Gene catalogs, the pharmacogenomic catalog and diplotype rules
//! - [`evidence`]: Evidence store and reconciliation engine
//! - [`reporting`]: Inheritance filter and phenotype correlation
//! - [`pgx`]: Pharmacogenomic genotype annotation and diplotype inference
//! - [`parsing`]: Readers for the upstream tables
//! - [`pipeline`]: Per-category orchestration
//! - [`report`]: TSV, JSON and text renderers
//! - [`config`]: Run configuration
//! - [`cli`]: Command-line interface implementation

pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;
pub mod evidence;
pub mod parsing;
pub mod pgx;
pub mod pipeline;
pub mod report;
pub mod reporting;
pub mod utils;

// Re-export commonly used types for convenience
pub use catalog::genes::GeneCatalog;
pub use catalog::rules::DiplotypeRuleSet;
pub use config::RunConfig;
pub use core::types::*;
pub use core::variant::{to_trimmed_convention, to_vcf_convention, TrimmedKey, VariantKey, VcfKey};
pub use core::verdict::{MergedVerdict, OverlapVariant, ReportableVariant};
pub use evidence::reconcile::{AcceptanceRule, ReconciliationEngine};
pub use evidence::store::EvidenceStore;
pub use pgx::engine::{DiplotypeCall, DiplotypeEngine, DiplotypeLabel};
pub use pipeline::{run_pipeline, PipelineOutput};
pub use reporting::inheritance::InheritanceFilter;
