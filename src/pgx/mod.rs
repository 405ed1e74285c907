//! Pharmacogenomic path: marker annotation and diplotype inference.
//!
//! Overlap records are matched against the marker catalog
//! ([`genotypes::annotate_pgx_variants`]); the resulting observations are run
//! through each gene's decision table by [`engine::DiplotypeEngine`], which
//! always yields one call per gene, ambiguous or not.

pub mod engine;
pub mod genotypes;
