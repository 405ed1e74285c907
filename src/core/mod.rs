//! Core data types for secondary-finding interpretation.
//!
//! - [`VariantKey`], [`VcfKey`], [`TrimmedKey`]: variant identity in the two
//!   coordinate conventions, and the normalizer converting between them
//! - [`ClassifierAnnotation`], [`DatabaseAnnotation`]: per-source evidence
//! - [`MergedVerdict`]: reconciled evidence for one variant
//! - [`GeneCatalogEntry`], [`ReportableVariant`]: gene context and report rows
//! - [`Category`], [`InheritanceMode`], [`Zygosity`]: classification types
//!
//! [`VariantKey`]: variant::VariantKey
//! [`VcfKey`]: variant::VcfKey
//! [`TrimmedKey`]: variant::TrimmedKey
//! [`ClassifierAnnotation`]: verdict::ClassifierAnnotation
//! [`DatabaseAnnotation`]: verdict::DatabaseAnnotation
//! [`MergedVerdict`]: verdict::MergedVerdict
//! [`GeneCatalogEntry`]: gene::GeneCatalogEntry
//! [`ReportableVariant`]: verdict::ReportableVariant
//! [`Category`]: types::Category
//! [`InheritanceMode`]: types::InheritanceMode
//! [`Zygosity`]: types::Zygosity

pub mod gene;
pub mod review;
pub mod types;
pub mod variant;
pub mod verdict;
