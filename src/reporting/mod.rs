//! Reporting decisions over merged verdicts.
//!
//! - [`inheritance`]: inheritance-mode rules, including recessive pairing
//! - [`diagnosis`]: correlation of reported genes with patient phenotype terms

pub mod diagnosis;
pub mod inheritance;
