//! Evidence from the two annotation sources and its reconciliation.
//!
//! [`store::EvidenceStore`] holds the classifier table (trimmed convention)
//! and the database table (VCF convention). [`reconcile::ReconciliationEngine`]
//! looks a caller variant up in both, applies an
//! [`reconcile::AcceptanceRule`] and emits one [`MergedVerdict`] per
//! significant variant.
//!
//! [`MergedVerdict`]: crate::core::verdict::MergedVerdict

pub mod reconcile;
pub mod store;
