use std::collections::HashMap;

use crate::core::variant::{TrimmedKey, VariantKey, VcfKey};
use crate::core::verdict::{ClassifierAnnotation, DatabaseAnnotation};

/// Per-run annotation tables of the two evidence sources.
///
/// Classifier records are keyed in trimmed convention and database records in
/// VCF convention; both indexes use canonical chromosome names. The store is
/// filled once at load time and only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct EvidenceStore {
    classifier: HashMap<VariantKey, ClassifierAnnotation>,
    database: HashMap<VariantKey, DatabaseAnnotation>,
}

impl EvidenceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a classifier record. A key seen before keeps its first record.
    pub fn insert_classifier(&mut self, key: &TrimmedKey, annotation: ClassifierAnnotation) {
        let canonical = key.key().canonical();
        if self.classifier.contains_key(&canonical) {
            tracing::debug!("Duplicate classifier record for {key}, keeping first");
            return;
        }
        self.classifier.insert(canonical, annotation);
    }

    /// Add a database record. When a key is seen again, the record with the
    /// higher review confidence is kept (the earlier one on ties).
    pub fn insert_database(&mut self, key: &VcfKey, annotation: DatabaseAnnotation) {
        let canonical = key.key().canonical();
        match self.database.get(&canonical) {
            Some(existing) if existing.review_stars >= annotation.review_stars => {
                tracing::debug!("Duplicate database record for {key}, keeping first");
            }
            _ => {
                self.database.insert(canonical, annotation);
            }
        }
    }

    #[must_use]
    pub fn classifier(&self, key: &TrimmedKey) -> Option<&ClassifierAnnotation> {
        self.classifier.get(&key.key().canonical())
    }

    #[must_use]
    pub fn database(&self, key: &VcfKey) -> Option<&DatabaseAnnotation> {
        self.database.get(&key.key().canonical())
    }

    /// Drop every database record (classifier-only analysis)
    pub fn clear_database(&mut self) {
        self.database.clear();
    }

    #[must_use]
    pub fn classifier_len(&self) -> usize {
        self.classifier.len()
    }

    #[must_use]
    pub fn database_len(&self) -> usize {
        self.database.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classifier.is_empty() && self.database.is_empty()
    }
}
