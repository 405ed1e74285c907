use serde::{Deserialize, Serialize};

use crate::core::types::InheritanceMode;

/// A gene monitored for one secondary-finding category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneCatalogEntry {
    /// HGNC gene symbol
    pub gene_symbol: String,

    /// Mode of inheritance deciding how variants are reported
    pub inheritance: InheritanceMode,

    /// Associated phenotype
    pub phenotype: String,

    /// Disorder reference (e.g. an OMIM identifier)
    pub disorder_reference: String,

    /// Which variants should be reported for this gene
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reporting_note: String,

    /// Version of the recommendation list that introduced the gene
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_version: Option<String>,
}

impl GeneCatalogEntry {
    pub fn new(gene_symbol: impl Into<String>, inheritance: InheritanceMode) -> Self {
        Self {
            gene_symbol: gene_symbol.into(),
            inheritance,
            phenotype: String::new(),
            disorder_reference: String::new(),
            reporting_note: String::new(),
            list_version: None,
        }
    }

    #[must_use]
    pub fn with_phenotype(mut self, phenotype: impl Into<String>) -> Self {
        self.phenotype = phenotype.into();
        self
    }

    #[must_use]
    pub fn with_disorder(mut self, disorder_reference: impl Into<String>) -> Self {
        self.disorder_reference = disorder_reference.into();
        self
    }

    #[must_use]
    pub fn with_reporting_note(mut self, note: impl Into<String>) -> Self {
        self.reporting_note = note.into();
        self
    }
}
