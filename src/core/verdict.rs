use serde::{Deserialize, Serialize};

use crate::core::gene::GeneCatalogEntry;
use crate::core::types::{Category, Zygosity};
use crate::core::variant::VcfKey;

/// A variant record from the category's overlap set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlapVariant {
    pub key: VcfKey,

    /// Raw `GT` of the sample (e.g. `0/1`)
    pub genotype_code: String,
}

impl OverlapVariant {
    pub fn new(key: VcfKey, genotype_code: impl Into<String>) -> Self {
        Self {
            key,
            genotype_code: genotype_code.into(),
        }
    }

    #[must_use]
    pub fn zygosity(&self) -> Zygosity {
        Zygosity::parse(&self.genotype_code)
    }
}

/// Annotation produced by the pathogenicity classifier (trimmed convention)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierAnnotation {
    pub gene: String,

    /// Classification label, e.g. `Pathogenic`, `Likely pathogenic`
    pub classification: String,

    /// dbSNP identifier, `None` when the classifier reports it as unknown
    pub rs_id: Option<String>,

    /// Disease cross-reference (Orphanet)
    pub disease_xref: Option<String>,

    pub genotype: Zygosity,
}

/// Annotation from the public variant-significance database (VCF convention)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseAnnotation {
    pub gene: String,

    /// Clinical significance; compound terms may be joined by `;` or `/`
    pub significance: String,

    /// Simplified binary pathogenicity flag (`ClinSigSimple == 1`)
    pub pathogenic_flag: bool,

    pub rs_id: Option<String>,

    /// Review status text as published
    pub review_status: String,

    /// Review confidence (0-4) derived from `review_status`
    pub review_stars: u8,

    /// Accession of the database record
    pub external_id: Option<String>,

    /// Condition names attached to the record
    pub disease_xref: Option<String>,
}

/// One reconciled, clinically significant variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedVerdict {
    pub key: VcfKey,
    pub gene: String,
    pub genotype: Zygosity,
    pub rs_id: Option<String>,
    pub classifier_classification: Option<String>,
    pub database_significance: Option<String>,
    pub review_confidence_label: Option<String>,
    pub external_id: Option<String>,
    pub disease_cross_reference: Option<String>,
}

/// Patient phenotype term whose annotated genes include a reported gene
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhenotypeMatch {
    pub term_id: String,
    pub term_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disease_ids: Vec<String>,
}

/// Correlation of a reported variant's gene with the patient's phenotype
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhenotypeCorrelation {
    pub matches: Vec<PhenotypeMatch>,
}

/// A merged verdict that passed the inheritance rules of its category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportableVariant {
    pub category: Category,
    pub verdict: MergedVerdict,
    pub gene: GeneCatalogEntry,

    /// Other variants of the same recessive gene reported together with this one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compound_het_partners: Vec<VcfKey>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phenotype_correlation: Option<PhenotypeCorrelation>,
}
