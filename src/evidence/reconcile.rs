use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::review::review_label;
use crate::core::types::{AnalysisMode, Zygosity};
use crate::core::variant::{to_trimmed_convention, VcfKey};
use crate::core::verdict::{ClassifierAnnotation, DatabaseAnnotation, MergedVerdict, OverlapVariant};
use crate::evidence::store::EvidenceStore;

/// Significance terms accepted from either source by default
pub const DEFAULT_PATHOGENIC_TERMS: [&str; 2] = ["Pathogenic", "Likely pathogenic"];

/// Primary database term accepted when the binary pathogenicity flag is set
pub const CONFLICTING_TERM: &str = "Conflicting interpretations of pathogenicity";

/// rs-id values meaning "no identifier"
const RS_PLACEHOLDERS: [&str; 4] = [".", "unknown", "-1", ""];

/// Which evidence makes a variant clinically significant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcceptanceRule {
    /// Classifier labels accepted on their own
    pub classifier_terms: Vec<String>,

    /// Database significance values accepted on their own
    pub database_terms: Vec<String>,

    /// Primary database term (text before any `;`) accepted with the flag set
    pub conflicting_primary_term: String,

    /// Whether the conflicting term is accepted at all
    pub accept_conflicting_with_flag: bool,
}

impl Default for AcceptanceRule {
    fn default() -> Self {
        Self {
            classifier_terms: DEFAULT_PATHOGENIC_TERMS.iter().map(ToString::to_string).collect(),
            database_terms: DEFAULT_PATHOGENIC_TERMS.iter().map(ToString::to_string).collect(),
            conflicting_primary_term: CONFLICTING_TERM.to_string(),
            accept_conflicting_with_flag: true,
        }
    }
}

impl AcceptanceRule {
    #[must_use]
    pub fn accepts_classifier(&self, annotation: &ClassifierAnnotation) -> bool {
        contains_term(&self.classifier_terms, &annotation.classification)
    }

    #[must_use]
    pub fn accepts_database(&self, annotation: &DatabaseAnnotation) -> bool {
        if contains_term(&self.database_terms, &annotation.significance) {
            return true;
        }
        if !self.accept_conflicting_with_flag || !annotation.pathogenic_flag {
            return false;
        }
        let primary = annotation.significance.split(';').next().unwrap_or_default();
        primary
            .trim()
            .eq_ignore_ascii_case(self.conflicting_primary_term.trim())
    }

    /// Whether at least one source makes the variant significant
    #[must_use]
    pub fn accepts(
        &self,
        classifier: Option<&ClassifierAnnotation>,
        database: Option<&DatabaseAnnotation>,
    ) -> bool {
        classifier.is_some_and(|c| self.accepts_classifier(c))
            || database.is_some_and(|d| self.accepts_database(d))
    }
}

fn contains_term(terms: &[String], value: &str) -> bool {
    let value = value.trim();
    terms.iter().any(|t| t.trim().eq_ignore_ascii_case(value))
}

fn known_rs(rs: Option<&String>) -> Option<&String> {
    rs.filter(|r| !RS_PLACEHOLDERS.contains(&r.trim().to_lowercase().as_str()))
}

/// Configuration of one reconciliation pass
#[derive(Debug, Clone, Default)]
pub struct ReconciliationConfig {
    pub rule: AcceptanceRule,
    pub mode: AnalysisMode,
}

/// Merges classifier and database evidence into one verdict per variant
pub struct ReconciliationEngine<'a> {
    store: &'a EvidenceStore,
    config: ReconciliationConfig,
}

impl<'a> ReconciliationEngine<'a> {
    /// Create an engine with the default acceptance rule in advanced mode
    #[must_use]
    pub fn new(store: &'a EvidenceStore) -> Self {
        Self {
            store,
            config: ReconciliationConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(store: &'a EvidenceStore, config: ReconciliationConfig) -> Self {
        Self { store, config }
    }

    /// Reconcile the evidence of one overlap variant.
    ///
    /// Returns `None` when neither source knows the variant or when no source
    /// makes it significant under the acceptance rule.
    #[must_use]
    pub fn reconcile(&self, variant: &OverlapVariant) -> Option<MergedVerdict> {
        let trimmed = to_trimmed_convention(&variant.key);
        let classifier = self.store.classifier(&trimmed);
        let database = match self.config.mode {
            AnalysisMode::Advanced => self.store.database(&variant.key),
            AnalysisMode::Basic => None,
        };

        if classifier.is_none() && database.is_none() {
            return None;
        }

        if !self.config.rule.accepts(classifier, database) {
            tracing::debug!("{}: not significant in either source", variant.key);
            return None;
        }

        Some(merge(variant, classifier, database))
    }

    /// Reconcile a whole overlap set. The result follows input order and a
    /// key seen twice keeps its first verdict.
    #[must_use]
    pub fn reconcile_all(&self, variants: &[OverlapVariant]) -> IndexMap<VcfKey, MergedVerdict> {
        let mut verdicts = IndexMap::new();
        for variant in variants {
            if verdicts.contains_key(&variant.key) {
                continue;
            }
            if let Some(verdict) = self.reconcile(variant) {
                verdicts.insert(variant.key.clone(), verdict);
            }
        }
        tracing::info!(
            "Reconciled {} of {} overlap variants",
            verdicts.len(),
            variants.len()
        );
        verdicts
    }
}

fn merge(
    variant: &OverlapVariant,
    classifier: Option<&ClassifierAnnotation>,
    database: Option<&DatabaseAnnotation>,
) -> MergedVerdict {
    let genotype = match classifier.map(|c| &c.genotype) {
        Some(z) if !matches!(z, Zygosity::Unknown(_)) => z.clone(),
        _ => variant.zygosity(),
    };

    let gene = database
        .map(|d| d.gene.as_str())
        .filter(|g| !g.trim().is_empty())
        .or_else(|| classifier.map(|c| c.gene.as_str()))
        .unwrap_or_default()
        .to_string();

    let rs_id = known_rs(classifier.and_then(|c| c.rs_id.as_ref()))
        .or_else(|| known_rs(database.and_then(|d| d.rs_id.as_ref())))
        .cloned();

    MergedVerdict {
        key: variant.key.clone(),
        gene,
        genotype,
        rs_id,
        classifier_classification: classifier.map(|c| c.classification.clone()),
        database_significance: database.map(|d| d.significance.clone()),
        review_confidence_label: database.map(|d| review_label(&d.review_status)),
        external_id: database.and_then(|d| d.external_id.clone()),
        disease_cross_reference: classifier
            .and_then(|c| c.disease_xref.clone())
            .or_else(|| database.and_then(|d| d.disease_xref.clone())),
    }
}
