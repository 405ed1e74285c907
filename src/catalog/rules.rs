//! Declarative star-allele rule set.
//!
//! Per gene, an ordered list of branches. A branch is selected when every one
//! of its trigger markers was observed; only the first selected branch is
//! evaluated, and its rules are tried in order. A rule matches when all of its
//! marker conditions hold and the number of observed markers (neutral markers
//! excluded) satisfies its count constraint.
//!
//! ```json
//! { "gene": "CYP2C9", "reference_diplotype": "*1/*1",
//!   "branches": [ { "trigger": ["rs1057910"], "rules": [
//!       { "markers": { "rs1057910": "hom" }, "diplotype": "*3/*3" },
//!       { "count": { "exactly": 1 }, "diplotype": "*1/*3" } ] } ] }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::catalog::CatalogError;
use crate::core::types::Zygosity;

/// Rule set schema version
pub const RULES_VERSION: &str = "1.0.0";

/// Observed markers of one gene: rs id -> zygosity
pub type ObservedMarkers = IndexMap<String, Zygosity>;

/// Zygosity a rule requires of a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerState {
    /// Observed with any zygosity
    Any,
    Het,
    Hom,
}

impl MarkerState {
    #[must_use]
    pub fn matches(self, zygosity: &Zygosity) -> bool {
        match self {
            Self::Any => true,
            Self::Het => *zygosity == Zygosity::Heterozygous,
            Self::Hom => *zygosity == Zygosity::Homozygous,
        }
    }
}

/// Constraint on the number of distinct markers observed in the gene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountConstraint {
    #[default]
    Any,
    Exactly(usize),
    AtLeast(usize),
}

impl CountConstraint {
    #[must_use]
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Self::Any => true,
            Self::Exactly(n) => count == n,
            Self::AtLeast(n) => count >= n,
        }
    }
}

/// One row of a branch: marker conditions and count constraint -> diplotype
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiplotypeRule {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub markers: IndexMap<String, MarkerState>,

    #[serde(default)]
    pub count: CountConstraint,

    pub diplotype: String,
}

impl DiplotypeRule {
    #[must_use]
    pub fn matches(&self, observed: &ObservedMarkers, marker_count: usize) -> bool {
        self.count.accepts(marker_count)
            && self.markers.iter().all(|(rs, state)| {
                observed
                    .get(rs)
                    .is_some_and(|zygosity| state.matches(zygosity))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleBranch {
    /// Markers that must all be observed for this branch to be selected
    pub trigger: Vec<String>,
    pub rules: Vec<DiplotypeRule>,
}

impl RuleBranch {
    #[must_use]
    pub fn is_selected(&self, observed: &ObservedMarkers) -> bool {
        self.trigger.iter().all(|rs| observed.contains_key(rs))
    }
}

fn default_reference_diplotype() -> String {
    "*1/*1".to_string()
}

/// Decision table of one pharmacogene
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneRules {
    pub gene: String,

    /// Diplotype called when no counted marker is observed
    #[serde(default = "default_reference_diplotype")]
    pub reference_diplotype: String,

    /// Markers that are recorded but excluded from the marker count
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub neutral_markers: Vec<String>,

    pub branches: Vec<RuleBranch>,
}

impl GeneRules {
    #[must_use]
    pub fn is_neutral(&self, rs: &str) -> bool {
        self.neutral_markers.iter().any(|m| m == rs)
    }
}

/// The full rule set, one table per monitored pharmacogene
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiplotypeRuleSet {
    pub version: String,
    genes: Vec<GeneRules>,
}

impl DiplotypeRuleSet {
    /// Load the rule set compiled into the binary
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the embedded document does not validate.
    pub fn load_embedded() -> Result<Self, CatalogError> {
        // Validated at compile time via build.rs
        const EMBEDDED_RULES: &str = include_str!("../../catalogs/pgx_diplotype_rules.json");
        Self::from_json(EMBEDDED_RULES)
    }

    /// Load a rule set from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read, parsed or validated.
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse and validate a rule set
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ParseError` for invalid JSON and
    /// `CatalogError::Invalid` for an inconsistent table.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let rules: Self = serde_json::from_str(json)?;

        if rules.version != RULES_VERSION {
            tracing::warn!(
                "Diplotype rule set version mismatch (expected {}, found {})",
                RULES_VERSION,
                rules.version
            );
        }

        rules.validate()?;
        Ok(rules)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.genes.is_empty() {
            return Err(CatalogError::Invalid("rule set has no genes".to_string()));
        }

        let mut seen = HashSet::new();
        for gene in &self.genes {
            if !seen.insert(gene.gene.as_str()) {
                return Err(CatalogError::Invalid(format!(
                    "gene {} is defined twice",
                    gene.gene
                )));
            }
            for (i, branch) in gene.branches.iter().enumerate() {
                if branch.trigger.is_empty() {
                    return Err(CatalogError::Invalid(format!(
                        "{} branch {i} has no trigger markers",
                        gene.gene
                    )));
                }
                if let Some(rule) = branch.rules.iter().find(|r| r.diplotype.trim().is_empty()) {
                    return Err(CatalogError::Invalid(format!(
                        "{} branch {i} has a rule without diplotype: {rule:?}",
                        gene.gene
                    )));
                }
            }
        }

        Ok(())
    }

    /// Gene tables in evaluation order
    #[must_use]
    pub fn genes(&self) -> &[GeneRules] {
        &self.genes
    }

    #[must_use]
    pub fn gene(&self, gene: &str) -> Option<&GeneRules> {
        self.genes.iter().find(|g| g.gene == gene)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observed(pairs: &[(&str, &str)]) -> ObservedMarkers {
        pairs
            .iter()
            .map(|(rs, gt)| ((*rs).to_string(), Zygosity::parse(gt)))
            .collect()
    }

    #[test]
    fn test_load_embedded_rules() {
        let rules = DiplotypeRuleSet::load_embedded().unwrap();
        let genes: Vec<_> = rules.genes().iter().map(|g| g.gene.as_str()).collect();
        assert_eq!(genes, ["CYP2C9", "CYP2C19", "DPYD", "NUDT15", "TPMT"]);
        assert!(rules.gene("CYP2C19").unwrap().is_neutral("rs3758581"));
    }

    #[test]
    fn test_count_constraint_json() {
        let rule: DiplotypeRule =
            serde_json::from_str(r#"{"count": {"at_least": 3}, "diplotype": "x"}"#).unwrap();
        assert_eq!(rule.count, CountConstraint::AtLeast(3));
        let rule: DiplotypeRule = serde_json::from_str(r#"{"diplotype": "x"}"#).unwrap();
        assert_eq!(rule.count, CountConstraint::Any);
    }

    #[test]
    fn test_rule_matching() {
        let rule = DiplotypeRule {
            markers: [("rs1".to_string(), MarkerState::Het)].into_iter().collect(),
            count: CountConstraint::Exactly(2),
            diplotype: "*1/*2".to_string(),
        };
        assert!(rule.matches(&observed(&[("rs1", "0/1"), ("rs2", "1/1")]), 2));
        assert!(!rule.matches(&observed(&[("rs1", "1/1"), ("rs2", "1/1")]), 2));
        assert!(!rule.matches(&observed(&[("rs1", "0/1")]), 1));
        assert!(!rule.matches(&observed(&[("rs2", "0/1"), ("rs3", "0/1")]), 2));
    }

    #[test]
    fn test_branch_selection_requires_all_triggers() {
        let branch = RuleBranch {
            trigger: vec!["rs1".to_string(), "rs2".to_string()],
            rules: Vec::new(),
        };
        assert!(branch.is_selected(&observed(&[("rs1", "0/1"), ("rs2", "0/1")])));
        assert!(!branch.is_selected(&observed(&[("rs1", "0/1")])));
    }

    #[test]
    fn test_invalid_rule_sets() {
        assert!(matches!(
            DiplotypeRuleSet::from_json(r#"{"version": "1.0.0", "genes": []}"#),
            Err(CatalogError::Invalid(_))
        ));

        let duplicated = r#"{"version": "1.0.0", "genes": [
            {"gene": "TPMT", "branches": []},
            {"gene": "TPMT", "branches": []}
        ]}"#;
        assert!(matches!(
            DiplotypeRuleSet::from_json(duplicated),
            Err(CatalogError::Invalid(_))
        ));

        let no_trigger = r#"{"version": "1.0.0", "genes": [
            {"gene": "TPMT", "branches": [{"trigger": [], "rules": []}]}
        ]}"#;
        assert!(DiplotypeRuleSet::from_json(no_trigger).is_err());
    }

    #[test]
    fn test_reference_diplotype_default() {
        let rules = DiplotypeRuleSet::from_json(
            r#"{"version": "1.0.0", "genes": [{"gene": "G", "branches": []}]}"#,
        )
        .unwrap();
        assert_eq!(rules.gene("G").unwrap().reference_diplotype, "*1/*1");
    }
}
