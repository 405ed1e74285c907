//! Run configuration.
//!
//! A [`RunConfig`] names every input of one sample's run. It is loaded from a
//! JSON document and may be adjusted by command-line flags before validation.
//!
//! ```json
//! {
//!   "sample": "NA12878",
//!   "categories_dir": "categories",
//!   "assembly": "37",
//!   "mode": "advanced",
//!   "evidence_level": 1,
//!   "database": "clinvar/variant_summary.txt.gz",
//!   "personal_risk": {
//!     "overlap_vcf": "work/NA12878_pr_intersection.vcf",
//!     "classifier_report": "work/NA12878_pr.hg19_multianno.txt.intervar"
//!   },
//!   "pharmacogenomic": { "overlap_vcf": "work/NA12878_fg_intersection.vcf" },
//!   "out_dir": "results"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::catalog::genes::GeneCatalog;
use crate::catalog::pgx::PharmacoVariantCatalog;
use crate::catalog::phenotypes::DiplotypePhenotypeTable;
use crate::core::review::MAX_STARS;
use crate::core::types::{AnalysisMode, Assembly, Category};
use crate::evidence::reconcile::{AcceptanceRule, ReconciliationConfig};
use crate::parsing::classifier::ClassifierColumns;
use crate::parsing::database::DatabaseFilter;
use crate::utils::validation::{validate_sample_name, ValidationError};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Evidence level {0} is out of range (0-{MAX_STARS})")]
    InvalidEvidenceLevel(u8),

    #[error("No categories selected")]
    NoCategories,

    #[error("Category {0} is selected but has no inputs configured")]
    MissingInputs(Category),

    #[error("Invalid sample name: {0}")]
    InvalidSample(#[from] ValidationError),
}

/// Inputs of a personal- or reproductive-risk category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskInputs {
    /// Overlap of the sample's variants with the category regions
    pub overlap_vcf: PathBuf,

    /// Classifier report for the same overlap set
    #[serde(default)]
    pub classifier_report: Option<PathBuf>,

    /// Gene catalog; defaults to the file under the categories directory
    #[serde(default)]
    pub gene_catalog: Option<PathBuf>,
}

/// Inputs of the pharmacogenomic category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PharmacogenomicInputs {
    pub overlap_vcf: PathBuf,

    #[serde(default)]
    pub variant_catalog: Option<PathBuf>,

    #[serde(default)]
    pub phenotype_table: Option<PathBuf>,

    /// Diplotype rule file replacing the built-in rules
    #[serde(default)]
    pub rules: Option<PathBuf>,
}

/// Phenotype ontology inputs for the diagnosis correlation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhenotypeInputs {
    /// Gene/term annotation table
    pub annotations: PathBuf,

    /// The patient's terms, one per line
    pub patient_terms: PathBuf,
}

/// Acceptance rules per risk category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcceptanceOverrides {
    pub personal_risk: Option<AcceptanceRule>,
    pub reproductive_risk: Option<AcceptanceRule>,
}

/// Files written for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Tsv,
    Json,
}

fn default_evidence_level() -> u8 {
    1
}

fn default_categories_dir() -> PathBuf {
    PathBuf::from("categories")
}

fn default_out_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_formats() -> Vec<ReportFormat> {
    vec![ReportFormat::Tsv, ReportFormat::Json]
}

/// Everything one run needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    pub sample: String,

    #[serde(default = "default_categories_dir")]
    pub categories_dir: PathBuf,

    #[serde(default)]
    pub assembly: Assembly,

    #[serde(default)]
    pub mode: AnalysisMode,

    /// Minimum review confidence of database records (0-4)
    #[serde(default = "default_evidence_level")]
    pub evidence_level: u8,

    /// Variant-summary table of the significance database
    #[serde(default)]
    pub database: Option<PathBuf>,

    #[serde(default)]
    pub personal_risk: Option<RiskInputs>,

    #[serde(default)]
    pub reproductive_risk: Option<RiskInputs>,

    #[serde(default)]
    pub pharmacogenomic: Option<PharmacogenomicInputs>,

    #[serde(default)]
    pub phenotypes: Option<PhenotypeInputs>,

    /// Categories to run; empty runs every configured category
    #[serde(default)]
    pub categories: Vec<Category>,

    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    #[serde(default = "default_formats")]
    pub formats: Vec<ReportFormat>,

    #[serde(default)]
    pub classifier_columns: ClassifierColumns,

    #[serde(default)]
    pub acceptance: AcceptanceOverrides,
}

impl RunConfig {
    /// A configuration with defaults and no category inputs
    #[must_use]
    pub fn new(sample: impl Into<String>) -> Self {
        Self {
            sample: sample.into(),
            categories_dir: default_categories_dir(),
            assembly: Assembly::default(),
            mode: AnalysisMode::default(),
            evidence_level: default_evidence_level(),
            database: None,
            personal_risk: None,
            reproductive_risk: None,
            pharmacogenomic: None,
            phenotypes: None,
            categories: Vec::new(),
            out_dir: default_out_dir(),
            formats: default_formats(),
            classifier_columns: ClassifierColumns::default(),
            acceptance: AcceptanceOverrides::default(),
        }
    }

    /// Load a configuration file. Relative paths stay relative to the
    /// working directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadError` or `ConfigError::ParseError`.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` for invalid JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check the configuration before a run
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for an evidence level above 4, an unusable
    /// sample name, no selected category, or a selected category without inputs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.evidence_level > MAX_STARS {
            return Err(ConfigError::InvalidEvidenceLevel(self.evidence_level));
        }
        validate_sample_name(&self.sample)?;

        let selected = self.selected_categories();
        if selected.is_empty() {
            return Err(ConfigError::NoCategories);
        }
        if let Some(category) = selected.into_iter().find(|c| !self.has_inputs(*c)) {
            return Err(ConfigError::MissingInputs(category));
        }
        Ok(())
    }

    /// Categories to run, in `pr`, `rr`, `fg` order
    #[must_use]
    pub fn selected_categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| {
                if self.categories.is_empty() {
                    self.has_inputs(*c)
                } else {
                    self.categories.contains(c)
                }
            })
            .collect()
    }

    fn has_inputs(&self, category: Category) -> bool {
        match category {
            Category::Pharmacogenomic => self.pharmacogenomic.is_some(),
            _ => self.risk_inputs(category).is_some(),
        }
    }

    #[must_use]
    pub fn risk_inputs(&self, category: Category) -> Option<&RiskInputs> {
        match category {
            Category::PersonalRisk => self.personal_risk.as_ref(),
            Category::ReproductiveRisk => self.reproductive_risk.as_ref(),
            Category::Pharmacogenomic => None,
        }
    }

    /// Reconciliation settings of a risk category
    #[must_use]
    pub fn reconciliation(&self, category: Category) -> ReconciliationConfig {
        let rule = match category {
            Category::PersonalRisk => self.acceptance.personal_risk.clone(),
            Category::ReproductiveRisk => self.acceptance.reproductive_risk.clone(),
            Category::Pharmacogenomic => None,
        };
        ReconciliationConfig {
            rule: rule.unwrap_or_default(),
            mode: self.mode,
        }
    }

    #[must_use]
    pub fn database_filter(&self) -> DatabaseFilter {
        DatabaseFilter {
            assembly: Some(self.assembly),
            min_review_stars: self.evidence_level,
        }
    }

    #[must_use]
    pub fn gene_catalog_path(&self, category: Category) -> PathBuf {
        self.risk_inputs(category)
            .and_then(|inputs| inputs.gene_catalog.clone())
            .unwrap_or_else(|| GeneCatalog::default_path(&self.categories_dir, category))
    }

    #[must_use]
    pub fn variant_catalog_path(&self) -> PathBuf {
        self.pharmacogenomic
            .as_ref()
            .and_then(|inputs| inputs.variant_catalog.clone())
            .unwrap_or_else(|| {
                PharmacoVariantCatalog::default_path(&self.categories_dir, self.assembly)
            })
    }

    #[must_use]
    pub fn phenotype_table_path(&self) -> PathBuf {
        self.pharmacogenomic
            .as_ref()
            .and_then(|inputs| inputs.phenotype_table.clone())
            .unwrap_or_else(|| DiplotypePhenotypeTable::default_path(&self.categories_dir))
    }

    /// Output file `<out_dir>/<sample>_<suffix>`
    #[must_use]
    pub fn output_path(&self, suffix: &str) -> PathBuf {
        self.out_dir.join(format!("{}_{suffix}", self.sample.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_defaults() {
        let config = RunConfig::from_json(
            r#"{"sample": "S1", "personal_risk": {"overlap_vcf": "pr.vcf"}}"#,
        )
        .unwrap();

        assert_eq!(config.mode, AnalysisMode::Advanced);
        assert_eq!(config.evidence_level, 1);
        assert_eq!(config.assembly, Assembly::Grch37);
        assert_eq!(config.formats, [ReportFormat::Tsv, ReportFormat::Json]);
        assert_eq!(config.selected_categories(), [Category::PersonalRisk]);
        assert!(config.validate().is_ok());
        assert_eq!(
            config.gene_catalog_path(Category::PersonalRisk),
            Path::new("categories/PR/pr_risk_genes.json")
        );
    }

    #[test]
    fn test_full_config() {
        let config = RunConfig::from_json(
            r#"{
                "sample": "S1",
                "categories_dir": "/data/categories",
                "assembly": "GRCh38",
                "mode": "basic",
                "evidence_level": 2,
                "categories": ["rr", "fg"],
                "reproductive_risk": {"overlap_vcf": "rr.vcf", "gene_catalog": "rr.csv"},
                "pharmacogenomic": {"overlap_vcf": "fg.vcf"},
                "acceptance": {"reproductive_risk": {"accept_conflicting_with_flag": false}}
            }"#,
        )
        .unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(
            config.selected_categories(),
            [Category::ReproductiveRisk, Category::Pharmacogenomic]
        );
        assert_eq!(config.gene_catalog_path(Category::ReproductiveRisk), Path::new("rr.csv"));
        assert_eq!(
            config.variant_catalog_path(),
            Path::new("/data/categories/FG/fg_risk_variants_grch38.json")
        );

        let rr = config.reconciliation(Category::ReproductiveRisk);
        assert_eq!(rr.mode, AnalysisMode::Basic);
        assert!(!rr.rule.accept_conflicting_with_flag);
        assert!(config.reconciliation(Category::PersonalRisk).rule.accept_conflicting_with_flag);
        assert_eq!(config.database_filter().min_review_stars, 2);
    }

    #[test]
    fn test_validate_errors() {
        let mut config = RunConfig::new("S1");
        assert!(matches!(config.validate(), Err(ConfigError::NoCategories)));

        config.categories = vec![Category::PersonalRisk];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingInputs(Category::PersonalRisk))
        ));

        config.personal_risk = Some(RiskInputs {
            overlap_vcf: "pr.vcf".into(),
            classifier_report: None,
            gene_catalog: None,
        });
        config.evidence_level = 5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidEvidenceLevel(5))
        ));

        config.evidence_level = 4;
        config.sample = "../escape".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidSample(_))));
    }

    #[test]
    fn test_output_path() {
        let mut config = RunConfig::new("S1");
        config.out_dir = PathBuf::from("out");
        assert_eq!(config.output_path("pr_results.tsv"), Path::new("out/S1_pr_results.tsv"));
    }
}
