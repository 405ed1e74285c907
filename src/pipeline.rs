//! Per-category orchestration of one sample's run.
//!
//! The personal-risk and reproductive-risk categories share the database
//! table and the phenotype correlator; each then runs reconciliation and the
//! inheritance filter over its own overlap set. The pharmacogenomic category
//! runs alongside them. A failure is reported against its category and never
//! stops the others.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::catalog::genes::GeneCatalog;
use crate::catalog::pgx::PharmacoVariantCatalog;
use crate::catalog::phenotypes::DiplotypePhenotypeTable;
use crate::catalog::rules::DiplotypeRuleSet;
use crate::catalog::CatalogError;
use crate::config::{ConfigError, RunConfig};
use crate::core::types::{AnalysisMode, Category};
use crate::core::variant::VcfKey;
use crate::core::verdict::{MergedVerdict, OverlapVariant, ReportableVariant};
use crate::evidence::reconcile::ReconciliationEngine;
use crate::evidence::store::EvidenceStore;
use crate::parsing::classifier::load_classifier_report;
use crate::parsing::database::load_database_table;
use crate::parsing::hpo::{load_patient_terms, load_phenotype_annotations};
use crate::parsing::vcf::parse_overlap_vcf;
use crate::parsing::ParseError;
use crate::pgx::engine::{DiplotypeCall, DiplotypeEngine};
use crate::pgx::genotypes::{annotate_pgx_variants, AnnotatedPgxVariant};
use crate::reporting::diagnosis::PhenotypeCorrelator;
use crate::reporting::inheritance::InheritanceFilter;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{category}: {source}")]
    Parse {
        category: Category,
        #[source]
        source: ParseError,
    },

    #[error("{category}: {source}")]
    Catalog {
        category: Category,
        #[source]
        source: CatalogError,
    },

    /// The database table or a phenotype input shared by the risk
    /// categories could not be read; every risk category fails with it
    #[error("{category}: shared input {} unavailable: {source}", .path.display())]
    SharedInput {
        category: Category,
        path: PathBuf,
        #[source]
        source: Arc<ParseError>,
    },

    #[error("{0}: no inputs configured")]
    MissingInputs(Category),
}

impl PipelineError {
    #[must_use]
    pub fn category(&self) -> Category {
        match self {
            Self::Parse { category, .. }
            | Self::Catalog { category, .. }
            | Self::SharedInput { category, .. } => *category,
            Self::MissingInputs(category) => *category,
        }
    }
}

/// Result of a personal- or reproductive-risk category
#[derive(Debug, Clone)]
pub struct RiskReport {
    pub category: Category,
    pub overlap_count: usize,
    pub verdicts: IndexMap<VcfKey, MergedVerdict>,
    pub reportable: IndexMap<VcfKey, ReportableVariant>,
}

/// Result of the pharmacogenomic category
#[derive(Debug, Clone, Serialize)]
pub struct PharmacogenomicReport {
    pub variants: Vec<AnnotatedPgxVariant>,
    pub diplotypes: Vec<DiplotypeCall>,
}

/// Everything a run produced, including per-category failures
#[derive(Debug, Default)]
pub struct PipelineOutput {
    pub risk: Vec<RiskReport>,
    pub pharmacogenomic: Option<PharmacogenomicReport>,
    pub failures: Vec<PipelineError>,
}

impl PipelineOutput {
    #[must_use]
    pub fn risk_report(&self, category: Category) -> Option<&RiskReport> {
        self.risk.iter().find(|r| r.category == category)
    }
}

/// Inputs shared by the risk categories
struct SharedEvidence {
    store: EvidenceStore,
    correlator: Option<PhenotypeCorrelator>,
}

/// A shared input that failed to load
struct SharedInputFailure {
    path: PathBuf,
    source: Arc<ParseError>,
}

impl SharedInputFailure {
    fn at(path: &Path) -> impl FnOnce(ParseError) -> Self + '_ {
        move |source| Self {
            path: path.to_path_buf(),
            source: Arc::new(source),
        }
    }
}

/// Run every selected category of a validated configuration
///
/// # Errors
///
/// Returns `ConfigError` if the configuration does not validate. Category
/// failures are collected in [`PipelineOutput::failures`].
pub fn run_pipeline(config: &RunConfig) -> Result<PipelineOutput, ConfigError> {
    config.validate()?;
    let selected = config.selected_categories();
    let risk_categories: Vec<Category> = selected
        .iter()
        .copied()
        .filter(|c| *c != Category::Pharmacogenomic)
        .collect();

    tracing::info!(
        "Running {} for sample {} ({}, {:?} mode)",
        selected.iter().map(|c| c.code()).collect::<Vec<_>>().join(","),
        config.sample,
        config.assembly,
        config.mode
    );

    let (risk_results, pgx_result) = rayon::join(
        || run_risk_categories(config, &risk_categories),
        || {
            selected
                .contains(&Category::Pharmacogenomic)
                .then(|| run_pharmacogenomic(config))
        },
    );

    let mut output = PipelineOutput::default();
    for result in risk_results {
        match result {
            Ok(report) => output.risk.push(report),
            Err(e) => {
                tracing::error!("{e}");
                output.failures.push(e);
            }
        }
    }
    match pgx_result {
        Some(Ok(report)) => output.pharmacogenomic = Some(report),
        Some(Err(e)) => {
            tracing::error!("{e}");
            output.failures.push(e);
        }
        None => {}
    }
    Ok(output)
}

fn run_risk_categories(
    config: &RunConfig,
    categories: &[Category],
) -> Vec<Result<RiskReport, PipelineError>> {
    if categories.is_empty() {
        return Vec::new();
    }

    let shared = match load_shared_evidence(config) {
        Ok(shared) => shared,
        Err(failure) => {
            return categories
                .iter()
                .map(|category| {
                    Err(PipelineError::SharedInput {
                        category: *category,
                        path: failure.path.clone(),
                        source: Arc::clone(&failure.source),
                    })
                })
                .collect();
        }
    };

    categories
        .par_iter()
        .map(|category| run_risk_category(config, *category, &shared))
        .collect()
}

fn load_shared_evidence(config: &RunConfig) -> Result<SharedEvidence, SharedInputFailure> {
    let mut store = EvidenceStore::new();
    match (config.mode, &config.database) {
        (AnalysisMode::Advanced, Some(path)) => {
            load_database_table(path, &config.database_filter(), &mut store)
                .map_err(SharedInputFailure::at(path))?;
        }
        (AnalysisMode::Advanced, None) => {
            tracing::warn!("No database table configured, reconciling classifier evidence only");
        }
        (AnalysisMode::Basic, _) => {}
    }

    let correlator = match &config.phenotypes {
        Some(inputs) => {
            let annotations = load_phenotype_annotations(&inputs.annotations)
                .map_err(SharedInputFailure::at(&inputs.annotations))?;
            let terms = load_patient_terms(&inputs.patient_terms)
                .map_err(SharedInputFailure::at(&inputs.patient_terms))?;
            Some(PhenotypeCorrelator::new(&annotations, &terms))
        }
        None => None,
    };

    Ok(SharedEvidence { store, correlator })
}

fn run_risk_category(
    config: &RunConfig,
    category: Category,
    shared: &SharedEvidence,
) -> Result<RiskReport, PipelineError> {
    let inputs = config
        .risk_inputs(category)
        .ok_or(PipelineError::MissingInputs(category))?;
    let parse_err = |source| PipelineError::Parse { category, source };

    let catalog = GeneCatalog::load_from_file(&config.gene_catalog_path(category))
        .map_err(|source| PipelineError::Catalog { category, source })?;
    tracing::info!("{category}: {} monitored genes", catalog.len());

    let overlap = parse_overlap_vcf(&inputs.overlap_vcf).map_err(parse_err)?;

    let mut store = shared.store.clone();
    if let Some(report) = &inputs.classifier_report {
        load_classifier_report(report, &config.classifier_columns, &mut store).map_err(parse_err)?;
    } else {
        tracing::warn!("{category}: no classifier report configured");
    }

    let engine = ReconciliationEngine::with_config(&store, config.reconciliation(category));
    let verdicts = engine.reconcile_all(&overlap);

    let mut reportable = InheritanceFilter::new(&catalog, category).filter(&verdicts);
    if let Some(correlator) = &shared.correlator {
        let matched = correlator.annotate(&mut reportable);
        tracing::info!("{category}: {matched} reportable variants match the patient phenotype");
    }

    Ok(RiskReport {
        category,
        overlap_count: overlap.len(),
        verdicts,
        reportable,
    })
}

/// Run the pharmacogenomic category alone
///
/// # Errors
///
/// Returns `PipelineError` if the overlap set or a catalog cannot be loaded.
pub fn run_pharmacogenomic(config: &RunConfig) -> Result<PharmacogenomicReport, PipelineError> {
    let category = Category::Pharmacogenomic;
    let inputs = config
        .pharmacogenomic
        .as_ref()
        .ok_or(PipelineError::MissingInputs(category))?;
    let catalog_err = |source| PipelineError::Catalog { category, source };

    let catalog = PharmacoVariantCatalog::load_from_file(&config.variant_catalog_path())
        .map_err(catalog_err)?;
    let rules = match &inputs.rules {
        Some(path) => DiplotypeRuleSet::load_from_file(path),
        None => DiplotypeRuleSet::load_embedded(),
    }
    .map_err(catalog_err)?;

    let phenotype_path = config.phenotype_table_path();
    let phenotypes = if inputs.phenotype_table.is_none() && !phenotype_path.exists() {
        tracing::warn!(
            "No diplotype phenotype table at {}, phenotypes will be unavailable",
            phenotype_path.display()
        );
        DiplotypePhenotypeTable::new()
    } else {
        DiplotypePhenotypeTable::load_from_file(&phenotype_path).map_err(catalog_err)?
    };

    let overlap = parse_overlap_vcf(&inputs.overlap_vcf)
        .map_err(|source| PipelineError::Parse { category, source })?;

    Ok(pharmacogenomic_report(&overlap, &catalog, &rules, &phenotypes))
}

/// Annotate an overlap set and call every gene of the rule set
#[must_use]
pub fn pharmacogenomic_report(
    overlap: &[OverlapVariant],
    catalog: &PharmacoVariantCatalog,
    rules: &DiplotypeRuleSet,
    phenotypes: &DiplotypePhenotypeTable,
) -> PharmacogenomicReport {
    let annotation = annotate_pgx_variants(overlap, catalog);
    let diplotypes = DiplotypeEngine::new(rules, phenotypes).infer_all(&annotation.observed);
    PharmacogenomicReport {
        variants: annotation.variants,
        diplotypes,
    }
}
