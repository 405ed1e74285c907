//! Renderers for pipeline results.
//!
//! Tables are tab-separated with a header row; fields a source could not
//! provide render as `NA`. The JSON report combines every category of a run.

use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::{ReportFormat, RunConfig};
use crate::core::types::{AnalysisMode, Assembly, Category, NOT_AVAILABLE};
use crate::core::verdict::ReportableVariant;
use crate::pgx::engine::DiplotypeCall;
use crate::pgx::genotypes::{AnnotatedPgxVariant, NOT_FOUND};
use crate::pipeline::{PharmacogenomicReport, PipelineOutput, RiskReport};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub const RESULTS_HEADER: [&str; 16] = [
    "Variant",
    "Gene",
    "Genotype",
    "rs",
    "ClassifierClassification",
    "DatabaseSignificance",
    "ReviewStatus",
    "ExternalID",
    "DiseaseXref",
    "Phenotype",
    "ACMG_version",
    "OMIM_disorder",
    "Inheritance",
    "VariantsToReport",
    "CompoundHetPartners",
    "PhenotypeMatches",
];

pub const PGX_VARIANTS_HEADER: [&str; 4] = ["Variant", "Genotype", "Gene", "rs"];

pub const DIPLOTYPES_HEADER: [&str; 5] = ["Gene", "Diplotype", "Phenotype", "ActivityScore", "Markers"];

fn or_na(value: Option<&str>) -> &str {
    value.map(str::trim).filter(|v| !v.is_empty()).unwrap_or(NOT_AVAILABLE)
}

fn tsv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer)
}

fn reportable_row(variant: &ReportableVariant) -> Vec<String> {
    let verdict = &variant.verdict;
    let gene = &variant.gene;
    let partners = variant
        .compound_het_partners
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    let matches = variant
        .phenotype_correlation
        .as_ref()
        .map(|c| {
            c.matches
                .iter()
                .map(|m| format!("{} ({})", m.term_id, m.term_name))
                .collect::<Vec<_>>()
                .join("; ")
        })
        .unwrap_or_default();

    vec![
        verdict.key.to_string(),
        verdict.gene.clone(),
        verdict.genotype.to_string(),
        or_na(verdict.rs_id.as_deref()).to_string(),
        or_na(verdict.classifier_classification.as_deref()).to_string(),
        or_na(verdict.database_significance.as_deref()).to_string(),
        or_na(verdict.review_confidence_label.as_deref()).to_string(),
        or_na(verdict.external_id.as_deref()).to_string(),
        or_na(verdict.disease_cross_reference.as_deref()).to_string(),
        or_na(Some(gene.phenotype.as_str())).to_string(),
        or_na(gene.list_version.as_deref()).to_string(),
        or_na(Some(gene.disorder_reference.as_str())).to_string(),
        gene.inheritance.to_string(),
        or_na(Some(gene.reporting_note.as_str())).to_string(),
        or_na(Some(partners.as_str())).to_string(),
        or_na(Some(matches.as_str())).to_string(),
    ]
}

/// Write the reportable variants of a risk category
///
/// # Errors
///
/// Returns `ReportError` if writing fails.
pub fn write_results_tsv<W: Write>(writer: W, report: &RiskReport) -> Result<(), ReportError> {
    let mut tsv = tsv_writer(writer);
    tsv.write_record(RESULTS_HEADER)?;
    for variant in report.reportable.values() {
        tsv.write_record(reportable_row(variant))?;
    }
    tsv.flush()?;
    Ok(())
}

/// Write the annotated pharmacogenomic overlap records
///
/// # Errors
///
/// Returns `ReportError` if writing fails.
pub fn write_pgx_variants_tsv<W: Write>(
    writer: W,
    variants: &[AnnotatedPgxVariant],
) -> Result<(), ReportError> {
    let mut tsv = tsv_writer(writer);
    tsv.write_record(PGX_VARIANTS_HEADER)?;
    for variant in variants {
        tsv.write_record([
            variant.key.to_string().as_str(),
            variant.genotype_code.as_str(),
            variant.gene.as_deref().unwrap_or(NOT_FOUND),
            variant.rs_id.as_deref().unwrap_or(NOT_FOUND),
        ])?;
    }
    tsv.flush()?;
    Ok(())
}

fn markers_field(call: &DiplotypeCall) -> String {
    call.markers
        .iter()
        .map(|(rs, zygosity)| format!("{rs}:{zygosity}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Write one row per called gene
///
/// # Errors
///
/// Returns `ReportError` if writing fails.
pub fn write_diplotypes_tsv<W: Write>(writer: W, calls: &[DiplotypeCall]) -> Result<(), ReportError> {
    let mut tsv = tsv_writer(writer);
    tsv.write_record(DIPLOTYPES_HEADER)?;
    for call in calls {
        let markers = markers_field(call);
        tsv.write_record([
            call.gene.as_str(),
            call.diplotype.as_str(),
            or_na(call.phenotype.as_deref()),
            or_na(call.activity_score.as_deref()),
            or_na(Some(markers.as_str())),
        ])?;
    }
    tsv.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct RiskSection<'a> {
    category: Category,
    overlap_variants: usize,
    significant_variants: usize,
    reportable: Vec<&'a ReportableVariant>,
}

#[derive(Serialize)]
struct FailureSection {
    category: Category,
    error: String,
}

/// Combined report of one run
#[derive(Serialize)]
pub struct JsonReport<'a> {
    sample: &'a str,
    assembly: Assembly,
    mode: AnalysisMode,
    evidence_level: u8,
    generated_at: String,
    categories: Vec<RiskSection<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pharmacogenomic: Option<&'a PharmacogenomicReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failures: Vec<FailureSection>,
}

impl<'a> JsonReport<'a> {
    #[must_use]
    pub fn new(config: &'a RunConfig, output: &'a PipelineOutput) -> Self {
        Self {
            sample: config.sample.trim(),
            assembly: config.assembly,
            mode: config.mode,
            evidence_level: config.evidence_level,
            generated_at: chrono::Utc::now().to_rfc3339(),
            categories: output
                .risk
                .iter()
                .map(|r| RiskSection {
                    category: r.category,
                    overlap_variants: r.overlap_count,
                    significant_variants: r.verdicts.len(),
                    reportable: r.reportable.values().collect(),
                })
                .collect(),
            pharmacogenomic: output.pharmacogenomic.as_ref(),
            failures: output
                .failures
                .iter()
                .map(|e| FailureSection {
                    category: e.category(),
                    error: e.to_string(),
                })
                .collect(),
        }
    }
}

/// Write every configured output file of a run; returns the paths written
///
/// # Errors
///
/// Returns `ReportError` if the output directory or a file cannot be written.
pub fn write_outputs(config: &RunConfig, output: &PipelineOutput) -> Result<Vec<PathBuf>, ReportError> {
    std::fs::create_dir_all(&config.out_dir)?;
    let mut written = Vec::new();

    if config.formats.contains(&ReportFormat::Tsv) {
        for report in &output.risk {
            let path = config.output_path(&format!("{}_results.tsv", report.category.code()));
            write_results_tsv(std::fs::File::create(&path)?, report)?;
            written.push(path);
        }
        if let Some(pgx) = &output.pharmacogenomic {
            let path = config.output_path("fg_variants.tsv");
            write_pgx_variants_tsv(std::fs::File::create(&path)?, &pgx.variants)?;
            written.push(path);

            let path = config.output_path("fg_diplotypes.tsv");
            write_diplotypes_tsv(std::fs::File::create(&path)?, &pgx.diplotypes)?;
            written.push(path);
        }
    }

    if config.formats.contains(&ReportFormat::Json) {
        let path = config.output_path("report.json");
        let file = std::io::BufWriter::new(std::fs::File::create(&path)?);
        serde_json::to_writer_pretty(file, &JsonReport::new(config, output))?;
        written.push(path);
    }

    for path in &written {
        tracing::info!("Wrote {}", path.display());
    }
    Ok(written)
}

/// Human-readable list of diplotype calls
///
/// # Errors
///
/// Returns `ReportError::Io` if writing fails.
pub fn write_diplotypes_text<W: Write>(mut writer: W, calls: &[DiplotypeCall]) -> Result<(), ReportError> {
    for call in calls {
        writeln!(
            writer,
            "  {:<8} {:<40} {} (activity score {})",
            call.gene,
            call.diplotype.as_str(),
            or_na(call.phenotype.as_deref()),
            or_na(call.activity_score.as_deref())
        )?;
    }
    Ok(())
}

/// Human-readable summary of a run
///
/// # Errors
///
/// Returns `ReportError::Io` if writing fails.
pub fn write_summary_text<W: Write>(mut writer: W, output: &PipelineOutput) -> Result<(), ReportError> {
    for report in &output.risk {
        writeln!(
            writer,
            "{}: {} overlap variants, {} significant, {} reportable",
            report.category,
            report.overlap_count,
            report.verdicts.len(),
            report.reportable.len()
        )?;
        for variant in report.reportable.values() {
            let verdict = &variant.verdict;
            write!(
                writer,
                "  {} {} {} [{}]",
                verdict.key, verdict.gene, verdict.genotype, variant.gene.inheritance
            )?;
            if !variant.compound_het_partners.is_empty() {
                write!(writer, " compound heterozygous")?;
            }
            if variant.phenotype_correlation.is_some() {
                write!(writer, " phenotype match")?;
            }
            writeln!(writer)?;
        }
    }

    if let Some(pgx) = &output.pharmacogenomic {
        let hits = pgx.variants.iter().filter(|v| v.gene.is_some()).count();
        writeln!(
            writer,
            "{}: {} overlap variants, {} catalog sites",
            Category::Pharmacogenomic,
            pgx.variants.len(),
            hits
        )?;
        write_diplotypes_text(&mut writer, &pgx.diplotypes)?;
    }

    for failure in &output.failures {
        writeln!(writer, "FAILED {failure}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gene::GeneCatalogEntry;
    use crate::core::types::{InheritanceMode, Zygosity};
    use crate::core::verdict::MergedVerdict;
    use crate::pgx::engine::DiplotypeLabel;
    use indexmap::IndexMap;

    fn risk_report() -> RiskReport {
        let key: crate::core::variant::VcfKey = "chr10:94781859:C:T".parse().unwrap();
        let verdict = MergedVerdict {
            key: key.clone(),
            gene: "CYP2C19".to_string(),
            genotype: Zygosity::Heterozygous,
            rs_id: Some("rs4244285".to_string()),
            classifier_classification: Some("Pathogenic".to_string()),
            database_significance: None,
            review_confidence_label: None,
            external_id: None,
            disease_cross_reference: None,
        };
        let variant = ReportableVariant {
            category: Category::PersonalRisk,
            verdict: verdict.clone(),
            gene: GeneCatalogEntry::new("CYP2C19", InheritanceMode::AutosomalDominant)
                .with_phenotype("Drug response"),
            compound_het_partners: Vec::new(),
            phenotype_correlation: None,
        };
        RiskReport {
            category: Category::PersonalRisk,
            overlap_count: 3,
            verdicts: IndexMap::from([(key.clone(), verdict)]),
            reportable: IndexMap::from([(key, variant)]),
        }
    }

    #[test]
    fn test_results_tsv_renders_na() {
        let mut out = Vec::new();
        write_results_tsv(&mut out, &risk_report()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Variant\tGene\tGenotype"));
        let fields: Vec<&str> = lines[1].split('\t').collect();
        assert_eq!(fields.len(), RESULTS_HEADER.len());
        assert_eq!(fields[0], "chr10:94781859:C:T");
        assert_eq!(fields[2], "het");
        assert_eq!(fields[4], "Pathogenic");
        assert_eq!(fields[5], NOT_AVAILABLE);
        assert_eq!(fields[9], "Drug response");
        assert_eq!(fields[12], "AD");
    }

    #[test]
    fn test_diplotypes_tsv() {
        let calls = vec![
            DiplotypeCall {
                gene: "CYP2C19".to_string(),
                diplotype: DiplotypeLabel::Called("*2/*2".to_string()),
                phenotype: Some("Poor Metabolizer".to_string()),
                activity_score: Some("0".to_string()),
                markers: IndexMap::from([("rs4244285".to_string(), Zygosity::Homozygous)]),
            },
            DiplotypeCall {
                gene: "TPMT".to_string(),
                diplotype: DiplotypeLabel::Ambiguous,
                phenotype: None,
                activity_score: None,
                markers: IndexMap::new(),
            },
        ];
        let mut out = Vec::new();
        write_diplotypes_tsv(&mut out, &calls).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("CYP2C19\t*2/*2\tPoor Metabolizer\t0\trs4244285:hom\n"));
        assert!(text.contains("TPMT\tambiguous — manual review required\tNA\tNA\tNA\n"));
    }

    #[test]
    fn test_write_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = RunConfig::new("S1");
        config.out_dir = dir.path().join("out");

        let output = PipelineOutput {
            risk: vec![risk_report()],
            pharmacogenomic: Some(PharmacogenomicReport {
                variants: Vec::new(),
                diplotypes: Vec::new(),
            }),
            failures: Vec::new(),
        };
        let written = write_outputs(&config, &output).unwrap();

        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            [
                "S1_pr_results.tsv",
                "S1_fg_variants.tsv",
                "S1_fg_diplotypes.tsv",
                "S1_report.json"
            ]
        );

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&written[3]).unwrap()).unwrap();
        assert_eq!(json["sample"], "S1");
        assert_eq!(json["categories"][0]["category"], "personal_risk");
        assert_eq!(json["categories"][0]["reportable"][0]["verdict"]["gene"], "CYP2C19");
    }
}
