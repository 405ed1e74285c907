//! Parser for the variant-summary table of the public significance database.
//!
//! The table is tab-separated (optionally gzip-compressed) with a header line;
//! columns are located by name, so both the full upstream summary and the
//! reduced per-assembly extract are accepted. Keys use the VCF convention
//! (`Chromosome`, `PositionVCF`, `ReferenceAlleleVCF`, `AlternateAlleleVCF`).

use csv::StringRecord;
use std::io::Read;
use std::path::Path;

use crate::core::review::{review_stars, MAX_STARS};
use crate::core::types::Assembly;
use crate::core::variant::VcfKey;
use crate::core::verdict::DatabaseAnnotation;
use crate::evidence::store::EvidenceStore;
use crate::parsing::{open_maybe_gz, ParseError};
use crate::utils::validation::{check_record_limit, normalize_rs_id};

/// Which database rows are kept at load time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DatabaseFilter {
    /// Keep only rows of this assembly when the table has an `Assembly` column
    pub assembly: Option<Assembly>,

    /// Minimum review confidence (0-4)
    pub min_review_stars: u8,
}

/// Counters reported after loading a table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatabaseLoadSummary {
    pub loaded: usize,
    pub other_assembly: usize,
    pub below_threshold: usize,
    pub malformed: usize,
}

struct ColumnIndex {
    gene: usize,
    significance: usize,
    review_status: usize,
    chrom: usize,
    pos: usize,
    reference: usize,
    alternate: usize,
    pathogenic_flag: Option<usize>,
    rs_id: Option<usize>,
    accession: Option<usize>,
    assembly: Option<usize>,
    phenotypes: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self, ParseError> {
        let names: Vec<&str> = headers.iter().map(|h| h.trim().trim_start_matches('#')).collect();
        let find = |name: &str| names.iter().position(|h| *h == name);
        let require = |name: &str| find(name).ok_or_else(|| ParseError::MissingColumn(name.to_string()));

        Ok(Self {
            gene: require("GeneSymbol")?,
            significance: require("ClinicalSignificance")?,
            review_status: require("ReviewStatus")?,
            chrom: require("Chromosome")?,
            pos: require("PositionVCF")?,
            reference: require("ReferenceAlleleVCF")?,
            alternate: require("AlternateAlleleVCF")?,
            pathogenic_flag: find("ClinSigSimple"),
            rs_id: find("RS# (dbSNP)"),
            accession: find("RCVaccession"),
            assembly: find("Assembly"),
            phenotypes: find("PhenotypeList"),
        })
    }
}

/// Load a database table into the evidence store
///
/// # Errors
///
/// Returns `ParseError::Io`/`ParseError::Csv` if the table cannot be read,
/// `ParseError::MissingColumn` if a required column is absent,
/// `ParseError::InvalidFormat` for a threshold above 4, or
/// `ParseError::TooManyRecords` if the record limit is exceeded.
pub fn load_database_table(
    path: &Path,
    filter: &DatabaseFilter,
    store: &mut EvidenceStore,
) -> Result<DatabaseLoadSummary, ParseError> {
    let summary = read_database(open_maybe_gz(path)?, filter, store)?;
    tracing::info!(
        "Loaded {} database records from {} ({} other assembly, {} below {} stars, {} malformed)",
        summary.loaded,
        path.display(),
        summary.other_assembly,
        summary.below_threshold,
        filter.min_review_stars,
        summary.malformed
    );
    Ok(summary)
}

/// Load database table text into the evidence store
///
/// # Errors
///
/// See [`load_database_table`].
pub fn load_database_text(
    text: &str,
    filter: &DatabaseFilter,
    store: &mut EvidenceStore,
) -> Result<DatabaseLoadSummary, ParseError> {
    read_database(text.as_bytes(), filter, store)
}

fn read_database<R: Read>(
    reader: R,
    filter: &DatabaseFilter,
    store: &mut EvidenceStore,
) -> Result<DatabaseLoadSummary, ParseError> {
    if filter.min_review_stars > MAX_STARS {
        return Err(ParseError::InvalidFormat(format!(
            "review threshold {} exceeds {MAX_STARS}",
            filter.min_review_stars
        )));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);
    let columns = ColumnIndex::from_headers(reader.headers()?)?;
    let wanted_assembly = filter.assembly.map(|a| a.to_string());

    let mut summary = DatabaseLoadSummary::default();
    let mut record = StringRecord::new();
    while reader.read_record(&mut record)? {
        let field = |i: usize| record.get(i).map_or("", str::trim);

        if let (Some(col), Some(wanted)) = (columns.assembly, wanted_assembly.as_deref()) {
            if field(col) != wanted {
                summary.other_assembly += 1;
                continue;
            }
        }

        let review_status = field(columns.review_status);
        let stars = review_stars(review_status);
        if stars < filter.min_review_stars {
            summary.below_threshold += 1;
            continue;
        }

        let key = match field(columns.pos)
            .parse::<u64>()
            .map_err(|_| format!("invalid position '{}'", field(columns.pos)))
            .and_then(|pos| {
                VcfKey::new(
                    field(columns.chrom),
                    pos,
                    field(columns.reference),
                    field(columns.alternate),
                )
                .map_err(|e| e.to_string())
            }) {
            Ok(key) => key,
            Err(reason) => {
                tracing::debug!("Skipping database row {:?}: {}", record.position(), reason);
                summary.malformed += 1;
                continue;
            }
        };

        let optional = |col: Option<usize>| {
            col.map(field)
                .filter(|v| !v.is_empty() && *v != "-" && *v != "na")
                .map(ToString::to_string)
        };

        let annotation = DatabaseAnnotation {
            gene: field(columns.gene).to_string(),
            significance: field(columns.significance).to_string(),
            pathogenic_flag: columns.pathogenic_flag.is_some_and(|col| field(col) == "1"),
            rs_id: columns.rs_id.and_then(|col| normalize_rs_id(field(col))),
            review_status: review_status.to_string(),
            review_stars: stars,
            external_id: optional(columns.accession),
            disease_xref: optional(columns.phenotypes),
        };

        if check_record_limit(summary.loaded).is_some() {
            return Err(ParseError::TooManyRecords(summary.loaded));
        }
        store.insert_database(&key, annotation);
        summary.loaded += 1;
    }

    if summary.malformed > 0 {
        tracing::warn!(
            "Skipped {} database rows without a usable VCF-convention key",
            summary.malformed
        );
    }
    Ok(summary)
}
