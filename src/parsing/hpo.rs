//! Readers for the phenotype ontology gene annotations and patient term lists.

use std::io::BufRead;
use std::path::Path;

use crate::parsing::{open_maybe_gz, ParseError};
use crate::reporting::diagnosis::PhenotypeAnnotation;
use crate::utils::validation::check_record_limit;

/// Read the gene/term annotation table
///
/// The table is tab-separated with a header naming at least `hpo_id`,
/// `hpo_name` and `gene_symbol`; extra columns are ignored.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened, `ParseError::Csv`
/// for rows that do not deserialize, or `ParseError::TooManyRecords`.
pub fn load_phenotype_annotations(path: &Path) -> Result<Vec<PhenotypeAnnotation>, ParseError> {
    let entries = read_annotations(open_maybe_gz(path)?)?;
    tracing::debug!("Loaded {} phenotype annotations from {}", entries.len(), path.display());
    Ok(entries)
}

/// Parse annotation table text
///
/// # Errors
///
/// See [`load_phenotype_annotations`].
pub fn parse_phenotype_annotations(text: &str) -> Result<Vec<PhenotypeAnnotation>, ParseError> {
    read_annotations(text.as_bytes())
}

fn read_annotations<R: std::io::Read>(reader: R) -> Result<Vec<PhenotypeAnnotation>, ParseError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let mut entries = Vec::new();
    for result in rdr.deserialize() {
        let entry: PhenotypeAnnotation = result?;
        if check_record_limit(entries.len()).is_some() {
            return Err(ParseError::TooManyRecords(entries.len()));
        }
        entries.push(entry);
    }
    Ok(entries)
}

/// Read a patient's phenotype terms, one identifier per line
///
/// Blank lines and `#` comments are ignored; anything after the first
/// whitespace (e.g. a term name) is dropped.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read.
pub fn load_patient_terms(path: &Path) -> Result<Vec<String>, ParseError> {
    let reader = open_maybe_gz(path)?;
    let mut terms = Vec::new();
    for line in reader.lines() {
        if let Some(term) = parse_term_line(&line?) {
            terms.push(term);
        }
    }
    tracing::debug!("Loaded {} patient phenotype terms", terms.len());
    Ok(terms)
}

fn parse_term_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    line.split_whitespace().next().map(ToString::to_string)
}
