//! Parser for the pathogenicity classifier report.
//!
//! The report is tab-separated, one variant per line, keyed by the trimmed
//! convention (`chrom`, `start`, `ref`, `alt` in columns 0, 1, 3 and 4, with
//! `-` for an empty allele). Lines starting with `#` are headers.
//!
//! The verdict column reads like `InterVar: Likely pathogenic PVS1=1 PS1=0 ...`;
//! the classification is the text between `": "` and `" PVS"`. The genotype is
//! taken from the last column.

use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::path::Path;

use crate::core::types::Zygosity;
use crate::core::variant::TrimmedKey;
use crate::core::verdict::ClassifierAnnotation;
use crate::evidence::store::EvidenceStore;
use crate::parsing::{open_maybe_gz, ParseError};
use crate::utils::validation::{check_record_limit, normalize_rs_id};

/// Positions of the annotation columns in the classifier report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierColumns {
    pub gene: usize,
    pub rs_id: usize,
    pub verdict: usize,
    pub disease_xref: usize,
}

impl Default for ClassifierColumns {
    fn default() -> Self {
        Self {
            gene: 5,
            rs_id: 9,
            verdict: 13,
            disease_xref: 32,
        }
    }
}

impl ClassifierColumns {
    fn required_fields(&self) -> usize {
        [self.gene, self.rs_id, self.verdict, 4]
            .into_iter()
            .max()
            .unwrap_or(4)
            + 1
    }
}

/// Read a classifier report and add its records to the evidence store
///
/// Returns the number of records added.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or
/// `ParseError::TooManyRecords` if the record limit is exceeded.
pub fn load_classifier_report(
    path: &Path,
    columns: &ClassifierColumns,
    store: &mut EvidenceStore,
) -> Result<usize, ParseError> {
    let records = parse_classifier_reader(open_maybe_gz(path)?, columns)?;
    let count = records.len();
    for (key, annotation) in records {
        store.insert_classifier(&key, annotation);
    }
    tracing::info!("Loaded {} classifier records from {}", count, path.display());
    Ok(count)
}

/// Parse classifier report text
///
/// # Errors
///
/// Returns `ParseError::TooManyRecords` if the record limit is exceeded.
pub fn parse_classifier_text(
    text: &str,
    columns: &ClassifierColumns,
) -> Result<Vec<(TrimmedKey, ClassifierAnnotation)>, ParseError> {
    parse_classifier_reader(text.as_bytes(), columns)
}

fn parse_classifier_reader<R: BufRead>(
    reader: R,
    columns: &ClassifierColumns,
) -> Result<Vec<(TrimmedKey, ClassifierAnnotation)>, ParseError> {
    let mut records = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches(['\n', '\r']);
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        match parse_line(line, columns) {
            Ok(record) => {
                if check_record_limit(records.len()).is_some() {
                    return Err(ParseError::TooManyRecords(records.len()));
                }
                records.push(record);
            }
            Err(reason) => tracing::warn!("Skipping classifier line {}: {}", i + 1, reason),
        }
    }

    Ok(records)
}

fn parse_line(
    line: &str,
    columns: &ClassifierColumns,
) -> Result<(TrimmedKey, ClassifierAnnotation), String> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < columns.required_fields() {
        return Err(format!("only {} fields", fields.len()));
    }

    let pos: u64 = fields[1]
        .trim()
        .parse()
        .map_err(|_| format!("invalid start '{}'", fields[1]))?;
    let key = TrimmedKey::new(fields[0].trim(), pos, fields[3].trim(), fields[4].trim())
        .map_err(|e| e.to_string())?;

    let genotype = fields
        .last()
        .and_then(|f| f.split(':').next())
        .map_or(Zygosity::Unknown(String::new()), Zygosity::parse);

    let annotation = ClassifierAnnotation {
        gene: fields[columns.gene].trim().to_string(),
        classification: extract_classification(fields[columns.verdict]),
        rs_id: normalize_rs_id(fields[columns.rs_id]),
        disease_xref: fields
            .get(columns.disease_xref)
            .map(|f| f.trim())
            .filter(|f| !f.is_empty() && *f != ".")
            .map(ToString::to_string),
        genotype,
    };
    Ok((key, annotation))
}

/// Classification label inside the verdict column
#[must_use]
pub fn extract_classification(verdict: &str) -> String {
    let label = verdict.split_once(": ").map_or(verdict, |(_, rest)| rest);
    label
        .split(" PVS")
        .next()
        .unwrap_or(label)
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(chrom: &str, start: &str, reference: &str, alt: &str, verdict: &str, gt: &str) -> String {
        let mut fields: Vec<String> = vec![".".to_string(); 34];
        fields[0] = chrom.to_string();
        fields[1] = start.to_string();
        fields[2] = start.to_string();
        fields[3] = reference.to_string();
        fields[4] = alt.to_string();
        fields[5] = "MUTYH".to_string();
        fields[9] = "rs36053993".to_string();
        fields[13] = verdict.to_string();
        fields[32] = "ORPHA:247798".to_string();
        fields[33] = gt.to_string();
        fields.join("\t")
    }

    #[test]
    fn test_extract_classification() {
        assert_eq!(
            extract_classification("InterVar: Likely pathogenic PVS1=1 PS=[0, 0]"),
            "Likely pathogenic"
        );
        assert_eq!(
            extract_classification("InterVar: Uncertain significance PVS1=0"),
            "Uncertain significance"
        );
        assert_eq!(extract_classification("Pathogenic"), "Pathogenic");
    }

    #[test]
    fn test_parse_classifier_text() {
        let text = [
            "#Chr\tStart\tEnd\tRef\tAlt\tRef.Gene".to_string(),
            line("1", "97915614", "-", "AT", "InterVar: Pathogenic PVS1=1", "het"),
            line("1", "45797228", "C", "T", "InterVar: Likely pathogenic PVS1=0", "0/1:30"),
            line("1", "bad", "C", "T", "InterVar: Pathogenic PVS1=1", "het"),
            "1\t2\t3".to_string(),
        ]
        .join("\n");

        let records = parse_classifier_text(&text, &ClassifierColumns::default()).unwrap();
        assert_eq!(records.len(), 2);

        let (key, annotation) = &records[0];
        assert_eq!(key.to_string(), "1:97915614:-:AT");
        assert_eq!(annotation.gene, "MUTYH");
        assert_eq!(annotation.classification, "Pathogenic");
        assert_eq!(annotation.rs_id.as_deref(), Some("rs36053993"));
        assert_eq!(annotation.disease_xref.as_deref(), Some("ORPHA:247798"));
        assert_eq!(annotation.genotype, Zygosity::Heterozygous);

        assert_eq!(records[1].1.classification, "Likely pathogenic");
        assert_eq!(records[1].1.genotype, Zygosity::Heterozygous);
    }

    #[test]
    fn test_unknown_rs_and_xref() {
        let mut text = line("2", "100", "A", "G", "InterVar: Pathogenic PVS1=1", "hom");
        text = text.replace("rs36053993", ".").replace("ORPHA:247798", ".");
        let records = parse_classifier_text(&text, &ClassifierColumns::default()).unwrap();
        assert_eq!(records[0].1.rs_id, None);
        assert_eq!(records[0].1.disease_xref, None);
    }

    #[test]
    fn test_non_ascii_rs_column() {
        let text = line("2", "100", "A", "G", "InterVar: Pathogenic PVS1=1", "het")
            .replace("rs36053993", "aé");
        let records = parse_classifier_text(&text, &ClassifierColumns::default()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].1.rs_id, None);
    }

    #[test]
    fn test_custom_gene_column() {
        let columns = ClassifierColumns {
            gene: 8,
            ..ClassifierColumns::default()
        };
        let text = line("2", "100", "A", "G", "InterVar: Pathogenic PVS1=1", "hom")
            .replacen("\t.\t.\t.\trs36053993", "\t.\t.\tENSG0001\trs36053993", 1);
        let records = parse_classifier_text(&text, &columns).unwrap();
        assert_eq!(records[0].1.gene, "ENSG0001");
    }

    #[test]
    fn test_load_into_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.intervar");
        std::fs::write(
            &path,
            line("chr1", "97915614", "-", "AT", "InterVar: Pathogenic PVS1=1", "het"),
        )
        .unwrap();

        let mut store = EvidenceStore::new();
        let count = load_classifier_report(&path, &ClassifierColumns::default(), &mut store).unwrap();
        assert_eq!(count, 1);

        let key: TrimmedKey = "1:97915614:-:AT".parse().unwrap();
        assert!(store.classifier(&key).is_some());
    }
}
