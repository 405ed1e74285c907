//! Parser for the per-category overlap VCF.
//!
//! The overlap VCF is the sample's normalized call set restricted to the
//! regions of one category. Records are read with noodles; each becomes an
//! [`OverlapVariant`] holding its VCF-convention key and the first sample's
//! `GT`.
//!
//! Records are expected to be biallelic. A record noodles cannot parse, or one
//! with several ALT alleles, an empty or non-nucleotide allele, or position 0,
//! is logged and skipped. A missing or malformed header is an error.

use std::io::{self, BufRead};
use std::path::Path;

use noodles::vcf;
use noodles::vcf::variant::record::samples::keys::key;
use noodles::vcf::variant::record::samples::series::value::genotype::Phasing;
use noodles::vcf::variant::record::AlternateBases;
use noodles::vcf::variant::record_buf::samples::sample::value::Genotype;
use noodles::vcf::variant::record_buf::samples::sample::Value;
use noodles::vcf::variant::RecordBuf;

use crate::core::variant::VcfKey;
use crate::core::verdict::OverlapVariant;
use crate::parsing::{open_maybe_gz, ParseError};
use crate::utils::validation::{check_record_limit, is_allele_length_ok};

/// Genotype recorded when the record carries no sample column
pub const MISSING_GENOTYPE: &str = ".";

/// Parse an overlap VCF file (plain or gzip-compressed)
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read,
/// `ParseError::InvalidFormat` if the header does not parse, or
/// `ParseError::TooManyRecords` if the record limit is exceeded.
pub fn parse_overlap_vcf(path: &Path) -> Result<Vec<OverlapVariant>, ParseError> {
    let reader = open_maybe_gz(path)?;
    parse_overlap_reader(reader)
}

/// Parse overlap VCF text
///
/// # Errors
///
/// See [`parse_overlap_vcf`].
pub fn parse_overlap_vcf_text(text: &str) -> Result<Vec<OverlapVariant>, ParseError> {
    parse_overlap_reader(text.as_bytes())
}

fn parse_overlap_reader<R: BufRead>(reader: R) -> Result<Vec<OverlapVariant>, ParseError> {
    let mut reader = vcf::io::Reader::new(reader);
    let header = reader
        .read_header()
        .map_err(|e| ParseError::InvalidFormat(format!("VCF header: {e}")))?;

    let mut variants = Vec::new();
    let mut skipped = 0usize;
    let mut record = RecordBuf::default();

    for n in 1usize.. {
        match reader.read_record_buf(&header, &mut record) {
            Ok(0) => break,
            Ok(_) => match overlap_variant(&record) {
                Ok(variant) => {
                    if check_record_limit(variants.len()).is_some() {
                        return Err(ParseError::TooManyRecords(variants.len()));
                    }
                    variants.push(variant);
                }
                Err(reason) => {
                    tracing::warn!("Skipping VCF record {}: {}", n, reason);
                    skipped += 1;
                }
            },
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                tracing::warn!("Skipping VCF record {}: {}", n, e);
                skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    tracing::debug!(
        "Parsed {} overlap variants ({} skipped)",
        variants.len(),
        skipped
    );
    Ok(variants)
}

/// Key and first-sample genotype of one parsed record
fn overlap_variant(record: &RecordBuf) -> Result<OverlapVariant, String> {
    let pos = record
        .variant_start()
        .map(|p| p.get() as u64)
        .ok_or_else(|| "position 0 is not a variant position".to_string())?;

    let alternates = record
        .alternate_bases()
        .iter()
        .map(|allele| allele.map(ToString::to_string))
        .collect::<io::Result<Vec<String>>>()
        .map_err(|e| e.to_string())?;
    let [alternate] = alternates.as_slice() else {
        return Err(format!("expected one ALT allele, found {}", alternates.len()));
    };
    let reference = record.reference_bases().to_string();

    if !is_allele_length_ok(&reference) || !is_allele_length_ok(alternate) {
        return Err("allele exceeds maximum length".to_string());
    }

    let key = VcfKey::new(record.reference_sequence_name(), pos, reference, alternate.as_str())
        .map_err(|e| e.to_string())?;

    Ok(OverlapVariant::new(key, first_sample_genotype(record)))
}

/// `GT` of the first sample, or [`MISSING_GENOTYPE`]
fn first_sample_genotype(record: &RecordBuf) -> String {
    match record
        .samples()
        .get_index(0)
        .and_then(|sample| sample.get(key::GENOTYPE))
    {
        Some(Some(Value::Genotype(genotype))) => genotype_code(genotype),
        Some(Some(Value::String(code))) => code.clone(),
        _ => MISSING_GENOTYPE.to_string(),
    }
}

/// Render a genotype as its `GT` text, e.g. `0/1` or `1|1`
fn genotype_code(genotype: &Genotype) -> String {
    let mut code = String::new();
    for (i, allele) in genotype.as_ref().iter().enumerate() {
        if i > 0 {
            code.push(match allele.phasing() {
                Phasing::Phased => '|',
                Phasing::Unphased => '/',
            });
        }
        match allele.position() {
            Some(position) => code.push_str(&position.to_string()),
            None => code.push('.'),
        }
    }
    if code.is_empty() {
        code.push_str(MISSING_GENOTYPE);
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Zygosity;

    const VCF: &str = "##fileformat=VCFv4.2\n\
##contig=<ID=chr10,length=135534747>\n\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tNA12878\n\
chr10\t94781859\t.\tC\tT\t50\tPASS\t.\tGT:DP\t0/1:30\n\
chr1\t97915614\trs1\tC\tCAT\t50\tPASS\t.\tGT:DP\t1|1:25\n\
chr1\t100\t.\tA\tC,G\t50\tPASS\t.\tGT\t1/2\n\
chr1\tabc\t.\tA\tC\t50\tPASS\t.\tGT\t0/1\n\
chr1\t200\t.\tA\t\t50\tPASS\t.\tGT\t0/1\n";

    #[test]
    fn test_parse_overlap_vcf_text() {
        let variants = parse_overlap_vcf_text(VCF).unwrap();
        assert_eq!(variants.len(), 2);

        assert_eq!(variants[0].key.to_string(), "chr10:94781859:C:T");
        assert_eq!(variants[0].genotype_code, "0/1");
        assert_eq!(variants[0].zygosity(), Zygosity::Heterozygous);

        assert_eq!(variants[1].key.to_string(), "chr1:97915614:C:CAT");
        assert_eq!(variants[1].genotype_code, "1|1");
    }

    #[test]
    fn test_sites_only_record() {
        let text = "##fileformat=VCFv4.2\n\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n\
1\t500\t.\tG\tA\t.\t.\t.\n";
        let variants = parse_overlap_vcf_text(text).unwrap();
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].key.to_string(), "1:500:G:A");
        assert_eq!(variants[0].genotype_code, MISSING_GENOTYPE);
    }

    #[test]
    fn test_genotype_rendering() {
        let text = format!(
            "{}chr2\t10\t.\tA\tG\t.\tPASS\t.\tGT\t./.\n\
chr2\t20\t.\tA\tG\t.\tPASS\t.\tGT\t0|1\n\
chr2\t30\t.\tA\tG\t.\tPASS\t.\tGT\t1\n",
            VCF.lines().take(3).map(|l| format!("{l}\n")).collect::<String>()
        );
        let codes: Vec<String> = parse_overlap_vcf_text(&text)
            .unwrap()
            .into_iter()
            .map(|v| v.genotype_code)
            .collect();
        assert_eq!(codes, ["./.", "0|1", "1"]);
    }

    #[test]
    fn test_missing_header_is_an_error() {
        let result = parse_overlap_vcf_text("1\t500\t.\tG\tA\t.\t.\t.\n");
        assert!(matches!(result, Err(ParseError::InvalidFormat(_))));
    }

    #[test]
    fn test_gzip_input() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overlap.vcf.gz");
        let mut encoder =
            GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::default());
        encoder.write_all(VCF.as_bytes()).unwrap();
        encoder.finish().unwrap();

        assert_eq!(parse_overlap_vcf(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_parse_overlap_vcf_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overlap.vcf");
        std::fs::write(&path, VCF).unwrap();
        assert_eq!(parse_overlap_vcf(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_missing_file() {
        let result = parse_overlap_vcf(Path::new("/nonexistent/overlap.vcf"));
        assert!(matches!(result, Err(ParseError::Io(_))));
    }
}
