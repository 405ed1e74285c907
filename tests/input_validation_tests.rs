//! Input validation test suite
//!
//! Checks that untrusted inputs (sample names used in output paths, malformed
//! or oversized records in upstream tables) are rejected or skipped without
//! stopping a run.

/// Sample names become output file prefixes and must stay inside the output directory
#[test]
fn test_sample_name_traversal_is_blocked() {
    use secondary_findings::utils::validation::{validate_sample_name, ValidationError};

    let traversal_attempts = vec![
        "../etc/passwd",
        "..\\windows\\system32",
        "run/../../secret",
        "nested/sample",
    ];

    for attempt in traversal_attempts {
        match validate_sample_name(attempt) {
            Err(ValidationError::InvalidSampleName) => {}
            Ok(_) => panic!("Sample name '{attempt}' should have been blocked"),
            Err(e) => panic!("Unexpected error for '{attempt}': {e:?}"),
        }
    }

    for attempt in ["S1\0", "S\x01", "name with space", ".hidden"] {
        assert!(
            validate_sample_name(attempt).is_err(),
            "Sample name '{attempt:?}' should be blocked"
        );
    }

    assert!(matches!(
        validate_sample_name("   "),
        Err(ValidationError::EmptySampleName)
    ));
    assert!(matches!(
        validate_sample_name(&"S".repeat(300)),
        Err(ValidationError::SampleNameTooLong)
    ));
    assert_eq!(validate_sample_name(" NA12878_rep-1.b ").unwrap(), "NA12878_rep-1.b");
}

/// A configuration with an unsafe sample name never reaches the pipeline
#[test]
fn test_run_rejects_unsafe_sample() {
    use secondary_findings::config::{ConfigError, PharmacogenomicInputs};
    use secondary_findings::{run_pipeline, RunConfig};

    let mut config = RunConfig::new("../S1");
    config.pharmacogenomic = Some(PharmacogenomicInputs {
        overlap_vcf: "fg.vcf".into(),
        variant_catalog: None,
        phenotype_table: None,
        rules: None,
    });

    assert!(matches!(
        run_pipeline(&config),
        Err(ConfigError::InvalidSample(_))
    ));
}

/// Oversized alleles and malformed records are skipped, not fatal
#[test]
fn test_overlap_vcf_skips_bad_records() {
    use secondary_findings::parsing::vcf::parse_overlap_vcf_text;
    use secondary_findings::utils::validation::MAX_ALLELE_LENGTH;

    let huge = "A".repeat(MAX_ALLELE_LENGTH + 1);
    let text = format!(
        "##fileformat=VCFv4.2\n\
         #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\n\
         chr1\t100\t.\t{huge}\tA\t.\tPASS\t.\tGT\t0/1\n\
         chr1\tnot_a_number\t.\tC\tT\t.\tPASS\t.\tGT\t0/1\n\
         chr1\t0\t.\tC\tT\t.\tPASS\t.\tGT\t0/1\n\
         chr1\t200\t.\tC\tT,G\t.\tPASS\t.\tGT\t0/1\n\
         chr1\t300\n\
         chr1\t400\t.\tG\tA\t.\tPASS\t.\tGT\t1/1\n"
    );

    let variants = parse_overlap_vcf_text(&text).unwrap();
    assert_eq!(variants.len(), 1);
    assert_eq!(variants[0].key.to_string(), "chr1:400:G:A");
    assert_eq!(variants[0].genotype_code, "1/1");
}

/// Truncated classifier lines are skipped
#[test]
fn test_classifier_report_skips_short_lines() {
    use secondary_findings::parsing::classifier::{parse_classifier_text, ClassifierColumns};

    let text = "1\t2\t3\n\n#comment\nnot\ta\treport\tline\n";
    let records = parse_classifier_text(text, &ClassifierColumns::default()).unwrap();
    assert!(records.is_empty());
}

/// A database table missing a required column is an error for the shared input
#[test]
fn test_database_table_requires_columns() {
    use secondary_findings::parsing::database::{load_database_text, DatabaseFilter};
    use secondary_findings::parsing::ParseError;
    use secondary_findings::EvidenceStore;

    let mut store = EvidenceStore::new();
    let result = load_database_text(
        "GeneSymbol\tClinicalSignificance\nHFE\tPathogenic\n",
        &DatabaseFilter::default(),
        &mut store,
    );
    assert!(matches!(result, Err(ParseError::MissingColumn(_))));
    assert!(store.is_empty());
}

/// Malformed keys are rejected by the normalizer instead of producing lookups
#[test]
fn test_variant_key_contract() {
    use secondary_findings::{TrimmedKey, VcfKey};

    for bad in ["chr1:100:C", "chr1:-5:C:T", "chr1:100::T", "chr1:100:C:-", "chr1:100:X:T"] {
        assert!(bad.parse::<VcfKey>().is_err(), "'{bad}' should not parse as a VCF key");
    }
    assert!("chr1:100:-:-".parse::<TrimmedKey>().is_err());
    assert!("chr1:100:-:AT".parse::<TrimmedKey>().is_ok());
}
