//! Command-line tests of the secondary-findings binary

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("secondary-findings").unwrap()
}

const GENES: &str = r#"{"category": "RR", "genes": [
    {"gene_symbol": "CFTR", "phenotype": "Cystic fibrosis", "OMIM_disorder": "219700", "inheritance": "AR"},
    {"gene_symbol": "OTC", "phenotype": "Ornithine transcarbamylase deficiency", "OMIM_disorder": "311250", "inheritance": "XL"}
]}"#;

const PGX_CATALOG: &str = r#"{"category": "FG", "variants": {
    "10:94761900:C:T": {"gene_symbol": "CYP2C19", "rs": "rs12769205"},
    "10:94781859:G:A": {"gene_symbol": "CYP2C19", "rs": "rs4244285"}
}}"#;

const VCF_HEADER: &str = "##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\n";

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

fn pgx_vcf(dir: &Path) -> std::path::PathBuf {
    write(
        dir,
        "fg_overlap.vcf",
        &format!(
            "{VCF_HEADER}chr10\t94761900\t.\tC\tT\t50\tPASS\t.\tGT\t1/1\nchr10\t94781859\t.\tG\tA\t50\tPASS\t.\tGT\t0/1\n"
        ),
    )
}

#[test]
fn test_normalize_insertion() {
    cmd()
        .args(["normalize", "chr1:97915614:C:CAT"])
        .assert()
        .success()
        .stdout("chr1:97915614:-:AT\n");
}

#[test]
fn test_normalize_reverse_needs_anchor() {
    cmd()
        .args(["normalize", "1:97915614:-:AT", "--reverse"])
        .assert()
        .failure();

    cmd()
        .args(["normalize", "1:97915614:-:AT", "--reverse", "--anchor", "C"])
        .assert()
        .success()
        .stdout("1:97915614:C:CAT\n");
}

#[test]
fn test_normalize_rejects_bad_key() {
    cmd()
        .args(["normalize", "chr1:0:C:T"])
        .assert()
        .failure();
}

#[test]
fn test_catalog_tsv_with_inheritance_filter() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write(dir.path(), "rr_risk_genes.json", GENES);

    cmd()
        .args(["catalog", "--format", "tsv", "--inheritance", "XL"])
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("OTC\tXL"))
        .stdout(predicate::str::contains("CFTR").not());
}

#[test]
fn test_catalog_by_category() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "RR/rr_risk_genes.json", GENES);

    cmd()
        .args(["catalog", "--category", "rr", "--categories-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 genes"));

    cmd()
        .args(["catalog", "--category", "fg", "--categories-dir"])
        .arg(dir.path())
        .assert()
        .failure();
}

#[test]
fn test_diplotype_json() {
    let dir = tempfile::tempdir().unwrap();
    let vcf = pgx_vcf(dir.path());
    let catalog = write(dir.path(), "fg_variants.json", PGX_CATALOG);

    let output = cmd()
        .args(["diplotype", "--format", "json", "--variants"])
        .arg(&catalog)
        .arg(&vcf)
        .output()
        .unwrap();
    assert!(output.status.success());

    let calls: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let cyp2c19 = calls
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["gene"] == "CYP2C19")
        .unwrap();
    assert_eq!(cyp2c19["diplotype"], "*1/*2");
    assert_eq!(cyp2c19["phenotype"], serde_json::Value::Null);
}

#[test]
fn test_run_writes_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let categories = dir.path().join("categories");
    write(&categories, "FG/fg_risk_variants_grch37.json", PGX_CATALOG);
    write(
        &categories,
        "FG/diplotype_phenotype.csv",
        "GENE,DIPLOTYPE,Phenotype,Activity_Score\nCYP2C19,*1/*2,Intermediate Metabolizer,1\n",
    );
    let vcf = pgx_vcf(dir.path());
    let config = write(
        dir.path(),
        "run.json",
        &serde_json::json!({
            "sample": "NA12878",
            "categories_dir": categories,
            "pharmacogenomic": { "overlap_vcf": vcf },
        })
        .to_string(),
    );
    let out = dir.path().join("results");

    cmd()
        .args(["run", "--config"])
        .arg(&config)
        .arg("--out-dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("CYP2C19"))
        .stdout(predicate::str::contains("Intermediate Metabolizer"));

    assert!(out.join("NA12878_fg_variants.tsv").exists());
    assert!(out.join("NA12878_report.json").exists());
    let diplotypes = std::fs::read_to_string(out.join("NA12878_fg_diplotypes.tsv")).unwrap();
    assert!(diplotypes.starts_with("Gene\tDiplotype\tPhenotype"));
    assert!(diplotypes.contains("CYP2C19\t*1/*2\tIntermediate Metabolizer\t1"));
}

#[test]
fn test_run_fails_when_category_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(
        dir.path(),
        "run.json",
        &serde_json::json!({
            "sample": "S1",
            "categories_dir": dir.path().join("categories"),
            "reproductive_risk": { "overlap_vcf": dir.path().join("missing.vcf") },
        })
        .to_string(),
    );

    cmd()
        .args(["run", "--config"])
        .arg(&config)
        .arg("--out-dir")
        .arg(dir.path().join("out"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("FAILED"))
        .stderr(predicate::str::contains("categories failed"));
}

#[test]
fn test_run_rejects_unselected_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(dir.path(), "run.json", r#"{"sample": "S1"}"#);

    cmd()
        .args(["run", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No categories selected"));
}
