use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::catalog::CatalogError;
use crate::core::gene::GeneCatalogEntry;
use crate::core::types::{Category, InheritanceMode};

/// One gene as written in the catalog JSON document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneRecord {
    pub gene_symbol: String,
    #[serde(default)]
    pub phenotype: String,
    #[serde(rename = "ACMG_version", default)]
    pub acmg_version: Option<String>,
    #[serde(rename = "OMIM_disorder", default)]
    pub omim_disorder: String,
    pub inheritance: String,
    #[serde(default)]
    pub variants_to_report: String,
}

/// Serializable gene catalog document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneCatalogData {
    #[serde(default)]
    pub category: String,
    pub genes: Vec<GeneRecord>,
}

/// Row of the recommendation-list CSV the JSON document is generated from
#[derive(Debug, Deserialize)]
struct GeneCsvRow {
    #[serde(rename = "Gene")]
    gene: String,
    #[serde(rename = "Phenotype", default)]
    phenotype: String,
    #[serde(rename = "ACMG SF List Version", default)]
    acmg_version: Option<String>,
    #[serde(rename = "OMIM Disorder", default)]
    omim_disorder: String,
    #[serde(rename = "Inheritance")]
    inheritance: String,
    #[serde(rename = "Variants to Report", default)]
    variants_to_report: String,
}

impl From<GeneCsvRow> for GeneRecord {
    fn from(row: GeneCsvRow) -> Self {
        Self {
            gene_symbol: row.gene,
            phenotype: row.phenotype,
            acmg_version: row.acmg_version,
            omim_disorder: row.omim_disorder,
            inheritance: row.inheritance,
            variants_to_report: row.variants_to_report,
        }
    }
}

/// Monitored genes of one category, looked up by gene symbol
#[derive(Debug, Clone, Default)]
pub struct GeneCatalog {
    /// Free-text category label from the catalog document
    pub category: String,

    entries: IndexMap<String, GeneCatalogEntry>,
}

impl GeneCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Location of a category's catalog under the categories directory,
    /// e.g. `PR/pr_risk_genes.json`
    #[must_use]
    pub fn default_path(categories_dir: &Path, category: Category) -> PathBuf {
        let code = category.code();
        categories_dir
            .join(code.to_uppercase())
            .join(format!("{code}_risk_genes.json"))
    }

    /// Load a catalog, choosing CSV or JSON from the file extension
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

        if is_csv {
            let reader = csv::ReaderBuilder::new()
                .has_headers(true)
                .trim(csv::Trim::All)
                .from_path(path)?;
            Self::from_csv_reader(reader)
        } else {
            let content = std::fs::read_to_string(path)?;
            Self::from_json(&content)
        }
    }

    /// Parse a catalog from its JSON document
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ParseError` for invalid JSON.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: GeneCatalogData = serde_json::from_str(json)?;
        Ok(Self::from_records(data.category, data.genes))
    }

    /// Parse a catalog from CSV text with the recommendation-list columns
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::CsvError` if a row cannot be deserialized.
    pub fn from_csv(text: &str) -> Result<Self, CatalogError> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());
        Self::from_csv_reader(reader)
    }

    fn from_csv_reader<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Self, CatalogError> {
        let records = reader
            .deserialize::<GeneCsvRow>()
            .map(|row| row.map(GeneRecord::from))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_records(String::new(), records))
    }

    fn from_records(category: String, records: Vec<GeneRecord>) -> Self {
        let mut catalog = Self {
            category,
            entries: IndexMap::new(),
        };

        for record in records {
            let Some(inheritance) = InheritanceMode::parse(&record.inheritance) else {
                tracing::warn!(
                    "Skipping gene {}: unsupported inheritance '{}'",
                    record.gene_symbol,
                    record.inheritance
                );
                continue;
            };

            let missing: Vec<&str> = [
                ("phenotype", &record.phenotype),
                ("OMIM_disorder", &record.omim_disorder),
            ]
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| field)
            .collect();
            if !missing.is_empty() {
                tracing::warn!(
                    "Skipping gene {}: missing {}",
                    record.gene_symbol,
                    missing.join(", ")
                );
                continue;
            }

            let mut entry = GeneCatalogEntry::new(record.gene_symbol.trim(), inheritance)
                .with_phenotype(record.phenotype)
                .with_disorder(record.omim_disorder)
                .with_reporting_note(record.variants_to_report);
            entry.list_version = record.acmg_version.filter(|v| !v.trim().is_empty());

            catalog.add_entry(entry);
        }

        catalog
    }

    /// Add an entry; a gene symbol already present keeps its first entry
    pub fn add_entry(&mut self, entry: GeneCatalogEntry) {
        if self.entries.contains_key(&entry.gene_symbol) {
            tracing::warn!("Duplicate catalog gene {}, keeping first entry", entry.gene_symbol);
            return;
        }
        self.entries.insert(entry.gene_symbol.clone(), entry);
    }

    #[must_use]
    pub fn get(&self, gene_symbol: &str) -> Option<&GeneCatalogEntry> {
        self.entries.get(gene_symbol)
    }

    pub fn entries(&self) -> impl Iterator<Item = &GeneCatalogEntry> {
        self.entries.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<GeneCatalogEntry> for GeneCatalog {
    fn from_iter<I: IntoIterator<Item = GeneCatalogEntry>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for entry in iter {
            catalog.add_entry(entry);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG_JSON: &str = r#"{
        "category": "personal risk",
        "genes": [
            {"gene_symbol": "BRCA1", "phenotype": "HBOC", "ACMG_version": "1.0",
             "OMIM_disorder": "604370", "inheritance": "AD", "variants_to_report": "All P and LP"},
            {"gene_symbol": "HFE", "phenotype": "Hemochromatosis", "ACMG_version": "3.0",
             "OMIM_disorder": "235200", "inheritance": "AR", "variants_to_report": "HOM P only"},
            {"gene_symbol": "ODD", "phenotype": "x", "OMIM_disorder": "1",
             "inheritance": "AD/AR", "variants_to_report": ""},
            {"gene_symbol": "BRCA1", "phenotype": "duplicate", "OMIM_disorder": "2",
             "inheritance": "AR", "variants_to_report": ""}
        ]
    }"#;

    #[test]
    fn test_from_json() {
        let catalog = GeneCatalog::from_json(CATALOG_JSON).unwrap();
        assert_eq!(catalog.category, "personal risk");
        assert_eq!(catalog.len(), 2);

        let hfe = catalog.get("HFE").unwrap();
        assert_eq!(hfe.inheritance, InheritanceMode::AutosomalRecessive);
        assert_eq!(hfe.disorder_reference, "235200");
        assert_eq!(hfe.reporting_note, "HOM P only");
        assert_eq!(hfe.list_version.as_deref(), Some("3.0"));
    }

    #[test]
    fn test_bad_inheritance_is_skipped() {
        let catalog = GeneCatalog::from_json(CATALOG_JSON).unwrap();
        assert!(catalog.get("ODD").is_none());
    }

    #[test]
    fn test_entries_without_phenotype_or_disorder_are_skipped() {
        let catalog = GeneCatalog::from_json(
            r#"{"category": "PR", "genes": [
                {"gene_symbol": "BRCA1", "inheritance": "AD"},
                {"gene_symbol": "BRCA2", "phenotype": "HBOC", "inheritance": "AD"},
                {"gene_symbol": "MLH1", "phenotype": " ", "OMIM_disorder": "609310", "inheritance": "AD"},
                {"gene_symbol": "TP53", "phenotype": "Li-Fraumeni syndrome", "OMIM_disorder": "151623", "inheritance": "AD"}
            ]}"#,
        )
        .unwrap();
        let genes: Vec<_> = catalog.entries().map(|e| e.gene_symbol.as_str()).collect();
        assert_eq!(genes, ["TP53"]);

        let csv = "Gene,Phenotype,ACMG SF List Version,OMIM Disorder,Inheritance,Variants to Report\n\
                   CFTR,Cystic fibrosis,,,AR,All P and LP\n";
        assert!(GeneCatalog::from_csv(csv).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let catalog = GeneCatalog::from_json(CATALOG_JSON).unwrap();
        let brca1 = catalog.get("BRCA1").unwrap();
        assert_eq!(brca1.phenotype, "HBOC");
        assert_eq!(brca1.inheritance, InheritanceMode::AutosomalDominant);
    }

    #[test]
    fn test_from_csv() {
        let csv = "Gene,Phenotype,ACMG SF List Version,OMIM Disorder,Inheritance,Variants to Report\n\
                   CFTR,Cystic fibrosis,,219700,AR,All P and LP\n\
                   OTC,OTC deficiency,3.1,311250,XL,All P and LP\n";
        let catalog = GeneCatalog::from_csv(csv).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("CFTR").unwrap().list_version, None);
        assert_eq!(
            catalog.get("OTC").unwrap().inheritance,
            InheritanceMode::XLinked
        );
        let order: Vec<_> = catalog.entries().map(|e| e.gene_symbol.as_str()).collect();
        assert_eq!(order, ["CFTR", "OTC"]);
    }

    #[test]
    fn test_default_path() {
        let path = GeneCatalog::default_path(Path::new("categories"), Category::ReproductiveRisk);
        assert_eq!(path, Path::new("categories/RR/rr_risk_genes.json"));
    }
}
