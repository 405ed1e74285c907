use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::catalog::CatalogError;

/// Phenotype and activity score attached to a called diplotype
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiplotypePhenotype {
    pub phenotype: String,
    pub activity_score: String,
}

#[derive(Debug, Deserialize)]
struct PhenotypeRow {
    #[serde(rename = "GENE")]
    gene: String,
    #[serde(rename = "DIPLOTYPE")]
    diplotype: String,
    #[serde(rename = "Phenotype")]
    phenotype: String,
    #[serde(rename = "Activity_Score", default)]
    activity_score: String,
}

/// Diplotype -> phenotype/activity-score lookup, per gene
#[derive(Debug, Clone, Default)]
pub struct DiplotypePhenotypeTable {
    by_gene: HashMap<String, HashMap<String, DiplotypePhenotype>>,
}

impl DiplotypePhenotypeTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Default location under the categories directory
    #[must_use]
    pub fn default_path(categories_dir: &Path) -> std::path::PathBuf {
        categories_dir.join("FG").join("diplotype_phenotype.csv")
    }

    /// Load the table from a CSV file (`GENE,DIPLOTYPE,Phenotype,Activity_Score`)
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read or a row is malformed.
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)?;
        Self::from_reader(reader)
    }

    /// Parse the table from CSV text
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::CsvError` if a row is malformed.
    pub fn from_csv(text: &str) -> Result<Self, CatalogError> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());
        Self::from_reader(reader)
    }

    fn from_reader<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Self, CatalogError> {
        let mut table = Self::new();
        for row in reader.deserialize::<PhenotypeRow>() {
            let row = row?;
            table.insert(
                &row.gene,
                &row.diplotype,
                DiplotypePhenotype {
                    phenotype: row.phenotype,
                    activity_score: row.activity_score,
                },
            );
        }
        Ok(table)
    }

    pub fn insert(&mut self, gene: &str, diplotype: &str, entry: DiplotypePhenotype) {
        self.by_gene
            .entry(gene.to_string())
            .or_default()
            .insert(diplotype.to_string(), entry);
    }

    #[must_use]
    pub fn get(&self, gene: &str, diplotype: &str) -> Option<&DiplotypePhenotype> {
        self.by_gene.get(gene)?.get(diplotype)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_gene.values().map(HashMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_csv() {
        let table = DiplotypePhenotypeTable::from_csv(
            "GENE,DIPLOTYPE,Phenotype,Activity_Score\n\
             CYP2C19,*2/*2,Poor Metabolizer,n/a\n\
             CYP2C9,*1/*3,Intermediate Metabolizer,1.0\n",
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        let entry = table.get("CYP2C9", "*1/*3").unwrap();
        assert_eq!(entry.phenotype, "Intermediate Metabolizer");
        assert_eq!(entry.activity_score, "1.0");
        assert!(table.get("CYP2C9", "*3/*3").is_none());
        assert!(table.get("TPMT", "*1/*1").is_none());
    }
}
