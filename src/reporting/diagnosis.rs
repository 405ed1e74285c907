use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::core::variant::VcfKey;
use crate::core::verdict::{PhenotypeCorrelation, PhenotypeMatch, ReportableVariant};

/// One row of the phenotype-ontology gene annotation table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhenotypeAnnotation {
    pub hpo_id: String,
    pub hpo_name: String,
    #[serde(alias = "entrez_id", default, deserialize_with = "csv::invalid_option")]
    pub ncbi_gene_id: Option<u32>,
    pub gene_symbol: String,
    #[serde(default)]
    pub disease_id: String,
}

/// Cross-references reportable genes with the patient's phenotype terms
#[derive(Debug, Clone, Default)]
pub struct PhenotypeCorrelator {
    by_gene: HashMap<String, Vec<PhenotypeMatch>>,
}

impl PhenotypeCorrelator {
    /// Build the gene -> matching term index for one patient
    #[must_use]
    pub fn new(annotations: &[PhenotypeAnnotation], patient_terms: &[String]) -> Self {
        let wanted: HashSet<&str> = patient_terms.iter().map(|t| t.trim()).collect();

        let by_gene = annotations
            .iter()
            .filter(|a| wanted.contains(a.hpo_id.as_str()))
            .into_group_map_by(|a| a.gene_symbol.clone())
            .into_iter()
            .map(|(gene, rows)| {
                let matches = rows
                    .into_iter()
                    .into_group_map_by(|a| (a.hpo_id.clone(), a.hpo_name.clone()))
                    .into_iter()
                    .sorted_by(|(a, _), (b, _)| a.cmp(b))
                    .map(|((term_id, term_name), terms)| PhenotypeMatch {
                        term_id,
                        term_name,
                        disease_ids: terms
                            .iter()
                            .map(|a| a.disease_id.trim())
                            .filter(|d| !d.is_empty())
                            .unique()
                            .map(ToString::to_string)
                            .collect(),
                    })
                    .collect();
                (gene, matches)
            })
            .collect();

        Self { by_gene }
    }

    /// Matching terms for a gene, if any
    #[must_use]
    pub fn correlate(&self, gene: &str) -> Option<PhenotypeCorrelation> {
        self.by_gene.get(gene).map(|matches| PhenotypeCorrelation {
            matches: matches.clone(),
        })
    }

    /// Attach correlations to reportable variants; returns how many matched
    pub fn annotate(&self, reportable: &mut IndexMap<VcfKey, ReportableVariant>) -> usize {
        let mut matched = 0;
        for variant in reportable.values_mut() {
            variant.phenotype_correlation = self.correlate(&variant.verdict.gene);
            if variant.phenotype_correlation.is_some() {
                tracing::info!(
                    "{}: gene {} matches the patient phenotype",
                    variant.verdict.key,
                    variant.verdict.gene
                );
                matched += 1;
            }
        }
        matched
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_gene.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(hpo: &str, gene: &str, disease: &str) -> PhenotypeAnnotation {
        PhenotypeAnnotation {
            hpo_id: hpo.to_string(),
            hpo_name: format!("name of {hpo}"),
            ncbi_gene_id: None,
            gene_symbol: gene.to_string(),
            disease_id: disease.to_string(),
        }
    }

    #[test]
    fn test_correlate() {
        let annotations = vec![
            row("HP:0001", "BRCA1", "OMIM:604370"),
            row("HP:0001", "BRCA1", "ORPHA:145"),
            row("HP:0001", "BRCA1", "OMIM:604370"),
            row("HP:0002", "BRCA1", "OMIM:1"),
            row("HP:0003", "HFE", "OMIM:235200"),
        ];
        let terms = vec!["HP:0001".to_string(), "HP:0003".to_string()];
        let correlator = PhenotypeCorrelator::new(&annotations, &terms);

        let brca1 = correlator.correlate("BRCA1").unwrap();
        assert_eq!(brca1.matches.len(), 1);
        assert_eq!(brca1.matches[0].term_id, "HP:0001");
        assert_eq!(brca1.matches[0].disease_ids, ["OMIM:604370", "ORPHA:145"]);

        assert!(correlator.correlate("HFE").is_some());
        assert!(correlator.correlate("TTN").is_none());
    }

    #[test]
    fn test_no_patient_terms() {
        let correlator = PhenotypeCorrelator::new(&[row("HP:0001", "BRCA1", "")], &[]);
        assert!(correlator.is_empty());
    }
}
