use rayon::prelude::*;
use serde::{Serialize, Serializer};

use crate::catalog::phenotypes::DiplotypePhenotypeTable;
use crate::catalog::rules::{DiplotypeRuleSet, GeneRules, ObservedMarkers};
use crate::pgx::genotypes::ObservedGenotype;

/// Label of a call that no rule of the gene's table resolves
pub const AMBIGUOUS_LABEL: &str = "ambiguous — manual review required";

/// Outcome of the decision table of one gene
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DiplotypeLabel {
    /// Star-allele diplotype, e.g. `*1/*2`
    Called(String),
    /// No branch or rule matched the observed markers
    Ambiguous,
}

impl DiplotypeLabel {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Called(label) => label,
            Self::Ambiguous => AMBIGUOUS_LABEL,
        }
    }

    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Ambiguous)
    }
}

impl std::fmt::Display for DiplotypeLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for DiplotypeLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Diplotype of one pharmacogene, with its phenotype lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiplotypeCall {
    pub gene: String,
    pub diplotype: DiplotypeLabel,
    /// `None` for ambiguous calls and diplotypes missing from the table
    pub phenotype: Option<String>,
    pub activity_score: Option<String>,
    /// Markers the call was made from
    pub markers: ObservedMarkers,
}

/// Infers one diplotype per gene of the rule set
pub struct DiplotypeEngine<'a> {
    rules: &'a DiplotypeRuleSet,
    phenotypes: &'a DiplotypePhenotypeTable,
}

impl<'a> DiplotypeEngine<'a> {
    #[must_use]
    pub fn new(rules: &'a DiplotypeRuleSet, phenotypes: &'a DiplotypePhenotypeTable) -> Self {
        Self { rules, phenotypes }
    }

    /// Call every gene of the rule set, in rule-set order. Genes are
    /// evaluated independently.
    #[must_use]
    pub fn infer_all(&self, observed: &[ObservedGenotype]) -> Vec<DiplotypeCall> {
        self.rules
            .genes()
            .par_iter()
            .map(|gene| self.infer_gene(gene, observed))
            .collect()
    }

    /// Call one gene from the full observation list
    #[must_use]
    pub fn infer_gene(&self, gene: &GeneRules, observed: &[ObservedGenotype]) -> DiplotypeCall {
        let markers = gene_markers(&gene.gene, observed);
        let diplotype = evaluate(gene, &markers);

        if diplotype.is_ambiguous() {
            tracing::warn!(
                "{}: observed markers {:?} match no diplotype rule, manual review required",
                gene.gene,
                markers.keys().collect::<Vec<_>>()
            );
        } else {
            tracing::debug!("{}: called {}", gene.gene, diplotype);
        }

        let lookup = match &diplotype {
            DiplotypeLabel::Called(label) => self.phenotypes.get(&gene.gene, label),
            DiplotypeLabel::Ambiguous => None,
        };

        DiplotypeCall {
            gene: gene.gene.clone(),
            phenotype: lookup.map(|p| p.phenotype.clone()),
            activity_score: lookup.map(|p| p.activity_score.clone()),
            diplotype,
            markers,
        }
    }
}

/// rs id -> zygosity of the gene's carrier observations.
///
/// An rs id observed more than once keeps its first observation, in overlap
/// file order; later records of the same marker are ignored.
fn gene_markers(gene: &str, observed: &[ObservedGenotype]) -> ObservedMarkers {
    let mut markers = ObservedMarkers::new();
    for genotype in observed.iter().filter(|g| g.gene == gene) {
        let zygosity = genotype.zygosity();
        if !zygosity.is_carrier() {
            continue;
        }
        markers.entry(genotype.rs_id.clone()).or_insert(zygosity);
    }
    markers
}

/// Run a gene's decision table over its observed markers
#[must_use]
pub fn evaluate(gene: &GeneRules, markers: &ObservedMarkers) -> DiplotypeLabel {
    let count = markers.keys().filter(|rs| !gene.is_neutral(rs)).count();
    if count == 0 {
        return DiplotypeLabel::Called(gene.reference_diplotype.clone());
    }

    gene.branches
        .iter()
        .find(|branch| branch.is_selected(markers))
        .and_then(|branch| branch.rules.iter().find(|rule| rule.matches(markers, count)))
        .map_or(DiplotypeLabel::Ambiguous, |rule| {
            DiplotypeLabel::Called(rule.diplotype.clone())
        })
}
