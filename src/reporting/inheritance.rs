use indexmap::IndexMap;
use std::collections::HashMap;

use crate::catalog::genes::GeneCatalog;
use crate::core::gene::GeneCatalogEntry;
use crate::core::types::{Category, InheritanceMode, Zygosity};
use crate::core::variant::VcfKey;
use crate::core::verdict::{MergedVerdict, ReportableVariant};

/// Why a verdict was reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportReason {
    /// Dominant, semi-dominant or X-linked gene, or reproductive-risk category
    Unconditional,
    /// Recessive gene, biallelic call
    Biallelic,
    /// Recessive gene, heterozygous with another carrier variant in the gene
    CompoundHeterozygous,
}

/// Decides which merged verdicts are reportable under their gene's inheritance mode.
///
/// Recessive heterozygous variants are paired through a gene -> carrier index
/// built once per call. Pairing does not check phase: any two carrier
/// variants of the same gene form a pair.
pub struct InheritanceFilter<'a> {
    catalog: &'a GeneCatalog,
    category: Category,
}

impl<'a> InheritanceFilter<'a> {
    #[must_use]
    pub fn new(catalog: &'a GeneCatalog, category: Category) -> Self {
        Self { catalog, category }
    }

    /// Classify one verdict; `partners` are the other carrier variants of its gene
    #[must_use]
    pub fn classify(
        &self,
        entry: &GeneCatalogEntry,
        genotype: &Zygosity,
        partners: &[&VcfKey],
    ) -> Option<ReportReason> {
        if self.category == Category::ReproductiveRisk
            || entry.inheritance != InheritanceMode::AutosomalRecessive
        {
            return Some(ReportReason::Unconditional);
        }

        match genotype {
            Zygosity::Homozygous | Zygosity::Hemizygous => Some(ReportReason::Biallelic),
            Zygosity::Heterozygous if !partners.is_empty() => {
                Some(ReportReason::CompoundHeterozygous)
            }
            _ => None,
        }
    }

    /// Filter verdicts into reportable variants, preserving verdict order.
    /// Verdicts whose gene is not in the catalog are left out.
    #[must_use]
    pub fn filter(
        &self,
        verdicts: &IndexMap<VcfKey, MergedVerdict>,
    ) -> IndexMap<VcfKey, ReportableVariant> {
        let carriers = carrier_index(verdicts);
        let mut reportable = IndexMap::new();

        for (key, verdict) in verdicts {
            let Some(entry) = self.catalog.get(&verdict.gene) else {
                tracing::debug!("{key}: gene {} not monitored for {}", verdict.gene, self.category);
                continue;
            };

            let partners: Vec<&VcfKey> = carriers
                .get(verdict.gene.as_str())
                .map(|keys| keys.iter().copied().filter(|k| *k != key).collect())
                .unwrap_or_default();

            let Some(reason) = self.classify(entry, &verdict.genotype, &partners) else {
                tracing::debug!(
                    "{key}: {} {} without a second carrier variant, not reported",
                    entry.inheritance,
                    verdict.genotype
                );
                continue;
            };

            let compound_het_partners = if reason == ReportReason::CompoundHeterozygous {
                partners.into_iter().cloned().collect()
            } else {
                Vec::new()
            };

            reportable.insert(
                key.clone(),
                ReportableVariant {
                    category: self.category,
                    verdict: verdict.clone(),
                    gene: entry.clone(),
                    compound_het_partners,
                    phenotype_correlation: None,
                },
            );
        }

        tracing::info!(
            "{}: {} of {} significant variants reportable",
            self.category,
            reportable.len(),
            verdicts.len()
        );
        reportable
    }
}

/// Gene -> keys of verdicts carrying at least one alternate allele
fn carrier_index(verdicts: &IndexMap<VcfKey, MergedVerdict>) -> HashMap<&str, Vec<&VcfKey>> {
    let mut index: HashMap<&str, Vec<&VcfKey>> = HashMap::new();
    for (key, verdict) in verdicts {
        if verdict.genotype.is_carrier() {
            index.entry(verdict.gene.as_str()).or_default().push(key);
        }
    }
    index
}
