use serde::{Deserialize, Serialize};

use crate::catalog::pgx::PharmacoVariantCatalog;
use crate::core::types::Zygosity;
use crate::core::variant::VcfKey;
use crate::core::verdict::OverlapVariant;

/// Gene/rs placeholder of an overlap record that is not a catalog site
pub const NOT_FOUND: &str = "not found";

/// A pharmacogenomic overlap record with its catalog annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedPgxVariant {
    pub key: VcfKey,
    pub genotype_code: String,
    /// `None` when the record is not a catalog site
    pub gene: Option<String>,
    pub rs_id: Option<String>,
}

/// Genotype of the sample at a known pharmacogenomic marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedGenotype {
    pub variant_key: VcfKey,
    pub gene: String,
    pub rs_id: String,
    /// Raw `GT` value, `/` and `|` separators alike
    pub zygosity_code: String,
}

impl ObservedGenotype {
    #[must_use]
    pub fn zygosity(&self) -> Zygosity {
        Zygosity::parse(&self.zygosity_code)
    }
}

/// Annotation result of the pharmacogenomic overlap set
#[derive(Debug, Clone, Default)]
pub struct PgxAnnotation {
    /// One row per overlap record
    pub variants: Vec<AnnotatedPgxVariant>,
    /// Catalog hits only
    pub observed: Vec<ObservedGenotype>,
}

/// Annotate every overlap record against the marker catalog
#[must_use]
pub fn annotate_pgx_variants(
    records: &[OverlapVariant],
    catalog: &PharmacoVariantCatalog,
) -> PgxAnnotation {
    let mut annotation = PgxAnnotation::default();

    for record in records {
        let site = catalog.get(&record.key);
        annotation.variants.push(AnnotatedPgxVariant {
            key: record.key.clone(),
            genotype_code: record.genotype_code.clone(),
            gene: site.map(|s| s.gene_symbol.clone()),
            rs_id: site.map(|s| s.rs.clone()),
        });

        match site {
            Some(site) => annotation.observed.push(ObservedGenotype {
                variant_key: record.key.clone(),
                gene: site.gene_symbol.clone(),
                rs_id: site.rs.clone(),
                zygosity_code: record.genotype_code.clone(),
            }),
            None => tracing::debug!("{}: not a pharmacogenomic catalog site", record.key),
        }
    }

    tracing::info!(
        "Pharmacogenomic overlap: {} records, {} catalog sites",
        annotation.variants.len(),
        annotation.observed.len()
    );
    annotation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::pgx::PgxSite;

    #[test]
    fn test_annotate() {
        let mut catalog = PharmacoVariantCatalog::default();
        catalog.insert(
            &"10:94781859:G:A".parse().unwrap(),
            PgxSite {
                gene_symbol: "CYP2C19".to_string(),
                rs: "rs4244285".to_string(),
            },
        );

        let records = vec![
            OverlapVariant::new("chr10:94781859:G:A".parse().unwrap(), "1|1"),
            OverlapVariant::new("chr10:94781900:G:A".parse().unwrap(), "0/1"),
        ];
        let annotation = annotate_pgx_variants(&records, &catalog);

        assert_eq!(annotation.variants.len(), 2);
        assert_eq!(annotation.variants[1].gene, None);
        assert_eq!(annotation.observed.len(), 1);
        assert_eq!(annotation.observed[0].rs_id, "rs4244285");
        assert_eq!(annotation.observed[0].zygosity(), Zygosity::Homozygous);
    }
}
