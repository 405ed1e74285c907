use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::catalog::CatalogError;
use crate::core::types::Assembly;
use crate::core::variant::{VariantKey, VcfKey};

/// Gene and dbSNP id of a pharmacogenomic marker site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PgxSite {
    pub gene_symbol: String,
    pub rs: String,
}

/// Serializable pharmacogenomic catalog document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PgxCatalogData {
    #[serde(default)]
    pub category: String,

    /// `chrom:pos:ref:alt` -> site; the ALT may list several alleles
    pub variants: IndexMap<String, PgxSite>,
}

/// Known pharmacogenomic marker variants, keyed in VCF convention
#[derive(Debug, Clone, Default)]
pub struct PharmacoVariantCatalog {
    pub category: String,

    /// Canonical-chromosome key -> site
    sites: IndexMap<VariantKey, PgxSite>,
}

impl PharmacoVariantCatalog {
    /// Relative path of the catalog for an assembly under the categories directory
    #[must_use]
    pub fn default_path(categories_dir: &Path, assembly: Assembly) -> std::path::PathBuf {
        categories_dir
            .join("FG")
            .join(format!("fg_risk_variants_grch{}.json", assembly.number()))
    }

    /// Load the catalog from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse the catalog from JSON. Keys that are not valid variant keys are
    /// skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ParseError` for invalid JSON.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: PgxCatalogData = serde_json::from_str(json)?;
        let mut catalog = Self {
            category: data.category,
            sites: IndexMap::new(),
        };

        for (key, site) in data.variants {
            let parsed: VariantKey = match key.parse() {
                Ok(k) => k,
                Err(e) => {
                    tracing::warn!("Skipping pharmacogenomic site {key}: {e}");
                    continue;
                }
            };
            for alternate in parsed.alternate.split(',') {
                let single = VariantKey::new(&parsed.chrom, parsed.pos, &parsed.reference, alternate);
                match VcfKey::try_from(single) {
                    Ok(vcf) => catalog.insert(&vcf, site.clone()),
                    Err(e) => tracing::warn!("Skipping pharmacogenomic site {key}: {e}"),
                }
            }
        }

        Ok(catalog)
    }

    pub fn insert(&mut self, key: &VcfKey, site: PgxSite) {
        self.sites.insert(key.key().canonical(), site);
    }

    /// Look up a marker site; chromosome spelling (`chr1` / `1`) is ignored
    #[must_use]
    pub fn get(&self, key: &VcfKey) -> Option<&PgxSite> {
        self.sites.get(&key.key().canonical())
    }

    /// Distinct genes of the catalog, in first-seen order
    pub fn genes(&self) -> Vec<&str> {
        let mut genes: Vec<&str> = Vec::new();
        for site in self.sites.values() {
            if !genes.contains(&site.gene_symbol.as_str()) {
                genes.push(&site.gene_symbol);
            }
        }
        genes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}
