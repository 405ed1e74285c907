use serde::{Deserialize, Serialize};

/// Placeholder rendered for fields a source could not provide
pub const NOT_AVAILABLE: &str = "NA";

/// Secondary-finding category a variant is evaluated under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Personal risk (PR)
    #[serde(alias = "pr")]
    PersonalRisk,
    /// Reproductive (carrier) risk (RR)
    #[serde(alias = "rr")]
    ReproductiveRisk,
    /// Pharmacogenomic (FG)
    #[serde(alias = "fg", alias = "pgx")]
    Pharmacogenomic,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::PersonalRisk,
        Category::ReproductiveRisk,
        Category::Pharmacogenomic,
    ];

    /// Short code used in file names (`pr`, `rr`, `fg`)
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::PersonalRisk => "pr",
            Self::ReproductiveRisk => "rr",
            Self::Pharmacogenomic => "fg",
        }
    }

    /// Parse a category from its short code or long name
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pr" | "personal" | "personal_risk" => Some(Self::PersonalRisk),
            "rr" | "reproductive" | "reproductive_risk" => Some(Self::ReproductiveRisk),
            "fg" | "pgx" | "pharmacogenomic" => Some(Self::Pharmacogenomic),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PersonalRisk => write!(f, "personal risk"),
            Self::ReproductiveRisk => write!(f, "reproductive risk"),
            Self::Pharmacogenomic => write!(f, "pharmacogenomic"),
        }
    }
}

/// Mode of inheritance of a catalog gene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InheritanceMode {
    #[serde(rename = "AD")]
    AutosomalDominant,
    #[serde(rename = "SD")]
    SemiDominant,
    #[serde(rename = "XL")]
    XLinked,
    #[serde(rename = "AR")]
    AutosomalRecessive,
}

impl InheritanceMode {
    /// Parse the catalog token (`AD`, `SD`, `XL`, `AR`)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "AD" => Some(Self::AutosomalDominant),
            "SD" => Some(Self::SemiDominant),
            "XL" => Some(Self::XLinked),
            "AR" => Some(Self::AutosomalRecessive),
            _ => None,
        }
    }

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::AutosomalDominant => "AD",
            Self::SemiDominant => "SD",
            Self::XLinked => "XL",
            Self::AutosomalRecessive => "AR",
        }
    }
}

impl std::fmt::Display for InheritanceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// How much evidence is combined when building verdicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Classifier evidence only
    Basic,
    /// Classifier and public database evidence
    #[default]
    Advanced,
}

/// Reference assembly the inputs were called against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Assembly {
    #[default]
    #[serde(rename = "37", alias = "GRCh37", alias = "grch37")]
    Grch37,
    #[serde(rename = "38", alias = "GRCh38", alias = "grch38")]
    Grch38,
}

impl Assembly {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().trim_start_matches("grch") {
            "37" => Some(Self::Grch37),
            "38" => Some(Self::Grch38),
            _ => None,
        }
    }

    /// Numeric suffix used in catalog file names
    #[must_use]
    pub fn number(self) -> &'static str {
        match self {
            Self::Grch37 => "37",
            Self::Grch38 => "38",
        }
    }
}

impl std::fmt::Display for Assembly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GRCh{}", self.number())
    }
}

/// Zygosity of a call, as reported by an annotation source or a VCF `GT`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zygosity {
    Heterozygous,
    Homozygous,
    Hemizygous,
    /// Homozygous reference or no call
    NonCarrier,
    /// Token that could not be interpreted, kept verbatim
    Unknown(String),
}

impl Zygosity {
    /// Parse a zygosity token (`het`, `hom`, `hemi`) or a `GT` code (`0/1`, `1|1`, `1`)
    #[must_use]
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        match token.to_lowercase().as_str() {
            "het" | "heterozygous" => return Self::Heterozygous,
            "hom" | "homozygous" | "hom_alt" => return Self::Homozygous,
            "hemi" | "hemizygous" => return Self::Hemizygous,
            _ => {}
        }
        Self::from_gt_code(token).unwrap_or_else(|| Self::Unknown(token.to_string()))
    }

    /// Interpret a VCF `GT` value; `None` if it is not a genotype code.
    ///
    /// Homozygous requires every allele to be the same alternate; two
    /// different alternates (`1/2`) are heterozygous.
    fn from_gt_code(code: &str) -> Option<Self> {
        let alleles: Vec<&str> = code.split(['/', '|']).collect();
        if alleles.is_empty() || alleles.iter().any(|a| a.is_empty()) {
            return None;
        }
        let mut alt = 0usize;
        let mut called = 0usize;
        let mut alt_indices = Vec::new();
        for allele in &alleles {
            if *allele == "." {
                continue;
            }
            let index: u32 = allele.parse().ok()?;
            called += 1;
            if index > 0 {
                alt += 1;
                alt_indices.push(index);
            }
        }
        let single_alt = alt_indices.windows(2).all(|w| w[0] == w[1]);
        Some(match (alleles.len(), called, alt) {
            (_, _, 0) => Self::NonCarrier,
            (1, 1, 1) => Self::Hemizygous,
            (n, c, a) if a == n && c == n && single_alt => Self::Homozygous,
            _ => Self::Heterozygous,
        })
    }

    /// Whether the call carries at least one alternate allele
    #[must_use]
    pub fn is_carrier(&self) -> bool {
        matches!(self, Self::Heterozygous | Self::Homozygous | Self::Hemizygous)
    }
}

impl std::fmt::Display for Zygosity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Heterozygous => write!(f, "het"),
            Self::Homozygous => write!(f, "hom"),
            Self::Hemizygous => write!(f, "hemi"),
            Self::NonCarrier => write!(f, "ref"),
            Self::Unknown(token) => write!(f, "{token}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zygosity_tokens() {
        assert_eq!(Zygosity::parse("het"), Zygosity::Heterozygous);
        assert_eq!(Zygosity::parse("HOM"), Zygosity::Homozygous);
        assert_eq!(Zygosity::parse("hemi"), Zygosity::Hemizygous);
        assert_eq!(Zygosity::parse("weird"), Zygosity::Unknown("weird".to_string()));
    }

    #[test]
    fn test_zygosity_gt_codes() {
        assert_eq!(Zygosity::parse("0/1"), Zygosity::Heterozygous);
        assert_eq!(Zygosity::parse("1|0"), Zygosity::Heterozygous);
        assert_eq!(Zygosity::parse("1/1"), Zygosity::Homozygous);
        assert_eq!(Zygosity::parse("1|1"), Zygosity::Homozygous);
        assert_eq!(Zygosity::parse("1"), Zygosity::Hemizygous);
        assert_eq!(Zygosity::parse("0/0"), Zygosity::NonCarrier);
        assert_eq!(Zygosity::parse("./."), Zygosity::NonCarrier);
        assert_eq!(Zygosity::parse("./1"), Zygosity::Heterozygous);
        assert!(!Zygosity::parse("0/0").is_carrier());
    }

    #[test]
    fn test_two_different_alternates_are_heterozygous() {
        assert_eq!(Zygosity::parse("1/2"), Zygosity::Heterozygous);
        assert_eq!(Zygosity::parse("2|1"), Zygosity::Heterozygous);
        assert_eq!(Zygosity::parse("2/2"), Zygosity::Homozygous);
        assert_eq!(Zygosity::parse("1/1/2"), Zygosity::Heterozygous);
    }

    #[test]
    fn test_inheritance_mode_parse() {
        assert_eq!(
            InheritanceMode::parse("ar"),
            Some(InheritanceMode::AutosomalRecessive)
        );
        assert_eq!(InheritanceMode::parse("XL"), Some(InheritanceMode::XLinked));
        assert_eq!(InheritanceMode::parse("AD/AR"), None);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(Category::parse("PR"), Some(Category::PersonalRisk));
        assert_eq!(Category::parse(" rr "), Some(Category::ReproductiveRisk));
        assert_eq!(Category::parse("fg"), Some(Category::Pharmacogenomic));
        assert_eq!(Category::parse("xx"), None);
    }

    #[test]
    fn test_assembly_parse() {
        assert_eq!(Assembly::parse("GRCh38"), Some(Assembly::Grch38));
        assert_eq!(Assembly::parse("37"), Some(Assembly::Grch37));
        assert_eq!(Assembly::Grch37.to_string(), "GRCh37");
    }
}
