//! Variant keys and conversion between the two coordinate conventions.
//!
//! The caller and the public database describe an indel with a shared anchor
//! base (VCF convention). The classifier strips that anchor base and, for
//! deletions, shifts the position by one (trimmed convention):
//!
//! | Event     | VCF key                 | Trimmed key             |
//! |-----------|-------------------------|-------------------------|
//! | SNV       | `chr1:100:C:T`          | `chr1:100:C:T`          |
//! | Deletion  | `chr1:100:CAT:C`        | `chr1:101:AT:-`         |
//! | Insertion | `chr1:100:C:CAT`        | `chr1:100:-:AT`         |
//!
//! The two conventions are wrapped in distinct types so they cannot be
//! compared with each other by accident.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Allele placeholder used by the trimmed convention for an empty side
pub const EMPTY_ALLELE: &str = "-";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Empty {0} allele")]
    EmptyAllele(&'static str),

    #[error("Multiallelic alternate '{0}' must be split before normalization")]
    MultiAllelic(String),

    #[error("Invalid {which} allele '{allele}'")]
    InvalidAllele { which: &'static str, allele: String },

    #[error("Invalid position {0}: positions are 1-based")]
    InvalidPosition(u64),

    #[error("Invalid anchor base '{0}'")]
    InvalidAnchor(char),

    #[error("Malformed variant key '{0}': expected chrom:pos:ref:alt")]
    Malformed(String),
}

/// Convention-agnostic `(chrom, pos, ref, alt)` tuple
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VariantKey {
    pub chrom: String,
    pub pos: u64,
    pub reference: String,
    pub alternate: String,
}

impl VariantKey {
    pub fn new(
        chrom: impl Into<String>,
        pos: u64,
        reference: impl Into<String>,
        alternate: impl Into<String>,
    ) -> Self {
        Self {
            chrom: chrom.into(),
            pos,
            reference: reference.into(),
            alternate: alternate.into(),
        }
    }

    /// Copy of this key with a canonical chromosome name, used for lookups
    #[must_use]
    pub fn canonical(&self) -> Self {
        Self {
            chrom: canonical_chrom(&self.chrom),
            ..self.clone()
        }
    }
}

impl std::fmt::Display for VariantKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.chrom, self.pos, self.reference, self.alternate
        )
    }
}

impl FromStr for VariantKey {
    type Err = NormalizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.trim().split(':').collect();
        if fields.len() != 4 || fields[0].is_empty() {
            return Err(NormalizeError::Malformed(s.to_string()));
        }
        let pos: u64 = fields[1]
            .parse()
            .map_err(|_| NormalizeError::Malformed(s.to_string()))?;
        Ok(Self::new(fields[0], pos, fields[2], fields[3]))
    }
}

/// A key in VCF convention (anchor base kept, 1-based anchored position)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VcfKey(VariantKey);

/// A key in the classifier's trimmed convention
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrimmedKey(VariantKey);

impl VcfKey {
    /// Build a VCF-convention key, validating alleles and position
    ///
    /// # Errors
    ///
    /// Returns a `NormalizeError` for empty, multiallelic or non-nucleotide
    /// alleles and for position 0.
    pub fn new(
        chrom: impl Into<String>,
        pos: u64,
        reference: impl Into<String>,
        alternate: impl Into<String>,
    ) -> Result<Self, NormalizeError> {
        Self::try_from(VariantKey::new(chrom, pos, reference, alternate))
    }

    #[must_use]
    pub fn key(&self) -> &VariantKey {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> VariantKey {
        self.0
    }
}

impl TryFrom<VariantKey> for VcfKey {
    type Error = NormalizeError;

    fn try_from(key: VariantKey) -> Result<Self, Self::Error> {
        validate_position(key.pos)?;
        validate_vcf_allele("reference", &key.reference)?;
        validate_vcf_allele("alternate", &key.alternate)?;
        Ok(Self(key))
    }
}

impl FromStr for VcfKey {
    type Err = NormalizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.parse::<VariantKey>()?)
    }
}

impl std::fmt::Display for VcfKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TrimmedKey {
    /// Build a trimmed-convention key; `-` is accepted for an empty side
    ///
    /// # Errors
    ///
    /// Returns a `NormalizeError` for empty or non-nucleotide alleles, for a
    /// key whose both sides are `-`, and for position 0.
    pub fn new(
        chrom: impl Into<String>,
        pos: u64,
        reference: impl Into<String>,
        alternate: impl Into<String>,
    ) -> Result<Self, NormalizeError> {
        Self::try_from(VariantKey::new(chrom, pos, reference, alternate))
    }

    #[must_use]
    pub fn key(&self) -> &VariantKey {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> VariantKey {
        self.0
    }
}

impl TryFrom<VariantKey> for TrimmedKey {
    type Error = NormalizeError;

    fn try_from(key: VariantKey) -> Result<Self, Self::Error> {
        validate_position(key.pos)?;
        validate_trimmed_allele("reference", &key.reference)?;
        validate_trimmed_allele("alternate", &key.alternate)?;
        if key.reference == EMPTY_ALLELE && key.alternate == EMPTY_ALLELE {
            return Err(NormalizeError::InvalidAllele {
                which: "alternate",
                allele: key.alternate,
            });
        }
        Ok(Self(key))
    }
}

impl FromStr for TrimmedKey {
    type Err = NormalizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.parse::<VariantKey>()?)
    }
}

impl std::fmt::Display for TrimmedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Convert a VCF-convention key into the classifier's trimmed convention.
///
/// Deletions drop the anchor base and move one position right; insertions
/// drop the anchor base and keep the position; substitutions are unchanged.
///
/// The first base of each allele is taken as the anchor without comparing
/// the two; a record whose first bases differ (`CAT` > `G`) is trimmed the
/// same way as a left-aligned one.
#[must_use]
pub fn to_trimmed_convention(vcf: &VcfKey) -> TrimmedKey {
    let key = &vcf.0;
    let (ref_len, alt_len) = (key.reference.len(), key.alternate.len());

    let trimmed = if ref_len > alt_len {
        let alternate = if alt_len == 1 {
            EMPTY_ALLELE.to_string()
        } else {
            key.alternate[1..].to_string()
        };
        VariantKey::new(&key.chrom, key.pos + 1, &key.reference[1..], alternate)
    } else if ref_len < alt_len {
        let reference = if ref_len == 1 {
            EMPTY_ALLELE.to_string()
        } else {
            key.reference[1..].to_string()
        };
        VariantKey::new(&key.chrom, key.pos, reference, &key.alternate[1..])
    } else {
        key.clone()
    };

    TrimmedKey(trimmed)
}

/// Convert a trimmed-convention key back to VCF convention.
///
/// The anchor base is not recoverable from the trimmed form and must be
/// supplied (it is the reference base at the VCF position).
///
/// # Errors
///
/// Returns `NormalizeError::InvalidAnchor` for a non-nucleotide anchor and
/// `NormalizeError::InvalidPosition` when a deletion would land on position 0.
pub fn to_vcf_convention(trimmed: &TrimmedKey, anchor: char) -> Result<VcfKey, NormalizeError> {
    if !is_nucleotide(anchor) {
        return Err(NormalizeError::InvalidAnchor(anchor));
    }
    let key = &trimmed.0;
    let with_anchor = |allele: &str| {
        if allele == EMPTY_ALLELE {
            anchor.to_string()
        } else {
            format!("{anchor}{allele}")
        }
    };

    let is_deletion = key.alternate == EMPTY_ALLELE
        || (key.reference != EMPTY_ALLELE && key.reference.len() > key.alternate.len());
    let is_insertion = key.reference == EMPTY_ALLELE
        || (key.alternate != EMPTY_ALLELE && key.reference.len() < key.alternate.len());

    let vcf = if is_deletion {
        let pos = key
            .pos
            .checked_sub(1)
            .filter(|p| *p > 0)
            .ok_or(NormalizeError::InvalidPosition(0))?;
        VariantKey::new(
            &key.chrom,
            pos,
            with_anchor(&key.reference),
            with_anchor(&key.alternate),
        )
    } else if is_insertion {
        VariantKey::new(
            &key.chrom,
            key.pos,
            with_anchor(&key.reference),
            with_anchor(&key.alternate),
        )
    } else {
        key.clone()
    };

    VcfKey::try_from(vcf)
}

/// Canonical chromosome name: no `chr` prefix, mitochondrion as `MT`
#[must_use]
pub fn canonical_chrom(chrom: &str) -> String {
    let stripped = chrom
        .strip_prefix("chr")
        .or_else(|| chrom.strip_prefix("CHR"))
        .or_else(|| chrom.strip_prefix("Chr"))
        .unwrap_or(chrom);
    match stripped {
        "M" | "m" | "mt" => "MT".to_string(),
        other => other.to_string(),
    }
}

fn is_nucleotide(c: char) -> bool {
    matches!(c.to_ascii_uppercase(), 'A' | 'C' | 'G' | 'T' | 'N')
}

fn validate_position(pos: u64) -> Result<(), NormalizeError> {
    if pos == 0 {
        Err(NormalizeError::InvalidPosition(pos))
    } else {
        Ok(())
    }
}

fn validate_vcf_allele(which: &'static str, allele: &str) -> Result<(), NormalizeError> {
    if allele.is_empty() {
        return Err(NormalizeError::EmptyAllele(which));
    }
    if allele.contains(',') {
        return Err(NormalizeError::MultiAllelic(allele.to_string()));
    }
    if !allele.chars().all(is_nucleotide) {
        return Err(NormalizeError::InvalidAllele {
            which,
            allele: allele.to_string(),
        });
    }
    Ok(())
}

fn validate_trimmed_allele(which: &'static str, allele: &str) -> Result<(), NormalizeError> {
    if allele == EMPTY_ALLELE {
        return Ok(());
    }
    validate_vcf_allele(which, allele)
}
