//! Centralized validation and helper functions.

/// Maximum number of records read from a single input table
pub const MAX_RECORDS: usize = 10_000_000;

/// Maximum allele length accepted from a caller VCF record
pub const MAX_ALLELE_LENGTH: usize = 10_000;

/// Security-related constants for output naming
pub const MAX_SAMPLE_NAME_LENGTH: usize = 255;

/// Validate that a string is a dbSNP identifier (`rs` followed by digits).
///
/// # Examples
///
/// ```
/// use secondary_findings::utils::validation::is_valid_rs_id;
///
/// assert!(is_valid_rs_id("rs4244285"));
/// assert!(!is_valid_rs_id("4244285"));
/// assert!(!is_valid_rs_id("rs"));
/// ```
#[must_use]
pub fn is_valid_rs_id(s: &str) -> bool {
    match (s.get(..2), s.get(2..)) {
        (Some(prefix), Some(digits)) => {
            prefix.eq_ignore_ascii_case("rs")
                && !digits.is_empty()
                && digits.chars().all(|c| c.is_ascii_digit())
        }
        _ => false,
    }
}

/// Normalize a dbSNP identifier to `rs<N>`.
///
/// Bare numbers (as written by the variant-summary table) gain the `rs`
/// prefix. Placeholders (`.`, `-1`, `unknown`, empty) and anything else that
/// is not an identifier return `None`.
#[must_use]
pub fn normalize_rs_id(s: &str) -> Option<String> {
    let s = s.trim();
    if is_valid_rs_id(s) {
        return s.get(2..).map(|digits| format!("rs{digits}"));
    }
    if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
        return Some(format!("rs{s}"));
    }
    None
}

/// Check if adding another record would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new record.
/// Returns an error message if adding would exceed the limit, None if safe to add.
#[must_use]
pub fn check_record_limit(count: usize) -> Option<String> {
    if count >= MAX_RECORDS {
        Some(format!(
            "Too many records: adding another would exceed maximum of {MAX_RECORDS}"
        ))
    } else {
        None
    }
}

/// Whether an allele is short enough to be processed
#[must_use]
pub fn is_allele_length_ok(allele: &str) -> bool {
    allele.len() <= MAX_ALLELE_LENGTH
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Sample name too long: exceeds {MAX_SAMPLE_NAME_LENGTH} characters")]
    SampleNameTooLong,
    #[error("Invalid sample name: contains path separators or invalid characters")]
    InvalidSampleName,
    #[error("Empty sample name provided")]
    EmptySampleName,
}

/// Validate a sample name used as the prefix of output file names.
///
/// Output files are written as `<sample>_<suffix>` inside the output directory,
/// so the name must not escape that directory.
///
/// # Errors
///
/// Returns `ValidationError::EmptySampleName` if the name is empty,
/// `ValidationError::SampleNameTooLong` if it exceeds the limit, or
/// `ValidationError::InvalidSampleName` if it contains path separators,
/// control characters or characters outside `[A-Za-z0-9._-]`.
pub fn validate_sample_name(name: &str) -> Result<&str, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptySampleName);
    }

    if name.len() > MAX_SAMPLE_NAME_LENGTH {
        return Err(ValidationError::SampleNameTooLong);
    }

    // Prevent directory traversal
    if name.contains("..") || name.contains('/') || name.contains('\\') {
        return Err(ValidationError::InvalidSampleName);
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
    {
        return Err(ValidationError::InvalidSampleName);
    }

    if name.starts_with('.') {
        return Err(ValidationError::InvalidSampleName);
    }

    Ok(name)
}
