//! Review-status to review-confidence ("stars") mapping for the public
//! variant-significance database.

/// Highest review confidence a record can carry
pub const MAX_STARS: u8 = 4;

/// Map a free-text review status to its review confidence (0-4).
///
/// Matching is case-insensitive; unrecognized text maps to 0.
#[must_use]
pub fn review_stars(review_status: &str) -> u8 {
    match review_status.trim().to_lowercase().as_str() {
        "practice guideline" => 4,
        "reviewed by expert panel" => 3,
        "criteria provided, multiple submitters, no conflicts" => 2,
        "criteria provided, conflicting interpretations"
        | "criteria provided, conflicting classifications"
        | "criteria provided, single submitter" => 1,
        _ => 0,
    }
}

/// Label carried into a verdict: `(<stars>) <review status>`
#[must_use]
pub fn review_label(review_status: &str) -> String {
    format!("({}) {}", review_stars(review_status), review_status.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_stars() {
        assert_eq!(review_stars("practice guideline"), 4);
        assert_eq!(review_stars("Reviewed by expert panel"), 3);
        assert_eq!(
            review_stars("criteria provided, multiple submitters, no conflicts"),
            2
        );
        assert_eq!(review_stars("criteria provided, single submitter"), 1);
        assert_eq!(review_stars("criteria provided, conflicting interpretations"), 1);
        assert_eq!(review_stars("no assertion criteria provided"), 0);
        assert_eq!(review_stars("no assertion provided"), 0);
        assert_eq!(review_stars("something else"), 0);
    }

    #[test]
    fn test_review_label() {
        assert_eq!(
            review_label("reviewed by expert panel"),
            "(3) reviewed by expert panel"
        );
    }
}
