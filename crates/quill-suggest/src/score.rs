//! Fuzzy similarity used to rank candidates.

/// Case-insensitive similarity in `[0, 1]`.
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(similarity("Main", "main"), 1.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
        let partial = similarity("main.rs", "main");
        assert!(partial > 0.5 && partial < 1.0);
    }
}
