//! Rouge-L F1 over whitespace tokens.
//!
//! Tokens are compared by exact, case-sensitive string equality. No stemming
//! or punctuation stripping is applied.

/// Length of the longest common subsequence of two token sequences.
pub fn lcs_length(a: &[&str], b: &[&str]) -> usize {
    let m = b.len();
    if a.is_empty() || m == 0 {
        return 0;
    }

    // Two rolling rows of the classic (n+1) x (m+1) table.
    let mut prev = vec![0usize; m + 1];
    let mut curr = vec![0usize; m + 1];

    for token_a in a {
        for (j, token_b) in b.iter().enumerate() {
            curr[j + 1] = if token_a == token_b {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[m]
}

/// Rouge-L F1 of a prediction against a reference, in [0, 1].
///
/// Returns 0 if either side has no tokens.
pub fn rouge_l(pred: &str, reference: &str) -> f64 {
    let pred_tokens: Vec<&str> = pred.split_whitespace().collect();
    let ref_tokens: Vec<&str> = reference.split_whitespace().collect();

    if pred_tokens.is_empty() || ref_tokens.is_empty() {
        return 0.0;
    }

    let lcs = lcs_length(&pred_tokens, &ref_tokens);
    let precision = lcs as f64 / pred_tokens.len() as f64;
    let recall = lcs as f64 / ref_tokens.len() as f64;

    if precision + recall == 0.0 {
        return 0.0;
    }

    2.0 * precision * recall / (precision + recall)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_float_eq::assert_float_absolute_eq;
    use proptest::prelude::*;

    #[test]
    fn test_identical_text_scores_one() {
        assert_float_absolute_eq!(rouge_l("the cat sat on the mat", "the cat sat on the mat"), 1.0);
    }

    #[test]
    fn test_disjoint_text_scores_zero() {
        assert_eq!(rouge_l("a b c", "x y z"), 0.0);
    }

    #[test]
    fn test_empty_side_scores_zero() {
        assert_eq!(rouge_l("", "a b"), 0.0);
        assert_eq!(rouge_l("a b", "   "), 0.0);
        assert_eq!(rouge_l("", ""), 0.0);
    }

    #[test]
    fn test_known_partial_overlap() {
        // pred: 4 tokens, ref: 6 tokens, LCS "the cat the mat" = 4
        // P = 1.0, R = 4/6, F1 = 2 * 1 * (2/3) / (5/3) = 0.8
        assert_float_absolute_eq!(rouge_l("the cat the mat", "the cat sat on the mat"), 0.8, 1e-12);
    }

    #[test]
    fn test_case_sensitive_tokens() {
        assert_eq!(rouge_l("The Cat", "the cat"), 0.0);
    }

    #[test]
    fn test_whitespace_kinds_are_equivalent() {
        assert_float_absolute_eq!(rouge_l("a\tb\n c", "a b c"), 1.0);
    }

    #[test]
    fn test_lcs_is_order_sensitive() {
        assert_eq!(lcs_length(&["a", "b", "c"], &["c", "b", "a"]), 1);
        assert_eq!(lcs_length(&["a", "x", "b", "y", "c"], &["a", "b", "c"]), 3);
    }

    proptest! {
        #[test]
        fn prop_rouge_in_unit_interval(
            pred in "[a-d]{1,3}( [a-d]{1,3}){0,12}",
            reference in "[a-d]{1,3}( [a-d]{1,3}){0,12}"
        ) {
            let score = rouge_l(&pred, &reference);
            prop_assert!((0.0..=1.0).contains(&score), "score out of range: {}", score);
        }

        #[test]
        fn prop_rouge_self_is_one(text in "[a-z]{1,5}( [a-z]{1,5}){0,10}") {
            prop_assert!((rouge_l(&text, &text) - 1.0).abs() < 1e-12);
        }

        #[test]
        fn prop_lcs_bounded(
            a in proptest::collection::vec("[a-c]", 0..15),
            b in proptest::collection::vec("[a-c]", 0..15)
        ) {
            let a: Vec<&str> = a.iter().map(String::as_str).collect();
            let b: Vec<&str> = b.iter().map(String::as_str).collect();
            let lcs = lcs_length(&a, &b);
            prop_assert!(lcs <= a.len().min(b.len()));
            prop_assert_eq!(lcs, lcs_length(&b, &a));
        }
    }
}
