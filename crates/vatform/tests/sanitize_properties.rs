#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Property tests for identifier sanitization and the submit gate.

use proptest::prelude::*;

use vatform::form::{ChallengeToken, MIN_IDENTIFIER_LEN, can_submit, sanitize};

#[test]
fn documented_example() {
    assert_eq!(sanitize("FI-123.456 7"), "FI1234567");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    /// sanitize(sanitize(x)) == sanitize(x)
    #[test]
    fn sanitize_is_idempotent(raw in any::<String>()) {
        let once = sanitize(&raw);
        prop_assert_eq!(sanitize(&once), once);
    }

    /// Output only contains `[A-Z0-9]`.
    #[test]
    fn sanitize_output_is_restricted(raw in any::<String>()) {
        let out = sanitize(&raw);
        prop_assert!(out.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    /// Allowed characters survive in order.
    #[test]
    fn sanitize_keeps_allowed_subsequence(raw in "[A-Z0-9 .\\-a-z]{0,40}") {
        let expected: String = raw
            .chars()
            .filter(|c| matches!(c, 'A'..='Z' | '0'..='9'))
            .collect();
        prop_assert_eq!(sanitize(&raw), expected);
    }

    /// An empty token closes the gate regardless of length.
    #[test]
    fn empty_token_never_submits(raw in any::<String>()) {
        prop_assert!(!can_submit(&sanitize(&raw), &ChallengeToken::default()));
    }

    /// With a token, the gate is exactly the length check.
    #[test]
    fn token_gate_is_length_check(raw in "[A-Z0-9\\- ]{0,20}", token in "[a-zA-Z0-9._-]{1,64}") {
        let sanitized = sanitize(&raw);
        let token = ChallengeToken::new(token);
        prop_assert_eq!(can_submit(&sanitized, &token), sanitized.len() >= MIN_IDENTIFIER_LEN);
    }
}
