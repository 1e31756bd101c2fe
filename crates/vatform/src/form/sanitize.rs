//! Business ID / VAT number sanitization and the submit gate.

use super::challenge::ChallengeToken;

/// Minimum sanitized identifier length before the form can be submitted.
pub const MIN_IDENTIFIER_LEN: usize = 8;

/// Strip everything except ASCII uppercase letters and digits.
///
/// Order is preserved and nothing is case-folded: lowercase letters are
/// dropped like any other character. `"FI-123.456 7"` becomes `"FI1234567"`.
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .collect()
}

/// Whether a sanitized identifier and challenge token allow submission.
pub fn can_submit(sanitized: &str, token: &ChallengeToken) -> bool {
    token.is_present() && sanitized.len() >= MIN_IDENTIFIER_LEN
}
