//! Challenge widget token handling.
//!
//! The anti-automation widget issues a short-lived proof token through its
//! verify callback and revokes it through its expire callback. The form only
//! listens; it never requests a challenge itself.

use serde::{Deserialize, Serialize};

/// Site key the form has been registered with at the challenge provider.
pub const DEFAULT_SITE_KEY: &str = "0x4AAAAAAA90YXNCF4DE_ZHk";

/// Opaque proof token. Empty means no usable proof.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChallengeToken(String);

impl ChallengeToken {
    /// Wrap a token string as issued by the provider.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Store the token from a verify callback.
    pub fn on_verify(&mut self, token: impl Into<String>) {
        self.0 = token.into();
    }

    /// Drop the token on an expire callback.
    pub fn on_expire(&mut self) {
        self.0.clear();
    }

    /// Whether a non-empty token is held.
    pub fn is_present(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Configuration handed to the challenge widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeSettings {
    /// Public site identifier.
    pub site_key: String,
}

impl Default for ChallengeSettings {
    fn default() -> Self {
        Self {
            site_key: DEFAULT_SITE_KEY.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_then_expire() {
        let mut token = ChallengeToken::default();
        assert!(!token.is_present());

        token.on_verify("0.abc");
        assert!(token.is_present());
        assert_eq!(token.as_str(), "0.abc");

        token.on_expire();
        assert!(!token.is_present());
        assert_eq!(token.as_str(), "");
    }

    #[test]
    fn verify_with_empty_string_is_no_proof() {
        let mut token = ChallengeToken::new("old");
        token.on_verify("");
        assert!(!token.is_present());
    }

    #[test]
    fn default_site_key() {
        assert_eq!(ChallengeSettings::default().site_key, DEFAULT_SITE_KEY);
    }
}
