//! Missing-value tokens recognized while loading

use serde::{Deserialize, Serialize};

/// Cell contents that load as null
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NullConfig {
    /// Tokens treated as missing
    pub tokens: Vec<String>,

    /// Whether to trim whitespace before checking
    pub trim_whitespace: bool,

    /// Case sensitive matching
    pub case_sensitive: bool,
}

impl Default for NullConfig {
    fn default() -> Self {
        Self {
            tokens: ["", "NA", "N/A", "NaN", "null", "None", "-"]
                .into_iter()
                .map(String::from)
                .collect(),
            trim_whitespace: true,
            case_sensitive: false,
        }
    }
}

impl NullConfig {
    /// Check if a cell should load as null
    pub fn is_null(&self, value: &str) -> bool {
        let value = if self.trim_whitespace { value.trim() } else { value };

        self.tokens.iter().any(|token| {
            if self.case_sensitive {
                value == token
            } else {
                value.eq_ignore_ascii_case(token)
            }
        })
    }

    /// Add a token, ignoring duplicates
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        if !self.tokens.contains(&token) {
            self.tokens.push(token);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tokens() {
        let config = NullConfig::default();
        assert!(config.is_null(""));
        assert!(config.is_null("  n/a "));
        assert!(config.is_null("nan"));
        assert!(!config.is_null("0"));
    }

    #[test]
    fn test_case_sensitive_custom_token() {
        let config = NullConfig { case_sensitive: true, ..NullConfig::default() }.with_token("missing");
        assert!(config.is_null("missing"));
        assert!(!config.is_null("MISSING"));
        assert!(!config.is_null("none"));
    }
}
