//! Redacting in-memory holder for provider API keys.
//!
//! ```rust
//! use lprovider::SecretString;
//!
//! let key = SecretString::new("AIza-secret");
//! assert_eq!(format!("{key:?}"), "[REDACTED]");
//! assert_eq!(key.expose(), "AIza-secret");
//! ```

use crate::ProviderError;

#[derive(PartialEq, Eq)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Trims the key and rejects blank values.
    pub fn api_key(value: impl Into<String>) -> Result<Self, ProviderError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ProviderError::authentication("api key must not be empty"));
        }

        Ok(Self::new(trimmed))
    }

    pub fn expose(&self) -> &str {
        self.value.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        unsafe {
            self.value.as_mut_vec().fill(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SecretString;
    use crate::ProviderErrorKind;

    #[test]
    fn api_key_rejects_blank_values_and_trims() {
        let error = SecretString::api_key("   ").expect_err("blank key should fail");
        assert_eq!(error.kind, ProviderErrorKind::Authentication);

        let key = SecretString::api_key("  abc  ").expect("key should build");
        assert_eq!(key.expose(), "abc");
        assert!(!key.is_empty());
    }
}
