//! Idempotency tag attached to submitted orders.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::ValidationError;

const MAX_TAG_LEN: usize = 255;

/// Client-chosen order tag. A retried submission with the same tag is
/// recognizable as a duplicate on the broker side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderTag(String);

impl OrderTag {
    /// Validate a caller-supplied tag.
    pub fn new(tag: impl Into<String>) -> Result<Self, ValidationError> {
        let tag = tag.into();
        let valid = !tag.is_empty()
            && tag.len() <= MAX_TAG_LEN
            && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid {
            return Err(ValidationError::InvalidTag { tag });
        }
        Ok(Self(tag))
    }

    /// Generate a fresh tag with the given prefix.
    ///
    /// Characters outside the accepted set are dropped from the prefix.
    #[must_use]
    pub fn generate(prefix: &str) -> Self {
        let prefix: String = prefix
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
            .take(64)
            .collect();
        let id = uuid::Uuid::new_v4().simple().to_string();
        if prefix.is_empty() {
            Self(id)
        } else {
            Self(format!("{prefix}-{id}"))
        }
    }

    /// Get the tag value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_alphanumeric_and_dash() {
        let tag = OrderTag::new("strangle-SPY-20250117").unwrap();
        assert_eq!(tag.as_str(), "strangle-SPY-20250117");
    }

    #[test]
    fn rejects_bad_characters() {
        assert!(OrderTag::new("has space").is_err());
        assert!(OrderTag::new("under_score").is_err());
        assert!(OrderTag::new("").is_err());
        assert!(OrderTag::new("x".repeat(256)).is_err());
    }

    #[test]
    fn generated_tags_are_unique_and_valid() {
        let a = OrderTag::generate("strangle SPY");
        let b = OrderTag::generate("strangle SPY");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("strangleSPY-"));
        assert!(OrderTag::new(a.as_str()).is_ok());
    }
}
