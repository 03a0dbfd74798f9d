//! Order duration (time in force) as the broker spells it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::ValidationError;

/// How long an order stays working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDuration {
    /// Valid for the current regular session only.
    #[default]
    Day,
    /// Good-til-canceled.
    Gtc,
    /// Pre-market session.
    Pre,
    /// Post-market session.
    Post,
}

impl OrderDuration {
    /// Normalize caller input, accepting common synonyms case-insensitively.
    pub fn normalize(value: &str) -> Result<Self, ValidationError> {
        let key: String = value
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect();

        match key.as_str() {
            "day" | "today" | "regular" => Ok(Self::Day),
            "gtc" | "goodtilcancelled" | "goodtilcanceled" | "goodtillcancelled"
            | "goodtillcanceled" | "goodtocancel" | "goodtocanceled" => Ok(Self::Gtc),
            "pre" | "premarket" | "preopen" => Ok(Self::Pre),
            "post" | "postmarket" | "afterhours" | "extended" => Ok(Self::Post),
            _ => Err(ValidationError::InvalidDuration {
                value: value.to_string(),
            }),
        }
    }

    /// Wire value for the `duration` form field.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Gtc => "gtc",
            Self::Pre => "pre",
            Self::Post => "post",
        }
    }

    /// Returns true if the order only works outside regular hours.
    #[must_use]
    pub const fn is_extended_hours(&self) -> bool {
        matches!(self, Self::Pre | Self::Post)
    }
}

impl FromStr for OrderDuration {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalize(s)
    }
}

impl fmt::Display for OrderDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
