//! Strangle Strategy Errors

use thiserror::Error;

/// Errors from strike selection and credit calculation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StrategyError {
    /// Target delta is not a finite value in (0, 1).
    #[error("Invalid target delta: {target}")]
    InvalidTargetDelta { target: f64 },

    /// No contract of the given type carries greeks.
    #[error("No {option_type} with greeks in chain")]
    NoCandidates { option_type: &'static str },

    /// No contract of the given type matches the strike.
    #[error("No {option_type} found at strike {strike}")]
    StrikeNotFound {
        option_type: &'static str,
        strike: f64,
    },

    /// The contract at the strike has no two-sided quote to price from.
    #[error("No two-sided quote for {option_type} at strike {strike}")]
    NoQuote {
        option_type: &'static str,
        strike: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StrategyError::StrikeNotFound {
            option_type: "put",
            strike: 95.0,
        };
        assert_eq!(err.to_string(), "No put found at strike 95");

        let err = StrategyError::NoCandidates {
            option_type: "call",
        };
        assert_eq!(err.to_string(), "No call with greeks in chain");

        let err = StrategyError::NoQuote {
            option_type: "put",
            strike: 430.0,
        };
        assert_eq!(err.to_string(), "No two-sided quote for put at strike 430");
    }
}
