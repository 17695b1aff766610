use std::collections::TryReserveError;

use thiserror::Error;

/// Result type alias for skip list operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("promotion probability must lie in (0, 1), got {0}")]
    InvalidProbability(f64),

    #[error("max level hint must be greater than zero, got {0}")]
    InvalidMaxLevel(usize),

    #[error("node allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    #[error("invariant violated at lane {lane}: {detail}")]
    InvariantViolation { lane: usize, detail: String },
}

impl Error {
    /// Construction errors are caller mistakes; everything else means the
    /// engine could not (or did not) keep its lanes consistent.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidProbability(_) | Error::InvalidMaxLevel(_)
        )
    }

    pub(crate) fn invariant(lane: usize, detail: impl Into<String>) -> Self {
        Error::InvariantViolation {
            lane,
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_offending_value() {
        let err = Error::InvalidProbability(1.5);
        assert_eq!(
            err.to_string(),
            "promotion probability must lie in (0, 1), got 1.5"
        );
        assert!(err.is_config_error());

        let err = Error::invariant(3, "lane out of order");
        assert_eq!(err.to_string(), "invariant violated at lane 3: lane out of order");
        assert!(!err.is_config_error());
    }
}
