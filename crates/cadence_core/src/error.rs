//! Error types
//!
//! Only authoring mistakes are errors. Runtime anomalies (a path that does not
//! resolve, a stale node handle, a second stop or interrupt) are reported as
//! `None`/`false` by the APIs that meet them.

use thiserror::Error;

/// Errors raised while configuring animations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnimationError {
    /// A node, tracker or block was configured with values it cannot run with
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Configuration text could not be parsed
    #[error("failed to parse configuration: {0}")]
    Config(String),
}

impl AnimationError {
    pub fn invalid(message: impl Into<String>) -> Self {
        AnimationError::InvalidConfiguration(message.into())
    }
}

/// Result alias used across the cadence crates
pub type Result<T, E = AnimationError> = std::result::Result<T, E>;

/// Fails unless `value` is finite and `>= 0`
pub fn ensure_non_negative(what: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AnimationError::invalid(format!(
            "{what} must be a finite, non-negative number (got {value})"
        )))
    }
}

/// Fails unless `value` is finite and `> 0`
pub fn ensure_positive(what: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AnimationError::invalid(format!(
            "{what} must be a finite, positive number (got {value})"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_checks() {
        assert!(ensure_non_negative("duration", 0.0).is_ok());
        assert!(ensure_non_negative("duration", -0.1).is_err());
        assert!(ensure_non_negative("duration", f32::NAN).is_err());
        assert!(ensure_positive("rapidity", 0.0).is_err());
        assert!(ensure_positive("rapidity", f32::INFINITY).is_err());
    }

    #[test]
    fn test_error_display() {
        let err = AnimationError::invalid("motion has no setter");
        assert_eq!(err.to_string(), "invalid configuration: motion has no setter");
    }
}
