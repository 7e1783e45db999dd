//! Statistics Errors

use thiserror::Error;

/// Errors from hypothesis tests and power analysis
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// A partition or table has no usable observations
    #[error("Insufficient data: {reason}")]
    InsufficientData {
        /// What was empty
        reason: String,
    },

    /// A statistical input lies outside its domain
    #[error("Invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f64,
        /// Accepted domain
        reason: &'static str,
    },
}

impl StatsError {
    pub(crate) fn insufficient(reason: impl Into<String>) -> Self {
        StatsError::InsufficientData {
            reason: reason.into(),
        }
    }

    /// Reject values outside the open unit interval
    pub(crate) fn check_probability(name: &'static str, value: f64) -> Result<(), Self> {
        if value > 0.0 && value < 1.0 {
            Ok(())
        } else {
            Err(StatsError::InvalidParameter {
                name,
                value,
                reason: "must be strictly between 0 and 1",
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_probability() {
        assert!(StatsError::check_probability("alpha", 0.05).is_ok());
        assert!(StatsError::check_probability("alpha", 0.0).is_err());
        assert!(StatsError::check_probability("alpha", 1.0).is_err());
        assert!(StatsError::check_probability("alpha", f64::NAN).is_err());
    }

    #[test]
    fn test_messages() {
        let err = StatsError::insufficient("control group is empty");
        assert_eq!(err.to_string(), "Insufficient data: control group is empty");

        let err = StatsError::check_probability("power", 1.5).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid parameter power = 1.5: must be strictly between 0 and 1"
        );
    }
}
