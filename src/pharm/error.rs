//! Error types for pharmacology model evaluation.
//!
//! The closed-form evaluators never fail; out-of-domain inputs simply yield
//! non-finite numbers. These errors come from explicit parameter validation
//! and from lookups into the built-in reference tables.

use thiserror::Error;

/// Errors raised while validating model inputs or resolving named cases.
#[derive(Debug, Error)]
pub enum Error {
    /// A parameter lies outside the domain its model is defined on.
    #[error("invalid parameter '{name}' = {value}: {reason}")]
    InvalidParameter {
        /// Parameter name as it appears in the model's inputs.
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// Why the value was rejected.
        reason: String,
    },

    /// A named entry (case study, excipient, category) does not exist.
    #[error("unknown {kind} '{name}'")]
    UnknownEntry {
        /// What was looked up, e.g. `"excipient"`.
        kind: &'static str,
        /// The name as given.
        name: String,
    },

    /// A formulation whose percentages do not sum to 100.
    #[error("total percentage must equal 100% (currently {total:.1}%)")]
    FormulationTotal {
        /// The summed percentage.
        total: f64,
    },
}

impl Error {
    /// Creates an [`InvalidParameter`](Error::InvalidParameter) error.
    ///
    /// # Arguments
    ///
    /// * `name`: Parameter name
    /// * `value`: Offending value
    /// * `reason`: Why the value is rejected
    pub fn invalid(name: &'static str, value: f64, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason: reason.into(),
        }
    }

    /// Creates an [`UnknownEntry`](Error::UnknownEntry) error.
    pub fn unknown(kind: &'static str, name: impl Into<String>) -> Self {
        Self::UnknownEntry {
            kind,
            name: name.into(),
        }
    }
}

/// Fails unless `value` is finite and strictly positive.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<(), Error> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid(name, value, "must be a positive number"))
    }
}

/// Fails unless `value` is finite and not negative.
pub(crate) fn require_non_negative(name: &'static str, value: f64) -> Result<(), Error> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::invalid(name, value, "must not be negative"))
    }
}

/// Fails unless `value` lies in `[0, 1]`.
pub(crate) fn require_fraction(name: &'static str, value: f64) -> Result<(), Error> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::invalid(name, value, "must lie between 0 and 1"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validators_accept_and_reject() {
        assert!(require_positive("k", 0.1).is_ok());
        assert!(require_positive("k", 0.0).is_err());
        assert!(require_positive("k", f64::NAN).is_err());
        assert!(require_non_negative("dose", 0.0).is_ok());
        assert!(require_non_negative("dose", -1.0).is_err());
        assert!(require_fraction("F", 1.0).is_ok());
        assert!(require_fraction("F", 1.2).is_err());
    }

    #[test]
    fn messages_name_the_parameter() {
        let err = Error::invalid("ka", -2.0, "must be a positive number");
        assert_eq!(
            err.to_string(),
            "invalid parameter 'ka' = -2: must be a positive number"
        );
        let err = Error::FormulationTotal { total: 95.0 };
        assert_eq!(
            err.to_string(),
            "total percentage must equal 100% (currently 95.0%)"
        );
    }
}
