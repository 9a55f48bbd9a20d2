// This module defines error types for dctgen using the thiserror crate. GenError is the
// single error enum shared by planning, evaluation and emission: invalid planning
// parameters (order, truncation, base offset, input length), reads of slots that were
// never written while evaluating a plan, and formatting or I/O failures while writing
// generated source. GenResult<T> is the matching Result alias.

//! Error types for the DCT generator.
//!
//! Using thiserror for more idiomatic error handling.

use thiserror::Error;

use super::slot::Slot;

/// Main error type for planning and emission.
#[derive(Error, Debug)]
pub enum GenError {
    #[error("Invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: i64,
        reason: String,
    },

    #[error("Read of unwritten slot {slot}")]
    UnwrittenSlot {
        slot: Slot,
    },

    #[error("Formatting generated source failed")]
    Format(#[from] std::fmt::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenError {
    /// Shorthand for an [`GenError::InvalidParameter`].
    pub fn invalid(name: &'static str, value: i64, reason: impl Into<String>) -> Self {
        GenError::InvalidParameter {
            name,
            value,
            reason: reason.into(),
        }
    }

    /// Whether this error came from parameter validation.
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, GenError::InvalidParameter { .. })
    }
}

/// Result type alias for generator operations.
pub type GenResult<T> = Result<T, GenError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::slot::Buffer;

    #[test]
    fn test_invalid_parameter_message() {
        let err = GenError::invalid("order", 0, "must be at least 1");
        assert!(err.is_invalid_parameter());
        assert_eq!(
            err.to_string(),
            "Invalid parameter order = 0: must be at least 1"
        );
    }

    #[test]
    fn test_unwritten_slot_message() {
        let slot = Slot::new(Buffer::Work, 3);
        let err = GenError::UnwrittenSlot { slot };
        assert!(!err.is_invalid_parameter());
        assert_eq!(err.to_string(), "Read of unwritten slot Y[3]");
    }
}
