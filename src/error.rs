//! Error types for the watch application logic.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Derives `defmt::Format` behind the `defmt` feature for on-target logging.

use core::fmt;

/// Failures reported by the calculator input buffer and evaluator.
///
/// None of these are fatal: the input buffer is left as it was so the
/// user can correct the expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalcError {
    /// The input buffer or an internal stack is full.
    CapacityExceeded,

    /// The character is not part of the calculator alphabet.
    InvalidCharacter(char),

    /// An operator had fewer than two operands to fold, or the expression
    /// did not reduce to exactly one value.
    MalformedExpression,

    /// A `)` without a matching `(`, or a `(` that is never closed.
    UnbalancedParentheses,

    /// The result is not finite or its integral part does not fit in a `u32`.
    ResultOutOfRange,
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalcError::CapacityExceeded => f.write_str("capacity exceeded"),
            CalcError::InvalidCharacter(c) => write!(f, "invalid character {:?}", c),
            CalcError::MalformedExpression => f.write_str("malformed expression"),
            CalcError::UnbalancedParentheses => f.write_str("unbalanced parentheses"),
            CalcError::ResultOutOfRange => f.write_str("result out of range"),
        }
    }
}

/// Failures of the vibration motor driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HapticsError {
    /// The motor GPIO could not be driven.
    Pin,
}

impl fmt::Display for HapticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HapticsError::Pin => f.write_str("motor pin error"),
        }
    }
}
