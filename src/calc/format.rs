//! Fixed-point decimal rendering of evaluation results.
//!
//! The integral part is printed as an unsigned integer and the fraction is
//! rounded to [`FRACTION_DIGITS`] digits with trailing zeros trimmed:
//!
//! ```text
//!  14.0        -> "14"
//!  0.1 + 0.2   -> "0.3"
//! -2.5         -> "-2.5"
//!  1/3         -> "0.333333"
//! ```

use core::fmt::{self, Write};

use heapless::String;

use crate::config::{FRACTION_DIGITS, FRACTION_SCALE, RESULT_CAPACITY};
use crate::error::CalcError;

/// A successfully evaluated result, ready for display.
#[derive(Clone, Debug, PartialEq)]
pub struct FormattedNumber {
    text: String<RESULT_CAPACITY>,
    value: f64,
}

impl FormattedNumber {
    /// Render `value`, rejecting non-finite values and magnitudes whose
    /// integral part does not fit in a `u32`.
    pub fn new(value: f64) -> Result<Self, CalcError> {
        let negative = value < 0.0;
        let magnitude = if negative { -value } else { value };

        // Also catches NaN, for which every comparison is false.
        if !(magnitude <= u32::MAX as f64) {
            return Err(CalcError::ResultOutOfRange);
        }

        let mut integral = magnitude as u32;
        let mut fraction = libm::round((magnitude - integral as f64) * FRACTION_SCALE as f64) as u32;
        if fraction >= FRACTION_SCALE {
            fraction = 0;
            integral = integral
                .checked_add(1)
                .ok_or(CalcError::ResultOutOfRange)?;
        }

        let mut text = String::new();
        if negative && (integral != 0 || fraction != 0) {
            text.push('-').map_err(|_| CalcError::CapacityExceeded)?;
        }
        write!(text, "{}", integral).map_err(|_| CalcError::CapacityExceeded)?;
        if fraction != 0 {
            write!(text, ".{:0width$}", fraction, width = FRACTION_DIGITS as usize)
                .map_err(|_| CalcError::CapacityExceeded)?;
            while text.ends_with('0') {
                text.pop();
            }
        }

        Ok(Self { text, value })
    }

    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    /// The unrounded value the text was rendered from.
    pub fn value(&self) -> f64 {
        self.value
    }
}

impl fmt::Display for FormattedNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
