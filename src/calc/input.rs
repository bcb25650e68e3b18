//! Bounded expression input buffer.

use heapless::String;

use super::eval;
use super::format::FormattedNumber;
use crate::config::INPUT_CAPACITY;
use crate::error::CalcError;

/// The characters typed so far, at most [`INPUT_CAPACITY`] of them.
///
/// Operator glyphs are normalised on entry (`*`/`×` become `x`, `÷` becomes
/// `/`) so the buffer is always ASCII and one byte per character.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpressionInput {
    text: String<INPUT_CAPACITY>,
}

impl ExpressionInput {
    pub const fn new() -> Self {
        Self {
            text: String::new(),
        }
    }

    /// Append a character.
    ///
    /// A full buffer refuses the character with
    /// [`CalcError::CapacityExceeded`] and is left untouched.
    pub fn push(&mut self, c: char) -> Result<(), CalcError> {
        let c = normalize(c).ok_or(CalcError::InvalidCharacter(c))?;
        self.text.push(c).map_err(|_| {
            log_debug!("input full, refusing {}", c);
            CalcError::CapacityExceeded
        })
    }

    /// Remove the last character. No-op on an empty buffer.
    pub fn backspace(&mut self) {
        self.text.pop();
    }

    /// Clear to the canonical empty state.
    pub fn reset(&mut self) {
        self.text.clear();
    }

    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    /// Text to show on screen: `"0"` when nothing has been typed.
    pub fn display(&self) -> &str {
        if self.text.is_empty() {
            "0"
        } else {
            self.text.as_str()
        }
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.text.len() == INPUT_CAPACITY
    }

    /// Evaluate the current buffer without modifying it.
    pub fn evaluate(&self) -> Result<FormattedNumber, CalcError> {
        eval::evaluate(self.as_str())
    }

    /// Evaluate and, on success, replace the buffer with the result so
    /// the user can keep calculating with it. On failure the buffer is
    /// left unchanged.
    pub fn commit(&mut self) -> Result<FormattedNumber, CalcError> {
        let result = self.evaluate()?;
        let mut text = String::new();
        text.push_str(result.as_str())
            .map_err(|_| CalcError::CapacityExceeded)?;
        self.text = text;
        Ok(result)
    }
}

fn normalize(c: char) -> Option<char> {
    match c {
        '0'..='9' | '.' | '+' | '-' | 'x' | '/' | '^' | '(' | ')' => Some(c),
        '*' | '×' => Some('x'),
        '÷' => Some('/'),
        _ => None,
    }
}
