//! Calculator keypad layers.
//!
//! The keypad is a 4x4 button matrix. Swiping switches between the basic
//! arithmetic layer and the layer carrying parentheses and `^`:
//!
//! ```text
//!   Basic          Extended
//!   7 8 9 /        7 8 9 (
//!   4 5 6 x        4 5 6 )
//!   1 2 3 -        1 2 3 ^
//!   . 0 = +        . 0 = +
//! ```
//!
//! Buttons are indexed row-major, 0..16.

/// Number of buttons in the matrix.
pub const KEY_COUNT: usize = 16;

/// What a button press means to the calculator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    /// Append this character to the expression.
    Char(char),
    /// Evaluate the expression.
    Equals,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Layer {
    #[default]
    Basic,
    Extended,
}

static BASIC_LABELS: [&str; KEY_COUNT] = [
    "7", "8", "9", "/", //
    "4", "5", "6", "x", //
    "1", "2", "3", "-", //
    ".", "0", "=", "+",
];

static EXTENDED_LABELS: [&str; KEY_COUNT] = [
    "7", "8", "9", "(", //
    "4", "5", "6", ")", //
    "1", "2", "3", "^", //
    ".", "0", "=", "+",
];

impl Layer {
    pub fn labels(self) -> &'static [&'static str; KEY_COUNT] {
        match self {
            Layer::Basic => &BASIC_LABELS,
            Layer::Extended => &EXTENDED_LABELS,
        }
    }

    /// Label of the button at `index`, or `None` outside the matrix.
    pub fn label(self, index: usize) -> Option<&'static str> {
        self.labels().get(index).copied()
    }

    /// Key produced by the button at `index`.
    pub fn key_at(self, index: usize) -> Option<Key> {
        let label = self.label(index)?;
        let c = label.chars().next()?;
        Some(if c == '=' { Key::Equals } else { Key::Char(c) })
    }

    pub fn toggled(self) -> Self {
        match self {
            Layer::Basic => Layer::Extended,
            Layer::Extended => Layer::Basic,
        }
    }
}
