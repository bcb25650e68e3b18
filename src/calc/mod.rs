//! Calculator: bounded input buffer and infix expression evaluator.
//!
//! Everything here is allocation-free and synchronous. Input and both
//! evaluation stacks have fixed capacities (see [`crate::config`]); running
//! out of room is reported as [`CalcError::CapacityExceeded`] rather than
//! growing.
//!
//! [`CalcError::CapacityExceeded`]: crate::error::CalcError::CapacityExceeded

pub mod eval;
pub mod format;
pub mod input;
pub mod keypad;
pub mod stack;


pub use eval::{evaluate, evaluate_value};
pub use format::FormattedNumber;
pub use input::ExpressionInput;
pub use keypad::{Key, Layer};
