//! Fixed-capacity stacks used during evaluation.
//!
//! Both stacks fail closed: a push beyond capacity returns
//! [`CalcError::CapacityExceeded`] instead of growing.

use heapless::Vec;

use crate::config::{OPERAND_STACK_CAPACITY, OPERATOR_STACK_CAPACITY};
use crate::error::CalcError;

/// Binary operators plus the open parenthesis marker kept on the
/// operator stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    LeftParen,
}

impl Operator {
    /// Map an input character to a binary operator.
    ///
    /// Accepts the keypad glyphs (`x`, `/`) as well as `*`, `×` and `÷`.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            'x' | '*' | '×' => Some(Operator::Mul),
            '/' | '÷' => Some(Operator::Div),
            '^' => Some(Operator::Pow),
            _ => None,
        }
    }

    pub fn precedence(self) -> u8 {
        match self {
            Operator::Pow => 4,
            Operator::Mul | Operator::Div => 3,
            Operator::Add | Operator::Sub => 2,
            Operator::LeftParen => 0,
        }
    }

    pub fn is_left_associative(self) -> bool {
        !matches!(self, Operator::Pow)
    }

    /// Whether `self`, sitting on the stack, must be folded before
    /// `incoming` is pushed.
    pub fn folds_before(self, incoming: Operator) -> bool {
        if self == Operator::LeftParen {
            return false;
        }
        self.precedence() > incoming.precedence()
            || (self.precedence() == incoming.precedence() && incoming.is_left_associative())
    }

    /// Apply the operator. Non-finite results are returned as-is and only
    /// rejected when the final value is formatted.
    pub fn apply(self, lhs: f64, rhs: f64) -> Option<f64> {
        match self {
            Operator::Add => Some(lhs + rhs),
            Operator::Sub => Some(lhs - rhs),
            Operator::Mul => Some(lhs * rhs),
            Operator::Div => Some(lhs / rhs),
            Operator::Pow => Some(libm::pow(lhs, rhs)),
            Operator::LeftParen => None,
        }
    }
}

/// Stack of numeric literals and intermediate results.
#[derive(Debug, Default)]
pub struct OperandStack {
    values: Vec<f64, OPERAND_STACK_CAPACITY>,
}

impl OperandStack {
    pub const fn new() -> Self {
        Self { values: Vec::new() }
    }

    pub fn push(&mut self, value: f64) -> Result<(), CalcError> {
        self.values
            .push(value)
            .map_err(|_| CalcError::CapacityExceeded)
    }

    pub fn pop(&mut self) -> Option<f64> {
        self.values.pop()
    }

    pub fn peek(&self) -> Option<f64> {
        self.values.last().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Replace the top two operands with `op` applied to them.
    ///
    /// The lower operand is the left-hand side (the base for `^`).
    pub fn fold(&mut self, op: Operator) -> Result<(), CalcError> {
        if self.values.len() < 2 {
            return Err(CalcError::MalformedExpression);
        }
        let rhs = self.pop().ok_or(CalcError::MalformedExpression)?;
        let lhs = self.pop().ok_or(CalcError::MalformedExpression)?;
        let result = op.apply(lhs, rhs).ok_or(CalcError::UnbalancedParentheses)?;
        self.push(result)
    }
}

/// Stack of pending operators and open parentheses.
#[derive(Debug, Default)]
pub struct OperatorStack {
    ops: Vec<Operator, OPERATOR_STACK_CAPACITY>,
}

impl OperatorStack {
    pub const fn new() -> Self {
        Self { ops: Vec::new() }
    }

    pub fn push(&mut self, op: Operator) -> Result<(), CalcError> {
        self.ops.push(op).map_err(|_| CalcError::CapacityExceeded)
    }

    pub fn pop(&mut self) -> Option<Operator> {
        self.ops.pop()
    }

    pub fn peek(&self) -> Option<Operator> {
        self.ops.last().copied()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
