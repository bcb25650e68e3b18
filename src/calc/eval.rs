//! Infix expression evaluation (shunting-yard with immediate folding).
//!
//! Operators are folded into the operand stack as soon as precedence
//! allows, so the stacks never hold more than a handful of entries for
//! inputs that fit in the input buffer.
//!
//! Precedence, highest first:
//! ```text
//!   ^      4  right-associative
//!   x /    3  left-associative
//!   + -    2  left-associative
//! ```
//!
//! A `+`/`-` where a number is expected is a sign, not an operator. A sign
//! in front of `(` is rewritten as `0 - (...)`, and a `(` directly after a
//! value or `)` implies a multiplication. Both inserted operators are pushed
//! without folding what is already stacked, so they bind to the group only:
//! `8/2(4)` is `8/(2x4)` and `2^3(2)` is `2^(3x2)`.

use core::iter::Peekable;
use core::str::Chars;

use super::format::FormattedNumber;
use super::stack::{OperandStack, Operator, OperatorStack};
use crate::error::CalcError;

/// Evaluate an infix expression and render the result.
pub fn evaluate(expression: &str) -> Result<FormattedNumber, CalcError> {
    let value = evaluate_value(expression)?;
    FormattedNumber::new(value)
}

/// Evaluate an infix expression to its raw value.
///
/// Non-finite intermediate values are carried through; only structural
/// problems are reported here.
pub fn evaluate_value(expression: &str) -> Result<f64, CalcError> {
    let mut evaluator = Evaluator::new();
    let mut chars = expression.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() || c == '.' {
            let literal = parse_literal(&mut chars)?;
            evaluator.push_literal(literal)?;
            continue;
        }

        chars.next();
        match c {
            '+' | '-' if evaluator.expecting_number => {
                if c == '-' {
                    evaluator.sign = -evaluator.sign;
                }
            }
            '(' => evaluator.open_paren()?,
            ')' => evaluator.close_paren()?,
            _ => match Operator::from_char(c) {
                Some(op) => evaluator.push_binary(op)?,
                None if c.is_whitespace() => {}
                None => return Err(CalcError::MalformedExpression),
            },
        }
    }

    evaluator.finish()
}

struct Evaluator {
    operands: OperandStack,
    operators: OperatorStack,
    expecting_number: bool,
    sign: f64,
}

impl Evaluator {
    fn new() -> Self {
        Self {
            operands: OperandStack::new(),
            operators: OperatorStack::new(),
            expecting_number: true,
            sign: 1.0,
        }
    }

    fn push_literal(&mut self, literal: f64) -> Result<(), CalcError> {
        self.operands.push(self.sign * literal)?;
        self.sign = 1.0;
        self.expecting_number = false;
        Ok(())
    }

    fn push_binary(&mut self, incoming: Operator) -> Result<(), CalcError> {
        while let Some(top) = self.operators.peek() {
            if !top.folds_before(incoming) {
                break;
            }
            self.operands.fold(top)?;
            self.operators.pop();
        }
        self.operators.push(incoming)?;
        self.expecting_number = true;
        Ok(())
    }

    fn open_paren(&mut self) -> Result<(), CalcError> {
        if self.expecting_number {
            if self.sign < 0.0 {
                // `-(5+11)` is `0-(5+11)`.
                self.sign = 1.0;
                self.operands.push(0.0)?;
                self.operators.push(Operator::Sub)?;
            }
        } else {
            // `3(4)` is `3x(4)`.
            self.operators.push(Operator::Mul)?;
        }
        self.operators.push(Operator::LeftParen)?;
        self.expecting_number = true;
        Ok(())
    }

    fn close_paren(&mut self) -> Result<(), CalcError> {
        loop {
            match self.operators.pop() {
                Some(Operator::LeftParen) => break,
                Some(op) => self.operands.fold(op)?,
                None => return Err(CalcError::UnbalancedParentheses),
            }
        }
        self.expecting_number = false;
        Ok(())
    }

    fn finish(mut self) -> Result<f64, CalcError> {
        while let Some(op) = self.operators.pop() {
            if op == Operator::LeftParen {
                return Err(CalcError::UnbalancedParentheses);
            }
            self.operands.fold(op)?;
        }

        match (self.operands.pop(), self.operands.is_empty()) {
            (Some(value), true) => Ok(value),
            _ => Err(CalcError::MalformedExpression),
        }
    }
}

/// Parse a run of digits with at most one decimal point.
///
/// A leading `.` reads as `0.`. The sign is applied by the caller.
fn parse_literal(chars: &mut Peekable<Chars<'_>>) -> Result<f64, CalcError> {
    let mut value = 0.0f64;
    let mut fraction_digits: Option<i32> = None;

    while let Some(&c) = chars.peek() {
        if let Some(digit) = c.to_digit(10) {
            value = value * 10.0 + digit as f64;
            if let Some(n) = fraction_digits.as_mut() {
                *n += 1;
            }
        } else if c == '.' {
            if fraction_digits.is_some() {
                return Err(CalcError::MalformedExpression);
            }
            fraction_digits = Some(0);
        } else {
            break;
        }
        chars.next();
    }

    // One division by an exact power of ten keeps short literals correctly
    // rounded.
    let mut scale = 1.0f64;
    for _ in 0..fraction_digits.unwrap_or(0) {
        scale *= 10.0;
    }
    Ok(value / scale)
}
