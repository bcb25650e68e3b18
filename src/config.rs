//! Application-wide constants and compile-time configuration.
//!
//! Buffer capacities, timing parameters and haptic durations live here so
//! they can be tuned in one place.

// Calculator

/// Maximum number of characters the expression input accepts.
pub const INPUT_CAPACITY: usize = 30;

/// Operand stack depth. Enough for a full input buffer because operands
/// are folded as soon as precedence allows.
pub const OPERAND_STACK_CAPACITY: usize = 16;

/// Operator stack depth (pending operators and open parentheses).
pub const OPERATOR_STACK_CAPACITY: usize = 32;

/// Number of fractional digits a result is rounded to.
pub const FRACTION_DIGITS: u32 = 6;

/// `10^FRACTION_DIGITS`, the fixed-point scale of the fractional part.
pub const FRACTION_SCALE: u32 = 1_000_000;

/// Longest rendered result: sign + 10 integral digits + `.` + 6 digits.
pub const RESULT_CAPACITY: usize = 18;

// Timer

/// Default tick frequency of the scheduler tick counter (Hz).
pub const TICK_RATE_HZ: u32 = 1024;

/// Upper bound of the minutes field on the timer screen.
pub const TIMER_MAX_MINUTES: u8 = 59;

/// Upper bound of the seconds field on the timer screen.
pub const TIMER_MAX_SECONDS: u8 = 59;

// Haptics

/// Pulse issued when a key press is refused or an evaluation fails (ms).
pub const KEY_HAPTIC_MS: u16 = 10;

/// Pulse issued when a countdown finishes (ms).
pub const TIMER_DONE_HAPTIC_MS: u16 = 35;

/// Depth of the firmware's haptic request queue.
pub const HAPTIC_QUEUE_DEPTH: usize = 4;
