//! Countdown timer and the timer screen's duration picker.

pub mod countdown;
pub mod setter;
pub mod tick;

pub use countdown::{ArmToken, CountdownTimer};
pub use setter::{format_mm_ss, TimerSetter};
pub use tick::{ExpirySink, TickSource};
