//! Application logic for the watch firmware's calculator and timer apps.
//!
//! Everything here is pure logic that runs on the host as well as on the
//! watch: the calculator's bounded expression evaluator, the countdown
//! timer over the wrapping scheduler tick counter, and the screen state
//! machines that sit between the GUI toolkit and those two components.
//!
//! Usage: `cargo test` (host), `cargo build --release --features embedded`
//! (firmware, see `main.rs`).

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod logging;

pub mod app;
pub mod calc;
pub mod config;
pub mod error;
pub mod haptics;
pub mod timer;

pub use calc::{evaluate, ExpressionInput, FormattedNumber};
pub use error::{CalcError, HapticsError};
pub use timer::{ArmToken, CountdownTimer, ExpirySink, TickSource};
