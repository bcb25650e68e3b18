//! Screen logic for the calculator and timer apps.
//!
//! The GUI toolkit owns layout and rendering; these types own what a
//! button press or gesture means and what text should be displayed.

pub mod calculator;
pub mod timer;

pub use calculator::CalculatorApp;
pub use timer::{TimerApp, TimerButton};

/// Touch gestures delivered by the touch controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchEvent {
    Tap,
    LongTap,
    SwipeLeft,
    SwipeRight,
    SwipeUp,
    SwipeDown,
}
