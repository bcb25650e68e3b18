//! Minutes/seconds selection for the timer screen.

use core::fmt::Write;

use heapless::String;

use crate::config::{TIMER_MAX_MINUTES, TIMER_MAX_SECONDS};

/// Duration picked with the +/- buttons. Each field wraps within 0..=59.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerSetter {
    minutes: u8,
    seconds: u8,
}

impl TimerSetter {
    pub const fn new() -> Self {
        Self {
            minutes: 0,
            seconds: 0,
        }
    }

    /// Load the whole seconds of a remaining countdown, e.g. when pausing.
    /// Minutes saturate at the field maximum.
    pub fn from_remaining_ms(remaining_ms: u32) -> Self {
        let total_seconds = remaining_ms / 1000;
        let minutes = (total_seconds / 60).min(TIMER_MAX_MINUTES as u32) as u8;
        let seconds = (total_seconds % 60) as u8;
        Self { minutes, seconds }
    }

    pub fn minutes(&self) -> u8 {
        self.minutes
    }

    pub fn seconds(&self) -> u8 {
        self.seconds
    }

    pub fn increment_minutes(&mut self) {
        self.minutes = wrap_up(self.minutes, TIMER_MAX_MINUTES);
    }

    pub fn decrement_minutes(&mut self) {
        self.minutes = wrap_down(self.minutes, TIMER_MAX_MINUTES);
    }

    pub fn increment_seconds(&mut self) {
        self.seconds = wrap_up(self.seconds, TIMER_MAX_SECONDS);
    }

    pub fn decrement_seconds(&mut self) {
        self.seconds = wrap_down(self.seconds, TIMER_MAX_SECONDS);
    }

    pub fn is_zero(&self) -> bool {
        self.minutes == 0 && self.seconds == 0
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    pub fn duration_ms(&self) -> u32 {
        (self.minutes as u32 * 60 + self.seconds as u32) * 1000
    }

    /// `MM:SS` rendering of the selection.
    pub fn text(&self) -> String<5> {
        format_mm_ss(self.duration_ms())
    }
}

fn wrap_up(value: u8, max: u8) -> u8 {
    if value >= max {
        0
    } else {
        value + 1
    }
}

fn wrap_down(value: u8, max: u8) -> u8 {
    if value == 0 {
        max
    } else {
        value - 1
    }
}

/// Render whole seconds of `ms` as `MM:SS`. Minutes past 99 are shown as 99.
pub fn format_mm_ss(ms: u32) -> String<5> {
    let total_seconds = ms / 1000;
    let minutes = (total_seconds / 60).min(99);
    let seconds = total_seconds % 60;

    let mut text = String::new();
    if write!(text, "{:02}:{:02}", minutes, seconds).is_err() {
        log_warn!("timer: {} s does not fit MM:SS", total_seconds);
    }
    text
}
