//! Timer screen logic.
//!
//! While stopped, the four adjust buttons edit the minutes/seconds picker.
//! Play starts the shared countdown if a non-zero duration is picked;
//! pause stops it and loads the remaining whole seconds back into the
//! picker so play resumes from there.

use heapless::String;

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::timer::{format_mm_ss, ArmToken, CountdownTimer, ExpirySink, TickSource, TimerSetter};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerButton {
    PlayPause,
    MinutesUp,
    MinutesDown,
    SecondsUp,
    SecondsDown,
}

pub struct TimerApp<'t, M: RawMutex, T: TickSource, S: ExpirySink> {
    timer: &'t CountdownTimer<M, T, S>,
    setter: TimerSetter,
}

impl<'t, M: RawMutex, T: TickSource, S: ExpirySink> TimerApp<'t, M, T, S> {
    /// Open the screen. A countdown already running keeps running.
    pub fn new(timer: &'t CountdownTimer<M, T, S>) -> Self {
        Self {
            timer,
            setter: TimerSetter::new(),
        }
    }

    /// Handle a button press.
    ///
    /// Returns the arm token when the press started a countdown, so the
    /// caller can schedule the expiry wake-up.
    pub fn on_button(&mut self, button: TimerButton) -> Option<ArmToken> {
        if button == TimerButton::PlayPause {
            return self.toggle();
        }
        if self.timer.is_running() {
            return None;
        }
        match button {
            TimerButton::MinutesUp => self.setter.increment_minutes(),
            TimerButton::MinutesDown => self.setter.decrement_minutes(),
            TimerButton::SecondsUp => self.setter.increment_seconds(),
            TimerButton::SecondsDown => self.setter.decrement_seconds(),
            TimerButton::PlayPause => {}
        }
        None
    }

    fn toggle(&mut self) -> Option<ArmToken> {
        if self.timer.is_running() {
            self.setter = TimerSetter::from_remaining_ms(self.timer.remaining_ms());
            self.timer.stop();
            None
        } else if !self.setter.is_zero() {
            Some(self.timer.start(self.setter.duration_ms()))
        } else {
            None
        }
    }

    /// The countdown finished: show `00:00` with a cleared picker.
    pub fn on_done(&mut self) {
        self.setter.clear();
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    /// `MM:SS` text for the current state, refreshed on every tick.
    pub fn text(&self) -> String<5> {
        if self.timer.is_running() {
            format_mm_ss(self.timer.remaining_ms())
        } else {
            self.setter.text()
        }
    }

    pub fn setter(&self) -> TimerSetter {
        self.setter
    }
}
