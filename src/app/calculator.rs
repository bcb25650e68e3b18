//! Calculator screen logic.
//!
//! Wires keypad presses to the expression input and gives haptic feedback
//! whenever a press is refused or an evaluation fails. A failed evaluation
//! keeps the expression on screen so it can be corrected.

use super::TouchEvent;
use crate::calc::{ExpressionInput, Key, Layer};
use crate::config::KEY_HAPTIC_MS;
use crate::error::CalcError;
use crate::haptics::Haptics;

pub struct CalculatorApp<H: Haptics> {
    input: ExpressionInput,
    layer: Layer,
    haptics: H,
}

impl<H: Haptics> CalculatorApp<H> {
    pub fn new(haptics: H) -> Self {
        Self {
            input: ExpressionInput::new(),
            layer: Layer::Basic,
            haptics,
        }
    }

    /// Handle a press on keypad button `index` of the current layer.
    pub fn press(&mut self, index: usize) -> Result<(), CalcError> {
        match self.layer.key_at(index) {
            Some(key) => self.on_key(key),
            None => Ok(()),
        }
    }

    pub fn on_key(&mut self, key: Key) -> Result<(), CalcError> {
        let result = match key {
            Key::Char(c) => self.input.push(c),
            Key::Equals => self.input.commit().map(|_| ()),
        };
        if let Err(e) = result {
            if key == Key::Equals {
                log_warn!("calculator: {}", e);
            }
            self.haptics.vibrate(KEY_HAPTIC_MS);
        }
        result
    }

    /// The return button: drop the last character, or reset once only one
    /// is left.
    pub fn on_return(&mut self) {
        if self.input.len() > 1 {
            self.input.backspace();
        } else {
            self.input.reset();
        }
    }

    /// Returns whether the gesture was consumed.
    pub fn on_touch(&mut self, event: TouchEvent) -> bool {
        match event {
            TouchEvent::LongTap => self.input.reset(),
            TouchEvent::SwipeLeft => self.layer = Layer::Extended,
            TouchEvent::SwipeRight => self.layer = Layer::Basic,
            _ => return false,
        }
        true
    }

    pub fn display(&self) -> &str {
        self.input.display()
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn input(&self) -> &ExpressionInput {
        &self.input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::INPUT_CAPACITY;

    #[derive(Default)]
    struct RecordingHaptics {
        pulses: std::vec::Vec<u16>,
    }

    impl Haptics for RecordingHaptics {
        fn vibrate(&mut self, duration_ms: u16) {
            self.pulses.push(duration_ms);
        }
    }

    fn type_keys(app: &mut CalculatorApp<&mut RecordingHaptics>, keys: &str) {
        for c in keys.chars() {
            let key = if c == '=' { Key::Equals } else { Key::Char(c) };
            let _ = app.on_key(key);
        }
    }

    #[test]
    fn successful_evaluation_replaces_input_without_feedback() {
        let mut haptics = RecordingHaptics::default();
        let mut app = CalculatorApp::new(&mut haptics);
        type_keys(&mut app, "2+3x4=");
        assert_eq!(app.display(), "14");
        drop(app);
        assert!(haptics.pulses.is_empty());
    }

    #[test]
    fn result_can_be_used_in_next_expression() {
        let mut haptics = RecordingHaptics::default();
        let mut app = CalculatorApp::new(&mut haptics);
        type_keys(&mut app, "7/2=x2=");
        assert_eq!(app.display(), "7");
    }

    #[test]
    fn failed_evaluation_vibrates_and_keeps_input() {
        let mut haptics = RecordingHaptics::default();
        let mut app = CalculatorApp::new(&mut haptics);
        type_keys(&mut app, "1/0");
        assert_eq!(app.on_key(Key::Equals), Err(CalcError::ResultOutOfRange));
        assert_eq!(app.display(), "1/0");
        drop(app);
        assert_eq!(haptics.pulses, [KEY_HAPTIC_MS]);
    }

    #[test]
    fn full_input_vibrates_on_each_refused_key() {
        let mut haptics = RecordingHaptics::default();
        let mut app = CalculatorApp::new(&mut haptics);
        for _ in 0..INPUT_CAPACITY {
            app.on_key(Key::Char('1')).unwrap();
        }
        assert_eq!(app.on_key(Key::Char('2')), Err(CalcError::CapacityExceeded));
        assert_eq!(app.on_key(Key::Char('3')), Err(CalcError::CapacityExceeded));
        assert_eq!(app.input().len(), INPUT_CAPACITY);
        drop(app);
        assert_eq!(haptics.pulses.len(), 2);
    }

    #[test]
    fn return_button_backspaces_then_resets() {
        let mut haptics = RecordingHaptics::default();
        let mut app = CalculatorApp::new(&mut haptics);
        type_keys(&mut app, "12");
        app.on_return();
        assert_eq!(app.display(), "1");
        app.on_return();
        assert_eq!(app.display(), "0");
        app.on_return();
        assert_eq!(app.display(), "0");
    }

    #[test]
    fn swipes_switch_layers() {
        let mut haptics = RecordingHaptics::default();
        let mut app = CalculatorApp::new(&mut haptics);
        assert_eq!(app.layer(), Layer::Basic);

        assert!(app.on_touch(TouchEvent::SwipeLeft));
        assert_eq!(app.layer(), Layer::Extended);
        // Button 3 is `(` on the extended layer, `/` on the basic one.
        app.press(3).unwrap();
        assert_eq!(app.display(), "(");

        assert!(app.on_touch(TouchEvent::SwipeRight));
        app.press(3).unwrap();
        assert_eq!(app.display(), "(/");

        assert!(!app.on_touch(TouchEvent::SwipeUp));
    }

    #[test]
    fn long_tap_resets() {
        let mut haptics = RecordingHaptics::default();
        let mut app = CalculatorApp::new(&mut haptics);
        type_keys(&mut app, "99");
        assert!(app.on_touch(TouchEvent::LongTap));
        assert_eq!(app.display(), "0");
    }

    #[test]
    fn keypad_session() {
        let mut haptics = RecordingHaptics::default();
        let mut app = CalculatorApp::new(&mut haptics);
        // 3 ( 4 ) = on the extended layer.
        app.on_touch(TouchEvent::SwipeLeft);
        for index in [10, 3, 4, 7, 14] {
            app.press(index).unwrap();
        }
        assert_eq!(app.display(), "12");
        assert!(app.press(16).is_ok());
    }
}
