//! Haptic feedback: the vibration motor and the fire-and-forget request
//! path the screens use.
//!
//! Screens only see the [`Haptics`] trait. In the firmware it is backed by
//! [`HapticQueue`], which posts the duration to a channel drained by the
//! motor task running [`MotorDriver::run_for`].

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Sender;
use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

use crate::error::HapticsError;

/// "Vibrate for N ms". Never blocks and never fails from the caller's
/// point of view.
pub trait Haptics {
    fn vibrate(&mut self, duration_ms: u16);
}

impl<H: Haptics + ?Sized> Haptics for &mut H {
    fn vibrate(&mut self, duration_ms: u16) {
        (**self).vibrate(duration_ms)
    }
}

/// Posts vibration requests to the motor task. Requests arriving while
/// the queue is full are dropped.
pub struct HapticQueue<'ch, M: RawMutex, const N: usize> {
    tx: Sender<'ch, M, u16, N>,
}

impl<'ch, M: RawMutex, const N: usize> HapticQueue<'ch, M, N> {
    pub fn new(tx: Sender<'ch, M, u16, N>) -> Self {
        Self { tx }
    }
}

impl<M: RawMutex, const N: usize> Haptics for HapticQueue<'_, M, N> {
    fn vibrate(&mut self, duration_ms: u16) {
        if self.tx.try_send(duration_ms).is_err() {
            log_debug!("haptics: queue full, dropping {} ms", duration_ms);
        }
    }
}

/// Vibration motor on an active-low GPIO.
pub struct MotorDriver<P, D> {
    pin: P,
    delay: D,
}

impl<P: OutputPin, D: DelayNs> MotorDriver<P, D> {
    /// Take the pin and make sure the motor is off.
    pub fn new(mut pin: P, delay: D) -> Result<Self, HapticsError> {
        pin.set_high().map_err(|_| HapticsError::Pin)?;
        Ok(Self { pin, delay })
    }

    /// Run the motor for `duration_ms`, then switch it off.
    pub async fn run_for(&mut self, duration_ms: u16) -> Result<(), HapticsError> {
        if duration_ms == 0 {
            return Ok(());
        }
        self.pin.set_low().map_err(|_| HapticsError::Pin)?;
        self.delay.delay_ms(duration_ms as u32).await;
        self.pin.set_high().map_err(|_| HapticsError::Pin)
    }

    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }
}
