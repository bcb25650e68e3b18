//! Tick source abstraction and tick/millisecond conversion.
//!
//! The scheduler tick counter is a free-running `u32` that wraps at 2^32.
//! Distances between two readings are always taken with wrapping
//! subtraction, which yields the forward distance across a wrap.

/// A monotonic, wrapping 32-bit tick counter with a known frequency.
pub trait TickSource {
    /// Current counter value.
    fn now(&self) -> u32;

    /// Counter frequency in ticks per second.
    fn frequency_hz(&self) -> u32;
}

impl<T: TickSource + ?Sized> TickSource for &T {
    fn now(&self) -> u32 {
        (**self).now()
    }

    fn frequency_hz(&self) -> u32 {
        (**self).frequency_hz()
    }
}

/// Receiver of the "countdown finished" event.
pub trait ExpirySink {
    fn timer_done(&self);
}

impl<T: ExpirySink + ?Sized> ExpirySink for &T {
    fn timer_done(&self) {
        (**self).timer_done()
    }
}

/// Forward distance from `from` to `to`, modulo 2^32.
#[inline]
pub fn ticks_between(from: u32, to: u32) -> u32 {
    to.wrapping_sub(from)
}

/// Convert milliseconds to ticks, rounding up so a countdown never ends
/// early.
///
/// Returns the tick count and whether it had to be clamped to `u32::MAX`.
pub fn ms_to_ticks(ms: u32, frequency_hz: u32) -> (u32, bool) {
    let ticks = (ms as u64 * frequency_hz as u64).div_ceil(1000);
    match u32::try_from(ticks) {
        Ok(ticks) => (ticks, false),
        Err(_) => (u32::MAX, true),
    }
}

/// Convert ticks to milliseconds, rounding down.
pub fn ticks_to_ms(ticks: u32, frequency_hz: u32) -> u32 {
    if frequency_hz == 0 {
        return 0;
    }
    let ms = ticks as u64 * 1000 / frequency_hz as u64;
    u32::try_from(ms).unwrap_or(u32::MAX)
}
