//! Countdown timer against a wrapping tick counter.
//!
//! The timer stores the tick at which it was started and its length in
//! ticks. The expiry tick is `start + duration` modulo 2^32, and every
//! distance is computed with wrapping subtraction, so a counter wrap during
//! a countdown does not disturb the remaining time.
//!
//! State is kept in a blocking mutex and copied in and out as a whole, so
//! `start`/`stop`/`on_expire` are serialised and a concurrent
//! `remaining_ms` never sees a half-written expiry. With
//! `CriticalSectionRawMutex` this holds against interrupt handlers too.
//!
//! Expiry is delivered in one of two ways:
//! - the scheduler arms a one-shot wake-up from the [`ArmToken`] returned by
//!   [`CountdownTimer::start`] and hands the token back to
//!   [`CountdownTimer::on_expire`] when it fires
//! - a tick-driven loop calls [`CountdownTimer::poll`]
//!
//! Either way the [`ExpirySink`] hears about a run at most once.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

use super::tick::{ms_to_ticks, ticks_between, ticks_to_ms, ExpirySink, TickSource};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct TimerState {
    running: bool,
    start_tick: u32,
    duration_ticks: u32,
    /// Requested length; caps `remaining_ms` when ticks are coarser than
    /// a millisecond.
    duration_ms: u32,
    /// Incremented by every `start`, so wake-ups armed for an earlier run
    /// can be recognised and ignored.
    generation: u32,
}

impl TimerState {
    fn expiry_tick(&self) -> u32 {
        self.start_tick.wrapping_add(self.duration_ticks)
    }

    fn elapsed(&self, now: u32) -> u32 {
        ticks_between(self.start_tick, now)
    }
}

/// Identifies one armed run of the countdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ArmToken {
    pub generation: u32,
    pub start_tick: u32,
    pub duration_ticks: u32,
}

impl ArmToken {
    /// Tick value, modulo 2^32, at which this run expires.
    pub fn expiry_tick(&self) -> u32 {
        self.start_tick.wrapping_add(self.duration_ticks)
    }
}

pub struct CountdownTimer<M: RawMutex, T: TickSource, S: ExpirySink> {
    ticks: T,
    sink: S,
    state: Mutex<M, Cell<TimerState>>,
}

impl<M: RawMutex, T: TickSource, S: ExpirySink> CountdownTimer<M, T, S> {
    pub fn new(ticks: T, sink: S) -> Self {
        Self {
            ticks,
            sink,
            state: Mutex::new(Cell::new(TimerState::default())),
        }
    }

    /// Arm the countdown for `duration_ms`, cancelling any run in progress.
    ///
    /// A zero duration expires on the next `poll`/`on_expire`. Durations
    /// longer than the counter range are clamped to `u32::MAX` ticks.
    pub fn start(&self, duration_ms: u32) -> ArmToken {
        let (duration_ticks, clamped) = ms_to_ticks(duration_ms, self.ticks.frequency_hz());
        if clamped {
            log_warn!("timer: {} ms exceeds tick range, clamped", duration_ms);
        }

        let token = self.state.lock(|cell| {
            let previous = cell.get();
            let next = TimerState {
                running: true,
                start_tick: self.ticks.now(),
                duration_ticks,
                duration_ms,
                generation: previous.generation.wrapping_add(1),
            };
            cell.set(next);
            ArmToken {
                generation: next.generation,
                start_tick: next.start_tick,
                duration_ticks,
            }
        });

        log_info!(
            "timer: started {} ms, expiry tick {}",
            duration_ms,
            token.expiry_tick()
        );
        token
    }

    /// Disarm the countdown. Idempotent.
    pub fn stop(&self) {
        let was_running = self.state.lock(|cell| {
            let mut state = cell.get();
            let was_running = state.running;
            state.running = false;
            cell.set(state);
            was_running
        });
        if was_running {
            log_info!("timer: stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.lock(|cell| cell.get().running)
    }

    /// Remaining time in milliseconds, 0 when not running.
    ///
    /// Once the elapsed distance reaches the duration this reports 0 even
    /// if the expiry has not been delivered yet.
    pub fn remaining_ms(&self) -> u32 {
        let state = self.state.lock(|cell| cell.get());
        if !state.running {
            return 0;
        }
        let now = self.ticks.now();
        if state.elapsed(now) >= state.duration_ticks {
            return 0;
        }
        ticks_to_ms(ticks_between(now, state.expiry_tick()), self.ticks.frequency_hz())
            .min(state.duration_ms)
    }

    /// Expiry tick of the current run, if one is armed.
    pub fn expiry_tick(&self) -> Option<u32> {
        let state = self.state.lock(|cell| cell.get());
        state.running.then(|| state.expiry_tick())
    }

    /// Deliver the wake-up armed for `token`.
    ///
    /// Stops the timer and notifies the sink if `token` belongs to the run
    /// that is still armed. Returns whether the sink was notified.
    pub fn on_expire(&self, token: &ArmToken) -> bool {
        let fired = self.state.lock(|cell| {
            let mut state = cell.get();
            if !state.running || state.generation != token.generation {
                return false;
            }
            state.running = false;
            cell.set(state);
            true
        });
        self.finish(fired)
    }

    /// Check the tick counter and deliver the expiry if it is due.
    ///
    /// Returns whether the sink was notified.
    pub fn poll(&self) -> bool {
        let fired = self.state.lock(|cell| {
            let mut state = cell.get();
            let now = self.ticks.now();
            if !state.running || state.elapsed(now) < state.duration_ticks {
                return false;
            }
            state.running = false;
            cell.set(state);
            true
        });
        self.finish(fired)
    }

    fn finish(&self, fired: bool) -> bool {
        if fired {
            log_info!("timer: expired");
            self.sink.timer_done();
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicU32, Ordering};
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

    struct FakeTicks {
        now: AtomicU32,
        hz: u32,
    }

    impl FakeTicks {
        fn at(now: u32, hz: u32) -> Self {
            Self {
                now: AtomicU32::new(now),
                hz,
            }
        }

        fn advance(&self, ticks: u32) {
            let now = self.now.load(Ordering::SeqCst);
            self.now.store(now.wrapping_add(ticks), Ordering::SeqCst);
        }
    }

    impl TickSource for FakeTicks {
        fn now(&self) -> u32 {
            self.now.load(Ordering::SeqCst)
        }

        fn frequency_hz(&self) -> u32 {
            self.hz
        }
    }

    #[derive(Default)]
    struct CountingSink {
        count: AtomicU32,
    }

    impl ExpirySink for CountingSink {
        fn timer_done(&self) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl CountingSink {
        fn count(&self) -> u32 {
            self.count.load(Ordering::SeqCst)
        }
    }

    type Timer<'a> = CountdownTimer<CriticalSectionRawMutex, &'a FakeTicks, &'a CountingSink>;

    #[test]
    fn never_started_reports_zero() {
        let ticks = FakeTicks::at(0, 1024);
        let sink = CountingSink::default();
        let timer: Timer = CountdownTimer::new(&ticks, &sink);
        assert!(!timer.is_running());
        assert_eq!(timer.remaining_ms(), 0);
        assert_eq!(timer.expiry_tick(), None);
        assert!(!timer.poll());
    }

    #[test]
    fn start_then_query_is_within_duration() {
        let ticks = FakeTicks::at(1000, 1024);
        let sink = CountingSink::default();
        let timer: Timer = CountdownTimer::new(&ticks, &sink);

        let token = timer.start(5000);
        assert!(timer.is_running());
        assert_eq!(token.duration_ticks, 5120);
        assert_eq!(token.expiry_tick(), 6120);

        let remaining = timer.remaining_ms();
        assert!(remaining > 0 && remaining <= 5000);

        ticks.advance(1024);
        assert_eq!(timer.remaining_ms(), 4000);
    }

    #[test]
    fn expiry_tick_wraps() {
        let ticks = FakeTicks::at(u32::MAX - 100, 1000);
        let sink = CountingSink::default();
        let timer: Timer = CountdownTimer::new(&ticks, &sink);

        timer.start(1000);
        assert_eq!(timer.expiry_tick(), Some(899));
    }

    #[test]
    fn remaining_decreases_across_wrap() {
        let ticks = FakeTicks::at(u32::MAX - 2047, 1024);
        let sink = CountingSink::default();
        let timer: Timer = CountdownTimer::new(&ticks, &sink);

        timer.start(4000);
        let mut previous = timer.remaining_ms();
        assert_eq!(previous, 4000);
        for _ in 0..64 {
            ticks.advance(64);
            let remaining = timer.remaining_ms();
            assert!(remaining <= previous, "{} > {}", remaining, previous);
            assert!(remaining <= 4000);
            previous = remaining;
        }
        assert_eq!(previous, 0);
        // The counter really did wrap.
        assert!(ticks.now() < 4096);
    }

    #[test]
    fn stop_disarms() {
        let ticks = FakeTicks::at(0, 1024);
        let sink = CountingSink::default();
        let timer: Timer = CountdownTimer::new(&ticks, &sink);

        let token = timer.start(1000);
        timer.stop();
        assert!(!timer.is_running());
        assert_eq!(timer.remaining_ms(), 0);

        ticks.advance(2048);
        assert!(!timer.on_expire(&token));
        assert!(!timer.poll());
        assert_eq!(sink.count(), 0);

        // Idempotent.
        timer.stop();
        assert!(!timer.is_running());
    }

    #[test]
    fn on_expire_fires_once_per_start() {
        let ticks = FakeTicks::at(0, 1024);
        let sink = CountingSink::default();
        let timer: Timer = CountdownTimer::new(&ticks, &sink);

        let token = timer.start(500);
        ticks.advance(512);
        assert!(timer.on_expire(&token));
        assert!(!timer.on_expire(&token));
        assert!(!timer.poll());
        assert_eq!(sink.count(), 1);
        assert!(!timer.is_running());
        assert_eq!(timer.remaining_ms(), 0);
    }

    #[test]
    fn stale_token_from_previous_run_is_ignored() {
        let ticks = FakeTicks::at(0, 1024);
        let sink = CountingSink::default();
        let timer: Timer = CountdownTimer::new(&ticks, &sink);

        let first = timer.start(500);
        let second = timer.start(10_000);
        assert_ne!(first.generation, second.generation);

        ticks.advance(512);
        assert!(!timer.on_expire(&first));
        assert!(timer.is_running());
        assert!(timer.on_expire(&second));
        assert_eq!(sink.count(), 1);
    }

    #[test]
    fn poll_fires_when_due() {
        let ticks = FakeTicks::at(u32::MAX - 10, 1000);
        let sink = CountingSink::default();
        let timer: Timer = CountdownTimer::new(&ticks, &sink);

        timer.start(20);
        ticks.advance(19);
        assert!(!timer.poll());
        assert_eq!(timer.remaining_ms(), 1);

        ticks.advance(1);
        assert!(timer.poll());
        for _ in 0..5 {
            ticks.advance(100);
            assert!(!timer.poll());
        }
        assert_eq!(sink.count(), 1);
    }

    #[test]
    fn zero_duration_expires_immediately() {
        let ticks = FakeTicks::at(42, 1024);
        let sink = CountingSink::default();
        let timer: Timer = CountdownTimer::new(&ticks, &sink);

        timer.start(0);
        assert!(timer.is_running());
        assert_eq!(timer.remaining_ms(), 0);
        assert!(timer.poll());
        assert_eq!(sink.count(), 1);
    }

    #[test]
    fn overdue_timer_reports_zero_before_delivery() {
        let ticks = FakeTicks::at(0, 1024);
        let sink = CountingSink::default();
        let timer: Timer = CountdownTimer::new(&ticks, &sink);

        timer.start(1000);
        ticks.advance(5000);
        assert!(timer.is_running());
        assert_eq!(timer.remaining_ms(), 0);
    }

    #[test]
    fn restart_cancels_previous_run() {
        let ticks = FakeTicks::at(0, 1000);
        let sink = CountingSink::default();
        let timer: Timer = CountdownTimer::new(&ticks, &sink);

        timer.start(100);
        ticks.advance(50);
        timer.start(1000);
        ticks.advance(100);
        assert!(!timer.poll());
        assert_eq!(timer.remaining_ms(), 900);
    }

    #[test]
    fn concurrent_expire_and_stop_notify_at_most_once() {
        for _ in 0..50 {
            let ticks = FakeTicks::at(0, 1000);
            let sink = CountingSink::default();
            let timer: Timer = CountdownTimer::new(&ticks, &sink);
            let token = timer.start(10);
            ticks.advance(10);

            std::thread::scope(|s| {
                s.spawn(|| timer.on_expire(&token));
                s.spawn(|| timer.poll());
                s.spawn(|| timer.stop());
                s.spawn(|| timer.remaining_ms());
            });

            assert!(sink.count() <= 1);
            assert!(!timer.is_running());
        }
    }

    /// Tick source that re-arms the timer from inside one reading, then
    /// returns the tick from before the re-arm.
    struct RearmOnRead<'a> {
        now: Cell<u32>,
        rearm: Cell<Option<&'a dyn Fn()>>,
    }

    impl TickSource for RearmOnRead<'_> {
        fn now(&self) -> u32 {
            let now = self.now.get();
            if let Some(rearm) = self.rearm.take() {
                self.now.set(now.wrapping_add(1));
                rearm();
            }
            now
        }

        fn frequency_hz(&self) -> u32 {
            1000
        }
    }

    #[test]
    fn poll_does_not_fire_a_run_started_mid_poll() {
        use embassy_sync::blocking_mutex::raw::NoopRawMutex;

        let ticks = RearmOnRead {
            now: Cell::new(100),
            rearm: Cell::new(None),
        };
        let sink = CountingSink::default();
        let timer: CountdownTimer<NoopRawMutex, _, _> = CountdownTimer::new(&ticks, &sink);
        timer.start(60_000);

        let rearm: &dyn Fn() = &|| {
            timer.start(60_000);
        };
        ticks.rearm.set(Some(rearm));

        assert!(!timer.poll());
        assert_eq!(sink.count(), 0);
        assert!(timer.is_running());
        assert!(timer.remaining_ms() > 59_000);
    }

    #[test]
    fn coarse_ticks_never_report_more_than_requested() {
        let ticks = FakeTicks::at(0, 300);
        let sink = CountingSink::default();
        let timer: Timer = CountdownTimer::new(&ticks, &sink);

        timer.start(1);
        assert_eq!(timer.remaining_ms(), 1);

        timer.start(10);
        assert!(timer.remaining_ms() <= 10);
    }
}
