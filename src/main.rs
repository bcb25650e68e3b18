//! Watch firmware entry point (nRF52832).
//!
//! Tasks:
//!   - `ui_task`        owns the calculator and timer screens, reacts to
//!                      input events and the countdown's completion
//!   - `countdown_task` waits for the armed countdown to expire
//!   - `motor_task`     drives the vibration motor from haptic requests
//!   - `refresh_task`   periodic screen refresh tick
//!
//! The GUI toolkit's event callbacks post into `APP_EVENTS`; rendering is
//! the toolkit's business, so the screens' text is only logged here.

#![no_std]
#![no_main]

use defmt::{debug, info, unwrap, warn};
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_nrf::gpio::{Level, Output, OutputDrive};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_time::{Delay, Duration, Instant, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use watchapp::app::{CalculatorApp, TimerApp, TimerButton, TouchEvent};
use watchapp::config::{HAPTIC_QUEUE_DEPTH, TIMER_DONE_HAPTIC_MS};
use watchapp::haptics::{HapticQueue, Haptics, MotorDriver};
use watchapp::timer::tick::ticks_between;
use watchapp::{ArmToken, CountdownTimer, ExpirySink, TickSource};

/// Events delivered to the UI task.
#[derive(Clone, Copy, defmt::Format)]
enum AppEvent {
    /// Calculator keypad button, row-major index.
    CalculatorKey(usize),
    /// Calculator "<=" button.
    CalculatorReturn,
    /// Gesture on the calculator screen.
    CalculatorTouch(TouchEvent),
    TimerButton(TimerButton),
    /// The countdown reached zero.
    TimerDone,
    Refresh,
}

/// Scheduler tick counter, truncated to its low 32 bits.
struct SchedulerTicks;

impl TickSource for SchedulerTicks {
    fn now(&self) -> u32 {
        Instant::now().as_ticks() as u32
    }

    fn frequency_hz(&self) -> u32 {
        embassy_time::TICK_HZ as u32
    }
}

/// Forwards countdown completion to the UI task.
struct TimerDoneEvent;

impl ExpirySink for TimerDoneEvent {
    fn timer_done(&self) {
        if APP_EVENTS.try_send(AppEvent::TimerDone).is_err() {
            warn!("app events full, timer completion dropped");
        }
    }
}

type Countdown = CountdownTimer<CriticalSectionRawMutex, SchedulerTicks, TimerDoneEvent>;

static APP_EVENTS: Channel<CriticalSectionRawMutex, AppEvent, 8> = Channel::new();
static HAPTICS: Channel<CriticalSectionRawMutex, u16, HAPTIC_QUEUE_DEPTH> = Channel::new();
static ARM: Signal<CriticalSectionRawMutex, ArmToken> = Signal::new();
static COUNTDOWN: StaticCell<Countdown> = StaticCell::new();

/// Screen refresh period.
const REFRESH_PERIOD: Duration = Duration::from_millis(500);

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("watchapp starting");

    // Vibration motor on P0.16, active-low: start high (off).
    let motor_pin = Output::new(p.P0_16, Level::High, OutputDrive::Standard);
    let motor = unwrap!(MotorDriver::new(motor_pin, Delay));

    let countdown: &'static Countdown = COUNTDOWN.init(CountdownTimer::new(SchedulerTicks, TimerDoneEvent));

    unwrap!(spawner.spawn(motor_task(motor)));
    unwrap!(spawner.spawn(countdown_task(countdown)));
    unwrap!(spawner.spawn(refresh_task()));
    unwrap!(spawner.spawn(ui_task(countdown)));
}

#[embassy_executor::task]
async fn motor_task(mut motor: MotorDriver<Output<'static>, Delay>) {
    loop {
        let duration_ms = HAPTICS.receive().await;
        if let Err(e) = motor.run_for(duration_ms).await {
            warn!("motor: {}", e);
        }
    }
}

/// Sleeps until the most recently armed run expires. A new arm token
/// replaces the one being waited on; tokens of stopped runs are rejected
/// by `on_expire`.
#[embassy_executor::task]
async fn countdown_task(countdown: &'static Countdown) {
    let mut armed: Option<ArmToken> = None;
    loop {
        let Some(token) = armed else {
            armed = Some(ARM.wait().await);
            continue;
        };

        let elapsed = ticks_between(token.start_tick, SchedulerTicks.now());
        let wait = token.duration_ticks.saturating_sub(elapsed);

        match select(Timer::after(Duration::from_ticks(wait as u64)), ARM.wait()).await {
            Either::First(()) => {
                countdown.on_expire(&token);
                armed = None;
            }
            Either::Second(next) => armed = Some(next),
        }
    }
}

#[embassy_executor::task]
async fn refresh_task() {
    loop {
        Timer::after(REFRESH_PERIOD).await;
        if APP_EVENTS.try_send(AppEvent::Refresh).is_err() {
            debug!("app events full, refresh skipped");
        }
    }
}

#[embassy_executor::task]
async fn ui_task(countdown: &'static Countdown) {
    let mut calculator = CalculatorApp::new(HapticQueue::new(HAPTICS.sender()));
    let mut timer_screen = TimerApp::new(countdown);
    let mut haptics = HapticQueue::new(HAPTICS.sender());

    loop {
        match APP_EVENTS.receive().await {
            AppEvent::CalculatorKey(index) => {
                if let Err(e) = calculator.press(index) {
                    info!("calculator: {}", e);
                }
                info!("calculator: {=str}", calculator.display());
            }
            AppEvent::CalculatorReturn => {
                calculator.on_return();
                info!("calculator: {=str}", calculator.display());
            }
            AppEvent::CalculatorTouch(event) => {
                calculator.on_touch(event);
            }
            AppEvent::TimerButton(button) => {
                if let Some(token) = timer_screen.on_button(button) {
                    ARM.signal(token);
                }
                info!("timer: {=str}", timer_screen.text().as_str());
            }
            AppEvent::TimerDone => {
                timer_screen.on_done();
                haptics.vibrate(TIMER_DONE_HAPTIC_MS);
                info!("timer: done");
            }
            AppEvent::Refresh => {
                if timer_screen.is_running() {
                    info!("timer: {=str}", timer_screen.text().as_str());
                }
            }
        }
    }
}
