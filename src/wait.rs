//! Polling of the controller's busy line

use core::fmt::{self, Debug, Display};
use core::time::Duration;

use embedded_hal_async::delay::DelayNs;
use log::warn;

use crate::gpio::{GpioController, PinState};
use crate::traits::BusyWait;

/// Default time between two samples of the busy pin
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Failure of a busy wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitError<E> {
    /// Sampling the pin failed
    Gpio(E),
    /// The pin stayed low for the whole timeout
    Timeout(Duration),
}

impl<E: Debug> Display for WaitError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitError::Gpio(err) => write!(f, "GPIO error: {err:?}"),
            WaitError::Timeout(timeout) => crate::error::fmt_timeout(f, timeout),
        }
    }
}

/// Samples the busy pin and sleeps on `DELAY` in between
///
/// The elapsed time is the sum of the intervals slept, so the waiter does not
/// need a clock.
pub struct BusyWaiter<DELAY> {
    delay: DELAY,
    interval: Duration,
}

impl<DELAY: DelayNs> BusyWaiter<DELAY> {
    /// Creates a waiter polling every [DEFAULT_POLL_INTERVAL]
    pub fn new(delay: DELAY) -> Self {
        Self::with_interval(delay, DEFAULT_POLL_INTERVAL)
    }

    /// Creates a waiter with a custom polling interval (at least 1us)
    pub fn with_interval(delay: DELAY, interval: Duration) -> Self {
        BusyWaiter {
            delay,
            interval: interval.max(Duration::from_micros(1)),
        }
    }

    /// Interval between two samples
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Gives back the delay
    pub fn release(self) -> DELAY {
        self.delay
    }
}

impl<DELAY: DelayNs> BusyWait for BusyWaiter<DELAY> {
    async fn wait_for_ready<G: GpioController>(
        &mut self,
        gpio: &mut G,
        pin: u8,
        timeout: Duration,
    ) -> Result<(), WaitError<G::Error>> {
        let interval_us = u32::try_from(self.interval.as_micros()).unwrap_or(u32::MAX);
        let mut elapsed = Duration::ZERO;
        loop {
            if gpio.read(pin).map_err(WaitError::Gpio)? == PinState::High {
                return Ok(());
            }
            if elapsed >= timeout {
                warn!("busy pin {pin} still low after {timeout:?}");
                return Err(WaitError::Timeout(timeout));
            }
            self.delay.delay_us(interval_us).await;
            elapsed += self.interval;
        }
    }
}
