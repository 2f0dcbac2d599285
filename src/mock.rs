//! Recording fakes of the GPIO, SPI and delay collaborators for unit tests

use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::convert::Infallible;
use core::time::Duration;

use embedded_hal::spi::{ErrorType, Operation};
use embedded_hal_async::{delay::DelayNs, spi::SpiDevice};

use crate::gpio::{GpioController, PinMode, PinState};
use crate::traits::BusyWait;
use crate::wait::WaitError;

/// Something one of the fakes was asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    Open(u8, PinMode),
    Close(u8),
    Write(u8, PinState),
    Read(u8),
    Spi(Vec<u8>),
    Wait(u8, Duration),
}

pub(crate) type Log = Rc<RefCell<Vec<Event>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FakeGpioError;

/// GPIO controller recording every call
///
/// Reads return the queued levels first, then the idle level (high by default).
pub(crate) struct FakeGpio {
    log: Log,
    queued: VecDeque<PinState>,
    idle: PinState,
    fail_reads: bool,
    fail_open: Option<u8>,
}

impl FakeGpio {
    pub(crate) fn new() -> Self {
        Self::with_log(Log::default())
    }

    pub(crate) fn with_log(log: Log) -> Self {
        FakeGpio {
            log,
            queued: VecDeque::new(),
            idle: PinState::High,
            fail_reads: false,
            fail_open: None,
        }
    }

    pub(crate) fn queue_busy_reads(&mut self, levels: &[PinState]) {
        self.queued.extend(levels.iter().copied());
    }

    pub(crate) fn set_idle_level(&mut self, level: PinState) {
        self.idle = level;
    }

    pub(crate) fn fail_reads(&mut self) {
        self.fail_reads = true;
    }

    pub(crate) fn fail_open(&mut self, pin: u8) {
        self.fail_open = Some(pin);
    }

    pub(crate) fn events(&self) -> Vec<Event> {
        self.log.borrow().clone()
    }
}

impl GpioController for FakeGpio {
    type Error = FakeGpioError;

    fn open_pin(&mut self, pin: u8, mode: PinMode) -> Result<(), Self::Error> {
        if self.fail_open == Some(pin) {
            return Err(FakeGpioError);
        }
        self.log.borrow_mut().push(Event::Open(pin, mode));
        Ok(())
    }

    fn close_pin(&mut self, pin: u8) -> Result<(), Self::Error> {
        self.log.borrow_mut().push(Event::Close(pin));
        Ok(())
    }

    fn write(&mut self, pin: u8, state: PinState) -> Result<(), Self::Error> {
        self.log.borrow_mut().push(Event::Write(pin, state));
        Ok(())
    }

    fn read(&mut self, pin: u8) -> Result<PinState, Self::Error> {
        self.log.borrow_mut().push(Event::Read(pin));
        if self.fail_reads {
            return Err(FakeGpioError);
        }
        Ok(self.queued.pop_front().unwrap_or(self.idle))
    }
}

/// SPI device appending every written chunk to the shared log
pub(crate) struct FakeSpi {
    log: Log,
}

impl FakeSpi {
    pub(crate) fn with_log(log: Log) -> Self {
        FakeSpi { log }
    }
}

impl ErrorType for FakeSpi {
    type Error = Infallible;
}

impl SpiDevice for FakeSpi {
    async fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Infallible> {
        for op in operations.iter() {
            if let Operation::Write(data) = op {
                self.log.borrow_mut().push(Event::Spi(data.to_vec()));
            }
        }
        Ok(())
    }
}

/// Busy waiter that returns at once and logs the requested timeout
pub(crate) struct RecordingWaiter {
    log: Log,
}

impl RecordingWaiter {
    pub(crate) fn with_log(log: Log) -> Self {
        RecordingWaiter { log }
    }
}

impl BusyWait for RecordingWaiter {
    async fn wait_for_ready<G: GpioController>(
        &mut self,
        _gpio: &mut G,
        pin: u8,
        timeout: Duration,
    ) -> Result<(), WaitError<G::Error>> {
        self.log.borrow_mut().push(Event::Wait(pin, timeout));
        Ok(())
    }
}

/// Delay that returns at once, counting what it was asked to sleep
#[derive(Debug, Default)]
pub(crate) struct FakeDelay {
    pub(crate) calls: u32,
    pub(crate) slept_ns: u64,
}

impl DelayNs for FakeDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.calls += 1;
        self.slept_ns += u64::from(ns);
    }
}
