use core::fmt::{Debug, Display, Formatter};
use core::time::Duration;

use crate::gpio::GpioController;
use crate::wait::WaitError;

/// Error of a [Uc8159](crate::uc8159::Uc8159) driven over `SPI` and `GPIO`
pub type DriverError<SPI, GPIO> =
    ErrorKind<<SPI as embedded_hal::spi::ErrorType>::Error, <GPIO as GpioController>::Error>;

/// Epd error type
///
/// `SpiE` and `GpioE` are the errors of the SPI device and GPIO controller in use.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind<SpiE, GpioE> {
    /// Encountered an SPI error
    SpiError(SpiE),

    /// Encountered an error on one of the GPIO pins
    GpioError(GpioE),

    /// A command or data frame without any bytes was requested
    EmptyFrame,

    /// A protocol operation was started before the driver was initialized
    Uninitialized,

    /// The busy pin did not report ready within the given time
    Timeout(Duration),
}

impl<SpiE, GpioE> From<WaitError<GpioE>> for ErrorKind<SpiE, GpioE> {
    fn from(err: WaitError<GpioE>) -> Self {
        match err {
            WaitError::Gpio(err) => Self::GpioError(err),
            WaitError::Timeout(timeout) => Self::Timeout(timeout),
        }
    }
}

pub(crate) fn fmt_timeout(f: &mut Formatter<'_>, timeout: &Duration) -> core::fmt::Result {
    write!(
        f,
        "Timeout waiting for busy signal to clear after {:.2} seconds",
        timeout.as_secs_f64()
    )
}

impl<SpiE: Debug, GpioE: Debug> Display for ErrorKind<SpiE, GpioE> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SpiError(err) => write!(f, "SPI error: {err:?}"),
            Self::GpioError(err) => write!(f, "GPIO error: {err:?}"),
            Self::EmptyFrame => f.write_str("Cannot write empty data to SPI bus"),
            Self::Uninitialized => {
                f.write_str("You must initialize the driver before resetting the display")
            }
            Self::Timeout(timeout) => fmt_timeout(f, timeout),
        }
    }
}

impl<SpiE: Debug, GpioE: Debug> Debug for ErrorKind<SpiE, GpioE> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SpiError(err) => Debug::fmt(&err, f),
            Self::GpioError(err) => Debug::fmt(&err, f),
            Self::EmptyFrame => write!(f, "EmptyFrame"),
            Self::Uninitialized => write!(f, "Uninitialized"),
            Self::Timeout(timeout) => write!(f, "Timeout({timeout:?})"),
        }
    }
}
