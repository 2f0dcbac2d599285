//! An async Driver for 7-colour UC8159 E-Ink Displays via SPI
//!
//! This driver was built using [`embedded-hal`] and [`embedded-hal-async`] traits.
//! The panel is a 600x448 pixel seven colour display such as the Pimoroni Inky Impression 5.7".
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal/1
//! [`embedded-hal-async`]: https://docs.rs/embedded-hal-async/1
//!
//! # Requirements
//!
//! ### SPI
//!
//! - MISO is not connected/available
//! - SPI_MODE_0 is used (CPHL = 0, CPOL = 0)
//! - 8 bits per word, MSB first
//! - 3Mhz, see [SPI_MAX_FREQUENCY_HZ]
//! - Chip select is toggled by the driver through a GPIO pin, the SPI device must not drive it
//!
//! ### GPIO
//!
//! Pins are opened and closed by the driver through a [GpioController](gpio::GpioController).
//! The default [PinConfig](gpio::PinConfig) matches the Inky Impression HAT.
//!
//! ### Other....
//!
//! - Buffersize: A packed frame always has `600 * 448 / 2` bytes, two pixels per byte
//! - A full refresh takes around 30 seconds, the driver waits on the busy pin for it
//!
//! # Examples
//!
//! ```ignore
//! use epd_uc8159::{graphics::*, prelude::*, uc8159::Uc8159};
//!
//! let mut epd = Uc8159::with_delay(spi, gpio, PinConfig::default(), delay);
//!
//! let mut display = FrameBuffer::new(Orientation::default());
//!
//! // draw something into the buffer
//! display.set_pixel(0, 0, DisplayColor::Red)?;
//!
//! // initializes the panel if needed and refreshes it
//! display.show(&mut epd).await?;
//!
//! // give the pins back
//! epd.release()?;
//! ```
//!
#![no_std]
#![allow(async_fn_in_trait)]

extern crate alloc;

pub mod array2d;

pub mod color;

pub mod error;

pub mod gpio;

pub mod graphics;

/// Interface for the physical connection between display and the controlling device
mod interface;

mod traits;

pub mod uc8159;

pub mod wait;

#[cfg(test)]
mod mock;

pub use crate::traits::{BusyWait, PanelDriver};

pub mod prelude {
    pub use crate::color::DisplayColor;
    pub use crate::error::{DriverError, ErrorKind};
    pub use crate::gpio::{DisplayButton, GpioController, PinConfig, PinMode, PinState};
    pub use crate::traits::{BusyWait, PanelDriver};
    pub use crate::SPI_MODE;
}

use embedded_hal::spi::{Mode, Phase, Polarity};

/// SPI mode -
/// For more infos see [Requirements: SPI](index.html#spi)
pub const SPI_MODE: Mode = Mode {
    phase: Phase::CaptureOnFirstTransition,
    polarity: Polarity::IdleLow,
};

/// Highest SPI clock the panel is driven with
pub const SPI_MAX_FREQUENCY_HZ: u32 = 3_000_000;
