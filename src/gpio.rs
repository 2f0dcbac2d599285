//! GPIO access and the pin wiring of the panel
//!
//! The driver talks to numbered pins through [GpioController] rather than
//! holding individual `embedded-hal` pins, since it opens and releases them itself.

use core::fmt::Debug;
pub use embedded_hal::digital::PinState;

/// Direction a pin is opened with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    /// Pin is read from
    Input,
    /// Pin is driven
    Output,
}

/// Numbered GPIO pins, e.g. a Linux gpiochip or the Raspberry Pi BCM pins
pub trait GpioController {
    /// Error of the underlying GPIO implementation
    type Error: Debug;

    /// Opens `pin` in the given direction
    fn open_pin(&mut self, pin: u8, mode: PinMode) -> Result<(), Self::Error>;

    /// Releases a previously opened `pin`
    fn close_pin(&mut self, pin: u8) -> Result<(), Self::Error>;

    /// Drives an output `pin`
    fn write(&mut self, pin: u8, state: PinState) -> Result<(), Self::Error>;

    /// Samples an input `pin`
    fn read(&mut self, pin: u8) -> Result<PinState, Self::Error>;
}

impl<T: GpioController + ?Sized> GpioController for &mut T {
    type Error = T::Error;

    fn open_pin(&mut self, pin: u8, mode: PinMode) -> Result<(), Self::Error> {
        T::open_pin(self, pin, mode)
    }

    fn close_pin(&mut self, pin: u8) -> Result<(), Self::Error> {
        T::close_pin(self, pin)
    }

    fn write(&mut self, pin: u8, state: PinState) -> Result<(), Self::Error> {
        T::write(self, pin, state)
    }

    fn read(&mut self, pin: u8) -> Result<PinState, Self::Error> {
        T::read(self, pin)
    }
}

/// Pins of the four control lines (BCM numbering)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinConfig {
    /// Chip select, low while a frame is transferred
    pub chip_select: u8,
    /// Data/Command select (High for data, Low for command)
    pub data_command: u8,
    /// Reset, kept high while running
    pub reset: u8,
    /// Busy input, high once the controller is idle
    pub busy: u8,
}

impl Default for PinConfig {
    /// Wiring of the Pimoroni Inky Impression HAT
    fn default() -> Self {
        PinConfig {
            chip_select: 8,
            data_command: 22,
            reset: 27,
            busy: 17,
        }
    }
}

impl PinConfig {
    /// BCM pin of one of the four buttons next to the panel
    ///
    /// The buttons pull their pin low while pressed.
    pub fn button_pin(button: DisplayButton) -> u8 {
        match button {
            DisplayButton::A => 5,
            DisplayButton::B => 6,
            DisplayButton::C => 16,
            DisplayButton::D => 24,
        }
    }
}

/// The buttons on the side of the Inky Impression, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayButton {
    /// First button
    A,
    /// Second button
    B,
    /// Third button
    C,
    /// Fourth button
    D,
}

impl DisplayButton {
    /// All buttons, top to bottom
    pub const ALL: [DisplayButton; 4] = [
        DisplayButton::A,
        DisplayButton::B,
        DisplayButton::C,
        DisplayButton::D,
    ];
}
