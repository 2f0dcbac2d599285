//! The seven colours (plus "clean") understood by the UC8159 controller

use bit_field::BitField;
use core::fmt;

#[cfg(feature = "graphics")]
use embedded_graphics_core::pixelcolor::PixelColor;

/// Error returned when a byte does not encode a [DisplayColor]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidEncoding(pub u8);

impl fmt::Display for InvalidEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid byte value for DisplayColor: {}", self.0)
    }
}

/// Colour of a single pixel on the 7-colour panel
///
/// The discriminant is the 3 bit code sent over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayColor {
    /// Black
    #[default]
    Black = 0,
    /// White
    White = 1,
    /// Green
    Green = 2,
    /// Blue
    Blue = 3,
    /// Red
    Red = 4,
    /// Yellow
    Yellow = 5,
    /// Orange
    Orange = 6,
    /// "Clean", drives the pixel to a washed out neutral state
    Clean = 7,
}

impl DisplayColor {
    /// Every colour, ordered by wire code
    pub const ALL: [DisplayColor; 8] = [
        DisplayColor::Black,
        DisplayColor::White,
        DisplayColor::Green,
        DisplayColor::Blue,
        DisplayColor::Red,
        DisplayColor::Yellow,
        DisplayColor::Orange,
        DisplayColor::Clean,
    ];

    /// Parses the 3 bit wire code of a colour
    pub fn from_byte(value: u8) -> Result<Self, InvalidEncoding> {
        match value {
            0x00 => Ok(DisplayColor::Black),
            0x01 => Ok(DisplayColor::White),
            0x02 => Ok(DisplayColor::Green),
            0x03 => Ok(DisplayColor::Blue),
            0x04 => Ok(DisplayColor::Red),
            0x05 => Ok(DisplayColor::Yellow),
            0x06 => Ok(DisplayColor::Orange),
            0x07 => Ok(DisplayColor::Clean),
            e => Err(InvalidEncoding(e)),
        }
    }

    /// Wire code of the colour
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Runs the handler belonging to this colour and returns its result
    ///
    /// Lets callers branch on a colour without touching the wire encoding.
    #[allow(clippy::too_many_arguments)]
    pub fn dispatch<R>(
        self,
        black: impl FnOnce() -> R,
        white: impl FnOnce() -> R,
        green: impl FnOnce() -> R,
        blue: impl FnOnce() -> R,
        red: impl FnOnce() -> R,
        yellow: impl FnOnce() -> R,
        orange: impl FnOnce() -> R,
        clean: impl FnOnce() -> R,
    ) -> R {
        match self {
            DisplayColor::Black => black(),
            DisplayColor::White => white(),
            DisplayColor::Green => green(),
            DisplayColor::Blue => blue(),
            DisplayColor::Red => red(),
            DisplayColor::Yellow => yellow(),
            DisplayColor::Orange => orange(),
            DisplayColor::Clean => clean(),
        }
    }

    /// Packs two colours into one byte, `first` in the high nibble
    pub fn colors_byte(first: DisplayColor, second: DisplayColor) -> u8 {
        let mut byte = 0u8;
        byte.set_bits(4..8, first.to_byte());
        byte.set_bits(0..4, second.to_byte());
        byte
    }

    /// Splits a packed byte back into its (high, low) colours
    pub fn split_byte(byte: u8) -> Result<(DisplayColor, DisplayColor), InvalidEncoding> {
        let first = DisplayColor::from_byte(byte.get_bits(4..8))?;
        let second = DisplayColor::from_byte(byte.get_bits(0..4))?;
        Ok((first, second))
    }
}

impl TryFrom<u8> for DisplayColor {
    type Error = InvalidEncoding;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        DisplayColor::from_byte(value)
    }
}

impl From<DisplayColor> for u8 {
    fn from(color: DisplayColor) -> u8 {
        color.to_byte()
    }
}

#[cfg(feature = "graphics")]
impl PixelColor for DisplayColor {
    type Raw = ();
}
