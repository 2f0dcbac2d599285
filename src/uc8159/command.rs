//! SPI Commands for the UC8159 controller
use crate::traits;

/// UC8159 commands
///
/// Should rarely (never?) be needed directly.
///
/// For more infos about the addresses and what they are doing look into the pdfs
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    /// Sets the resolution, scan direction and colour mode of the panel
    PanelSetting = 0x00,
    /// Selecting internal and external power
    PowerSetting = 0x01,
    /// Power off sequence setting (PFS)
    PowerOffSequenceSetting = 0x03,
    /// Turning On the Power
    ///
    /// Also sent as the refresh trigger during a paint cycle
    PowerOn = 0x04,
    /// Starts the transmission of the packed image (DTM1)
    DataStartTransmission1 = 0x10,
    /// The command controls the PLL clock frequency.
    PllControl = 0x30,
    /// Temperature sensor enable (TSE)
    TemperatureSensorEnable = 0x41,
    /// VCOM and data interval, including the border colour
    VcomAndDataIntervalSetting = 0x50,
    /// Gate/Source non-overlap period (TCON)
    TconSetting = 0x60,
    /// Resolution setting (TRES)
    TconResolution = 0x61,
    /// Access to the external SPI flash (DAM)
    SpiFlashControl = 0x65,
    /// Power saving, enables the 7 colour waveform
    PowerSaving = 0xE3,
}

impl traits::Command for Command {
    /// Returns the address of the command
    fn address(self) -> u8 {
        self as u8
    }
}
