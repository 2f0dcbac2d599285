//! A Driver for 7-colour UC8159 E-Ink Displays (600x448) via SPI, e.g. the Pimoroni Inky Impression 5.7"
//!
//! # References
//!
//! - [Pimoroni Inky Python library](https://github.com/pimoroni/inky)
//!
//!# Example for the UC8159 E-Ink Display
//!
//!```rust, ignore
//!use epd_uc8159::{graphics::*, prelude::*, uc8159::*, wait::BusyWaiter};
//!
//!// Setup the driver, pins are opened by `initialize`
//!let mut epd = Uc8159::with_delay(spi, gpio, PinConfig::default(), delay);
//!epd.initialize().await?;
//!
//!// Draw into a frame buffer and paint it
//!let mut display = FrameBuffer::new(Orientation::default());
//!display.set_pixel(10, 20, DisplayColor::Red)?;
//!display.show(&mut epd).await?;
//!```

use core::time::Duration;

use embedded_hal_async::{delay::DelayNs, spi::SpiDevice};
use log::{debug, warn};

use crate::color::DisplayColor;
use crate::error::{DriverError, ErrorKind};
use crate::gpio::{GpioController, PinConfig, PinState};
use crate::interface::DisplayInterface;
use crate::traits::{BusyWait, PanelDriver};
use crate::wait::BusyWaiter;

pub(crate) mod command;
use self::command::Command;

/// Width of the display
pub const WIDTH: u32 = 600;
/// Height of the display
pub const HEIGHT: u32 = 448;
/// Default Border Color
pub const DEFAULT_BORDER_COLOR: DisplayColor = DisplayColor::White;
/// Number of bytes of a packed frame, two pixels per byte
pub const BUFFER_LEN: usize = WIDTH as usize * HEIGHT as usize / 2;

/// Time the controller may need to come out of reset
const INIT_TIMEOUT: Duration = Duration::from_secs(40);
/// Wait after the first power on
const POWER_ON_TIMEOUT: Duration = Duration::from_millis(210);
/// A full refresh of all seven colours
const REFRESH_TIMEOUT: Duration = Duration::from_secs(32);
/// Wait after the final power command
const POWER_SETTLE_TIMEOUT: Duration = Duration::from_millis(200);

/// Uc8159 driver
///
/// Owns the SPI device and the GPIO controller. The control pins are opened by
/// [initialize](Uc8159::initialize) and closed again by [release](Uc8159::release) or on drop.
pub struct Uc8159<SPI, GPIO, WAIT>
where
    GPIO: GpioController,
{
    /// Connection Interface
    interface: DisplayInterface<SPI, GPIO, WAIT>,
    /// Border Color
    border: DisplayColor,
    /// Set once the pins are open and the controller reported ready
    initialized: bool,
}

impl<SPI, GPIO, DELAY> Uc8159<SPI, GPIO, BusyWaiter<DELAY>>
where
    SPI: SpiDevice,
    GPIO: GpioController,
    DELAY: DelayNs,
{
    /// Creates a driver polling the busy pin with the default interval of a [BusyWaiter]
    pub fn with_delay(spi: SPI, gpio: GPIO, pins: PinConfig, delay: DELAY) -> Self {
        Self::new(spi, gpio, pins, BusyWaiter::new(delay))
    }
}

impl<SPI, GPIO, WAIT> Uc8159<SPI, GPIO, WAIT>
where
    SPI: SpiDevice,
    GPIO: GpioController,
    WAIT: BusyWait,
{
    /// Creates a new driver
    ///
    /// Nothing is sent and no pin is touched until [initialize](Uc8159::initialize).
    pub fn new(spi: SPI, gpio: GPIO, pins: PinConfig, waiter: WAIT) -> Self {
        Uc8159 {
            interface: DisplayInterface::new(spi, gpio, pins, waiter),
            border: DEFAULT_BORDER_COLOR,
            initialized: false,
        }
    }

    /// Opens the control pins and waits for the controller to become ready
    ///
    /// Chip select is left high, data/command low and reset high. Calling this on an
    /// initialized driver does nothing. If the controller does not get ready, all pins
    /// are closed again.
    pub async fn initialize(&mut self) -> Result<(), DriverError<SPI, GPIO>> {
        if self.initialized {
            return Ok(());
        }
        debug!("opening control pins {:?}", self.interface.pins());
        self.interface.open_pins()?;

        if let Err(err) = self.interface.wait_until_idle(INIT_TIMEOUT).await {
            let _ = self.interface.close_pins();
            return Err(err);
        }
        self.initialized = true;
        Ok(())
    }

    /// Whether [initialize](Uc8159::initialize) has completed
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Closes all control pins
    ///
    /// The driver has to be initialized again before it can be used.
    pub fn release(&mut self) -> Result<(), DriverError<SPI, GPIO>> {
        debug!("releasing control pins");
        self.initialized = false;
        self.interface.close_pins().map_err(ErrorKind::GpioError)
    }

    /// Pins of the control lines
    pub fn pins(&self) -> &PinConfig {
        self.interface.pins()
    }

    /// Sets the colour of the border around the active area, used from the next reset on
    pub fn set_border_color(&mut self, color: DisplayColor) {
        self.border = color;
    }

    /// Get current border color
    pub fn border_color(&self) -> DisplayColor {
        self.border
    }

    /// Sends a raw command frame
    pub async fn write_command(&mut self, data: &[u8]) -> Result<(), DriverError<SPI, GPIO>> {
        self.write_frame(PinState::Low, data).await
    }

    /// Sends a raw data frame
    pub async fn write_data(&mut self, data: &[u8]) -> Result<(), DriverError<SPI, GPIO>> {
        self.write_frame(PinState::High, data).await
    }

    async fn write_frame(
        &mut self,
        dc: PinState,
        data: &[u8],
    ) -> Result<(), DriverError<SPI, GPIO>> {
        if data.is_empty() {
            return Err(ErrorKind::EmptyFrame);
        }
        self.ensure_initialized()?;
        self.interface.frame(dc, data).await
    }

    /// Programs the register set of the controller
    ///
    /// Some of the values are not explained by the datasheet, they are kept as the
    /// panel expects them.
    pub async fn reset_display(&mut self) -> Result<(), DriverError<SPI, GPIO>> {
        self.ensure_initialized()?;
        debug!("programming registers");

        self.cmd_with_data(Command::PowerOffSequenceSetting, &[0x00])
            .await?;
        // 0b11 << 6: 600x448, 0x2F: LUT from OTP, scan up and right, booster on, no soft reset
        // 0x08: 7 colour mode
        self.cmd_with_data(Command::PanelSetting, &[0xEF, 0x08])
            .await?;
        // 0x06 << 3 is undocumented, the low bits enable the internal DC/DC converters
        self.cmd_with_data(Command::PowerSetting, &[0x37, 0x00, 0x23, 0x23])
            .await?;
        self.cmd_with_data(Command::PllControl, &[0x1C]).await?;
        self.cmd_with_data(Command::TemperatureSensorEnable, &[0x00])
            .await?;
        self.update_vcom().await?;
        self.cmd_with_data(Command::TconSetting, &[0x22]).await?;
        self.cmd_with_data(Command::SpiFlashControl, &[0x00]).await?;
        self.cmd_with_data(Command::PowerSaving, &[0xAA]).await?;
        self.cmd_with_data(Command::PowerOffSequenceSetting, &[0x00])
            .await
    }

    /// Sends the resolution setting
    ///
    /// Not part of [reset_display](Uc8159::reset_display); the panel setting already selects
    /// the resolution.
    pub async fn set_resolution(&mut self) -> Result<(), DriverError<SPI, GPIO>> {
        self.ensure_initialized()?;
        self.cmd_with_data(Command::TconResolution, &[0x01, 0xF4, 0x01, 0xC0])
            .await
    }

    /// Runs a full paint cycle
    ///
    /// Initializes the driver if needed, programs the registers, transfers `buffer`
    /// (see [FrameBuffer::render](crate::graphics::FrameBuffer::render)) and refreshes the
    /// panel. A full refresh takes up to 32 seconds.
    pub async fn flush_buffer_to_display(
        &mut self,
        buffer: &[u8],
    ) -> Result<(), DriverError<SPI, GPIO>> {
        if buffer.len() != BUFFER_LEN {
            warn!(
                "frame has {} bytes, the panel expects {}",
                buffer.len(),
                BUFFER_LEN
            );
        }
        self.initialize().await?;
        self.reset_display().await?;

        debug!("transferring {} bytes", buffer.len());
        self.cmd_with_data(Command::DataStartTransmission1, buffer)
            .await?;

        self.interface.cmd(Command::PowerOn).await?;
        self.interface.wait_until_idle(POWER_ON_TIMEOUT).await?;

        // refresh; the datasheet lists DRF as 0x12 but this panel is triggered with 0x04
        self.interface.cmd(Command::PowerOn).await?;
        self.interface.wait_until_idle(REFRESH_TIMEOUT).await?;

        self.interface.cmd(Command::PowerOn).await?;
        self.interface.wait_until_idle(POWER_SETTLE_TIMEOUT).await?;
        debug!("refresh done");
        Ok(())
    }

    fn ensure_initialized(&self) -> Result<(), DriverError<SPI, GPIO>> {
        if self.initialized {
            Ok(())
        } else {
            Err(ErrorKind::Uninitialized)
        }
    }

    async fn cmd_with_data(
        &mut self,
        command: Command,
        data: &[u8],
    ) -> Result<(), DriverError<SPI, GPIO>> {
        self.interface.cmd_with_data(command, data).await
    }

    async fn update_vcom(&mut self) -> Result<(), DriverError<SPI, GPIO>> {
        let border = (self.border.to_byte() & 0b111) << 5;
        self.cmd_with_data(Command::VcomAndDataIntervalSetting, &[0x17 | border])
            .await
    }
}

impl<SPI, GPIO, WAIT> PanelDriver for Uc8159<SPI, GPIO, WAIT>
where
    SPI: SpiDevice,
    GPIO: GpioController,
    WAIT: BusyWait,
{
    type Error = DriverError<SPI, GPIO>;

    fn width(&self) -> u32 {
        WIDTH
    }

    fn height(&self) -> u32 {
        HEIGHT
    }

    async fn flush_buffer_to_display(&mut self, buffer: &[u8]) -> Result<(), Self::Error> {
        Uc8159::flush_buffer_to_display(self, buffer).await
    }
}
