use bit_field::BitField;
use core::time::Duration;
use embedded_hal_async::spi::SpiDevice;
use log::{trace, warn};

use crate::error::{DriverError, ErrorKind};
use crate::gpio::{GpioController, PinConfig, PinMode, PinState};
use crate::traits::{BusyWait, Command};

/// The Connection Interface of the UC8159
///
/// Owns the SPI device, the GPIO controller and the busy waiter. Chip select is driven
/// through the GPIO controller, so the SPI device must not toggle a CS line itself.
pub(crate) struct DisplayInterface<SPI, GPIO, WAIT>
where
    GPIO: GpioController,
{
    spi: SPI,
    gpio: GPIO,
    waiter: WAIT,
    pins: PinConfig,
    /// Bit `i` is set while the `i`th pin of [Self::pin_table] is open
    opened: u8,
}

impl<SPI, GPIO, WAIT> DisplayInterface<SPI, GPIO, WAIT>
where
    GPIO: GpioController,
{
    /// Pins in the order they are opened, with their direction and initial level
    fn pin_table(&self) -> [(u8, PinMode, Option<PinState>); 4] {
        [
            (self.pins.chip_select, PinMode::Output, Some(PinState::High)),
            (self.pins.data_command, PinMode::Output, Some(PinState::Low)),
            (self.pins.reset, PinMode::Output, Some(PinState::High)),
            (self.pins.busy, PinMode::Input, None),
        ]
    }

    /// Closes every open pin, carrying on past failures
    ///
    /// Returns the first error encountered.
    pub(crate) fn close_pins(&mut self) -> Result<(), GPIO::Error> {
        let mut result = Ok(());
        for (i, (pin, _, _)) in self.pin_table().into_iter().enumerate() {
            if !self.opened.get_bit(i) {
                continue;
            }
            self.opened.set_bit(i, false);
            if let Err(err) = self.gpio.close_pin(pin) {
                warn!("failed to close pin {pin}: {err:?}");
                if result.is_ok() {
                    result = Err(err);
                }
            }
        }
        result
    }
}

impl<SPI, GPIO, WAIT> DisplayInterface<SPI, GPIO, WAIT>
where
    SPI: SpiDevice,
    GPIO: GpioController,
    WAIT: BusyWait,
{
    pub fn new(spi: SPI, gpio: GPIO, pins: PinConfig, waiter: WAIT) -> Self {
        DisplayInterface {
            spi,
            gpio,
            waiter,
            pins,
            opened: 0,
        }
    }

    pub fn pins(&self) -> &PinConfig {
        &self.pins
    }

    /// Opens all control pins and puts the outputs into their idle levels
    ///
    /// If a pin fails, every pin opened so far is closed again.
    pub(crate) fn open_pins(&mut self) -> Result<(), DriverError<SPI, GPIO>> {
        for (i, (pin, mode, level)) in self.pin_table().into_iter().enumerate() {
            if let Err(err) = self.open_pin(i, pin, mode, level) {
                let _ = self.close_pins();
                return Err(ErrorKind::GpioError(err));
            }
        }
        Ok(())
    }

    fn open_pin(
        &mut self,
        index: usize,
        pin: u8,
        mode: PinMode,
        level: Option<PinState>,
    ) -> Result<(), GPIO::Error> {
        self.gpio.open_pin(pin, mode)?;
        self.opened.set_bit(index, true);
        if let Some(level) = level {
            self.gpio.write(pin, level)?;
        }
        Ok(())
    }

    /// Basic function for sending [Commands](Command).
    ///
    /// Enables direct interaction with the device with the help of [data()](DisplayInterface::data())
    pub(crate) async fn cmd<T: Command>(
        &mut self,
        command: T,
    ) -> Result<(), DriverError<SPI, GPIO>> {
        self.frame(PinState::Low, &[command.address()]).await
    }

    /// Basic function for sending an array of u8-values of data over spi
    pub(crate) async fn data(&mut self, data: &[u8]) -> Result<(), DriverError<SPI, GPIO>> {
        self.frame(PinState::High, data).await
    }

    /// Basic function for sending [Commands](Command) and the data belonging to it.
    pub(crate) async fn cmd_with_data<T: Command>(
        &mut self,
        command: T,
        data: &[u8],
    ) -> Result<(), DriverError<SPI, GPIO>> {
        self.cmd(command).await?;
        self.data(data).await
    }

    /// One chip select framed transfer
    ///
    /// `dc` is low for commands and high for data. Chip select is released again
    /// even if the SPI transfer fails.
    pub(crate) async fn frame(
        &mut self,
        dc: PinState,
        data: &[u8],
    ) -> Result<(), DriverError<SPI, GPIO>> {
        if data.is_empty() {
            return Err(ErrorKind::EmptyFrame);
        }
        trace!(
            "{} frame, {} bytes",
            if dc == PinState::Low { "command" } else { "data" },
            data.len()
        );

        let cs = self.pins.chip_select;
        self.gpio
            .write(cs, PinState::Low)
            .map_err(ErrorKind::GpioError)?;
        if let Err(err) = self.gpio.write(self.pins.data_command, dc) {
            let _ = self.gpio.write(cs, PinState::High);
            return Err(ErrorKind::GpioError(err));
        }

        let transfer = self.write(data).await;
        let release = self
            .gpio
            .write(cs, PinState::High)
            .map_err(ErrorKind::GpioError);
        transfer.and(release)
    }

    // spi write helper/abstraction function
    async fn write(&mut self, data: &[u8]) -> Result<(), DriverError<SPI, GPIO>> {
        // transfer spi data
        // Be careful!! Linux has a default limit of 4096 bytes per spi transfer
        // see https://raspberrypi.stackexchange.com/questions/65595/spi-transfer-fails-with-buffer-size-greater-than-4096
        if cfg!(target_os = "linux") {
            for data_chunk in data.chunks(4096) {
                self.spi
                    .write(data_chunk)
                    .await
                    .map_err(ErrorKind::SpiError)?;
            }
            Ok(())
        } else {
            self.spi.write(data).await.map_err(ErrorKind::SpiError)
        }
    }

    /// Waits until device isn't busy anymore (busy == HIGH)
    pub(crate) async fn wait_until_idle(
        &mut self,
        timeout: Duration,
    ) -> Result<(), DriverError<SPI, GPIO>> {
        self.waiter
            .wait_for_ready(&mut self.gpio, self.pins.busy, timeout)
            .await
            .map_err(ErrorKind::from)
    }
}

impl<SPI, GPIO, WAIT> Drop for DisplayInterface<SPI, GPIO, WAIT>
where
    GPIO: GpioController,
{
    fn drop(&mut self) {
        let _ = self.close_pins();
    }
}
