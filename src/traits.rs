use core::time::Duration;

use crate::gpio::GpioController;
use crate::wait::WaitError;

/// All commands need to have this trait which gives the address of the command
/// which needs to be send via SPI with activated CommandsPin (Data/Command Pin in CommandMode)
pub(crate) trait Command: Copy {
    fn address(self) -> u8;
}

/// Blocks until the controller releases its busy line
///
/// [BusyWaiter](crate::wait::BusyWaiter) is the polling implementation used on real hardware.
pub trait BusyWait {
    /// Waits until `pin` reads high or `timeout` has elapsed
    async fn wait_for_ready<G: GpioController>(
        &mut self,
        gpio: &mut G,
        pin: u8,
        timeout: Duration,
    ) -> Result<(), WaitError<G::Error>>;
}

/// A panel that can show a packed frame
///
/// Implemented by [Uc8159](crate::uc8159::Uc8159); [FrameBuffer](crate::graphics::FrameBuffer)
/// renders into any implementor.
pub trait PanelDriver {
    /// Error of the whole paint cycle
    type Error;

    /// Get the width of the display
    fn width(&self) -> u32;

    /// Get the height of the display
    fn height(&self) -> u32;

    /// Runs a full paint cycle with an already packed frame
    ///
    /// This function waits until the device isn`t busy anymore
    async fn flush_buffer_to_display(&mut self, buffer: &[u8]) -> Result<(), Self::Error>;
}
