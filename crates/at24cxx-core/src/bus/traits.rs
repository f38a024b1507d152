//! Bus and pin trait definitions
//!
//! These traits use `maybe_async` to support both sync and async modes.
//! - With the `is_sync` feature (default), traits are synchronous
//! - Without it, traits become async (suitable for Embassy, tokio, WASM)

use crate::error::Result;

use super::I2cCommand;
use maybe_async::maybe_async;

/// Two-wire bus master (sync or async depending on `is_sync` feature)
///
/// One shared bus may serve several devices; the driver selects the device
/// address it needs before each transaction. Implementations are not
/// expected to serialize concurrent users - that is the caller's job.
#[maybe_async(AFIT)]
pub trait I2cMaster {
    /// Select the 7-bit device address used by subsequent transactions
    fn set_device_address(&mut self, address: u8);

    /// Execute a single transaction
    ///
    /// For a write command, send the register address followed by
    /// `write_data` in one transfer. For a read command, send the register
    /// address, then read `read_buf.len()` bytes.
    async fn execute(&mut self, cmd: &mut I2cCommand<'_>) -> Result<()>;

    /// Block for the specified number of milliseconds
    async fn delay_ms(&mut self, ms: u32);
}

/// Control over the write-protect output pin
///
/// Driving the pin high blocks write transactions in hardware; the driver
/// never consults the pin state in software.
pub trait WriteProtectPin {
    /// Configure the pin as a digital output
    fn configure_output(&mut self) -> Result<()>;

    /// Drive the pin high (true) or low (false)
    fn set_level(&mut self, high: bool) -> Result<()>;
}

/// Placeholder pin type for drivers constructed without a write-protect pin
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPin;

impl WriteProtectPin for NoPin {
    fn configure_output(&mut self) -> Result<()> {
        Ok(())
    }

    fn set_level(&mut self, _high: bool) -> Result<()> {
        Ok(())
    }
}
