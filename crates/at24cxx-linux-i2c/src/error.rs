//! Error types for the Linux i2c-dev transport

use std::io;
use thiserror::Error;

/// Errors from opening or configuring an i2c-dev device
#[derive(Debug, Error)]
pub enum LinuxI2cError {
    /// Failed to open the device node
    #[error("failed to open {path}: {source}")]
    Open {
        /// Device path that was attempted
        path: String,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The I2C_SLAVE ioctl was rejected
    #[error("failed to select device address 0x{address:02X}: {source}")]
    SetAddress {
        /// 7-bit device address
        address: u8,
        /// Underlying I/O error
        source: io::Error,
    },

    /// I/O error during a transfer
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
