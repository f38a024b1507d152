//! Error types for at24cxx-core
//!
//! This module provides a no_std compatible error type that can be used
//! throughout the crate.

use core::fmt;

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Operation attempted before the driver was initialized
    NotInitialized,
    /// Requested address range extends past the end of the chip
    AddressOutOfBounds,
    /// Bus transaction failed (device did not acknowledge, transfer error)
    BusTransferFailed,
    /// Write-protect pin operation failed
    PinFailed,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "driver not initialized"),
            Self::AddressOutOfBounds => write!(f, "address out of bounds"),
            Self::BusTransferFailed => write!(f, "bus transfer failed"),
            Self::PinFailed => write!(f, "write-protect pin operation failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
