//! at24cxx-linux-i2c - Linux i2c-dev transport
//!
//! Implements the bus trait over the kernel's `/dev/i2c-N` character
//! devices. Register writes go out as a single `write(2)` of address bytes
//! plus data; register reads are an address-byte write followed by a
//! `read(2)`, which matches the EEPROM's current-address read behavior.

mod device;
mod error;

pub use device::LinuxI2c;
pub use error::LinuxI2cError;
