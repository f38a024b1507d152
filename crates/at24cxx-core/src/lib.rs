//! at24cxx-core - Core driver library for AT24CXX serial EEPROMs
//!
//! This crate provides a uniform byte-addressable read/write interface to the
//! AT24CXX family of two-wire serial EEPROMs. The chips are internally
//! organized in pages of varied sizes; the driver hides that arrangement so
//! arrays and strings of arbitrary length can be written to any address, and
//! handles the device-address encoding the smaller parts use for their high
//! address bits. It is designed to be `no_std` compatible for use in embedded
//! environments.
//!
//! # Features
//!
//! - `std` - Enable standard library support (runtime chip definition files)
//! - `is_sync` - Compile the driver as blocking/synchronous (default)
//!
//! # Example
//!
//! ```ignore
//! use at24cxx_core::{chip, eeprom::At24cxx};
//!
//! fn store_greeting<M: at24cxx_core::bus::I2cMaster>(bus: &mut M) {
//!     let mut eeprom = At24cxx::new(bus, chip::AT24C256, 0);
//!     eeprom.init().unwrap();
//!     eeprom.write_str(0x0000, "hello").unwrap();
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
// Allow async fn in traits - we use maybe-async for dual sync/async support
#![allow(async_fn_in_trait)]

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod bus;
pub mod chip;
pub mod eeprom;
pub mod error;

pub use error::{Error, Result};
