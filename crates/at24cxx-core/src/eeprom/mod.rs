//! EEPROM driver and write planning
//!
//! This module provides the stateful driver bound to one chip and one bus,
//! plus the pure page-splitting helpers it is built on.

mod driver;
mod operations;

pub use driver::{At24cxx, Mode, BASE_DEVICE_ADDRESS};
pub use operations::*;
