//! Two-wire bus abstraction
//!
//! This module provides the transaction type and the traits the driver
//! consumes for bus access and write-protect pin control. The bus protocol
//! itself (start/stop/ack framing) is entirely the transport's business.

mod command;
mod traits;

pub use command::{AddressWidth, I2cCommand};
pub use traits::{I2cMaster, NoPin, WriteProtectPin};
