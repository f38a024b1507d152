//! Transport selection
//!
//! Maps the `--bus` argument onto an opened bus. All transports end up in
//! one enum so the command implementations can stay generic over a single
//! `I2cMaster` value.

use at24cxx_core::bus::{I2cCommand, I2cMaster};
use at24cxx_core::chip::EepromChip;
use at24cxx_core::error::Result as CoreResult;
use at24cxx_dummy::DummyEeprom;
use at24cxx_linux_i2c::LinuxI2c;

/// An opened bus, selected from the CLI `--bus` argument
pub enum Transport {
    /// In-memory dummy chip
    Dummy(DummyEeprom),
    /// Linux i2c-dev device
    I2cDev(LinuxI2c),
}

/// Open the bus named by `spec`
///
/// `"dummy"` opens an in-memory chip matching the selected descriptor and
/// bias; anything else is treated as an i2c-dev path.
pub fn open_transport(
    spec: &str,
    chip: EepromChip,
    address_bias: u8,
) -> Result<Transport, Box<dyn std::error::Error>> {
    if spec == "dummy" {
        log::info!("using in-memory dummy chip");
        Ok(Transport::Dummy(DummyEeprom::with_address_bias(
            chip,
            address_bias,
        )))
    } else {
        log::info!("using i2c-dev device {}", spec);
        Ok(Transport::I2cDev(LinuxI2c::open(spec)?))
    }
}

impl I2cMaster for Transport {
    fn set_device_address(&mut self, address: u8) {
        match self {
            Transport::Dummy(bus) => bus.set_device_address(address),
            Transport::I2cDev(bus) => bus.set_device_address(address),
        }
    }

    fn execute(&mut self, cmd: &mut I2cCommand<'_>) -> CoreResult<()> {
        match self {
            Transport::Dummy(bus) => bus.execute(cmd),
            Transport::I2cDev(bus) => bus.execute(cmd),
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        match self {
            Transport::Dummy(bus) => bus.delay_ms(ms),
            Transport::I2cDev(bus) => bus.delay_ms(ms),
        }
    }
}
