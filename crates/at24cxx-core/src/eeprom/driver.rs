//! AT24CXX driver

use log::{debug, trace};
use maybe_async::maybe_async;

use super::operations;
use crate::bus::{AddressWidth, I2cCommand, I2cMaster, NoPin, WriteProtectPin};
use crate::chip::EepromChip;
use crate::error::{Error, Result};

/// Fixed upper bits of the 7-bit device address; the low three bits come
/// from the A0-A2 pins
pub const BASE_DEVICE_ADDRESS: u8 = 0x50;

/// Internal write-cycle time (datasheet maximum). The device does not
/// acknowledge further transactions until the cycle completes.
const WRITE_CYCLE_TIME_MS: u32 = 5;

/// Driver lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Constructed but not yet initialized; all operations fail
    Uninitialized,
    /// Initialized, no write-protect pin configured
    Active,
    /// Initialized with a write-protect pin driven as an output
    ActiveWithProtect,
}

/// AT24CXX EEPROM driver
///
/// Bound to one chip descriptor, one borrowed bus handle, and one device
/// address. The bus is not owned: it must outlive the driver, and callers
/// sharing it between devices are responsible for serializing access.
///
/// Operations fail with [`Error::NotInitialized`] until [`init`] has been
/// called.
///
/// [`init`]: At24cxx::init
pub struct At24cxx<'bus, M: ?Sized, P = NoPin> {
    bus: &'bus mut M,
    chip: EepromChip,
    device_address: u8,
    wp_pin: Option<P>,
    mode: Mode,
}

impl<'bus, M: I2cMaster + ?Sized> At24cxx<'bus, M, NoPin> {
    /// Create a driver without a write-protect pin
    ///
    /// `address_bias` is the 3-bit value wired on the A0-A2 pins; only its
    /// low three bits are used.
    pub fn new(bus: &'bus mut M, chip: EepromChip, address_bias: u8) -> Self {
        Self {
            bus,
            chip,
            device_address: BASE_DEVICE_ADDRESS | (address_bias & 0x07),
            wp_pin: None,
            mode: Mode::Uninitialized,
        }
    }
}

impl<'bus, M: I2cMaster + ?Sized, P: WriteProtectPin> At24cxx<'bus, M, P> {
    /// Create a driver with a write-protect pin
    pub fn with_write_protect(
        bus: &'bus mut M,
        chip: EepromChip,
        address_bias: u8,
        wp_pin: P,
    ) -> Self {
        Self {
            bus,
            chip,
            device_address: BASE_DEVICE_ADDRESS | (address_bias & 0x07),
            wp_pin: Some(wp_pin),
            mode: Mode::Uninitialized,
        }
    }

    /// Initialize the driver
    ///
    /// Bus-level setup belongs to the surrounding application; this only
    /// configures the write-protect pin when one was supplied, driving it
    /// low so writes are possible. May be called again to repeat the pin
    /// configuration.
    pub fn init(&mut self) -> Result<()> {
        match self.wp_pin.as_mut() {
            Some(pin) => {
                pin.configure_output()?;
                pin.set_level(false)?;
                self.mode = Mode::ActiveWithProtect;
            }
            None => self.mode = Mode::Active,
        }
        debug!(
            "eeprom at 0x{:02X} initialized ({:?}, {} bytes, {}-byte pages)",
            self.device_address, self.mode, self.chip.capacity, self.chip.page_size
        );
        Ok(())
    }

    /// Current lifecycle state
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The chip descriptor this driver was built with
    pub fn chip(&self) -> &EepromChip {
        &self.chip
    }

    /// The 7-bit device address before overflow-bit substitution
    pub fn device_address(&self) -> u8 {
        self.device_address
    }

    /// Assert the write-protect pin, blocking writes in hardware
    ///
    /// Does nothing unless the driver was initialized with a pin.
    pub fn set_write_protect(&mut self) -> Result<()> {
        self.drive_write_protect(true)
    }

    /// Release the write-protect pin
    ///
    /// Does nothing unless the driver was initialized with a pin.
    pub fn clear_write_protect(&mut self) -> Result<()> {
        self.drive_write_protect(false)
    }

    fn drive_write_protect(&mut self, high: bool) -> Result<()> {
        match self.mode {
            Mode::ActiveWithProtect => match self.wp_pin.as_mut() {
                Some(pin) => pin.set_level(high),
                None => Ok(()),
            },
            Mode::Uninitialized | Mode::Active => Ok(()),
        }
    }

    fn ensure_active(&self) -> Result<()> {
        match self.mode {
            Mode::Uninitialized => Err(Error::NotInitialized),
            Mode::Active | Mode::ActiveWithProtect => Ok(()),
        }
    }

    fn check_range(&self, address: u16, len: usize) -> Result<()> {
        if self.chip.is_valid_range(address, len) {
            Ok(())
        } else {
            Err(Error::AddressOutOfBounds)
        }
    }
}

#[maybe_async]
impl<'bus, M: I2cMaster + ?Sized, P: WriteProtectPin> At24cxx<'bus, M, P> {
    /// Write a byte sequence starting at `address`
    ///
    /// The write is split into page transactions so no transaction crosses
    /// an internal page boundary, and the driver blocks for the device's
    /// write-cycle time after each page. Nothing is sent unless the whole
    /// range fits the chip.
    pub async fn write(&mut self, address: u16, data: &[u8]) -> Result<()> {
        self.ensure_active()?;
        self.check_range(address, data.len())?;
        if data.is_empty() {
            return Ok(());
        }

        debug!(
            "writing {} bytes at 0x{:04X} in {} page transaction(s)",
            data.len(),
            address,
            operations::page_count(&self.chip, address, data.len())
        );

        self.bus.set_device_address(self.device_address);

        let mut sent = 0usize;
        for (start, len) in operations::page_chunks(&self.chip, address, data.len()) {
            if self.chip.uses_overflow_addressing() {
                let device = self.chip.device_address(self.device_address, start);
                self.bus.set_device_address(device);
            }

            trace!("page write: {} bytes at 0x{:04X}", len, start);
            let chunk = &data[sent..sent + len];
            match self.chip.address_width() {
                AddressWidth::OneByte => {
                    let mut cmd = I2cCommand::write_1b(start as u8, chunk);
                    self.bus.execute(&mut cmd).await?;
                }
                AddressWidth::TwoByte => {
                    let mut cmd = I2cCommand::write_2b(start, chunk);
                    self.bus.execute(&mut cmd).await?;
                }
            }
            sent += len;

            // Every page transaction starts an internal write cycle.
            self.bus.delay_ms(WRITE_CYCLE_TIME_MS).await;
        }

        Ok(())
    }

    /// Write a single byte
    pub async fn write_byte(&mut self, address: u16, value: u8) -> Result<()> {
        self.write(address, &[value]).await
    }

    /// Write a string's bytes starting at `address`
    pub async fn write_str(&mut self, address: u16, s: &str) -> Result<()> {
        self.write(address, s.as_bytes()).await
    }

    /// Read `buf.len()` bytes starting at `address`
    ///
    /// Issued as a single transaction. On parts with overflow addressing the
    /// device address is derived from `address` alone; a read spanning an
    /// address where the overflow bits change keeps that starting device
    /// address for the whole transfer, matching the device's own sequential
    /// address counter.
    pub async fn read(&mut self, address: u16, buf: &mut [u8]) -> Result<()> {
        self.ensure_active()?;
        self.check_range(address, buf.len())?;
        if buf.is_empty() {
            return Ok(());
        }

        trace!("reading {} bytes at 0x{:04X}", buf.len(), address);
        let device = self.chip.device_address(self.device_address, address);
        self.bus.set_device_address(device);

        match self.chip.address_width() {
            AddressWidth::OneByte => {
                let mut cmd = I2cCommand::read_1b(address as u8, buf);
                self.bus.execute(&mut cmd).await
            }
            AddressWidth::TwoByte => {
                let mut cmd = I2cCommand::read_2b(address, buf);
                self.bus.execute(&mut cmd).await
            }
        }
    }

    /// Read a single byte
    pub async fn read_byte(&mut self, address: u16) -> Result<u8> {
        let mut byte = [0u8; 1];
        self.read(address, &mut byte).await?;
        Ok(byte[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip::{AT24C02, AT24C04, AT24C08, AT24C64};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec;
    use std::vec::Vec;

    /// A mock bus that simulates one EEPROM in plain linear memory
    ///
    /// Records every device-address select, page write, read, and delay so
    /// tests can assert the exact transaction sequence. The memory model is
    /// deliberately simple: the register address indexes the array directly
    /// (overflow addressing is asserted through the recorded selects, and
    /// modeled fully by the at24cxx-dummy crate).
    struct MockBus {
        memory: Vec<u8>,
        device_address: u8,
        selects: Vec<u8>,
        writes: Vec<(u8, u16, Vec<u8>)>,
        reads: Vec<(u8, u16, usize)>,
        delays: Vec<u32>,
    }

    impl MockBus {
        fn new(size: usize) -> Self {
            Self {
                memory: vec![0xFF; size],
                device_address: 0,
                selects: Vec::new(),
                writes: Vec::new(),
                reads: Vec::new(),
                delays: Vec::new(),
            }
        }
    }

    impl I2cMaster for MockBus {
        fn set_device_address(&mut self, address: u8) {
            self.device_address = address;
            self.selects.push(address);
        }

        fn execute(&mut self, cmd: &mut I2cCommand<'_>) -> Result<()> {
            let addr = cmd.register as usize;
            if cmd.has_write() {
                self.writes
                    .push((self.device_address, cmd.register, cmd.write_data.to_vec()));
                if addr + cmd.write_data.len() <= self.memory.len() {
                    self.memory[addr..addr + cmd.write_data.len()].copy_from_slice(cmd.write_data);
                }
            } else {
                self.reads
                    .push((self.device_address, cmd.register, cmd.read_buf.len()));
                if addr + cmd.read_buf.len() <= self.memory.len() {
                    cmd.read_buf.copy_from_slice(&self.memory[addr..addr + cmd.read_buf.len()]);
                }
            }
            Ok(())
        }

        fn delay_ms(&mut self, ms: u32) {
            self.delays.push(ms);
        }
    }

    /// Write-protect pin that logs every operation
    #[derive(Clone)]
    struct MockPin {
        events: Rc<RefCell<Vec<&'static str>>>,
    }

    impl MockPin {
        fn new() -> Self {
            Self {
                events: Rc::new(RefCell::new(Vec::new())),
            }
        }
    }

    impl WriteProtectPin for MockPin {
        fn configure_output(&mut self) -> Result<()> {
            self.events.borrow_mut().push("output");
            Ok(())
        }

        fn set_level(&mut self, high: bool) -> Result<()> {
            self.events.borrow_mut().push(if high { "high" } else { "low" });
            Ok(())
        }
    }

    #[test]
    fn operations_fail_before_init() {
        let mut bus = MockBus::new(256);
        let mut eeprom = At24cxx::new(&mut bus, AT24C02, 0);

        assert_eq!(eeprom.write(0, &[1, 2, 3]), Err(Error::NotInitialized));
        let mut buf = [0u8; 4];
        assert_eq!(eeprom.read(0, &mut buf), Err(Error::NotInitialized));

        assert!(bus.selects.is_empty());
        assert!(bus.writes.is_empty());
        assert!(bus.reads.is_empty());
    }

    #[test]
    fn init_without_pin_activates() {
        let mut bus = MockBus::new(256);
        let mut eeprom = At24cxx::new(&mut bus, AT24C02, 0);
        assert_eq!(eeprom.mode(), Mode::Uninitialized);
        eeprom.init().unwrap();
        assert_eq!(eeprom.mode(), Mode::Active);
    }

    #[test]
    fn out_of_range_write_sends_nothing() {
        let mut bus = MockBus::new(256);
        let mut eeprom = At24cxx::new(&mut bus, AT24C02, 0);
        eeprom.init().unwrap();

        assert_eq!(eeprom.write(250, &[0u8; 7]), Err(Error::AddressOutOfBounds));
        assert_eq!(eeprom.write(0, &[0u8; 257]), Err(Error::AddressOutOfBounds));
        // address + len == capacity is the last valid combination
        assert!(eeprom.write(250, &[0u8; 6]).is_ok());

        assert_eq!(bus.writes.len(), 1);
    }

    #[test]
    fn out_of_range_read_sends_nothing() {
        let mut bus = MockBus::new(256);
        let mut eeprom = At24cxx::new(&mut bus, AT24C02, 0);
        eeprom.init().unwrap();

        let mut buf = [0u8; 8];
        assert_eq!(eeprom.read(250, &mut buf), Err(Error::AddressOutOfBounds));
        assert!(bus.reads.is_empty());
    }

    #[test]
    fn write_splits_on_page_boundaries() {
        let mut bus = MockBus::new(256);
        let mut eeprom = At24cxx::new(&mut bus, AT24C02, 0);
        eeprom.init().unwrap();

        let data: Vec<u8> = (0..10).collect();
        eeprom.write(5, &data).unwrap();

        assert_eq!(bus.writes.len(), 2);
        assert_eq!(bus.writes[0], (0x50, 5, vec![0, 1, 2]));
        assert_eq!(bus.writes[1], (0x50, 8, vec![3, 4, 5, 6, 7, 8, 9]));
    }

    #[test]
    fn write_cycle_delay_follows_every_page() {
        let mut bus = MockBus::new(256);
        let mut eeprom = At24cxx::new(&mut bus, AT24C02, 0);
        eeprom.init().unwrap();

        eeprom.write(5, &[0u8; 10]).unwrap();
        assert_eq!(bus.delays, vec![5, 5]);
    }

    #[test]
    fn long_write_on_two_byte_part_uses_limited_pages() {
        let mut bus = MockBus::new(8192);
        let mut eeprom = At24cxx::new(&mut bus, AT24C64, 0);
        eeprom.init().unwrap();

        eeprom.write(0, &[0xAA; 40]).unwrap();

        let sizes: Vec<usize> = bus.writes.iter().map(|(_, _, d)| d.len()).collect();
        assert_eq!(sizes, vec![16, 16, 8]);
    }

    #[test]
    fn overflow_part_reselects_device_across_block_boundary() {
        let mut bus = MockBus::new(1024);
        let mut eeprom = At24cxx::new(&mut bus, AT24C08, 0);
        eeprom.init().unwrap();

        // 16-byte pages: 0x00FE..0x0102 splits at 0x0100, where address
        // bit 8 moves into the device address and the register byte
        // restarts at zero
        eeprom.write(0x00FE, &[1, 2, 3, 4]).unwrap();

        assert_eq!(bus.writes.len(), 2);
        assert_eq!(bus.writes[0], (0x50, 0x00FE, vec![1, 2]));
        assert_eq!(bus.writes[1], (0x51, 0x0000, vec![3, 4]));
    }

    #[test]
    fn read_is_a_single_transaction() {
        let mut bus = MockBus::new(256);
        bus.memory[10..14].copy_from_slice(&[9, 8, 7, 6]);
        let mut eeprom = At24cxx::new(&mut bus, AT24C02, 0);
        eeprom.init().unwrap();

        let mut buf = [0u8; 4];
        eeprom.read(10, &mut buf).unwrap();
        assert_eq!(buf, [9, 8, 7, 6]);
        assert_eq!(bus.reads, vec![(0x50, 10, 4)]);
    }

    #[test]
    fn read_derives_device_address_from_start() {
        let mut bus = MockBus::new(512);
        let mut eeprom = At24cxx::new(&mut bus, AT24C04, 0);
        eeprom.init().unwrap();

        let mut buf = [0u8; 2];
        eeprom.read(0x01F0, &mut buf).unwrap();
        // Address bit 8 selects device 0x51; only the low byte goes on the
        // wire as the register
        assert_eq!(bus.reads, vec![(0x51, 0x00F0, 2)]);
    }

    #[test]
    fn address_bias_lands_in_device_address() {
        let mut bus = MockBus::new(256);
        let mut eeprom = At24cxx::new(&mut bus, AT24C02, 0b101);
        assert_eq!(eeprom.device_address(), 0x55);
        eeprom.init().unwrap();
        eeprom.write_byte(0, 0x42).unwrap();
        assert_eq!(bus.writes[0].0, 0x55);
    }

    #[test]
    fn byte_and_string_roundtrip() {
        let mut bus = MockBus::new(256);
        let mut eeprom = At24cxx::new(&mut bus, AT24C02, 0);
        eeprom.init().unwrap();

        eeprom.write_byte(40, 0x5A).unwrap();
        assert_eq!(eeprom.read_byte(40).unwrap(), 0x5A);

        eeprom.write_str(100, "hello").unwrap();
        let mut buf = [0u8; 5];
        eeprom.read(100, &mut buf).unwrap();
        assert_eq!(&buf, b"hello");
    }

    #[test]
    fn zero_length_operations_send_nothing() {
        let mut bus = MockBus::new(256);
        let mut eeprom = At24cxx::new(&mut bus, AT24C02, 0);
        eeprom.init().unwrap();

        eeprom.write(10, &[]).unwrap();
        let mut empty: [u8; 0] = [];
        eeprom.read(10, &mut empty).unwrap();

        assert!(bus.writes.is_empty());
        assert!(bus.reads.is_empty());
        assert!(bus.selects.is_empty());
    }

    #[test]
    fn write_protect_without_pin_is_a_no_op() {
        let mut bus = MockBus::new(256);
        let mut eeprom = At24cxx::new(&mut bus, AT24C02, 0);
        eeprom.init().unwrap();

        assert!(eeprom.set_write_protect().is_ok());
        assert!(eeprom.clear_write_protect().is_ok());
        assert_eq!(eeprom.mode(), Mode::Active);
    }

    #[test]
    fn write_protect_drives_the_pin() {
        let mut bus = MockBus::new(256);
        let pin = MockPin::new();
        let events = pin.events.clone();
        let mut eeprom = At24cxx::with_write_protect(&mut bus, AT24C02, 0, pin);

        // Nothing happens before init
        eeprom.set_write_protect().unwrap();
        assert!(events.borrow().is_empty());

        eeprom.init().unwrap();
        assert_eq!(eeprom.mode(), Mode::ActiveWithProtect);
        assert_eq!(*events.borrow(), ["output", "low"]);

        eeprom.set_write_protect().unwrap();
        eeprom.clear_write_protect().unwrap();
        assert_eq!(*events.borrow(), ["output", "low", "high", "low"]);
    }

    #[test]
    fn reinit_repeats_pin_configuration() {
        let mut bus = MockBus::new(256);
        let pin = MockPin::new();
        let events = pin.events.clone();
        let mut eeprom = At24cxx::with_write_protect(&mut bus, AT24C02, 0, pin);

        eeprom.init().unwrap();
        eeprom.init().unwrap();
        assert_eq!(*events.borrow(), ["output", "low", "output", "low"]);
    }

    #[test]
    fn full_capacity_write_covers_every_page() {
        let mut bus = MockBus::new(256);
        let mut eeprom = At24cxx::new(&mut bus, AT24C02, 0);
        eeprom.init().unwrap();

        let data: Vec<u8> = (0..=255).collect();
        eeprom.write(0, &data).unwrap();

        assert_eq!(bus.writes.len(), 32);
        assert_eq!(bus.memory, data);
    }
}
