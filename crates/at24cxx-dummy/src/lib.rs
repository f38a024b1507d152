//! at24cxx-dummy - In-memory EEPROM emulator for testing
//!
//! This crate provides a dummy bus that emulates one AT24CXX chip in
//! memory. It's useful for testing and development without real hardware:
//! it models the device-address matching of the overflow-addressing parts,
//! wraps writes inside a page the way the silicon does, and records every
//! transaction so tests can assert the exact sequence a driver produced.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "alloc")]
use alloc::vec;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use at24cxx_core::bus::{I2cCommand, I2cMaster};
use at24cxx_core::chip::EepromChip;
use at24cxx_core::eeprom::BASE_DEVICE_ADDRESS;
use at24cxx_core::error::{Error, Result};

/// Dummy EEPROM device
///
/// Emulates a single chip on the bus. The device answers transactions only
/// when the active device address matches its own (ignoring the bits that
/// carry overflow address bits on the small parts), which makes a wrong
/// address bias show up as a transfer failure rather than silent success.
#[cfg(feature = "alloc")]
pub struct DummyEeprom {
    chip: EepromChip,
    base_address: u8,
    active_address: u8,
    data: Vec<u8>,
    address_selects: Vec<u8>,
    writes: Vec<(u8, u32, Vec<u8>)>,
    reads: Vec<(u8, u32, usize)>,
    delays_ms: Vec<u32>,
}

#[cfg(feature = "alloc")]
impl DummyEeprom {
    /// Create a dummy chip with address bias 0, memory erased to 0xFF
    pub fn new(chip: EepromChip) -> Self {
        Self::with_address_bias(chip, 0)
    }

    /// Create a dummy chip wired with the given A0-A2 bias
    pub fn with_address_bias(chip: EepromChip, address_bias: u8) -> Self {
        let data = vec![0xFF; chip.capacity as usize];
        Self {
            chip,
            base_address: BASE_DEVICE_ADDRESS | (address_bias & 0x07),
            active_address: 0,
            data,
            address_selects: Vec::new(),
            writes: Vec::new(),
            reads: Vec::new(),
            delays_ms: Vec::new(),
        }
    }

    /// Create a dummy chip with pre-filled contents
    pub fn with_data(chip: EepromChip, initial_data: &[u8]) -> Self {
        let mut eeprom = Self::new(chip);
        let len = core::cmp::min(initial_data.len(), eeprom.data.len());
        eeprom.data[..len].copy_from_slice(&initial_data[..len]);
        eeprom
    }

    /// Get a reference to the memory contents
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get a mutable reference to the memory contents
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Get the chip descriptor
    pub fn chip(&self) -> &EepromChip {
        &self.chip
    }

    /// Every device-address select seen, in order
    pub fn address_selects(&self) -> &[u8] {
        &self.address_selects
    }

    /// Every write transaction seen: (device address, memory address, data)
    pub fn writes(&self) -> &[(u8, u32, Vec<u8>)] {
        &self.writes
    }

    /// Every read transaction seen: (device address, memory address, length)
    pub fn reads(&self) -> &[(u8, u32, usize)] {
        &self.reads
    }

    /// Every delay requested, in milliseconds
    pub fn delays_ms(&self) -> &[u32] {
        &self.delays_ms
    }

    fn overflow_mask(&self) -> u8 {
        (1u8 << self.chip.overflow_bits) - 1
    }

    /// Whether the active device address selects this chip
    fn selected(&self) -> bool {
        if self.chip.uses_overflow_addressing() {
            let mask = self.overflow_mask();
            (self.active_address & !mask) == (self.base_address & !mask)
        } else {
            self.active_address == self.base_address
        }
    }

    /// Memory address for a transaction: register bits plus any high bits
    /// carried in the device address, wrapped to the array size
    fn memory_address(&self, register: u16) -> u32 {
        let mut address = register as u32;
        if self.chip.uses_overflow_addressing() {
            let high = (self.active_address & self.overflow_mask()) as u32;
            address |= high << 8;
        }
        address % self.chip.capacity
    }

    fn handle_write(&mut self, mem: u32, data: &[u8]) {
        // The device latches one page per transaction: bytes past the page
        // boundary wrap to the start of the page.
        let page = self.chip.page_size as u32;
        let page_base = mem - (mem % page);
        for (i, &byte) in data.iter().enumerate() {
            let dest = (page_base + ((mem % page) + i as u32) % page) % self.chip.capacity;
            self.data[dest as usize] = byte;
        }
        self.writes.push((self.active_address, mem, data.to_vec()));
    }

    fn handle_read(&mut self, mem: u32, buf: &mut [u8]) {
        // Sequential reads increment an internal counter that rolls over at
        // the end of the array.
        for (i, byte) in buf.iter_mut().enumerate() {
            *byte = self.data[((mem + i as u32) % self.chip.capacity) as usize];
        }
        self.reads.push((self.active_address, mem, buf.len()));
    }
}

#[cfg(feature = "alloc")]
impl I2cMaster for DummyEeprom {
    fn set_device_address(&mut self, address: u8) {
        self.active_address = address;
        self.address_selects.push(address);
    }

    fn execute(&mut self, cmd: &mut I2cCommand<'_>) -> Result<()> {
        if !self.selected() {
            log::debug!(
                "no ack: active address 0x{:02X}, chip at 0x{:02X}",
                self.active_address,
                self.base_address
            );
            return Err(Error::BusTransferFailed);
        }

        let mem = self.memory_address(cmd.register);
        if cmd.has_write() {
            self.handle_write(mem, cmd.write_data);
        } else {
            self.handle_read(mem, cmd.read_buf);
        }
        Ok(())
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays_ms.push(ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use at24cxx_core::chip::{AT24C02, AT24C04, AT24C08, AT24C512, AT24C64};
    use at24cxx_core::eeprom::At24cxx;

    #[test]
    fn roundtrip_across_page_boundaries() {
        let mut bus = DummyEeprom::new(AT24C02);
        let mut eeprom = At24cxx::new(&mut bus, AT24C02, 0);
        eeprom.init().unwrap();

        let data: Vec<u8> = (0..20).collect();
        eeprom.write(5, &data).unwrap();

        let mut readback = [0u8; 20];
        eeprom.read(5, &mut readback).unwrap();
        assert_eq!(readback.as_slice(), data.as_slice());

        assert_eq!(&bus.data()[5..25], data.as_slice());
    }

    #[test]
    fn long_write_on_two_byte_part_splits_and_lands() {
        let mut bus = DummyEeprom::new(AT24C64);
        let mut eeprom = At24cxx::new(&mut bus, AT24C64, 0);
        eeprom.init().unwrap();

        let data = [0x5Au8; 40];
        eeprom.write(100, &data).unwrap();

        let sizes: Vec<usize> = bus.writes().iter().map(|(_, _, d)| d.len()).collect();
        assert_eq!(sizes, vec![12, 16, 12]);
        assert_eq!(&bus.data()[100..140], &data[..]);
        assert_eq!(bus.delays_ms(), [5, 5, 5]);
    }

    #[test]
    fn overflow_part_write_crosses_block_boundary() {
        let mut bus = DummyEeprom::new(AT24C08);
        let mut eeprom = At24cxx::new(&mut bus, AT24C08, 0);
        eeprom.init().unwrap();

        eeprom.write(0x00FE, &[1, 2, 3, 4]).unwrap();

        // Second page transaction carries address bit 8 in the device address
        assert_eq!(bus.writes()[0].0, 0x50);
        assert_eq!(bus.writes()[1].0, 0x51);
        assert_eq!(&bus.data()[0x00FE..0x0102], &[1, 2, 3, 4]);
    }

    #[test]
    fn read_spanning_block_boundary_follows_internal_counter() {
        let mut initial = vec![0u8; 512];
        initial[0x00FF] = 0xAA;
        initial[0x0100] = 0xBB;
        let mut bus = DummyEeprom::with_data(AT24C04, &initial);
        let mut eeprom = At24cxx::new(&mut bus, AT24C04, 0);
        eeprom.init().unwrap();

        // One transaction with the starting block's device address; the
        // device's own address counter rolls into the next block
        let mut buf = [0u8; 2];
        eeprom.read(0x00FF, &mut buf).unwrap();
        assert_eq!(buf, [0xAA, 0xBB]);
        assert_eq!(bus.reads(), [(0x50, 0x00FF, 2)]);
    }

    #[test]
    fn wrong_address_bias_is_not_acknowledged() {
        let mut bus = DummyEeprom::with_address_bias(AT24C02, 1);
        let mut eeprom = At24cxx::new(&mut bus, AT24C02, 0);
        eeprom.init().unwrap();

        assert_eq!(eeprom.write_byte(0, 0x42), Err(Error::BusTransferFailed));
        assert!(bus.writes().is_empty());
    }

    #[test]
    fn matching_address_bias_is_acknowledged() {
        let mut bus = DummyEeprom::with_address_bias(AT24C02, 3);
        let mut eeprom = At24cxx::new(&mut bus, AT24C02, 3);
        eeprom.init().unwrap();

        eeprom.write_byte(7, 0x42).unwrap();
        assert_eq!(eeprom.read_byte(7).unwrap(), 0x42);
    }

    #[test]
    fn uninitialized_driver_touches_no_bus_state() {
        let mut bus = DummyEeprom::new(AT24C02);
        let mut eeprom = At24cxx::new(&mut bus, AT24C02, 0);

        assert_eq!(eeprom.write_byte(0, 1), Err(Error::NotInitialized));
        assert!(bus.address_selects().is_empty());
        assert!(bus.writes().is_empty());
    }

    #[test]
    fn string_survives_a_roundtrip() {
        let mut bus = DummyEeprom::new(AT24C512);
        let mut eeprom = At24cxx::new(&mut bus, AT24C512, 0);
        eeprom.init().unwrap();

        let message = "page splitting should be invisible to callers";
        eeprom.write_str(0x1234, message).unwrap();

        let mut buf = vec![0u8; message.len()];
        eeprom.read(0x1234, &mut buf).unwrap();
        assert_eq!(core::str::from_utf8(&buf).unwrap(), message);
    }

    #[test]
    fn misaligned_page_write_wraps_inside_the_page() {
        // Bypass the driver: a raw transaction that crosses a page boundary
        // wraps within the page, as on the real device
        let mut bus = DummyEeprom::new(AT24C02);
        bus.set_device_address(0x50);
        let mut cmd = I2cCommand::write_1b(6, &[1, 2, 3, 4]);
        bus.execute(&mut cmd).unwrap();

        assert_eq!(&bus.data()[6..8], &[1, 2]);
        // Remaining bytes wrapped to the start of the 8-byte page
        assert_eq!(&bus.data()[0..2], &[3, 4]);
    }
}
