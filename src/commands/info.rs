//! Chip information commands

use at24cxx_core::chip::{EepromChip, EepromDatabase};
use at24cxx_core::eeprom::BASE_DEVICE_ADDRESS;

/// Run the info command
pub fn run_info(name: &str, chip: EepromChip, address_bias: u8) {
    let device_address = BASE_DEVICE_ADDRESS | (address_bias & 0x07);
    println!("Chip:           {}", name);
    println!("Capacity:       {} bytes", chip.capacity);
    println!("Page size:      {} bytes", chip.page_size);
    println!("Address bytes:  {}", chip.address_bytes);
    println!("Overflow bits:  {}", chip.overflow_bits);
    println!("Device address: 0x{:02X}", device_address);
    if chip.uses_overflow_addressing() {
        let span = 1u8 << chip.overflow_bits;
        println!(
            "                (responds on 0x{:02X}..=0x{:02X}; high address bits ride in the device address)",
            device_address & !(span - 1),
            (device_address & !(span - 1)) + span - 1
        );
    }
}

/// Run the list-chips command
pub fn run_list_chips(db: &EepromDatabase) {
    println!(
        "{:<12} {:>10} {:>10} {:>12} {:>14}",
        "NAME", "SIZE", "PAGE", "ADDR BYTES", "OVERFLOW BITS"
    );
    for (name, chip) in db.iter() {
        println!(
            "{:<12} {:>10} {:>10} {:>12} {:>14}",
            name, chip.capacity, chip.page_size, chip.address_bytes, chip.overflow_bits
        );
    }
}
