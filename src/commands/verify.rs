//! Verify command implementation

use at24cxx_core::bus::I2cMaster;
use at24cxx_core::chip::EepromChip;
use at24cxx_core::eeprom::At24cxx;
use std::fs;
use std::path::Path;

use super::read::read_with_progress;

/// Run the verify command
pub fn run_verify<M: I2cMaster + ?Sized>(
    master: &mut M,
    chip: EepromChip,
    address_bias: u8,
    input: &Path,
    start: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    super::resolve_length(&chip, start, Some(data.len() as u32))?;

    let mut eeprom = At24cxx::new(master, chip, address_bias);
    eeprom.init()?;

    let readback = read_with_progress(&mut eeprom, start, data.len())?;
    compare(&data, &readback, start)?;
    println!("Verify OK: {} bytes match", data.len());

    Ok(())
}

/// Compare expected against actual contents, reporting the first mismatch
pub fn compare(
    expected: &[u8],
    actual: &[u8],
    start: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    for (i, (e, a)) in expected.iter().zip(actual.iter()).enumerate() {
        if e != a {
            return Err(format!(
                "mismatch at 0x{:04X}: expected 0x{:02X}, found 0x{:02X}",
                start as usize + i,
                e,
                a
            )
            .into());
        }
    }
    Ok(())
}
