//! Write and fill command implementations

use at24cxx_core::bus::I2cMaster;
use at24cxx_core::chip::EepromChip;
use at24cxx_core::eeprom::At24cxx;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::Path;

use super::read::read_with_progress;
use super::verify::compare;

/// Bytes handed to the driver per call; the driver splits further into
/// pages, this only controls progress granularity
const WRITE_CHUNK_SIZE: usize = 256;

/// Run the write command
pub fn run_write<M: I2cMaster + ?Sized>(
    master: &mut M,
    chip: EepromChip,
    address_bias: u8,
    input: &Path,
    start: u16,
    verify: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    super::resolve_length(&chip, start, Some(data.len() as u32))?;

    let mut eeprom = At24cxx::new(master, chip, address_bias);
    eeprom.init()?;

    write_with_progress(&mut eeprom, start, &data)?;
    println!("Wrote {} bytes from {:?}", data.len(), input);

    if verify {
        let readback = read_with_progress(&mut eeprom, start, data.len())?;
        compare(&data, &readback, start)?;
        println!("Verify OK");
    }

    Ok(())
}

/// Run the fill command
pub fn run_fill<M: I2cMaster + ?Sized>(
    master: &mut M,
    chip: EepromChip,
    address_bias: u8,
    value: u8,
    start: u16,
    length: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let length = super::resolve_length(&chip, start, length)?;
    let data = vec![value; length];

    let mut eeprom = At24cxx::new(master, chip, address_bias);
    eeprom.init()?;

    write_with_progress(&mut eeprom, start, &data)?;
    println!("Filled {} bytes at 0x{:04X} with 0x{:02X}", length, start, value);

    Ok(())
}

/// Write a byte sequence in chunks, showing progress
///
/// Writes are slow (5 ms of write-cycle time per page), so even the small
/// parts benefit from a bar.
fn write_with_progress<M: I2cMaster + ?Sized>(
    eeprom: &mut At24cxx<'_, M>,
    start: u16,
    data: &[u8],
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = ProgressBar::new(data.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})")?
            .progress_chars("#>-"),
    );

    let mut offset = 0usize;
    while offset < data.len() {
        let chunk = std::cmp::min(WRITE_CHUNK_SIZE, data.len() - offset);
        eeprom.write(start + offset as u16, &data[offset..offset + chunk])?;
        offset += chunk;
        pb.set_position(offset as u64);
    }
    pb.finish_and_clear();

    Ok(())
}
