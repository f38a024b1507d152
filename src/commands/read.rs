//! Read command implementation

use at24cxx_core::bus::I2cMaster;
use at24cxx_core::chip::EepromChip;
use at24cxx_core::eeprom::At24cxx;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Chunk size for reads, small enough for any i2c-dev transfer limit
const READ_CHUNK_SIZE: usize = 256;

/// Run the read command
pub fn run_read<M: I2cMaster + ?Sized>(
    master: &mut M,
    chip: EepromChip,
    address_bias: u8,
    output: &Path,
    start: u16,
    length: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let length = super::resolve_length(&chip, start, length)?;

    let mut eeprom = At24cxx::new(master, chip, address_bias);
    eeprom.init()?;

    let data = read_with_progress(&mut eeprom, start, length)?;

    let mut file = File::create(output)?;
    file.write_all(&data)?;
    println!("Wrote {} bytes to {:?}", data.len(), output);

    Ok(())
}

/// Read an address range in chunks, showing progress
pub fn read_with_progress<M: I2cMaster + ?Sized>(
    eeprom: &mut At24cxx<'_, M>,
    start: u16,
    length: usize,
) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let mut data = vec![0u8; length];

    let pb = ProgressBar::new(length as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})")?
            .progress_chars("#>-"),
    );

    let mut offset = 0usize;
    while offset < length {
        let chunk = std::cmp::min(READ_CHUNK_SIZE, length - offset);
        eeprom.read(start + offset as u16, &mut data[offset..offset + chunk])?;
        offset += chunk;
        pb.set_position(offset as u64);
    }
    pb.finish_and_clear();

    Ok(data)
}
