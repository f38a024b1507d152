//! Command implementations

pub mod info;
pub mod read;
pub mod verify;
pub mod write;

use at24cxx_core::chip::EepromChip;

/// Resolve an optional length to a concrete byte count
///
/// Defaults to the rest of the chip and rejects ranges that spill past it,
/// so commands can report a friendly error before touching the bus.
pub fn resolve_length(
    chip: &EepromChip,
    start: u16,
    length: Option<u32>,
) -> Result<usize, String> {
    let remaining = chip.capacity.saturating_sub(start as u32);
    let length = length.unwrap_or(remaining);
    if length > remaining {
        return Err(format!(
            "range 0x{:04X}+{} extends past the {}-byte chip",
            start, length, chip.capacity
        ));
    }
    Ok(length as usize)
}
