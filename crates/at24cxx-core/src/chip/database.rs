//! Chip database for runtime loading and lookup
//!
//! The built-in parts table covers the stock family; boards with compatible
//! third-party parts can describe them in RON files instead of patching the
//! crate. A definition file maps part names to descriptors:
//!
//! ```ron
//! {
//!     "M24C32": (capacity: KiB(4), page_size: 32, address_bytes: 2),
//! }
//! ```

use std::collections::BTreeMap;
use std::format;
use std::fs;
use std::io;
use std::path::Path;
use std::string::{String, ToString};
use std::vec::Vec;

use super::parts::PARTS;
use super::types::EepromChip;

/// Error type for chip database operations
#[derive(Debug)]
pub enum ChipDbError {
    /// I/O error reading files
    Io(io::Error),
    /// RON parsing error
    Parse(ron::error::SpannedError),
    /// Validation error
    Validation(String),
}

impl From<io::Error> for ChipDbError {
    fn from(e: io::Error) -> Self {
        ChipDbError::Io(e)
    }
}

impl From<ron::error::SpannedError> for ChipDbError {
    fn from(e: ron::error::SpannedError) -> Self {
        ChipDbError::Parse(e)
    }
}

impl std::fmt::Display for ChipDbError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChipDbError::Io(e) => write!(f, "I/O error: {}", e),
            ChipDbError::Parse(e) => write!(f, "Parse error: {}", e),
            ChipDbError::Validation(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ChipDbError {}

/// Size specification with human-readable units (for RON parsing)
#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub enum Size {
    /// Size in bytes
    B(u32),
    /// Size in kibibytes (1024 bytes)
    KiB(u32),
}

impl Size {
    /// Convert to bytes
    pub fn to_bytes(self) -> u32 {
        match self {
            Size::B(n) => n,
            Size::KiB(n) => n * 1024,
        }
    }
}

/// Chip definition as written in a RON file
#[derive(Debug, Clone, Copy, serde::Deserialize)]
struct EepromDef {
    capacity: Size,
    page_size: u16,
    address_bytes: u8,
    #[serde(default)]
    overflow_bits: u8,
}

impl From<EepromDef> for EepromChip {
    fn from(def: EepromDef) -> Self {
        EepromChip::new(
            def.capacity.to_bytes(),
            def.page_size,
            def.address_bytes,
            def.overflow_bits,
        )
    }
}

/// Database of chip definitions
///
/// Holds the built-in parts plus any definitions loaded at runtime. Lookups
/// are case-insensitive; definitions loaded later shadow earlier ones, so a
/// file can override a built-in part.
#[derive(Debug, Default)]
pub struct EepromDatabase {
    chips: Vec<(String, EepromChip)>,
}

impl EepromDatabase {
    /// Create an empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a database seeded with the built-in parts table
    pub fn builtin() -> Self {
        let chips = PARTS
            .iter()
            .map(|(name, chip)| (name.to_string(), *chip))
            .collect();
        Self { chips }
    }

    /// Add a single definition
    pub fn add(&mut self, name: &str, chip: EepromChip) -> Result<(), ChipDbError> {
        chip.validate()
            .map_err(|msg| ChipDbError::Validation(format!("{}: {}", name, msg)))?;
        self.chips.push((name.to_string(), chip));
        Ok(())
    }

    /// Parse RON definitions and add them, returning how many were added
    pub fn load_str(&mut self, source: &str) -> Result<usize, ChipDbError> {
        let defs: BTreeMap<String, EepromDef> = ron::from_str(source)?;
        let count = defs.len();
        for (name, def) in defs {
            let chip = EepromChip::from(def);
            chip.validate()
                .map_err(|msg| ChipDbError::Validation(format!("{}: {}", name, msg)))?;
            self.chips.push((name, chip));
        }
        Ok(count)
    }

    /// Load definitions from a single RON file
    pub fn load_file(&mut self, path: &Path) -> Result<usize, ChipDbError> {
        let source = fs::read_to_string(path)?;
        self.load_str(&source)
    }

    /// Load every `.ron` file in a directory, returning the total added
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, ChipDbError> {
        let mut count = 0;
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "ron") {
                count += self.load_file(&path)?;
            }
        }
        Ok(count)
    }

    /// Look up a chip by name, case-insensitively
    pub fn find(&self, name: &str) -> Option<EepromChip> {
        self.chips
            .iter()
            .rev()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, chip)| *chip)
    }

    /// Number of definitions
    pub fn len(&self) -> usize {
        self.chips.len()
    }

    /// Whether the database holds no definitions
    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }

    /// Iterate over all definitions in load order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EepromChip)> {
        self.chips.iter().map(|(name, chip)| (name.as_str(), chip))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_database_resolves_parts() {
        let db = EepromDatabase::builtin();
        assert_eq!(db.len(), PARTS.len());
        assert_eq!(db.find("at24c64"), Some(super::super::AT24C64));
        assert_eq!(db.find("no-such-part"), None);
    }

    #[test]
    fn load_str_parses_and_validates() {
        let mut db = EepromDatabase::new();
        let added = db
            .load_str(
                r#"{
                    "M24C32": (capacity: KiB(4), page_size: 32, address_bytes: 2),
                    "BR24T01": (capacity: B(128), page_size: 8, address_bytes: 1),
                }"#,
            )
            .unwrap();
        assert_eq!(added, 2);
        let chip = db.find("m24c32").unwrap();
        assert_eq!(chip.capacity, 4096);
        assert_eq!(chip.page_size, 32);
        assert_eq!(chip.overflow_bits, 0);
    }

    #[test]
    fn later_definitions_shadow_builtins() {
        let mut db = EepromDatabase::builtin();
        db.load_str(r#"{ "AT24C02": (capacity: B(256), page_size: 16, address_bytes: 1) }"#)
            .unwrap();
        assert_eq!(db.find("AT24C02").unwrap().page_size, 16);
    }

    #[test]
    fn invalid_definition_is_rejected() {
        let mut db = EepromDatabase::new();
        let err = db
            .load_str(r#"{ "BAD": (capacity: KiB(128), page_size: 32, address_bytes: 2) }"#)
            .unwrap_err();
        assert!(matches!(err, ChipDbError::Validation(_)));
    }

    #[test]
    fn malformed_ron_is_a_parse_error() {
        let mut db = EepromDatabase::new();
        let err = db.load_str("{ not ron").unwrap_err();
        assert!(matches!(err, ChipDbError::Parse(_)));
    }
}
