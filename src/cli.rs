//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parse a string as a hex or decimal u16
fn parse_hex_u16(s: &str) -> Result<u16, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u16>().map_err(|e| format!("Invalid number: {}", e))
    }
}

/// Parse a string as a hex or decimal u32
fn parse_hex_u32(s: &str) -> Result<u32, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u32>().map_err(|e| format!("Invalid number: {}", e))
    }
}

/// Parse a string as a hex or decimal u8
fn parse_hex_u8(s: &str) -> Result<u8, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u8::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u8>().map_err(|e| format!("Invalid number: {}", e))
    }
}

#[derive(Parser)]
#[command(name = "at24cxx")]
#[command(author, version, about = "AT24CXX serial EEPROM programmer", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Bus to use: "dummy" or an i2c-dev path like /dev/i2c-1
    #[arg(short, long, global = true, default_value = "dummy")]
    pub bus: String,

    /// Chip name, e.g. at24c256 (see list-chips)
    #[arg(short, long, global = true, default_value = "at24c256")]
    pub chip: String,

    /// Address bias wired on the A0-A2 pins
    #[arg(short = 'a', long, global = true, default_value_t = 0,
          value_parser = clap::value_parser!(u8).range(0..=7))]
    pub address_bias: u8,

    /// Path to a directory with extra chip definitions (.ron files)
    /// Defaults to looking in ./chips/
    #[arg(long, global = true)]
    pub chip_db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read EEPROM contents to a file
    Read {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Start address (hex or decimal)
        #[arg(long, value_parser = parse_hex_u16, default_value = "0")]
        start: u16,

        /// Number of bytes (defaults to the rest of the chip)
        #[arg(long, value_parser = parse_hex_u32)]
        length: Option<u32>,
    },

    /// Write a file to the EEPROM
    Write {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Start address (hex or decimal)
        #[arg(long, value_parser = parse_hex_u16, default_value = "0")]
        start: u16,

        /// Verify after writing
        #[arg(long, default_value = "true")]
        verify: bool,
    },

    /// Fill an address range with one byte value
    Fill {
        /// Byte value to fill with
        #[arg(long, value_parser = parse_hex_u8, default_value = "0xFF")]
        value: u8,

        /// Start address (hex or decimal)
        #[arg(long, value_parser = parse_hex_u16, default_value = "0")]
        start: u16,

        /// Number of bytes (defaults to the rest of the chip)
        #[arg(long, value_parser = parse_hex_u32)]
        length: Option<u32>,
    },

    /// Verify EEPROM contents against a file
    Verify {
        /// Input file path to verify against
        #[arg(short, long)]
        input: PathBuf,

        /// Start address (hex or decimal)
        #[arg(long, value_parser = parse_hex_u16, default_value = "0")]
        start: u16,
    },

    /// Show chip information
    Info,

    /// List supported chips
    ListChips,
}
