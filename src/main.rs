//! at24cxx - AT24CXX serial EEPROM programmer
//!
//! Reads, writes and verifies AT24CXX family EEPROMs over a selectable
//! transport:
//! - **i2c-dev** - a real chip behind `/dev/i2c-N`
//! - **dummy** - an in-memory chip emulator, for trying commands without
//!   hardware
//!
//! The page splitting, device addressing and write-cycle pacing all live in
//! `at24cxx-core`; this binary only moves bytes between files and the
//! driver.

mod cli;
mod commands;
mod transport;

use clap::Parser;
use cli::{Cli, Commands};

use at24cxx_core::chip::{EepromChip, EepromDatabase};
use transport::open_transport;

use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Log level from verbosity; RUST_LOG still wins when set
    let default_filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    // Load chip database
    let db = match load_chip_database(cli.chip_db.as_deref()) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to load chip database: {}", e);
            std::process::exit(1);
        }
    };

    log::debug!("Loaded {} chip definitions", db.len());

    match cli.command {
        Commands::Read {
            output,
            start,
            length,
        } => {
            let chip = resolve_chip(&db, &cli.chip)?;
            let mut bus = open_transport(&cli.bus, chip, cli.address_bias)?;
            commands::read::run_read(&mut bus, chip, cli.address_bias, &output, start, length)
        }
        Commands::Write {
            input,
            start,
            verify,
        } => {
            let chip = resolve_chip(&db, &cli.chip)?;
            let mut bus = open_transport(&cli.bus, chip, cli.address_bias)?;
            commands::write::run_write(&mut bus, chip, cli.address_bias, &input, start, verify)
        }
        Commands::Fill {
            value,
            start,
            length,
        } => {
            let chip = resolve_chip(&db, &cli.chip)?;
            let mut bus = open_transport(&cli.bus, chip, cli.address_bias)?;
            commands::write::run_fill(&mut bus, chip, cli.address_bias, value, start, length)
        }
        Commands::Verify { input, start } => {
            let chip = resolve_chip(&db, &cli.chip)?;
            let mut bus = open_transport(&cli.bus, chip, cli.address_bias)?;
            commands::verify::run_verify(&mut bus, chip, cli.address_bias, &input, start)
        }
        Commands::Info => {
            let chip = resolve_chip(&db, &cli.chip)?;
            commands::info::run_info(&cli.chip, chip, cli.address_bias);
            Ok(())
        }
        Commands::ListChips => {
            commands::info::run_list_chips(&db);
            Ok(())
        }
    }
}

/// Look up the selected chip, with a hint on failure
fn resolve_chip(
    db: &EepromDatabase,
    name: &str,
) -> Result<EepromChip, Box<dyn std::error::Error>> {
    db.find(name)
        .ok_or_else(|| format!("unknown chip {:?} (see list-chips)", name).into())
}

/// Build the chip database: built-in parts plus any definition files
fn load_chip_database(dir: Option<&Path>) -> Result<EepromDatabase, Box<dyn std::error::Error>> {
    let mut db = EepromDatabase::builtin();
    if let Some(dir) = dir {
        let added = db.load_dir(dir)?;
        log::debug!("loaded {} definitions from {:?}", added, dir);
    } else {
        let default = Path::new("chips");
        if default.is_dir() {
            db.load_dir(default)?;
        }
    }
    Ok(db)
}
