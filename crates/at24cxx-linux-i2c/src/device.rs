//! Linux i2c-dev device implementation
//!
//! This module provides the `LinuxI2c` struct that implements the
//! `I2cMaster` trait using the kernel's i2c-dev interface.

use crate::error::LinuxI2cError;

use at24cxx_core::bus::{I2cCommand, I2cMaster};
use at24cxx_core::error::{Error as CoreError, Result as CoreResult};

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::os::unix::io::AsRawFd;
use std::path::Path;
use std::thread;
use std::time::Duration;

/// `I2C_SLAVE` ioctl from `<linux/i2c-dev.h>`: selects the device address
/// used by subsequent `read(2)`/`write(2)` calls on the file descriptor.
const I2C_SLAVE: libc::c_ulong = 0x0703;

/// Linux i2c-dev bus master
///
/// Wraps one `/dev/i2c-N` character device. The kernel tracks one selected
/// device address per descriptor; the address is applied lazily, on the
/// first transaction after it changes.
pub struct LinuxI2c {
    file: File,
    requested: u8,
    selected: Option<u8>,
}

impl LinuxI2c {
    /// Open an i2c-dev device node, e.g. `/dev/i2c-1`
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LinuxI2cError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| LinuxI2cError::Open {
                path: path.display().to_string(),
                source,
            })?;
        log::debug!("opened {}", path.display());
        Ok(Self {
            file,
            requested: 0,
            selected: None,
        })
    }

    fn apply_device_address(&mut self) -> CoreResult<()> {
        if self.selected == Some(self.requested) {
            return Ok(());
        }
        let rc = unsafe {
            libc::ioctl(
                self.file.as_raw_fd(),
                I2C_SLAVE,
                self.requested as libc::c_ulong,
            )
        };
        if rc < 0 {
            let err = LinuxI2cError::SetAddress {
                address: self.requested,
                source: std::io::Error::last_os_error(),
            };
            log::warn!("{}", err);
            return Err(CoreError::BusTransferFailed);
        }
        self.selected = Some(self.requested);
        Ok(())
    }

    fn transfer_failed(err: std::io::Error) -> CoreError {
        log::warn!("{}", LinuxI2cError::Io(err));
        CoreError::BusTransferFailed
    }
}

impl I2cMaster for LinuxI2c {
    fn set_device_address(&mut self, address: u8) {
        self.requested = address;
    }

    fn execute(&mut self, cmd: &mut I2cCommand<'_>) -> CoreResult<()> {
        self.apply_device_address()?;

        let mut register = [0u8; 2];
        let register_len = cmd.encode_register(&mut register);

        if cmd.has_write() {
            let mut buf = Vec::with_capacity(register_len + cmd.write_data.len());
            buf.extend_from_slice(&register[..register_len]);
            buf.extend_from_slice(cmd.write_data);
            self.file.write_all(&buf).map_err(Self::transfer_failed)
        } else {
            self.file
                .write_all(&register[..register_len])
                .map_err(Self::transfer_failed)?;
            self.file
                .read_exact(cmd.read_buf)
                .map_err(Self::transfer_failed)
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(ms as u64));
    }
}
