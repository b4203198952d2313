//! Sysfs GPIO pin access for digital inputs.

use crate::gpio::{GpioError, GpioResult};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Default kernel GPIO class directory.
pub const DEFAULT_SYSFS_ROOT: &str = "/sys/class/gpio";

/// One sysfs-exposed GPIO, exported lazily on first access.
pub struct SysfsPin {
    number: u16,
    root: PathBuf,
}

impl SysfsPin {
    pub fn new(number: u16) -> Self {
        Self::with_root(number, DEFAULT_SYSFS_ROOT)
    }

    /// Use a non-default sysfs root. Tests point this at a scratch
    /// directory.
    pub fn with_root(number: u16, root: impl Into<PathBuf>) -> Self {
        Self {
            number,
            root: root.into(),
        }
    }

    pub fn number(&self) -> u16 {
        self.number
    }

    fn value_path(&self) -> PathBuf {
        self.root.join(format!("gpio{}", self.number)).join("value")
    }

    /// Export the pin through `<root>/export` if the kernel has not exposed
    /// it yet.
    pub fn ensure_exported(&self) -> GpioResult<()> {
        if self.value_path().exists() {
            return Ok(());
        }
        let export = self.root.join("export");
        fs::write(&export, self.number.to_string())
            .map_err(|e| GpioError::io(format!("exporting gpio {}", self.number), &e))?;
        debug!("exported gpio {}", self.number);
        Ok(())
    }

    /// Read the pin level: 0 or 1.
    pub fn read(&self) -> GpioResult<u8> {
        self.ensure_exported()?;
        let path = self.value_path();
        let raw = fs::read_to_string(&path)
            .map_err(|e| GpioError::io(format!("reading {}", path.display()), &e))?;
        parse_level(&raw)
    }
}

/// The kernel writes a single digit plus newline; accept exactly that.
fn parse_level(raw: &str) -> GpioResult<u8> {
    match raw.trim() {
        "0" => Ok(0),
        "1" => Ok(1),
        _ => Err(GpioError::BadValue {
            raw: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn scratch_root(tag: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!(
            "obc-hal-pin-{}-{}",
            tag,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(&root).unwrap();
        root
    }

    #[test]
    fn test_read_exported_pin() {
        let root = scratch_root("read");
        fs::create_dir_all(root.join("gpio692")).unwrap();
        fs::write(root.join("gpio692/value"), "1\n").unwrap();

        let pin = SysfsPin::with_root(692, &root);
        assert_eq!(pin.read().unwrap(), 1);
    }

    #[test]
    fn test_lazy_export_writes_number() {
        let root = scratch_root("export");
        fs::write(root.join("export"), "").unwrap();

        let pin = SysfsPin::with_root(695, &root);
        pin.ensure_exported().unwrap();
        assert_eq!(fs::read_to_string(root.join("export")).unwrap(), "695");

        // Once the value file exists the export path is left alone.
        fs::create_dir_all(root.join("gpio695")).unwrap();
        fs::write(root.join("gpio695/value"), "0\n").unwrap();
        fs::write(root.join("export"), "sentinel").unwrap();
        pin.ensure_exported().unwrap();
        assert_eq!(fs::read_to_string(root.join("export")).unwrap(), "sentinel");
    }

    #[test]
    fn test_bad_value_rejected() {
        let root = scratch_root("bad");
        fs::create_dir_all(root.join("gpio700")).unwrap();
        fs::write(root.join("gpio700/value"), "x\n").unwrap();

        let pin = SysfsPin::with_root(700, &root);
        assert!(matches!(pin.read(), Err(GpioError::BadValue { .. })));
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("0\n").unwrap(), 0);
        assert_eq!(parse_level("1").unwrap(), 1);
        assert!(parse_level("2").is_err());
        assert!(parse_level("").is_err());
    }
}
