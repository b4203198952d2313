//! System property access.
//!
//! Properties are the signaling channel between this library and the
//! privileged components that actually touch restricted hardware paths.

use std::io;
use std::process::Command;

/// Abstraction over the OS property store.
pub trait PropertyStore: Send + Sync {
    /// Read a property. Unset properties come back as an empty string.
    fn get(&self, name: &str) -> io::Result<String>;

    /// Write a property.
    fn set(&self, name: &str, value: &str) -> io::Result<()>;
}

/// Property store backed by the `getprop`/`setprop` tools.
pub struct SystemProperties;

impl PropertyStore for SystemProperties {
    fn get(&self, name: &str) -> io::Result<String> {
        let output = Command::new("getprop").arg(name).output()?;
        let raw = String::from_utf8_lossy(&output.stdout);
        Ok(raw.trim().trim_matches('"').to_string())
    }

    fn set(&self, name: &str, value: &str) -> io::Result<()> {
        let status = Command::new("setprop").arg(name).arg(value).status()?;
        if !status.success() {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("setprop {} exited with {}", name, status),
            ));
        }
        Ok(())
    }
}
