//! Digital output driver for platforms where direct sysfs writes are
//! blocked by OS policy.
//!
//! Legacy workaround, quarantined here: the library writes a small shell
//! script that echoes the level into the real sysfs value file, then flips a
//! system property watched by a privileged executor daemon. Completion is
//! confirmed by polling for the executor's result file and for the property
//! returning to `"0"`, within a fixed budget.

use crate::gpio::properties::PropertyStore;
use crate::gpio::{GpioError, GpioResult};
use log::{error, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Default script/result directory (device external storage).
pub const DEFAULT_SCRIPT_DIR: &str = "/mnt/shell/emulated/0";
/// Property the privileged executor watches for a script path.
pub const DEFAULT_TRIGGER_PROPERTY: &str = "op.se_dom_ex";

/// Settle time before the first poll, and the full wait when not
/// validating.
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 40;
/// Sleep between poll iterations.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 10;
/// Maximum poll iterations before the set is reported failed.
pub const DEFAULT_POLL_BUDGET: u32 = 40;

/// Confirmation progress for one validated output set.
///
/// The checks are ordered: the result file must exist before its exit code
/// is read, and the exit code must be zero before the executor property is
/// consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    AwaitResultFile,
    AwaitExitCode,
    AwaitExecutor,
}

/// Writes digital outputs through the privileged-executor path.
pub struct OutputWriter {
    script_dir: PathBuf,
    sysfs_root: PathBuf,
    trigger_property: String,
    initial_delay: Duration,
    poll_interval: Duration,
    poll_budget: u32,
    properties: Arc<dyn PropertyStore>,
}

impl OutputWriter {
    pub fn new(properties: Arc<dyn PropertyStore>) -> Self {
        Self {
            script_dir: PathBuf::from(DEFAULT_SCRIPT_DIR),
            sysfs_root: PathBuf::from(crate::gpio::pin::DEFAULT_SYSFS_ROOT),
            trigger_property: DEFAULT_TRIGGER_PROPERTY.to_string(),
            initial_delay: Duration::from_millis(DEFAULT_INITIAL_DELAY_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            poll_budget: DEFAULT_POLL_BUDGET,
            properties,
        }
    }

    pub fn with_script_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.script_dir = dir.into();
        self
    }

    pub fn with_sysfs_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.sysfs_root = root.into();
        self
    }

    pub fn with_trigger_property(mut self, property: impl Into<String>) -> Self {
        self.trigger_property = property.into();
        self
    }

    /// Override the poll tuning. Earlier device builds shipped with
    /// 20 iterations at 25 ms; current builds use 40 at 10 ms.
    pub fn with_poll(
        mut self,
        budget: u32,
        interval: Duration,
        initial_delay: Duration,
    ) -> Self {
        self.poll_budget = budget;
        self.poll_interval = interval;
        self.initial_delay = initial_delay;
        self
    }

    /// Set GPIO `gpio` high or low.
    ///
    /// With `validate` the call blocks until the executor confirms the write
    /// or the poll budget runs out; without it the call sleeps a fixed
    /// settle delay and reports success unchecked.
    pub fn set(&self, gpio: u16, high: bool, validate: bool) -> GpioResult<()> {
        let script_path = self.script_dir.join(format!("outputs{}.sh", gpio));
        let result_path = self.script_dir.join("result.txt");

        remove_stale(&script_path)?;
        if validate {
            remove_stale(&result_path)?;
        }

        self.write_script(&script_path, &result_path, gpio, high, validate)?;

        let script_str = script_path.to_string_lossy();
        self.properties
            .set(&self.trigger_property, &script_str)
            .map_err(|e| GpioError::io(format!("setting {}", self.trigger_property), &e))?;

        thread::sleep(self.initial_delay);
        if !validate {
            return Ok(());
        }

        self.await_confirmation(&result_path)?;

        // Confirmed; stale artifacts would confuse the next set.
        if fs::remove_file(&result_path).is_err() || fs::remove_file(&script_path).is_err() {
            warn!("could not clean up output script artifacts for gpio {}", gpio);
        }
        Ok(())
    }

    fn write_script(
        &self,
        script_path: &Path,
        result_path: &Path,
        gpio: u16,
        high: bool,
        validate: bool,
    ) -> GpioResult<()> {
        let level = if high { 1 } else { 0 };
        let mut script = String::from("#!/system/bin/sh\n");
        script.push_str(&format!(
            "echo {} > {}/gpio{}/value\n",
            level,
            self.sysfs_root.display(),
            gpio
        ));
        if validate {
            script.push_str(&format!("echo $? > {}\n", result_path.display()));
        }
        fs::write(script_path, script)
            .map_err(|e| GpioError::io(format!("writing {}", script_path.display()), &e))
    }

    /// Bounded confirmation poll. Runs the phase machine forward as far as
    /// the current filesystem/property state allows on each iteration,
    /// sleeping between iterations, and never exceeds the budget.
    fn await_confirmation(&self, result_path: &Path) -> GpioResult<()> {
        let mut phase = Phase::AwaitResultFile;
        let mut last_code: Option<i32> = None;

        for attempt in 1..=self.poll_budget {
            if self.advance(&mut phase, result_path, &mut last_code)? {
                return Ok(());
            }
            if attempt < self.poll_budget {
                thread::sleep(self.poll_interval);
            }
        }

        let err = match (phase, last_code) {
            (Phase::AwaitExitCode, Some(code)) if code != 0 => {
                GpioError::ScriptFailure { code }
            }
            _ => GpioError::ExecutorTimeout {
                iterations: self.poll_budget,
            },
        };
        error!("output validation failed: {}", err);
        Err(err)
    }

    /// One poll iteration: advance through as many phases as currently
    /// possible. `Ok(true)` means the write is confirmed.
    fn advance(
        &self,
        phase: &mut Phase,
        result_path: &Path,
        last_code: &mut Option<i32>,
    ) -> GpioResult<bool> {
        loop {
            match *phase {
                Phase::AwaitResultFile => {
                    if !result_path.exists() {
                        return Ok(false);
                    }
                    *phase = Phase::AwaitExitCode;
                }
                Phase::AwaitExitCode => {
                    match read_exit_code(result_path)? {
                        Some(0) => *phase = Phase::AwaitExecutor,
                        Some(code) => {
                            *last_code = Some(code);
                            return Ok(false);
                        }
                        // Partially written file, retry.
                        None => return Ok(false),
                    }
                }
                Phase::AwaitExecutor => {
                    let value = self
                        .properties
                        .get(&self.trigger_property)
                        .map_err(|e| {
                            GpioError::io(format!("reading {}", self.trigger_property), &e)
                        })?;
                    return Ok(value.trim().trim_matches('"') == "0");
                }
            }
        }
    }
}

fn remove_stale(path: &Path) -> GpioResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(GpioError::io(format!("deleting {}", path.display()), &e)),
    }
}

fn read_exit_code(path: &Path) -> GpioResult<Option<i32>> {
    let raw =
        fs::read_to_string(path).map_err(|e| GpioError::io(format!("reading {}", path.display()), &e))?;
    Ok(raw.trim().trim_matches('"').parse().ok())
}
