use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::backend::PowerSource;
use crate::error::{EapoError, Result};

const COMPONENT: &str = "telemetry";

/// Unit of the raw number found in a power file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerUnit {
    Watts,
    Milliwatts,
    #[default]
    Microwatts,
}

impl PowerUnit {
    pub fn to_watts(self, raw: f64) -> f64 {
        match self {
            PowerUnit::Watts => raw,
            PowerUnit::Milliwatts => raw / 1_000.0,
            PowerUnit::Microwatts => raw / 1_000_000.0,
        }
    }
}

/// Constant power draw.
#[derive(Debug, Clone, Copy)]
pub struct FixedPowerSource {
    watts: f64,
}

impl FixedPowerSource {
    pub fn new(watts: f64) -> Self {
        Self { watts }
    }
}

impl PowerSource for FixedPowerSource {
    fn sample_watts(&self) -> Result<f64> {
        Ok(self.watts)
    }
}

/// Reads a sysfs-style file holding the current power draw as one number,
/// e.g. `/sys/class/power_supply/BAT0/power_now` or hwmon `power1_input`.
///
/// The file stays open for the lifetime of the source and is re-read from
/// offset 0 on every sample.
#[derive(Debug)]
pub struct SysfsPowerSource {
    path: PathBuf,
    file: File,
    unit: PowerUnit,
}

impl SysfsPowerSource {
    pub fn open<P: AsRef<Path>>(path: P, unit: PowerUnit) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| {
            EapoError::external(COMPONENT, format!("cannot open {}: {}", path.display(), e))
        })?;
        let source = Self { path, file, unit };
        // Fail at open time rather than on the first trial.
        source.sample_watts()?;
        Ok(source)
    }

}

impl PowerSource for SysfsPowerSource {
    fn sample_watts(&self) -> Result<f64> {
        let read_err =
            |e: std::io::Error| EapoError::external(COMPONENT, format!("{}: {}", self.path.display(), e));

        let mut file = &self.file;
        file.seek(SeekFrom::Start(0)).map_err(read_err)?;
        let mut raw = String::new();
        file.read_to_string(&mut raw).map_err(read_err)?;

        let value: f64 = raw.trim().parse().map_err(|_| {
            EapoError::external(
                COMPONENT,
                format!("{}: not a number: {:?}", self.path.display(), raw.trim()),
            )
        })?;
        Ok(self.unit.to_watts(value))
    }
}

/// Power telemetry held for the duration of one run.
///
/// Acquired once when a run starts and released when dropped, whichever way
/// the run ends. A missing or unreadable source is not an error: the session
/// simply has no source and every energy figure will be 0.
pub struct Telemetry {
    source: Option<Box<dyn PowerSource>>,
    label: String,
}

impl Telemetry {
    /// Open the configured power file, degrading to no source on failure.
    pub fn acquire(path: Option<&Path>, unit: PowerUnit) -> Self {
        let Some(path) = path else {
            info!("no power source configured; energy will be reported as 0");
            return Self::disabled();
        };

        match SysfsPowerSource::open(path, unit) {
            Ok(source) => {
                info!(path = %path.display(), ?unit, "power telemetry acquired");
                Self {
                    source: Some(Box::new(source)),
                    label: path.display().to_string(),
                }
            }
            Err(e) => {
                warn!(error = %e, "power telemetry unavailable; energy will be reported as 0");
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self {
            source: None,
            label: "none".to_string(),
        }
    }

    pub fn source(&self) -> Option<&dyn PowerSource> {
        self.source.as_deref()
    }
}

impl Drop for Telemetry {
    fn drop(&mut self) {
        if self.source.is_some() {
            info!(source = %self.label, "power telemetry released");
        }
    }
}
