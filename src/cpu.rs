use crate::core::{CoreFrequencyEntry, PerformanceBounds};
use crate::util::sysfs::read_scalar_file;
use log::debug;
use std::path::PathBuf;

/// Probing never goes past this core index.
pub const MAX_PROBED_CORES: u32 = 16;

/// Locations of the cpufreq and intel_pstate files below a sysfs cpu root
/// (normally `/sys/devices/system/cpu`).
#[derive(Debug, Clone)]
pub struct CpuPaths {
    root: PathBuf,
}

impl CpuPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn core_frequency(&self, core_id: u32) -> PathBuf {
        self.root
            .join(format!("cpu{core_id}"))
            .join("cpufreq/scaling_cur_freq")
    }

    pub fn min_perf_pct(&self) -> PathBuf {
        self.root.join("intel_pstate/min_perf_pct")
    }

    pub fn max_perf_pct(&self) -> PathBuf {
        self.root.join("intel_pstate/max_perf_pct")
    }

    pub fn turbo_pct(&self) -> PathBuf {
        self.root.join("intel_pstate/turbo_pct")
    }
}

/// Current frequency of one core in kHz, `None` if the core has no readable
/// cpufreq entry.
pub fn read_core_frequency(paths: &CpuPaths, core_id: u32) -> Option<u64> {
    read_scalar_file(paths.core_frequency(core_id)).and_then(|khz| u64::try_from(khz).ok())
}

/// Probe cores from 0 upwards until the first one without a frequency.
pub fn read_core_frequencies(paths: &CpuPaths) -> Vec<CoreFrequencyEntry> {
    let mut entries = Vec::new();
    for core_id in 0..MAX_PROBED_CORES {
        let Some(frequency_khz) = read_core_frequency(paths, core_id) else {
            debug!("No frequency for core {core_id}, stopping enumeration");
            break;
        };
        entries.push(CoreFrequencyEntry {
            core_id,
            frequency_khz,
        });
    }
    entries
}

pub fn read_performance_bounds(paths: &CpuPaths) -> PerformanceBounds {
    let min = read_scalar_file(paths.min_perf_pct());
    let max = read_scalar_file(paths.max_perf_pct());
    PerformanceBounds::from_raw(min, max)
}

/// Turbo threshold percentage, 0 when unavailable. Negative values clamp to 0.
pub fn read_turbo_pct(paths: &CpuPaths) -> u32 {
    read_scalar_file(paths.turbo_pct())
        .map(|pct| pct.clamp(0, i64::from(u32::MAX)) as u32)
        .unwrap_or(0)
}
