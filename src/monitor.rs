use crate::config::SamplerConfig;
use crate::core::{Snapshot, TurboThreshold};
use crate::cpu::{self, CpuPaths};
use crate::sensors::SensorsCommand;
use chrono::Local;
use log::debug;

/// Produces one [`Snapshot`] per call to [`Sampler::sample`].
///
/// The only state carried between samples is the turbo threshold, which is
/// read on the first sample and then kept for the lifetime of the sampler.
#[derive(Debug)]
pub struct Sampler {
    paths: CpuPaths,
    sensors: SensorsCommand,
    turbo: TurboThreshold,
}

impl Sampler {
    pub fn new(paths: CpuPaths, sensors: SensorsCommand) -> Self {
        Self {
            paths,
            sensors,
            turbo: TurboThreshold::default(),
        }
    }

    pub fn from_config(config: &SamplerConfig) -> Self {
        Self::new(
            CpuPaths::new(&config.cpu_root),
            SensorsCommand::new(
                &config.sensors_command,
                config.sensors_args.clone(),
                config.sensors_timeout(),
            ),
        )
    }

    pub fn paths(&self) -> &CpuPaths {
        &self.paths
    }

    pub fn sensors(&self) -> &SensorsCommand {
        &self.sensors
    }

    pub fn sample(&mut self) -> Snapshot {
        let frequencies = cpu::read_core_frequencies(&self.paths);
        let bounds = cpu::read_performance_bounds(&self.paths);

        if !self.turbo.cached {
            self.turbo = TurboThreshold {
                percent: cpu::read_turbo_pct(&self.paths),
                cached: true,
            };
            debug!("Cached turbo threshold: {}%", self.turbo.percent);
        }

        let temperatures = self.sensors.read_temperatures();

        debug!(
            "Sampled {} cores, {} temperatures, bounds {}-{}%",
            frequencies.len(),
            temperatures.len(),
            bounds.min_percent,
            bounds.max_percent
        );

        Snapshot {
            frequencies,
            bounds,
            temperatures,
            turbo: self.turbo,
            taken_at: Local::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PerformanceBounds;
    use crate::util::fixture::FakeSysfs;
    use std::time::Duration;

    fn sampler(sysfs: &FakeSysfs, script: &str) -> Sampler {
        Sampler::new(
            CpuPaths::new(sysfs.root()),
            SensorsCommand::new(
                "sh",
                vec!["-c".to_string(), script.to_string()],
                Duration::from_secs(5),
            ),
        )
    }

    #[test]
    fn full_pass() {
        let sysfs = FakeSysfs::new();
        for core in 0..4 {
            sysfs.write_core_frequency(core, 2_000_000);
        }
        sysfs.write("intel_pstate/min_perf_pct", "20\n");
        sysfs.write("intel_pstate/max_perf_pct", "80\n");
        sysfs.write("intel_pstate/turbo_pct", "35\n");

        let mut sampler = sampler(
            &sysfs,
            "printf 'Package id 0:  +45.0°C  (high = +100.0°C)\\nCore 0:        +40.0°C  (high = +100.0°C)\\nFan1: 1200 RPM\\n'",
        );
        let snapshot = sampler.sample();

        assert_eq!(snapshot.frequencies.len(), 4);
        assert_eq!(
            snapshot.bounds,
            PerformanceBounds {
                min_percent: 20,
                max_percent: 80
            }
        );
        assert_eq!(snapshot.performance_ratio(), 0.75);
        assert_eq!(
            snapshot.turbo,
            TurboThreshold {
                percent: 35,
                cached: true
            }
        );
        let labels: Vec<&str> = snapshot
            .temperatures
            .iter()
            .map(|t| t.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Package id 0", "Core 0"]);
        assert_eq!(snapshot.temperatures[0].celsius, 45.0);
        assert_eq!(snapshot.temperatures[1].celsius, 40.0);
    }

    #[test]
    fn turbo_is_read_once() {
        let sysfs = FakeSysfs::new();
        sysfs.write("intel_pstate/turbo_pct", "35\n");
        let mut sampler = sampler(&sysfs, "true");

        assert_eq!(sampler.sample().turbo.percent, 35);

        sysfs.write("intel_pstate/turbo_pct", "50\n");
        assert_eq!(sampler.sample().turbo.percent, 35);
    }

    #[test]
    fn absent_turbo_is_cached_as_zero() {
        let sysfs = FakeSysfs::new();
        let mut sampler = sampler(&sysfs, "true");
        let first = sampler.sample();
        assert_eq!(
            first.turbo,
            TurboThreshold {
                percent: 0,
                cached: true
            }
        );

        sysfs.write("intel_pstate/turbo_pct", "20\n");
        assert_eq!(sampler.sample().turbo.percent, 0);
    }

    #[test]
    fn empty_system_degrades_to_defaults() {
        let sysfs = FakeSysfs::new();
        let mut sampler = Sampler::new(
            CpuPaths::new(sysfs.root()),
            SensorsCommand::new(
                "/nonexistent/pstatectl-sensors",
                Vec::new(),
                Duration::from_secs(1),
            ),
        );
        let snapshot = sampler.sample();
        assert!(snapshot.frequencies.is_empty());
        assert!(snapshot.temperatures.is_empty());
        assert_eq!(snapshot.bounds, PerformanceBounds::default());
        assert_eq!(snapshot.performance_ratio(), 1.0);
    }
}
