// Configuration types and structures for pstatectl
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub use crate::util::error::ConfigError;

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub sampler: SamplerConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scheduler.interval_ms == 0 {
            return Err(ConfigError::Validation(
                "Scheduler interval must be greater than 0 ms".to_string(),
            ));
        }
        if self.sampler.sensors_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "Sensors timeout must be greater than 0 ms".to_string(),
            ));
        }
        if self.sampler.sensors_command.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Sensors command cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SamplerConfig {
    #[serde(default = "default_cpu_root")]
    pub cpu_root: PathBuf,
    #[serde(default = "default_sensors_command")]
    pub sensors_command: String,
    #[serde(default)]
    pub sensors_args: Vec<String>,
    #[serde(default = "default_sensors_timeout_ms")]
    pub sensors_timeout_ms: u64,
}

impl SamplerConfig {
    pub const fn sensors_timeout(&self) -> Duration {
        Duration::from_millis(self.sensors_timeout_ms)
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            cpu_root: default_cpu_root(),
            sensors_command: default_sensors_command(),
            sensors_args: Vec::new(),
            sensors_timeout_ms: default_sensors_timeout_ms(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SchedulerConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats_file_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility_file: Option<PathBuf>,
}

impl SchedulerConfig {
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            log_level: default_log_level(),
            stats_file_path: None,
            visibility_file: None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warning,
    Info,
    Debug,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Self::Error,
            LogLevel::Warning => Self::Warn,
            LogLevel::Info => Self::Info,
            LogLevel::Debug => Self::Debug,
        }
    }
}

fn default_cpu_root() -> PathBuf {
    PathBuf::from("/sys/devices/system/cpu")
}

fn default_sensors_command() -> String {
    "sensors".to_string()
}

const fn default_sensors_timeout_ms() -> u64 {
    900
}

const fn default_interval_ms() -> u64 {
    1000
}

const fn default_log_level() -> LogLevel {
    LogLevel::Info
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.scheduler.interval(), Duration::from_secs(1));
        assert_eq!(config.sampler.cpu_root, PathBuf::from("/sys/devices/system/cpu"));
        assert_eq!(config.sampler.sensors_command, "sensors");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_sections_are_filled_in() {
        let config: AppConfig = toml::from_str(
            r#"
            [sampler]
            sensors_args = ["-A"]

            [scheduler]
            interval_ms = 2500
            log_level = "Debug"
            visibility_file = "/run/user/1000/pstatectl.visible"
            "#,
        )
        .unwrap();
        assert_eq!(config.sampler.sensors_args, vec!["-A".to_string()]);
        assert_eq!(config.sampler.sensors_timeout_ms, 900);
        assert_eq!(config.scheduler.interval_ms, 2500);
        assert_eq!(config.scheduler.log_level, LogLevel::Debug);
        assert!(config.scheduler.stats_file_path.is_none());
        assert!(config.scheduler.visibility_file.is_some());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut config = AppConfig::default();
        config.scheduler.interval_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn blank_command_is_rejected() {
        let mut config = AppConfig::default();
        config.sampler.sensors_command = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn log_levels_map_to_filters() {
        assert_eq!(log::LevelFilter::from(LogLevel::Warning), log::LevelFilter::Warn);
        assert_eq!(log::LevelFilter::from(LogLevel::Debug), log::LevelFilter::Debug);
    }
}
