use std::io;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read sysfs path: {0}")]
    ReadError(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Path missing: {0}")]
    PathMissing(String),

    #[error("Failed to parse value: {0}")]
    ParseError(String),

    #[error("Failed to spawn command '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Command '{command}' did not finish within {timeout_ms} ms")]
    Timeout { command: String, timeout_ms: u64 },

    #[error("Command '{0}' produced no output")]
    EmptyOutput(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}

// A unified error type for the entire application
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to watch visibility file: {0}")]
    Watch(#[from] notify::Error),

    #[error("Failed to install signal handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watcher_failures_convert() {
        let err = AppError::from(notify::Error::generic("inotify limit reached"));
        assert!(matches!(err, AppError::Watch(_)));
        assert!(err.to_string().starts_with("Failed to watch visibility file"));
    }

    #[test]
    fn signal_failures_convert() {
        let err = AppError::from(ctrlc::Error::MultipleHandlers);
        assert!(matches!(err, AppError::Signal(_)));
        assert!(err.to_string().starts_with("Failed to install signal handler"));
    }
}
