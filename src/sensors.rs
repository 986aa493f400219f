//! Temperatures from the output of an external sensor command (lm-sensors'
//! `sensors` by default).
//!
//! Only lines whose first token is `Package` or `Core` are considered, e.g.
//!
//! ```text
//! Package id 0:  +45.0°C  (high = +100.0°C, crit = +100.0°C)
//! Core 0:        +40.0°C  (high = +100.0°C, crit = +100.0°C)
//! ```

use crate::core::TemperatureReading;
use crate::util::error::SourceError;
use log::debug;
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_STEP: Duration = Duration::from_millis(5);

/// An external command printing sensor readings on stdout.
#[derive(Debug, Clone)]
pub struct SensorsCommand {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl SensorsCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run the command and return its stdout.
    ///
    /// The child is killed once `timeout` elapses. A non-zero exit status is
    /// not an error as long as something was printed.
    pub fn run(&self) -> Result<String, SourceError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| SourceError::Spawn {
                command: self.program.clone(),
                source,
            })?;

        // drain stdout concurrently so a chatty child never blocks on a full pipe.
        let reader = child.stdout.take().map(|mut stdout| {
            thread::spawn(move || {
                let mut out = Vec::new();
                stdout.read_to_end(&mut out).map(|_| out)
            })
        });

        let start = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    debug!("'{}' exited with {status}", self.program);
                    break;
                }
                Ok(None) => {}
                Err(e) => {
                    abandon(&mut child);
                    return Err(SourceError::Io(e));
                }
            }
            if start.elapsed() >= self.timeout {
                abandon(&mut child);
                return Err(SourceError::Timeout {
                    command: self.program.clone(),
                    timeout_ms: self.timeout.as_millis() as u64,
                });
            }
            thread::sleep(POLL_STEP);
        }

        let out = match reader {
            Some(handle) => match handle.join() {
                Ok(result) => result?,
                Err(_) => Vec::new(),
            },
            None => Vec::new(),
        };

        let text = String::from_utf8_lossy(&out).into_owned();
        if text.trim().is_empty() {
            return Err(SourceError::EmptyOutput(self.program.clone()));
        }
        Ok(text)
    }

    /// Raw `(label, value token)` pairs, or `None` when the command could not
    /// produce any output.
    pub fn read_raw(&self) -> Option<Vec<(String, String)>> {
        match self.run() {
            Ok(output) => Some(parse_sensor_lines(&output)),
            Err(e) => {
                debug!("Temperature source unavailable: {e}");
                None
            }
        }
    }

    pub fn read_temperatures(&self) -> Vec<TemperatureReading> {
        self.read_raw()
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(label, token)| {
                let reading = parse_reading(&label, &token);
                if reading.is_none() {
                    debug!("Dropping malformed reading '{label}: {token}'");
                }
                reading
            })
            .collect()
    }
}

/// Kill a child we no longer wait for and reap it.
fn abandon(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Split sensor output into `(text before the first colon, first token after
/// it)` for every `Package`/`Core` line.
pub fn parse_sensor_lines(output: &str) -> Vec<(String, String)> {
    output
        .lines()
        .filter(|line| {
            matches!(line.split_whitespace().next(), Some(first) if first == "Package" || first == "Core")
        })
        .filter_map(|line| {
            let (label, rest) = line.split_once(':')?;
            let token = rest.split_whitespace().next()?;
            Some((label.trim().to_string(), token.to_string()))
        })
        .collect()
}

/// Parse a value token such as `+45.0°C` into degrees celsius.
pub fn parse_celsius(token: &str) -> Option<f64> {
    let number = token
        .trim()
        .trim_end_matches("°C")
        .trim_end_matches('C')
        .trim_end_matches('°')
        .trim_start_matches('+');
    number.parse::<f64>().ok().filter(|c| c.is_finite())
}

pub fn parse_reading(label: &str, token: &str) -> Option<TemperatureReading> {
    Some(TemperatureReading {
        label: label.to_string(),
        celsius: parse_celsius(token)?,
    })
}
