use crate::core::{CoreFrequencyEntry, Snapshot, TemperatureReading};
use log::error;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A consumer of snapshots. Every call replaces what the previous tick
/// rendered for that section.
pub trait Presenter {
    fn render_frequencies(&mut self, entries: &[CoreFrequencyEntry]);

    /// `turbo_percent` of 0 means the threshold is unknown.
    fn render_temperatures(&mut self, readings: &[TemperatureReading], turbo_percent: u32);

    /// `ratio` is in [0, 1].
    fn render_performance(&mut self, ratio: f64);

    /// Called once after the three render calls of a tick.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Hand one snapshot to a presenter.
pub fn present<P: Presenter + ?Sized>(presenter: &mut P, snapshot: &Snapshot) {
    presenter.render_frequencies(&snapshot.frequencies);
    presenter.render_temperatures(&snapshot.temperatures, snapshot.turbo.percent);
    presenter.render_performance(snapshot.performance_ratio());
    if let Err(e) = presenter.flush() {
        error!("Failed to flush presenter: {e}");
    }
}

impl Presenter for Vec<Box<dyn Presenter + Send>> {
    fn render_frequencies(&mut self, entries: &[CoreFrequencyEntry]) {
        for presenter in self.iter_mut() {
            presenter.render_frequencies(entries);
        }
    }

    fn render_temperatures(&mut self, readings: &[TemperatureReading], turbo_percent: u32) {
        for presenter in self.iter_mut() {
            presenter.render_temperatures(readings, turbo_percent);
        }
    }

    fn render_performance(&mut self, ratio: f64) {
        for presenter in self.iter_mut() {
            presenter.render_performance(ratio);
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut result = Ok(());
        for presenter in self.iter_mut() {
            if let Err(e) = presenter.flush() {
                result = Err(e);
            }
        }
        result
    }
}

pub fn format_frequency(entry: &CoreFrequencyEntry) -> (String, String) {
    (
        format!("CPU {}", entry.core_id),
        format!("{:.2} GHz", entry.frequency_ghz()),
    )
}

pub fn format_temperature(reading: &TemperatureReading) -> (String, String) {
    (reading.label.clone(), format!("{:.1} °C", reading.celsius))
}

/// Renders label/value rows as text, one block per tick.
pub struct ConsolePresenter<W: Write> {
    out: W,
    rows: Vec<(String, String)>,
    temperature_rows: Vec<(String, String)>,
    performance: Option<f64>,
}

impl<W: Write> ConsolePresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            rows: Vec::new(),
            temperature_rows: Vec::new(),
            performance: None,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl ConsolePresenter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Presenter for ConsolePresenter<W> {
    fn render_frequencies(&mut self, entries: &[CoreFrequencyEntry]) {
        self.rows = entries.iter().map(format_frequency).collect();
    }

    fn render_temperatures(&mut self, readings: &[TemperatureReading], turbo_percent: u32) {
        self.temperature_rows = readings.iter().map(format_temperature).collect();
        if turbo_percent > 0 {
            self.temperature_rows
                .push(("Turbo starts at".to_string(), format!("{turbo_percent}%")));
        }
    }

    fn render_performance(&mut self, ratio: f64) {
        self.performance = Some(ratio);
    }

    fn flush(&mut self) -> io::Result<()> {
        let width = self
            .rows
            .iter()
            .chain(&self.temperature_rows)
            .map(|(label, _)| label.chars().count() + 1)
            .max()
            .unwrap_or(0)
            .max("Performance:".len());

        for (label, value) in self.rows.iter().chain(&self.temperature_rows) {
            writeln!(self.out, "{:<width$} {value}", format!("{label}:"))?;
        }
        if let Some(ratio) = self.performance {
            writeln!(
                self.out,
                "{:<width$} {:.0}%",
                "Performance:",
                ratio * 100.0
            )?;
        }
        writeln!(self.out)?;
        self.out.flush()
    }
}

/// Rewrites a `key=value` stats file after every tick.
pub struct StatsFilePresenter {
    path: PathBuf,
    frequencies: Vec<CoreFrequencyEntry>,
    temperatures: Vec<TemperatureReading>,
    turbo_percent: u32,
    performance: f64,
}

impl StatsFilePresenter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            frequencies: Vec::new(),
            temperatures: Vec::new(),
            turbo_percent: 0,
            performance: 0.0,
        }
    }
}

impl Presenter for StatsFilePresenter {
    fn render_frequencies(&mut self, entries: &[CoreFrequencyEntry]) {
        self.frequencies = entries.to_vec();
    }

    fn render_temperatures(&mut self, readings: &[TemperatureReading], turbo_percent: u32) {
        self.temperatures = readings.to_vec();
        self.turbo_percent = turbo_percent;
    }

    fn render_performance(&mut self, ratio: f64) {
        self.performance = ratio;
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut file = File::create(&self.path)?;

        writeln!(file, "timestamp={}", chrono::Local::now().to_rfc3339())?;
        for entry in &self.frequencies {
            writeln!(file, "cpu{}_khz={}", entry.core_id, entry.frequency_khz)?;
        }
        for reading in &self.temperatures {
            let key = reading.label.to_ascii_lowercase().replace(' ', "_");
            writeln!(file, "{key}_celsius={:.1}", reading.celsius)?;
        }
        writeln!(file, "turbo_pct={}", self.turbo_percent)?;
        writeln!(file, "performance={:.2}", self.performance)?;

        Ok(())
    }
}
