use chrono::{DateTime, Local};

/// Lowest performance percentage intel_pstate reports as a floor.
pub const MIN_PERF_FLOOR: u32 = 10;
pub const MAX_PERF_CEILING: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreFrequencyEntry {
    pub core_id: u32,
    pub frequency_khz: u64,
}

impl CoreFrequencyEntry {
    pub fn frequency_ghz(&self) -> f64 {
        self.frequency_khz as f64 / 1_000_000.0
    }
}

/// Operating range of the P-state driver. `min_percent <= max_percent` holds
/// for every value built through [`PerformanceBounds::from_raw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerformanceBounds {
    pub min_percent: u32,
    pub max_percent: u32,
}

impl Default for PerformanceBounds {
    fn default() -> Self {
        Self {
            min_percent: MIN_PERF_FLOOR,
            max_percent: MAX_PERF_CEILING,
        }
    }
}

impl PerformanceBounds {
    /// Clamp raw sysfs readings: min into [10, 100], then max into [min, 100].
    pub fn from_raw(min: Option<i64>, max: Option<i64>) -> Self {
        let floor = i64::from(MIN_PERF_FLOOR);
        let ceiling = i64::from(MAX_PERF_CEILING);

        let min_percent = min.unwrap_or(floor).clamp(floor, ceiling);
        let max_percent = max.unwrap_or(ceiling).clamp(min_percent, ceiling);

        // Both values are within [10, 100] at this point.
        Self {
            min_percent: min_percent as u32,
            max_percent: max_percent as u32,
        }
    }

    /// Position of `max_percent` within the adjustable range, in [0, 1].
    ///
    /// A pinned floor (`min_percent == 100`) leaves no range to move in and
    /// reports 0.
    pub fn performance_ratio(&self) -> f64 {
        if self.min_percent >= MAX_PERF_CEILING {
            return 0.0;
        }
        f64::from(self.max_percent - self.min_percent)
            / f64::from(MAX_PERF_CEILING - self.min_percent)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureReading {
    pub label: String, // e.g. "Package id 0", "Core 0"
    pub celsius: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurboThreshold {
    pub percent: u32,
    pub cached: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub frequencies: Vec<CoreFrequencyEntry>,
    pub bounds: PerformanceBounds,
    pub temperatures: Vec<TemperatureReading>,
    pub turbo: TurboThreshold,
    pub taken_at: DateTime<Local>, // so we know when the sample was taken
}

impl Snapshot {
    pub fn performance_ratio(&self) -> f64 {
        self.bounds.performance_ratio()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Shown,
    Hidden,
}

impl Visibility {
    /// Parse the contents of a visibility file. Anything unrecognised hides.
    pub fn from_state(state: &str) -> Self {
        match state.trim().to_ascii_lowercase().as_str() {
            "visible" | "shown" | "1" => Self::Shown,
            _ => Self::Hidden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_within_range_are_kept() {
        let bounds = PerformanceBounds::from_raw(Some(20), Some(80));
        assert_eq!(
            bounds,
            PerformanceBounds {
                min_percent: 20,
                max_percent: 80
            }
        );
        assert!((bounds.performance_ratio() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn max_below_floor_is_raised_to_min() {
        let bounds = PerformanceBounds::from_raw(None, Some(5));
        assert_eq!(
            bounds,
            PerformanceBounds {
                min_percent: 10,
                max_percent: 10
            }
        );
        assert_eq!(bounds.performance_ratio(), 0.0);
    }

    #[test]
    fn absent_values_use_defaults() {
        let bounds = PerformanceBounds::from_raw(None, None);
        assert_eq!(bounds, PerformanceBounds::default());
        assert_eq!(bounds.performance_ratio(), 1.0);
    }

    #[test]
    fn min_is_clamped_into_range() {
        assert_eq!(PerformanceBounds::from_raw(Some(3), None).min_percent, 10);

        let pinned = PerformanceBounds::from_raw(Some(150), Some(40));
        assert_eq!(
            pinned,
            PerformanceBounds {
                min_percent: 100,
                max_percent: 100
            }
        );
    }

    #[test]
    fn pinned_floor_reports_zero_ratio() {
        let bounds = PerformanceBounds::from_raw(Some(100), Some(100));
        assert_eq!(bounds.performance_ratio(), 0.0);
    }

    #[test]
    fn max_above_ceiling_is_lowered() {
        let bounds = PerformanceBounds::from_raw(Some(50), Some(250));
        assert_eq!(bounds.max_percent, 100);
    }

    #[test]
    fn frequency_converts_to_ghz() {
        let entry = CoreFrequencyEntry {
            core_id: 0,
            frequency_khz: 2_400_000,
        };
        assert!((entry.frequency_ghz() - 2.4).abs() < 1e-9);
    }

    #[test]
    fn visibility_states() {
        assert_eq!(Visibility::from_state("visible\n"), Visibility::Shown);
        assert_eq!(Visibility::from_state("1"), Visibility::Shown);
        assert_eq!(Visibility::from_state("hidden"), Visibility::Hidden);
        assert_eq!(Visibility::from_state(""), Visibility::Hidden);
    }
}
