use crate::config::AppConfig;
use crate::cpu::{self, MAX_PROBED_CORES};
use crate::monitor::Sampler;
use crate::sensors;
use crate::util::error::AppError;
use crate::util::sysfs::read_sysfs_string;
use crate::visibility::read_visibility;

/// Prints comprehensive debug information about the sampling sources
pub fn run_debug(config: &AppConfig) -> Result<(), AppError> {
    println!("=== PSTATECTL DEBUG INFORMATION ===");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!("Timestamp: {}", chrono::Local::now().to_rfc3339());

    println!("\n--- CONFIGURATION ---");
    println!("Current Configuration: {config:#?}");

    let sampler = Sampler::from_config(&config.sampler);
    let paths = sampler.paths();

    println!("\n--- CPU FREQUENCY SOURCES ---");
    println!("Logical CPUs reported by OS: {}", num_cpus::get());
    println!("Probe limit: {MAX_PROBED_CORES}");
    for core_id in 0..MAX_PROBED_CORES {
        let path = paths.core_frequency(core_id);
        match read_sysfs_string(&path) {
            Ok(raw) => println!("  {}: '{raw}'", path.display()),
            Err(e) => {
                println!("  {}: {e} (enumeration stops here)", path.display());
                break;
            }
        }
    }

    println!("\n--- P-STATE SOURCES ---");
    for path in [paths.min_perf_pct(), paths.max_perf_pct(), paths.turbo_pct()] {
        match read_sysfs_string(&path) {
            Ok(raw) => println!("  {}: '{raw}'", path.display()),
            Err(e) => println!("  {}: {e}", path.display()),
        }
    }
    let bounds = cpu::read_performance_bounds(paths);
    println!(
        "Effective bounds: {}-{}% (performance {:.2})",
        bounds.min_percent,
        bounds.max_percent,
        bounds.performance_ratio()
    );

    println!("\n--- SENSOR COMMAND ---");
    println!("Command: {}", sampler.sensors().program());
    match sampler.sensors().run() {
        Ok(output) => {
            println!("Raw output:\n{output}");
            println!("Matched lines:");
            for (label, token) in sensors::parse_sensor_lines(&output) {
                let parsed = sensors::parse_celsius(&token)
                    .map_or_else(|| "unparsable".to_string(), |c| format!("{c:.1} °C"));
                println!("  {label}: '{token}' -> {parsed}");
            }
        }
        Err(e) => println!("Unavailable: {e}"),
    }

    println!("\n--- VISIBILITY ---");
    match &config.scheduler.visibility_file {
        Some(path) => println!("{}: {:?}", path.display(), read_visibility(path)),
        None => println!("No visibility file configured (always visible)"),
    }

    Ok(())
}
