use crate::config::{AppConfig, LogLevel};
use crate::monitor::Sampler;
use crate::presenter::{ConsolePresenter, Presenter, StatsFilePresenter};
use crate::scheduler::Scheduler;
use crate::util::error::AppError;
use crate::visibility::VisibilityWatcher;
use log::{LevelFilter, debug, info};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// How often the main loop checks for shutdown and visibility changes.
const CONTROL_POLL: Duration = Duration::from_millis(100);

/// Run the sampling service until interrupted
pub fn run_daemon(config: AppConfig, verbose: bool) -> Result<(), AppError> {
    // Set effective log level based on config and verbose flag
    let effective_log_level = if verbose {
        LogLevel::Debug
    } else {
        config.scheduler.log_level
    };

    // Update the log level filter if needed, without re-initializing the logger
    log::set_max_level(LevelFilter::from(effective_log_level));

    info!("Starting pstatectl...");

    // Create a flag that will be set to false when a signal is received
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        info!("Received shutdown signal, exiting...");
        r.store(false, Ordering::SeqCst);
    })?;

    let mut presenters: Vec<Box<dyn Presenter + Send>> = vec![Box::new(ConsolePresenter::stdout())];
    if let Some(stats_path) = &config.scheduler.stats_file_path {
        info!("Stats will be written to: {}", stats_path.display());
        presenters.push(Box::new(StatsFilePresenter::new(stats_path)));
    }

    let sampler = Sampler::from_config(&config.sampler);
    let mut scheduler = Scheduler::new(sampler, presenters, config.scheduler.interval());

    let mut visibility_watcher = match &config.scheduler.visibility_file {
        Some(path) => {
            let watcher = VisibilityWatcher::new(path)?;
            info!("Watching visibility file: {}", path.display());
            scheduler.on_visibility_changed(watcher.current());
            Some(watcher)
        }
        None => {
            debug!("No visibility file configured, sampling continuously");
            scheduler.start();
            None
        }
    };

    while running.load(Ordering::SeqCst) {
        if let Some(watcher) = &mut visibility_watcher {
            if let Some(visibility) = watcher.check_for_changes() {
                scheduler.on_visibility_changed(visibility);
            }
        }
        std::thread::sleep(CONTROL_POLL);
    }

    scheduler.stop();
    info!("pstatectl stopped");
    Ok(())
}
