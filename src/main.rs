mod cli;
mod config;
mod core;
mod cpu;
mod daemon;
mod monitor;
mod presenter;
mod scheduler;
mod sensors;
mod util;
mod visibility;

use crate::config::AppConfig;
use crate::monitor::Sampler;
use crate::presenter::ConsolePresenter;
use crate::util::error::AppError;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Option<Commands>,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Take one sample and print it
    Info,
    /// Sample periodically until interrupted
    Watch {
        #[clap(long)]
        verbose: bool,
    },
    /// Display debug information about every sampling source
    Debug,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match config::load_config_from_path(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) if cli.config.is_some() => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error loading configuration: {e}. Using default values.");
            AppConfig::default()
        }
    };

    let command_result: Result<(), AppError> = match cli.command {
        Some(Commands::Info) => {
            let mut sampler = Sampler::from_config(&config.sampler);
            let snapshot = sampler.sample();
            println!("--- {} ---", snapshot.taken_at.format("%Y-%m-%d %H:%M:%S"));
            presenter::present(&mut ConsolePresenter::stdout(), &snapshot);
            Ok(())
        }
        Some(Commands::Watch { verbose }) => daemon::run_daemon(config, verbose),
        Some(Commands::Debug) => cli::debug::run_debug(&config),
        None => {
            println!("Welcome to pstatectl! Use --help for commands.");
            println!("Current effective configuration: {config:?}");
            Ok(())
        }
    };

    if let Err(e) = command_result {
        eprintln!("Error executing command: {e}");
        if let Some(source) = std::error::Error::source(&e) {
            eprintln!("Caused by: {source}");
        }
        std::process::exit(1);
    }
}
