use clap::Parser;
use kakeibo_sync::args::{Args, Command};
use kakeibo_sync::{commands, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().kakeibo_home().path();

    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args)?.print(),
        Command::Sync(_sync_args) => commands::sync(Config::load(home)?)?.print(),
        Command::Import(import_args) => {
            commands::import(Config::load(home)?, import_args.memo())?.print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "kakeibo_sync={level},{}={level}",
                env!("CARGO_BIN_NAME")
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
