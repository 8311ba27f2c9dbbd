mod app;
mod cli;
mod components;
mod message;
mod views;

use std::process::ExitCode;

use clap::Parser;

use crate::cli::Cli;

fn main() -> ExitCode {
    let _ = env_logger::Builder::from_default_env()
        .format_timestamp_secs()
        .try_init();

    let args = Cli::parse();
    match args.command {
        Some(command) => cli::run(command),
        None => match app::run() {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                log::error!("Window closed with an error: {err}");
                ExitCode::FAILURE
            }
        },
    }
}
