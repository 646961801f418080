//! prefsync - inspect and watch workspace preferences from the command line.

use std::process::ExitCode;

use clap::Parser;
use prefsync::{
    cli::{self, Cli, Commands},
    tracing_config,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            cli::print_error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    let logging = match cli.command {
        Commands::Watch { .. } => tracing_config::init_with_file(&config.general).map(Some),
        _ => tracing_config::init(&config.general).map(|()| None),
    };
    let _log_guard = match logging {
        Ok(guard) => guard,
        Err(e) => {
            cli::print_error(&e.to_string());
            None
        }
    };

    match cli::run(&cli, &config).await {
        Ok(code) => code,
        Err(e) => {
            cli::print_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
