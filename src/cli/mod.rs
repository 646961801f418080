//! Command-line interface for inspecting and watching preferences.

pub mod formatting;

use std::{env, path::PathBuf, process::ExitCode, sync::Arc, time::Duration};

use clap::{Parser, Subcommand};
use futures::StreamExt;
use tracing::{debug, info};

use crate::{
    Result,
    config::{Config, ConfigPaths},
    preferences::{ChangeEvent, LoadError, Notifier, PreferenceService},
    workspace::{FileWatcher, LocalStore},
};
use formatting::{format_change, format_error, format_note, format_value};

/// Read and watch workspace preferences.
#[derive(Parser, Debug)]
#[command(name = "prefsync", version)]
pub struct Cli {
    /// Workspace root (defaults to the configured root, then the current directory)
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// Preference document path relative to the workspace root
    #[arg(short, long, global = true)]
    pub path: Option<String>,

    /// Settings file (defaults to $XDG_CONFIG_HOME/prefsync/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the value of a preference
    Get {
        /// Preference name (e.g. editor.fontSize)
        name: String,
    },
    /// Report whether a preference is set
    Has {
        /// Preference name
        name: String,
    },
    /// Print every preference in document order
    List,
    /// Print preference changes as they happen, until interrupted
    Watch {
        /// Only show preferences matching this pattern (e.g. "editor.*")
        #[arg(default_value = "*")]
        pattern: String,
    },
}

impl Cli {
    /// Loads the settings file and applies command-line overrides.
    ///
    /// # Errors
    /// Returns error if the settings file is invalid or an override is invalid.
    pub fn load_config(&self) -> Result<Config> {
        let settings_file = match &self.config {
            Some(path) => Some(path.clone()),
            None => ConfigPaths::main_config().ok(),
        };

        let mut config = match settings_file {
            Some(path) => Config::load(&path)?,
            None => Config::default(),
        };

        if let Some(root) = &self.root {
            config.preferences.workspace_root = Some(root.clone());
        }
        if let Some(path) = &self.path {
            config.preferences.path = path.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

/// Executes the parsed command.
///
/// # Errors
/// Returns error if the workspace root cannot be determined or file
/// watching cannot be set up. Preference load failures are reported but
/// are not errors.
pub async fn run(cli: &Cli, config: &Config) -> Result<ExitCode> {
    let root = match &config.preferences.workspace_root {
        Some(root) => root.clone(),
        None => env::current_dir()?,
    };
    let store = Arc::new(LocalStore::new(root));
    let color = !cli.no_color;

    if let Commands::Watch { pattern } = &cli.command {
        return watch(store, config, pattern, color).await;
    }

    let service = PreferenceService::new(
        store,
        futures::stream::empty::<ChangeEvent>(),
        &config.preferences.path,
    );
    service.settled().await;
    report_load_error(&service, color);

    let code = match &cli.command {
        Commands::Get { name } => match service.get(name) {
            Some(value) => {
                println!("{}", format_value(&value));
                ExitCode::SUCCESS
            }
            None => {
                eprintln!("{name} is not set");
                ExitCode::FAILURE
            }
        },
        Commands::Has { name } => {
            println!("{}", service.has(name));
            ExitCode::SUCCESS
        }
        Commands::List => {
            if let Some(snapshot) = service.snapshot() {
                for (name, value) in snapshot.values() {
                    println!("{name} = {}", format_value(value));
                }
            }
            ExitCode::SUCCESS
        }
        Commands::Watch { .. } => ExitCode::SUCCESS,
    };

    service.shutdown();
    Ok(code)
}

async fn watch(
    store: Arc<LocalStore>,
    config: &Config,
    pattern: &str,
    color: bool,
) -> Result<ExitCode> {
    let document = store.document_path(&config.preferences.path);
    let debounce = Duration::from_millis(config.preferences.debounce_ms);
    let (watcher, changes) = FileWatcher::watch_file(&document, debounce)?;
    debug!(watched = %watcher.watched().display(), "File watcher ready");

    let notifier = Notifier::new();
    let mut subscription = notifier.subscribe_stream(pattern);
    let service = PreferenceService::with_notifier(
        store,
        changes,
        &config.preferences.path,
        notifier,
    );

    info!(document = %document.display(), pattern, "Watching preferences");

    loop {
        tokio::select! {
            change = subscription.next() => {
                let Some(change) = change else {
                    break;
                };
                println!("{}", format_change(&change, color));
            }

            _ = tokio::signal::ctrl_c() => break,
        }
    }

    service.shutdown();
    Ok(ExitCode::SUCCESS)
}

fn report_load_error(service: &PreferenceService, color: bool) {
    let Some(error) = service.last_error() else {
        return;
    };

    let message = match error.as_ref() {
        LoadError::NotFound { uri } => format!("no preference document at {uri}"),
        other => other.to_string(),
    };

    if color {
        eprintln!("{}", format_note(&message));
    } else {
        eprintln!("{message}");
    }
}

/// Prints an error in the CLI's error style.
pub fn print_error(message: &str) {
    eprintln!("{}", format_error(message));
}
