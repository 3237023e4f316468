//! Gridboard - CLI entry point
//!
//! Runs the dashboard TUI and offers a few commands for inspecting and
//! resetting the persisted layout and managing the configuration file.

use clap::{Parser, Subcommand};
use gridboard::config::{
    default, error::ConfigError, loader::ConfigLoader, schema::Config, xdg,
};
use gridboard::engine::GridContainer;
use gridboard::layout::{default_arrangement, Arrangement};
use gridboard::logging;
use gridboard::store::{LayoutStore, StoredLayout};
use gridboard::tui::app::App;
use gridboard::view::DashboardView;
use local_kv::FileStore;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Name of the dashboard container.
const CONTAINER_NAME: &str = "dashboard";

/// Grid dashboard with persistent widget layouts
#[derive(Parser)]
#[command(name = "gridboard")]
#[command(version, about = "Grid dashboard with persistent, resettable widget layouts")]
struct Cli {
    /// Configuration file (defaults to the XDG location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the gridboard CLI
#[derive(Subcommand)]
enum Commands {
    /// Launch the terminal dashboard
    Tui,

    /// Print the saved layout, or the default when none is usable
    Show,

    /// Delete the saved layout
    Reset,

    /// Manage configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Actions for the `config` subcommand.
#[derive(Subcommand)]
enum ConfigAction {
    /// Create default configuration file
    Init {
        /// Overwrite existing configuration (creates backup)
        #[arg(long)]
        force: bool,
    },
    /// Show configuration file path
    Path,
    /// Validate configuration file
    Validate,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Tui => with_config(config_path, true, run_tui),
        Commands::Show => with_config(config_path, false, run_show_command),
        Commands::Reset => with_config(config_path, false, run_reset_command),
        Commands::Config { action } => run_config_command(config_path, action),
    }
}

/// Loads the configuration, starts logging and hands over to `run`.
///
/// `interactive` commands own the terminal, so they only log to a file.
fn with_config(
    path: Option<&Path>,
    interactive: bool,
    run: fn(&Config) -> ExitCode,
) -> ExitCode {
    let config = match load_config(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = logging::init(&config.log, interactive) {
        eprintln!("Warning: logging disabled: {e}");
    }
    run(&config)
}

/// Loads and validates the configuration.
fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config = ConfigLoader::load(path)?;
    config.validate()?;
    Ok(config)
}

/// Layout store backed by the configured storage directory.
fn layout_store(config: &Config) -> LayoutStore<FileStore> {
    let kv = FileStore::new(config.storage.resolved_dir());
    LayoutStore::with_key(kv, &config.storage.key)
}

/// Runs the TUI until the user quits.
fn run_tui(config: &Config) -> ExitCode {
    let tick_rate = match config.tui.tick_rate() {
        Ok(rate) => rate,
        Err(e) => {
            eprintln!("Config error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to create tokio runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let container = GridContainer::new(CONTAINER_NAME, config.grid.column);
    let view = DashboardView::with_store(layout_store(config), container);
    let mut app = App::new(view, config.grid.clone(), tick_rate);
    if let Err(e) = rt.block_on(app.run()) {
        eprintln!("TUI error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// Prints what is stored under the layout key.
fn run_show_command(config: &Config) -> ExitCode {
    let store = layout_store(config);
    let stored = store.inspect();
    println!("{}", stored.describe());

    let (label, arrangement) = match stored {
        StoredLayout::Found(arrangement) => ("saved", arrangement),
        _ => ("default", default_arrangement()),
    };
    match render_arrangement(&arrangement) {
        Ok(json) => {
            println!("{label} layout:");
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: failed to encode layout: {e}");
            ExitCode::FAILURE
        }
    }
}

fn render_arrangement(arrangement: &Arrangement) -> serde_json::Result<String> {
    serde_json::to_string_pretty(arrangement)
}

/// Deletes the saved layout.
fn run_reset_command(config: &Config) -> ExitCode {
    let store = layout_store(config);
    match store.clear() {
        Ok(()) => {
            println!("Cleared saved layout `{}`", store.key());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_config_command(path: Option<&Path>, action: ConfigAction) -> ExitCode {
    let result = match action {
        ConfigAction::Init { force } => {
            default::create_default_config(path, force).map(|created| {
                println!("Created configuration at {}", created.display());
            })
        }
        ConfigAction::Path => {
            let shown = path.map(Path::to_path_buf).unwrap_or_else(xdg::config_path);
            println!("{}", shown.display());
            Ok(())
        }
        ConfigAction::Validate => load_config(path).map(|config| {
            println!("Configuration is valid");
            println!("{config:#?}");
        }),
    };
    if let Err(e) = result {
        eprintln!("Config error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
