//! confab CLI
//!
//! Interactive team chat over a local dataset.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use clap::{Parser, Subcommand};
use tracing::info;

use confab::config::{Config, Overrides, Settings, default_config_path, default_data_dir};
use confab::console::{Console, Navigator};
use confab::logging::{self, LOG_ENV};
use confab::screens::{LoginScreen, Services};
use confab::session;
use confab::store::{Dataset, MemoryStore, save_dataset};

#[derive(Parser)]
#[command(name = "confab")]
#[command(about = "Team channels, messages, and projects in the terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session
    Run {
        /// Dataset file (default: from config, else the data directory)
        #[arg(long)]
        data: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Write a sample dataset and print its logins
    Seed {
        /// Dataset file to write
        #[arg(long)]
        data: Option<PathBuf>,

        /// Overwrite an existing dataset
        #[arg(long)]
        force: bool,
    },

    /// Show where config, data, and log files live
    Paths,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { data, no_color } => cmd_run(data, no_color),
        Commands::Seed { data, force } => cmd_seed(data, force),
        Commands::Paths => cmd_paths(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// SETTINGS
// ============================================================================

fn load_settings(data_file: Option<PathBuf>, no_color: bool) -> Result<Settings, String> {
    let config = Config::load().map_err(|e| e.to_string())?;
    let overrides = Overrides {
        data_file,
        no_color,
    };
    Ok(config.resolve(overrides, &default_data_dir()))
}

/// Install the file logger. The app runs without one if this fails.
fn start_logging(settings: &Settings) {
    if let Err(e) = logging::init(&settings.log_file, &settings.log_filter) {
        eprintln!("Note: logging disabled ({})", e);
    }
}

// ============================================================================
// COMMAND HANDLERS
// ============================================================================

fn cmd_run(data: Option<PathBuf>, no_color: bool) -> Result<(), String> {
    let settings = load_settings(data, no_color)?;
    start_logging(&settings);

    if !settings.data_file.exists() {
        return Err(format!(
            "No dataset at {}.\n\
             \n\
             Create one with: confab seed{}",
            settings.data_file.display(),
            data_flag(&settings.data_file)
        ));
    }

    let store = Rc::new(MemoryStore::open(&settings.data_file).map_err(|e| e.to_string())?);
    let (reader, control) = session::open();
    let control = Rc::new(control);

    let services = Services {
        auth: store.clone(),
        repo: store,
        session: reader,
    };

    let hook_control = Rc::clone(&control);
    let mut navigator = Navigator::new().on_logout(move || hook_control.clear());
    let mut console = Console::stdio().with_color(settings.color);

    info!(data = %settings.data_file.display(), "session started");
    navigator.run(Box::new(LoginScreen::new(services, control)), &mut console);
    info!("session ended");

    Ok(())
}

fn cmd_seed(data: Option<PathBuf>, force: bool) -> Result<(), String> {
    let settings = load_settings(data, false)?;

    if settings.data_file.exists() && !force {
        return Err(format!(
            "{} already exists. Use --force to overwrite it.",
            settings.data_file.display()
        ));
    }

    let (dataset, logins) = Dataset::sample().map_err(|e| e.to_string())?;
    save_dataset(&dataset, &settings.data_file).map_err(|e| e.to_string())?;

    println!("Wrote sample dataset to {}", settings.data_file.display());
    println!();
    println!("Logins (password = username):");
    for login in &logins {
        println!("  {:<8} {}", login.username, login.role);
    }
    println!();
    println!("Start with: confab run{}", data_flag(&settings.data_file));

    Ok(())
}

fn cmd_paths() -> Result<(), String> {
    let settings = load_settings(None, false)?;

    println!("Config:  {}", default_config_path().display());
    println!("Data:    {}", settings.data_file.display());
    println!("Log:     {}", settings.log_file.display());
    println!("Filter:  {} (override with {})", settings.log_filter, LOG_ENV);

    Ok(())
}

/// ` --data PATH` unless `path` is the default location.
fn data_flag(path: &Path) -> String {
    let default = Config::default().resolve(Overrides::default(), &default_data_dir());
    if path == default.data_file {
        String::new()
    } else {
        format!(" --data {}", path.display())
    }
}
