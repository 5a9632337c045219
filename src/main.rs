mod app;
mod command;
mod config;
mod document;
mod files;
mod logging;
mod render;
mod search;
mod theme;
mod view;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "inkey",
    about = "Terminal editor for INI configuration files",
    disable_version_flag = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// INI file to open
    file: Option<PathBuf>,

    /// Print version information
    #[arg(short = 'v', long = "version")]
    display_version: bool,

    /// Write logs to this file instead of the cache directory
    #[arg(long = "log-file", value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (repeatable)
    #[arg(long = "verbose", action = ArgAction::Count)]
    verbosity: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the config file in $EDITOR (default: nvim)
    Config,
    /// List available themes
    Themes,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.display_version {
        println!("inkey {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if let Some(command) = cli.command {
        match command {
            Commands::Config => return config::open_config_in_editor(),
            Commands::Themes => {
                let cfg = config::load_config()?;
                let manager = theme::ThemeManager::load(&cfg)?;
                for name in manager.theme_names() {
                    println!("{name}");
                }
                return Ok(());
            }
        }
    }

    let cfg = config::load_config()?;
    let level = logging::bump_level(logging::level_from_name(&cfg.log_level), cli.verbosity);
    if let Some(file) = cli.log_file.or_else(logging::default_log_file) {
        if let Err(err) = logging::init(level, &file) {
            eprintln!("inkey: logging disabled: {err:#}");
        }
    }

    app::run_app(cli.file, cfg)
}
