use anyhow::{Context, Result};
use log::LevelFilter;
use std::fs;
use std::path::{Path, PathBuf};

pub fn default_log_file() -> Option<PathBuf> {
    let base = dirs::cache_dir()?;
    Some(base.join("inkey").join("inkey.log"))
}

/// Parses a config level name; unknown names fall back to `info`.
pub fn level_from_name(name: &str) -> LevelFilter {
    name.parse().unwrap_or(LevelFilter::Info)
}

/// Raises `base` by one level per `--verbose` flag.
pub fn bump_level(base: LevelFilter, verbosity: u8) -> LevelFilter {
    LevelFilter::iter()
        .skip_while(|level| *level != base)
        .nth(verbosity as usize)
        .unwrap_or(LevelFilter::Trace)
}

/// Routes the `log` macros to `file`. The terminal is owned by the UI, so
/// nothing goes to stdout or stderr.
pub fn init(level: LevelFilter, file: &Path) -> Result<()> {
    if let Some(parent) = file.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}: {}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(
            fern::log_file(file)
                .with_context(|| format!("Failed to open log file {}", file.display()))?,
        )
        .apply()
        .context("Logger already initialized")?;
    Ok(())
}
