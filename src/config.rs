use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme: String,
    pub bat_theme_dir: Option<PathBuf>,
    pub extensions: Vec<String>,
    pub chrome_reserve: u16,
    pub show_line_numbers: bool,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            bat_theme_dir: dirs::config_dir().map(|dir| dir.join("bat").join("themes")),
            extensions: vec!["ini".to_string()],
            chrome_reserve: 4,
            show_line_numbers: true,
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct PartialConfig {
    theme: Option<String>,
    bat_theme_dir: Option<PathBuf>,
    extensions: Option<Vec<String>>,
    chrome_reserve: Option<u16>,
    show_line_numbers: Option<bool>,
    log_level: Option<String>,
}

impl PartialConfig {
    /// Fills missing keys from the defaults; the flag says whether any were missing.
    fn apply_defaults(self) -> (Config, bool) {
        let defaults = Config::default();
        let mut changed = false;
        let cfg = Config {
            theme: or_default(self.theme, defaults.theme, &mut changed),
            bat_theme_dir: or_default(
                self.bat_theme_dir.map(Some),
                defaults.bat_theme_dir,
                &mut changed,
            ),
            extensions: or_default(self.extensions, defaults.extensions, &mut changed),
            chrome_reserve: or_default(self.chrome_reserve, defaults.chrome_reserve, &mut changed),
            show_line_numbers: or_default(
                self.show_line_numbers,
                defaults.show_line_numbers,
                &mut changed,
            ),
            log_level: or_default(self.log_level, defaults.log_level, &mut changed),
        };
        (cfg, changed)
    }
}

fn or_default<T>(value: Option<T>, default: T, changed: &mut bool) -> T {
    match value {
        Some(v) => v,
        None => {
            *changed = true;
            default
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    Ok(base.join("inkey").join("config.toml"))
}

pub fn ensure_config_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(())
}

pub fn load_config() -> Result<Config> {
    let path = config_path()?;
    if !path.exists() {
        let cfg = Config::default();
        write_config(&cfg)?;
        return Ok(cfg);
    }

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let (cfg, changed) = parse_config(&raw)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    if changed {
        write_config(&cfg)?;
    }
    Ok(cfg)
}

fn parse_config(raw: &str) -> Result<(Config, bool)> {
    let partial: PartialConfig = toml::from_str(raw)?;
    Ok(partial.apply_defaults())
}

pub fn write_config(cfg: &Config) -> Result<()> {
    let path = config_path()?;
    ensure_config_dir(&path)?;
    let text = toml::to_string_pretty(cfg).context("Failed to serialize config")?;
    fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

pub fn open_config_in_editor() -> Result<()> {
    let path = config_path()?;
    if !path.exists() {
        let cfg = Config::default();
        write_config(&cfg)?;
    }

    let editor = env::var("EDITOR").unwrap_or_else(|_| "nvim".to_string());
    let mut parts = match shell_words::split(&editor) {
        Ok(p) if !p.is_empty() => p,
        _ => vec![editor],
    };
    let cmd = parts.remove(0);
    let status = Command::new(cmd)
        .args(parts)
        .arg(&path)
        .status()
        .with_context(|| format!("Failed to launch editor for {}", path.display()))?;
    if !status.success() {
        anyhow::bail!("Editor exited with status {}", status);
    }
    Ok(())
}
