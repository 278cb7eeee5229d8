use std::{env, path::PathBuf};

use super::schema::Settings;

const APP_DIR: &str = "cadenza";

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `CADENZA__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("CADENZA")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.audio.initial_volume > 100 {
            return Err("audio.initial_volume must be <= 100".to_string());
        }
        if self.audio.tick_ms == 0 {
            return Err("audio.tick_ms must be >= 1".to_string());
        }
        if self.library.max_depth == Some(0) {
            return Err("library.max_depth must be >= 1".to_string());
        }
        if self.ui.volume_step == 0 {
            return Err("ui.volume_step must be >= 1".to_string());
        }
        Ok(())
    }

    /// Key-value storage file, from `storage.path` or the XDG data dir.
    pub fn storage_path(&self) -> Option<PathBuf> {
        self.storage
            .path
            .clone()
            .or_else(|| default_data_dir().map(|d| d.join("storage.json")))
    }

    /// Log file, from `logging.file` or the XDG state dir.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.logging
            .file
            .clone()
            .or_else(|| default_state_dir().map(|d| d.join("cadenza.log")))
    }
}

/// Resolve the config path from `CADENZA_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("CADENZA_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/cadenza/config.toml`
/// or `~/.config/cadenza/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", &[".config"]).map(|d| d.join("config.toml"))
}

/// `$XDG_DATA_HOME/cadenza` or `~/.local/share/cadenza`.
pub fn default_data_dir() -> Option<PathBuf> {
    xdg_dir("XDG_DATA_HOME", &[".local", "share"])
}

/// `$XDG_STATE_HOME/cadenza` or `~/.local/state/cadenza`.
pub fn default_state_dir() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", &[".local", "state"])
}

fn xdg_dir(var: &str, home_fallback: &[&str]) -> Option<PathBuf> {
    let base = if let Some(xdg) = env::var_os(var) {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(home_fallback.iter().fold(PathBuf::from(home), |p, c| p.join(c)))
    } else {
        None
    };

    base.map(|d| d.join(APP_DIR))
}
