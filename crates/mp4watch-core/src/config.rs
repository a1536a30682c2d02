use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Global configuration loaded from `~/.config/mp4watch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Seconds before an unconsumed pending download injection expires.
    pub pending_ttl_secs: u64,
    /// Maximum number of pending download injections held at once.
    pub pending_max_entries: usize,
    /// Origin prefix identifying requests initiated by this extension
    /// (the only requests eligible for header injection). None disables
    /// injection entirely.
    #[serde(default)]
    pub self_origin: Option<String>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            pending_ttl_secs: 120,
            pending_max_entries: 64,
            self_origin: None,
        }
    }
}

impl WatchConfig {
    pub fn pending_ttl_ms(&self) -> u64 {
        self.pending_ttl_secs.saturating_mul(1000)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mp4watch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<WatchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = WatchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: WatchConfig = toml::from_str(&data)?;
    Ok(cfg)
}
