use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// External fetch tool parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Program invoked to retrieve media (must be on PATH or an absolute path).
    pub program: String,
    /// Format selector passed via `-f`: best video plus best audio, falling
    /// back to the best combined stream.
    pub format: String,
    /// Hard cap on a single invocation, in seconds; the child is killed on expiry.
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            program: "yt-dlp".to_string(),
            format: "bv*+ba/b".to_string(),
            timeout_secs: 600,
        }
    }
}

/// Global configuration loaded from `~/.config/vidchute/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VidchuteConfig {
    /// Address the HTTP server binds, e.g. "127.0.0.1:8080".
    pub listen_addr: String,
    /// Substring a submitted URL must contain to be accepted. A coarse
    /// convenience filter, not a security boundary.
    pub url_must_contain: String,
    /// Extension minted artifact names carry (without the dot).
    pub artifact_ext: String,
    /// Age in seconds past which the janitor removes an uncollected artifact.
    pub max_artifact_age_secs: u64,
    /// Directory holding artifacts; if missing, `$XDG_CACHE_HOME/vidchute/downloads`.
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
    /// Optional fetch tool settings; if missing, built-in defaults are used.
    #[serde(default)]
    pub fetch: Option<FetchConfig>,
}

impl Default for VidchuteConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            url_must_contain: "youtube.com".to_string(),
            artifact_ext: "mp4".to_string(),
            max_artifact_age_secs: 3600,
            scratch_dir: None,
            fetch: None,
        }
    }
}

impl VidchuteConfig {
    /// Fetch tool settings with the optional section applied over defaults.
    pub fn fetch_config(&self) -> FetchConfig {
        self.fetch.clone().unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("vidchute")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Scratch directory used when neither config nor CLI supplies one.
pub fn default_scratch_dir() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("vidchute")?;
    Ok(xdg_dirs.get_cache_home().join("downloads"))
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<VidchuteConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = VidchuteConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: VidchuteConfig = toml::from_str(&data)?;
    Ok(cfg)
}
