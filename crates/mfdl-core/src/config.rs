use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::extract::ExtractorKind;

/// Default pause between consecutive URLs.
pub const DEFAULT_SLEEP_MS: u64 = 200;

/// HTTP transport settings (optional `[http]` table in a `--config` file).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Overall per-request timeout in seconds (covers the whole body transfer).
    pub timeout_secs: u64,
    /// Maximum number of redirects followed per request.
    pub max_redirections: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("mediafire-dl/", env!("CARGO_PKG_VERSION")).to_string(),
            connect_timeout_secs: 30,
            timeout_secs: 3600,
            max_redirections: 10,
        }
    }
}

/// Contents of a TOML config file. Only read when passed explicitly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub http: HttpConfig,
}

/// Resolved, immutable settings for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory downloads are written to; created if missing.
    pub output_directory: PathBuf,
    /// Pause after every URL except the last.
    pub sleep_ms: u64,
    /// Strategy used to pull the filename and download link out of a page.
    pub extractor: ExtractorKind,
    pub http: HttpConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            output_directory: PathBuf::from("."),
            sleep_ms: DEFAULT_SLEEP_MS,
            extractor: ExtractorKind::default(),
            http: HttpConfig::default(),
        }
    }
}

impl RunConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.sleep_ms)
    }
}

/// Load a config file. Missing keys fall back to defaults.
pub fn load_from_path(path: &Path) -> Result<FileConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let cfg: FileConfig =
        toml::from_str(&data).with_context(|| format!("failed to parse {}", path.display()))?;
    tracing::debug!("loaded config from {}: {:?}", path.display(), cfg);
    Ok(cfg)
}
