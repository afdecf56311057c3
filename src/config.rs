use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::filter::PacketFilter;
use crate::unpacker::Limits;

pub const CONFIG_PATH_VAR: &str = "PACKET_LOGGER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "packet-logger-config.json";
pub const DEFAULT_LOG_DIR: &str = "package-logger";
pub const DEFAULT_PREVIEW_CHARS: usize = 300;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Colored preview lines on the chat surface.
    #[default]
    Chat,
    /// Full lines appended to the session log file.
    File,
}

impl OutputMode {
    /// Cycles chat -> file -> chat.
    pub fn next(self) -> Self {
        match self {
            OutputMode::Chat => OutputMode::File,
            OutputMode::File => OutputMode::Chat,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub logging_enabled: bool,
    pub output_mode: OutputMode,
    /// When off, packets are logged by name only with `{}` as data.
    pub deep_logging: bool,
    pub selected_inbound: BTreeSet<String>,
    pub selected_outbound: BTreeSet<String>,
    pub log_dir: PathBuf,
    pub limits: Limits,
    pub chat_preview_chars: usize,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            logging_enabled: true,
            output_mode: OutputMode::Chat,
            deep_logging: true,
            selected_inbound: BTreeSet::new(),
            selected_outbound: BTreeSet::new(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            limits: Limits::default(),
            chat_preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

impl LoggerConfig {
    /// Reads the config at `path`. A missing file yields the defaults, which
    /// are written back so the user has something to edit.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            info!("Wrote default config to {}", path.display());
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: LoggerConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        Ok(())
    }

    pub fn filter(&self) -> PacketFilter {
        PacketFilter::new(
            self.selected_inbound.iter().cloned(),
            self.selected_outbound.iter().cloned(),
        )
    }
}

/// Process-level settings taken from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub config_path: PathBuf,
}

impl Settings {
    pub fn from_env() -> Self {
        // Current dir, then the workspace root when run from a member dir.
        let env_locations = [".env", "../../.env", "../.env"];

        let mut loaded = false;
        for location in &env_locations {
            let path = Path::new(location);
            if path.exists() && dotenv::from_path(path).is_ok() {
                loaded = true;
                break;
            }
        }
        if !loaded {
            dotenv::dotenv().ok();
        }

        let config_path = std::env::var(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self { config_path }
    }

    pub fn load_config(&self) -> Result<LoggerConfig> {
        LoggerConfig::load_from(&self.config_path)
    }
}

/// Config handle shared between the host UI and the logger. The logger only
/// ever reads snapshots.
#[derive(Debug, Clone, Default)]
pub struct SharedConfig(Arc<RwLock<LoggerConfig>>);

impl SharedConfig {
    pub fn new(config: LoggerConfig) -> Self {
        Self(Arc::new(RwLock::new(config)))
    }

    pub fn snapshot(&self) -> LoggerConfig {
        match self.0.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut LoggerConfig),
    {
        match self.0.write() {
            Ok(mut guard) => f(&mut guard),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }
}

impl From<LoggerConfig> for SharedConfig {
    fn from(config: LoggerConfig) -> Self {
        Self::new(config)
    }
}
