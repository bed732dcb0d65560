use crate::error::{Result, TallyError};
use crate::paths::home;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_MAX_RETRIES: u32 = 5;
const DEFAULT_INITIAL_BACKOFF_MS: u64 = 100;
const DEFAULT_MAX_BACKOFF_MS: u64 = 1000;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TallyConfig {
    #[serde(default)]
    pub locking: LockingConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(skip)]
    home: PathBuf,
}

/// Retry policy for lock acquisition, exposed as configuration rather than
/// baked-in protocol constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockingConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

impl Default for LockingConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff_ms: DEFAULT_INITIAL_BACKOFF_MS,
            max_backoff_ms: DEFAULT_MAX_BACKOFF_MS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Overrides the directory relative counter names resolve against.
    #[serde(default)]
    pub counters_dir: Option<PathBuf>,
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_initial_backoff_ms() -> u64 {
    DEFAULT_INITIAL_BACKOFF_MS
}

fn default_max_backoff_ms() -> u64 {
    DEFAULT_MAX_BACKOFF_MS
}

impl TallyConfig {
    /// Load configuration from `config.toml` under the given home directory,
    /// falling back to defaults when the file does not exist.
    pub fn new(home: PathBuf) -> Result<Self> {
        let config_path = home.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            log::debug!("Config file not found at {config_path:?}, using defaults");
            return Ok(Self {
                home,
                ..Self::default()
            });
        }

        let contents = fs::read_to_string(&config_path).map_err(|e| {
            TallyError::ConfigError(format!("Failed to read {}: {e}", config_path.display()))
        })?;
        let mut config: TallyConfig = toml::from_str(&contents)
            .map_err(|e| TallyError::ConfigError(format!("Failed to parse config.toml: {e}")))?;
        config.home = home;

        log::debug!("Loaded config from {config_path:?}");
        Ok(config)
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Directory relative counter names resolve against.
    pub fn counters_dir(&self) -> PathBuf {
        self.storage
            .counters_dir
            .clone()
            .unwrap_or_else(|| home::counters_dir(&self.home))
    }

    /// Resolve a counter name into its on-disk resource path.
    pub fn resolve_resource(&self, resource: &Path) -> PathBuf {
        if resource.is_absolute() {
            resource.to_path_buf()
        } else {
            self.counters_dir().join(resource)
        }
    }
}

/// Resolve the tally home and load the configuration stored there.
pub fn new_tally_config() -> Result<TallyConfig> {
    TallyConfig::new(home::tally_home()?)
}
