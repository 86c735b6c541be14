//! Configuration loading and root folder resolution
//!
//! Bootstrap settings come from a small TOML file. Every value has a
//! built-in default, so a missing file only produces a warning.
//!
//! Priority order for each value:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "WARDROBE_CONFIG";
/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV_VAR: &str = "WARDROBE_ROOT_FOLDER";
/// Environment variable carrying the news API key
pub const NEWS_API_KEY_ENV_VAR: &str = "WARDROBE_NEWS_API_KEY";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "wardrobe.db";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the database and bundled assets
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Path to SQLite database file (defaults to `<root>/wardrobe.db`)
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Insert the bundled clothing dataset when the clothing table is empty
    #[serde(default = "default_true")]
    pub seed_on_first_run: bool,

    /// Folder holding bundled seed images (defaults to `<root>/assets`)
    #[serde(default)]
    pub assets_dir: Option<PathBuf>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// News API configuration (optional)
    #[serde(default)]
    pub news: NewsConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// News API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NewsConfig {
    /// Search endpoint
    #[serde(default = "default_news_base_url")]
    pub base_url: String,

    /// API key sent in the query string
    #[serde(default)]
    pub api_key: Option<String>,

    /// Search term
    #[serde(default = "default_news_query")]
    pub query: String,

    /// Article language
    #[serde(default = "default_news_language")]
    pub language: String,

    /// Request timeout in seconds
    #[serde(default = "default_news_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_port() -> u16 {
    5740
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_news_base_url() -> String {
    "https://newsdata.io/api/1/news".to_string()
}

fn default_news_query() -> String {
    "fashion".to_string()
}

fn default_news_language() -> String {
    "en".to_string()
}

fn default_news_timeout_secs() -> u64 {
    30
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            database_path: None,
            port: default_port(),
            seed_on_first_run: true,
            assets_dir: None,
            logging: LoggingConfig::default(),
            news: NewsConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            base_url: default_news_base_url(),
            api_key: None,
            query: default_news_query(),
            language: default_news_language(),
            timeout_secs: default_news_timeout_secs(),
        }
    }
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config file: {}", e)))
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

/// Locate the config file
///
/// Explicit path, then `WARDROBE_CONFIG`, then the platform config directory
/// (`~/.config/wardrobe/config.toml` on Linux). Returns `None` when no
/// candidate exists.
pub fn locate_config_file(cli_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_path {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(path));
    }

    dirs::config_dir()
        .map(|d| d.join("wardrobe").join("config.toml"))
        .filter(|p| p.exists())
}

/// Load the bootstrap config, falling back to defaults
///
/// A missing file is not an error. A file that exists but fails to parse
/// is, since silently ignoring it would hide the user's settings.
pub fn load_toml_config(cli_path: Option<&Path>) -> Result<TomlConfig> {
    match locate_config_file(cli_path) {
        Some(path) if path.exists() => {
            info!("Loading config file: {}", path.display());
            TomlConfig::load(&path)
        }
        Some(path) => {
            warn!("Config file not found: {} (using defaults)", path.display());
            Ok(TomlConfig::default())
        }
        None => {
            info!("No config file found, using built-in defaults");
            Ok(TomlConfig::default())
        }
    }
}

/// Root folder resolution following the priority order above
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
    toml_value: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(cli_arg: Option<PathBuf>, toml_value: Option<PathBuf>) -> Self {
        Self { cli_arg, toml_value }
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV_VAR) {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &self.toml_value {
            return path.clone();
        }

        default_root_folder()
    }
}

/// Get OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("wardrobe"))
        .unwrap_or_else(|| PathBuf::from("./wardrobe_data"))
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub root_folder: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub assets_dir: Option<PathBuf>,
    pub port: Option<u16>,
    pub no_seed: bool,
}

/// Fully resolved configuration used at startup
#[derive(Debug, Clone)]
pub struct WardrobeConfig {
    pub root_folder: PathBuf,
    pub database_path: PathBuf,
    pub assets_dir: PathBuf,
    pub port: u16,
    pub seed_on_first_run: bool,
    pub log_level: String,
    pub news: NewsConfig,
}

impl WardrobeConfig {
    /// Merge TOML values, environment and command-line overrides
    pub fn resolve(toml: TomlConfig, overrides: &ConfigOverrides) -> Self {
        let root_folder =
            RootFolderResolver::new(overrides.root_folder.clone(), toml.root_folder.clone())
                .resolve();

        let database_path = overrides
            .database_path
            .clone()
            .or(toml.database_path)
            .unwrap_or_else(|| root_folder.join(DATABASE_FILE_NAME));

        let assets_dir = overrides
            .assets_dir
            .clone()
            .or(toml.assets_dir)
            .unwrap_or_else(|| root_folder.join("assets"));

        let mut news = toml.news;
        if let Ok(key) = std::env::var(NEWS_API_KEY_ENV_VAR) {
            if !key.is_empty() {
                news.api_key = Some(key);
            }
        }

        Self {
            root_folder,
            database_path,
            assets_dir,
            port: overrides.port.unwrap_or(toml.port),
            seed_on_first_run: toml.seed_on_first_run && !overrides.no_seed,
            log_level: toml.logging.level,
            news,
        }
    }

    /// Create the root folder if it does not exist
    pub fn ensure_root_folder(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root_folder)?;
        Ok(())
    }
}
