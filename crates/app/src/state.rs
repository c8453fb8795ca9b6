use std::{fs, path::PathBuf};

use common::share::DEFAULT_MAX_SET_MEMBERS;
use serde::{Deserialize, Serialize};
use url::Url;

pub const APP_NAME: &str = "blobshare";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3179/";
pub const DEFAULT_UI_ROOT: &str = "/ui/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the blob server
    #[serde(default = "default_server_url")]
    pub server_url: Url,
    /// Token sent with every request, if the server wants one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    /// Path the server's web UI lives under
    #[serde(default = "default_ui_root")]
    pub ui_root: String,
    /// Most members per static set blob before a selection is split
    #[serde(default = "default_max_set_members")]
    pub max_set_members: usize,
}

fn default_server_url() -> Url {
    Url::parse(DEFAULT_SERVER_URL).expect("hardcoded URL must parse")
}

fn default_ui_root() -> String {
    DEFAULT_UI_ROOT.to_string()
}

fn default_max_set_members() -> usize {
    DEFAULT_MAX_SET_MEMBERS
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            auth_token: None,
            ui_root: default_ui_root(),
            max_set_members: default_max_set_members(),
        }
    }
}

impl AppConfig {
    /// Where the web UI would be served from; share URLs are resolved
    ///  against it
    pub fn ui_location(&self) -> Result<Url, url::ParseError> {
        self.server_url.join(&self.ui_root)
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the blobshare directory (~/.blobshare)
    pub app_dir: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the blobshare directory path (custom or default ~/.blobshare)
    pub fn app_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new blobshare directory
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let app_dir = Self::app_dir(custom_path)?;
        let config_path = app_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&app_dir)?;

        let config = config.unwrap_or_default();
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        Ok(Self {
            app_dir,
            config_path,
            config,
        })
    }

    /// Load existing state from the blobshare directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let app_dir = Self::app_dir(custom_path)?;
        let config_path = app_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Err(StateError::NotInitialized);
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            app_dir,
            config_path,
            config,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("blobshare directory not initialized. Run 'blobshare init' first")]
    NotInitialized,

    #[error("blobshare directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
