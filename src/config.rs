use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";

/// Main application configuration
///
/// The API key is injected from here into the HTTP client; nothing below
/// `main` reads ambient environment state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API key for the generative language endpoint
    pub api_key: Option<String>,

    /// Model identifier appended to the endpoint path
    pub model: String,

    /// Endpoint base URL (overridden in tests to point at a mock server)
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 60,
        }
    }
}

impl Config {
    /// Load configuration from `~/.pen2pdf/config.toml`, falling back to
    /// defaults when the file does not exist.
    pub fn load() -> Result<Self> {
        let home = app_home()?;
        fs::create_dir_all(&home).context("Failed to create .pen2pdf directory")?;
        Self::load_from(&home.join("config.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Config::default())
        }
    }

    /// Get API key from config or environment
    pub fn api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
    }

    /// Check if an API key is configured anywhere
    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some()
    }
}

/// Application data directory, `~/.pen2pdf`.
pub fn app_home() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".pen2pdf"))
}

/// Diagnostic log file path. Logs go to a file so they never write over
/// the terminal UI.
pub fn log_path() -> Result<PathBuf> {
    Ok(app_home()?.join("pen2pdf.log"))
}
