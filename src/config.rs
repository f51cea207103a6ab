use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the chat endpoint
pub const ENDPOINT_ENV: &str = "CHATBOX_ENDPOINT";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// URL the chat form posts to
    pub endpoint: String,

    /// Log file for interactive sessions; defaults to `chatbox.log` in the
    /// chatbox home directory
    pub log_file: Option<PathBuf>,

    /// UI preferences
    pub ui: UiConfig,

    /// Chatbox home directory
    #[serde(skip)]
    pub chatbox_home: PathBuf,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Placeholder shown until the first message is sent; empty disables it
    pub welcome_message: String,
    pub input_placeholder: String,
    pub show_timestamps: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            welcome_message: "Hello! Ask me anything to get started.".to_string(),
            input_placeholder: "Type your message...".to_string(),
            show_timestamps: true,
        }
    }
}

impl UiConfig {
    pub fn welcome(&self) -> Option<String> {
        let text = self.welcome_message.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            endpoint: "http://127.0.0.1:5000/api/chat".to_string(),
            log_file: None,
            ui: UiConfig::default(),
            chatbox_home: default_home(),
        }
    }
}

fn default_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".chatbox")
}

impl Config {
    /// Load `~/.chatbox/config.toml`, falling back to defaults when absent,
    /// then apply the environment override
    pub fn load() -> Result<Self> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        let chatbox_home = home.join(".chatbox");

        // Ensure chatbox directory exists
        fs::create_dir_all(&chatbox_home).context("Failed to create .chatbox directory")?;

        let mut config = Self::load_from(&chatbox_home.join("config.toml"))?;
        config.chatbox_home = chatbox_home;
        Ok(config)
    }

    /// Load a specific config file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        } else {
            Config::default()
        };

        if let Some(parent) = path.parent() {
            config.chatbox_home = parent.to_path_buf();
        }
        config.apply_env();
        Ok(config)
    }

    /// Save configuration to `config.toml` in the chatbox home directory
    pub fn save(&self) -> Result<()> {
        self.save_to(&self.config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    pub fn config_path(&self) -> PathBuf {
        self.chatbox_home.join("config.toml")
    }

    /// Effective log file path
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.chatbox_home.join("chatbox.log"))
    }

    /// Point the widget at another endpoint
    pub fn set_endpoint(&mut self, endpoint: impl Into<String>) {
        self.endpoint = endpoint.into();
    }

    fn apply_env(&mut self) {
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            if !endpoint.trim().is_empty() {
                self.endpoint = endpoint.trim().to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config.chatbox_home, dir.path());
        assert_eq!(config.log_path(), dir.path().join("chatbox.log"));
        assert!(config.ui.show_timestamps);
        assert!(config.ui.welcome().is_some());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "log_file = \"/tmp/chat.log\"\n\n[ui]\nshow_timestamps = false\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(!config.ui.show_timestamps);
        assert_eq!(config.ui.input_placeholder, "Type your message...");
        assert_eq!(config.log_path(), PathBuf::from("/tmp/chat.log"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.ui.welcome_message = String::new();
        config.ui.input_placeholder = "Say something".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.ui.welcome(), None);
        assert_eq!(loaded.ui.input_placeholder, "Say something");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "endpoint = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
