use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{Session, SessionStore};
use crate::config::AppConfig;
use crate::error::ClientError;

/// Per-user overrides saved in `console.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ConsoleConfig {
    pub fn api_url(&self, app: &AppConfig) -> String {
        self.api_url.clone().unwrap_or_else(|| app.api.base_url.clone())
    }

    pub fn auth_url(&self, app: &AppConfig) -> String {
        self.auth_url.clone().unwrap_or_else(|| app.api.auth_url.clone())
    }

    /// Set a key by name. Returns false for unknown keys.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        let slot = match key {
            "api_url" | "api-url" => &mut self.api_url,
            "auth_url" | "auth-url" => &mut self.auth_url,
            _ => return false,
        };
        *slot = Some(value.trim_end_matches('/').to_string());
        self.updated_at = Some(Utc::now());
        true
    }

    pub fn unset(&mut self, key: &str) -> bool {
        let slot = match key {
            "api_url" | "api-url" => &mut self.api_url,
            "auth_url" | "auth-url" => &mut self.auth_url,
            _ => return false,
        };
        *slot = None;
        self.updated_at = Some(Utc::now());
        true
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("AUDITLIB_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("auditlib")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_console_config() -> anyhow::Result<ConsoleConfig> {
    let config_file = get_config_dir()?.join("console.json");

    if !config_file.exists() {
        return Ok(ConsoleConfig::default());
    }

    let content = fs::read_to_string(config_file)?;
    let config: ConsoleConfig = serde_json::from_str(&content)?;
    Ok(config)
}

pub fn save_console_config(config: &ConsoleConfig) -> anyhow::Result<()> {
    let config_file = get_config_dir()?.join("console.json");

    let content = serde_json::to_string_pretty(config)?;
    fs::write(config_file, content)?;
    Ok(())
}

/// Session kept in `session.json` so separate invocations share one login.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn in_config_dir() -> anyhow::Result<Self> {
        Ok(Self::new(get_config_dir()?.join("session.json")))
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, ClientError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, session: &Session) -> Result<(), ClientError> {
        let content = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
