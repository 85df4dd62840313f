use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// HS256 signing secret for bearer tokens. Overridable with
    /// INSIGHTWIRE_JWT_SECRET so it never has to live in the file.
    pub jwt_secret: Option<String>,

    /// When set, every request is attributed to this user id instead of
    /// verifying a token. Test fixtures only; the server logs loudly if it
    /// starts with this populated.
    #[serde(default)]
    pub fixture_user: Option<String>,
}

fn default_db_path() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("insightwire");
    std::fs::create_dir_all(&data_dir).ok();
    data_dir.join("insightwire.db").to_string_lossy().to_string()
}

fn default_bind_addr() -> String {
    "127.0.0.1:5000".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            bind_addr: default_bind_addr(),
            jwt_secret: None,
            fixture_user: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            let config = Config::default();
            config.save()?;
            config
        };

        if let Ok(addr) = std::env::var("INSIGHTWIRE_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(path) = std::env::var("INSIGHTWIRE_DB_PATH") {
            config.db_path = path;
        }
        if let Ok(secret) = std::env::var("INSIGHTWIRE_JWT_SECRET") {
            config.jwt_secret = Some(secret);
        }

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("insightwire")
            .join("config.toml")
    }

    pub fn jwt_secret(&self) -> String {
        match &self.jwt_secret {
            Some(secret) => secret.clone(),
            None => {
                tracing::warn!("no jwt_secret configured, using a development default");
                "insightwire-dev-secret".to_string()
            }
        }
    }
}
