use crate::error::{PoExtractError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tên biến môi trường chứa API key (ưu tiên hơn file cấu hình)
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.5-flash".into(),
            timeout_seconds: 120,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PoExtractError::Config("Không tìm thấy thư mục home".into()))?;
        Ok(home.join(".config").join("po-extract").join("config.json"))
    }

    /// Lấy API key: biến môi trường được ưu tiên, sau đó đến file cấu hình
    pub fn get_api_key(&self) -> Result<String> {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                return Ok(key);
            }
        }

        self.api_key.clone().ok_or(PoExtractError::MissingApiKey)
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.api_key.is_none());
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.timeout_seconds, 120);
    }

    #[test]
    fn test_config_roundtrip_json() {
        let config = Config {
            api_key: Some("abc".into()),
            model: "gemini-2.5-flash".into(),
            timeout_seconds: 60,
        };
        let json = serde_json::to_string(&config).unwrap();
        let loaded: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.api_key.as_deref(), Some("abc"));
        assert_eq!(loaded.timeout_seconds, 60);
    }

    #[test]
    fn test_config_partial_json_uses_defaults() {
        let loaded: Config = serde_json::from_str(r#"{"api_key": "k"}"#).unwrap();
        assert_eq!(loaded.api_key.as_deref(), Some("k"));
        assert_eq!(loaded.model, "gemini-2.5-flash");
    }
}
