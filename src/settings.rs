use async_openai::error::OpenAIError;
// Import necessary libraries and modules for API interaction, file I/O, and serialization.
use async_openai::{Client, config::OpenAIConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

// Application settings, stored as JSON under the data directory.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub openai_api_key: Option<String>, // Falls back to OPENAI_API_KEY when unset.
    pub model: String,
    pub base_url: Option<String>, // Any OpenAI-compatible endpoint.
    pub temperature: f32,
    pub request_timeout_secs: u64,
    pub debug_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            openai_api_key: None,
            model: "gpt-4o-mini".to_string(),
            base_url: None,
            temperature: 0.7,
            request_timeout_secs: 120,
            debug_mode: false,
        }
    }
}

pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("magic_tales")
        .join("data")
}

impl Settings {
    pub fn default_path() -> PathBuf {
        data_dir().join("settings.json")
    }

    // Load settings from the default path, falling back to defaults when absent.
    pub fn load() -> io::Result<Self> {
        let path = Self::default_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_settings_from_file(path)
    }

    pub fn load_settings_from_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let data = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&data)?;
        Ok(settings)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        let data = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(path)?;
        file.write_all(data.as_bytes())?;
        Ok(())
    }

    /// The configured key, or the one from the environment.
    pub fn api_key(&self) -> Option<String> {
        self.openai_api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
    }

    pub fn openai_config(&self, api_key: &str) -> OpenAIConfig {
        let config = OpenAIConfig::new().with_api_key(api_key);
        match &self.base_url {
            Some(base_url) => config.with_api_base(base_url),
            None => config,
        }
    }

    // Check a key by listing the provider's models.
    pub async fn validate_api_key(&self, api_key: &str) -> bool {
        let client = Client::with_config(self.openai_config(api_key));
        match client.models().list().await {
            Ok(_) => true,
            Err(OpenAIError::Reqwest(e)) => {
                log::warn!("Please verify your internet connection. Error: {e}");
                false
            }
            Err(e) => {
                log::warn!("API key validation failed: {e}");
                false
            }
        }
    }
}
