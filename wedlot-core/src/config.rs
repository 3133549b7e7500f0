use crate::error::{Result, WedlotError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const ENV_STORAGE_BACKEND: &str = "WEDLOT_STORAGE";
pub const ENV_TTS_ENDPOINT: &str = "WEDLOT_TTS_ENDPOINT";
pub const ENV_TTS_APP_KEY: &str = "WEDLOT_TTS_APP_KEY";
pub const ENV_TTS_APP_SECRET: &str = "WEDLOT_TTS_APP_SECRET";
pub const ENV_AUDIO_PLAYER: &str = "WEDLOT_AUDIO_PLAYER";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub speech: SpeechConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sqlite,
            timeout_secs: 5,
        }
    }
}

impl StorageConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Voice settings for the on-device fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceParams {
    pub language: String,
    /// Relative speaking rate, 1.0 is the engine default.
    pub rate: f32,
    /// Relative pitch, 1.0 is the engine default.
    pub pitch: f32,
}

impl Default for VoiceParams {
    fn default() -> Self {
        Self {
            language: "zh".to_string(),
            rate: 0.8,
            pitch: 1.2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub endpoint: String,
    pub app_key: String,
    #[serde(skip_serializing)]
    pub app_secret: String,
    pub voice_name: String,
    pub format: String,
    pub timeout_secs: u64,
    /// Program that plays provider audio fed on stdin.
    pub player: String,
    pub player_args: Vec<String>,
    pub local_voice: VoiceParams,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://openapi.youdao.com/ttsapi".to_string(),
            app_key: String::new(),
            app_secret: String::new(),
            voice_name: "youxiaozhi".to_string(),
            format: "mp3".to_string(),
            timeout_secs: 10,
            player: "mpg123".to_string(),
            player_args: vec!["-q".to_string(), "-".to_string()],
            local_voice: VoiceParams::default(),
        }
    }
}

impl SpeechConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The networked provider is only attempted with credentials present.
    pub fn has_credentials(&self) -> bool {
        !self.app_key.is_empty() && !self.app_secret.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub cors_allow_all: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            cors_allow_all: true,
        }
    }
}

impl AppConfig {
    /// Reads a JSON config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| WedlotError::config(format!("Failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Applies `WEDLOT_*` environment variables on top of the file values.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(backend) = var(ENV_STORAGE_BACKEND) {
            self.storage.backend = match backend.to_lowercase().as_str() {
                "sqlite" => StorageBackend::Sqlite,
                "memory" => StorageBackend::Memory,
                other => {
                    return Err(WedlotError::config(format!(
                        "Unknown storage backend '{}'",
                        other
                    )))
                }
            };
        }
        if let Some(endpoint) = var(ENV_TTS_ENDPOINT) {
            self.speech.endpoint = endpoint;
        }
        if let Some(key) = var(ENV_TTS_APP_KEY) {
            self.speech.app_key = key;
        }
        if let Some(secret) = var(ENV_TTS_APP_SECRET) {
            self.speech.app_secret = secret;
        }
        if let Some(player) = var(ENV_AUDIO_PLAYER) {
            self.speech.player = player;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage.timeout_secs == 0 {
            return Err(WedlotError::config("Storage timeout must be greater than 0"));
        }

        if self.speech.endpoint.is_empty() {
            return Err(WedlotError::config("Speech endpoint cannot be empty"));
        }

        if self.speech.timeout_secs == 0 {
            return Err(WedlotError::config("Speech timeout must be greater than 0"));
        }

        let voice = &self.speech.local_voice;
        if voice.rate <= 0.0 || voice.pitch <= 0.0 {
            return Err(WedlotError::config("Voice rate and pitch must be positive"));
        }

        Ok(())
    }
}
