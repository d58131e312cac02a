pub mod capability;
pub mod knowledge;
pub mod tokens;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub use capability::{Capability, CapabilityInput, InputError};
pub use tokens::TokenError;

// --- Storage ---

/// Resolve the global config directory (~/.atelier/).
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".atelier")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

// --- AI Settings ---

pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown setting '{0}' (expected provider, model, apiKey, baseUrl, maxTokens, temperature, timeoutSecs)")]
    UnknownKey(String),
    #[error("invalid value for '{key}': {value}")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: String::new(),
            api_key: String::new(),
            model: String::new(),
            base_url: None,
            max_tokens: None,
            temperature: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Apply `ATELIER_*` environment overrides on top of the stored values.
    pub fn with_env_overrides(mut self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok());
        self
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let set = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if let Some(v) = set("ATELIER_PROVIDER") {
            self.provider = v;
        }
        if let Some(v) = set("ATELIER_MODEL") {
            self.model = v;
        }
        if let Some(v) = set("ATELIER_API_KEY") {
            self.api_key = v;
        }
        if let Some(v) = set("ATELIER_BASE_URL") {
            self.base_url = Some(v);
        }
    }

    /// Set one field by its camelCase name, as used by `atelier config set`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        let invalid = || SettingsError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "provider" => self.provider = value.to_string(),
            "model" => self.model = value.to_string(),
            "apiKey" => self.api_key = value.to_string(),
            "baseUrl" => self.base_url = Some(value.to_string()).filter(|v| !v.is_empty()),
            "maxTokens" => self.max_tokens = Some(value.parse().map_err(|_| invalid())?),
            "temperature" => self.temperature = Some(value.parse().map_err(|_| invalid())?),
            "timeoutSecs" => {
                self.timeout_secs = value
                    .parse()
                    .ok()
                    .filter(|secs: &u64| *secs > 0)
                    .ok_or_else(invalid)?
            }
            other => return Err(SettingsError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        !self.provider.is_empty()
            && !self.model.is_empty()
            && (self.provider == "ollama" || !self.api_key.is_empty())
    }

    /// Copy safe to print: the API key is masked.
    pub fn redacted(&self) -> Settings {
        let mut copy = self.clone();
        if !copy.api_key.is_empty() {
            let tail: String = copy
                .api_key
                .chars()
                .rev()
                .take(4)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            copy.api_key = format!("****{tail}");
        }
        copy
    }
}

/// Read stored settings. A missing or unreadable file yields defaults.
pub fn read_settings() -> Settings {
    let path = settings_path();
    if !path.exists() {
        return Settings::default();
    }
    match fs::read_to_string(&path)
        .map_err(SettingsError::from)
        .and_then(|s| serde_json::from_str(&s).map_err(SettingsError::from))
    {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
            Settings::default()
        }
    }
}

pub fn write_settings(settings: &Settings) -> Result<PathBuf, SettingsError> {
    let dir = config_dir();
    fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)?;
    let path = settings_path();
    fs::write(&path, json)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn ollama_needs_no_key() {
        let mut s = Settings {
            provider: "ollama".into(),
            model: "llama3".into(),
            ..Settings::default()
        };
        assert!(s.is_configured());
        s.provider = "openai".into();
        assert!(!s.is_configured());
        s.api_key = "sk-test".into();
        assert!(s.is_configured());
    }

    #[test]
    fn missing_fields_use_defaults() {
        let s: Settings = serde_json::from_str(r#"{"provider":"anthropic"}"#).unwrap();
        assert_eq!(s.provider, "anthropic");
        assert_eq!(s.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(s.max_tokens.is_none());
    }

    #[test]
    fn env_overrides_replace_non_empty_values() {
        let env: HashMap<&str, &str> = [
            ("ATELIER_PROVIDER", "groq"),
            ("ATELIER_MODEL", ""),
            ("ATELIER_API_KEY", "key-123"),
        ]
        .into_iter()
        .collect();
        let mut s = Settings {
            model: "kept".into(),
            ..Settings::default()
        };
        s.apply_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(s.provider, "groq");
        assert_eq!(s.model, "kept");
        assert_eq!(s.api_key, "key-123");
        assert!(s.base_url.is_none());
    }

    #[test]
    fn set_parses_typed_fields() {
        let mut s = Settings::default();
        s.set("maxTokens", "2048").unwrap();
        s.set("temperature", "0.2").unwrap();
        s.set("timeoutSecs", "30").unwrap();
        assert_eq!(s.max_tokens, Some(2048));
        assert_eq!(s.timeout_secs, 30);
        assert!(matches!(s.set("maxTokens", "lots"), Err(SettingsError::InvalidValue { .. })));
        assert!(matches!(s.set("timeoutSecs", "0"), Err(SettingsError::InvalidValue { .. })));
        assert_eq!(s.timeout_secs, 30);
        assert!(matches!(s.set("colour", "x"), Err(SettingsError::UnknownKey(_))));
    }

    #[test]
    fn redacted_masks_key() {
        let s = Settings {
            api_key: "sk-abcdef1234".into(),
            ..Settings::default()
        };
        assert_eq!(s.redacted().api_key, "****1234");
        assert_eq!(Settings::default().redacted().api_key, "");
    }
}
