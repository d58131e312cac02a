use std::time::Duration;

use async_trait::async_trait;
use llm::builder::{LLMBackend, LLMBuilder};
use llm::chat::ChatMessage;

use atelier_core::Settings;

use crate::AdviseError;

/// Anything that turns a system prompt and a user message into raw model text.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn generate(&self, system: &str, user_msg: &str) -> Result<String, AdviseError>;

    /// Human-readable label for logs.
    fn describe(&self) -> String;
}

fn map_backend(provider: &str) -> Result<LLMBackend, AdviseError> {
    match provider {
        "openai" => Ok(LLMBackend::OpenAI),
        "anthropic" => Ok(LLMBackend::Anthropic),
        "google" => Ok(LLMBackend::Google),
        "ollama" => Ok(LLMBackend::Ollama),
        "groq" => Ok(LLMBackend::Groq),
        "mistral" => Ok(LLMBackend::Mistral),
        "deepseek" => Ok(LLMBackend::DeepSeek),
        other => Err(AdviseError::Config(format!("unknown provider: {other}"))),
    }
}

/// Hosted model reached through the `llm` crate.
pub struct LlmBackend {
    settings: Settings,
}

impl LlmBackend {
    pub fn new(settings: Settings) -> Result<Self, AdviseError> {
        if !settings.is_configured() {
            return Err(AdviseError::Config(
                "no model configured: set provider, model and apiKey (see `atelier config`)"
                    .to_string(),
            ));
        }
        if settings.timeout_secs == 0 {
            return Err(AdviseError::Config("timeoutSecs must be at least 1".to_string()));
        }
        map_backend(&settings.provider)?;
        Ok(Self { settings })
    }

    async fn chat(&self, system: &str, user_msg: &str) -> Result<String, AdviseError> {
        let settings = &self.settings;
        let backend = map_backend(&settings.provider)?;

        let mut builder = LLMBuilder::new()
            .backend(backend)
            .model(&settings.model)
            .system(system);

        if !settings.api_key.is_empty() {
            builder = builder.api_key(&settings.api_key);
        }
        if let Some(url) = &settings.base_url {
            builder = builder.base_url(url);
        }
        if let Some(max_tokens) = settings.max_tokens {
            builder = builder.max_tokens(max_tokens);
        }
        if let Some(temperature) = settings.temperature {
            builder = builder.temperature(temperature);
        }

        let llm = builder
            .build()
            .map_err(|e| AdviseError::Config(format!("build LLM: {e}")))?;

        let messages = vec![ChatMessage::user().content(user_msg).build()];

        let response = llm
            .chat(&messages)
            .await
            .map_err(|e| AdviseError::Backend(format!("chat: {e}")))?;

        match response.text() {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(AdviseError::EmptyResponse),
        }
    }
}

#[async_trait]
impl Backend for LlmBackend {
    async fn generate(&self, system: &str, user_msg: &str) -> Result<String, AdviseError> {
        let limit = Duration::from_secs(self.settings.timeout_secs);
        tokio::time::timeout(limit, self.chat(system, user_msg))
            .await
            .map_err(|_| AdviseError::Timeout(self.settings.timeout_secs))?
    }

    fn describe(&self) -> String {
        format!("{} ({})", self.settings.provider, self.settings.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_provider_is_config_error() {
        assert!(matches!(map_backend("cohere"), Err(AdviseError::Config(_))));
        assert!(map_backend("anthropic").is_ok());
    }

    #[test]
    fn unconfigured_settings_are_rejected() {
        let err = LlmBackend::new(Settings::default()).err().unwrap();
        assert!(matches!(err, AdviseError::Config(_)));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let settings = Settings {
            provider: "ollama".into(),
            model: "llama3".into(),
            timeout_secs: 0,
            ..Settings::default()
        };
        let err = LlmBackend::new(settings).err().unwrap();
        assert!(matches!(err, AdviseError::Config(_)));
    }

    #[test]
    fn configured_backend_describes_itself() {
        let settings = Settings {
            provider: "ollama".into(),
            model: "llama3".into(),
            ..Settings::default()
        };
        let backend = LlmBackend::new(settings).unwrap();
        assert_eq!(backend.describe(), "ollama (llama3)");
    }
}
