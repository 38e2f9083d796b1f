use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::EngineError;

/// A single-shot text generation backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short identifier used in logs, e.g. `"openai"`.
    fn name(&self) -> &str;

    async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<String, EngineError>;
}

/// Sampling parameters shared by every provider.
#[derive(Debug, Clone)]
pub struct GenerationParams {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl From<&EngineConfig> for GenerationParams {
    fn from(config: &EngineConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";

pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    params: GenerationParams,
}

impl OpenAiProvider {
    pub fn new(api_key: String, params: GenerationParams) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: OPENAI_BASE_URL.into(),
            params,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl TextGenerator for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<String, EngineError> {
        let body = serde_json::json!({
            "model": self.params.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": prompt },
            ],
            "max_tokens": self.params.max_tokens,
            "temperature": self.params.temperature,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::Status { status, body });
        }

        let parsed: serde_json::Value = response.json().await?;
        debug!(provider = "openai", usage = %parsed["usage"], "completion received");

        parsed
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .filter(|text| !text.trim().is_empty())
            .map(String::from)
            .ok_or(EngineError::EmptyReply)
    }
}

pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    base_url: String,
    params: GenerationParams,
}

impl AnthropicProvider {
    pub fn new(api_key: String, params: GenerationParams) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: ANTHROPIC_BASE_URL.into(),
            params,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl TextGenerator for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<String, EngineError> {
        let body = serde_json::json!({
            "model": self.params.model,
            "max_tokens": self.params.max_tokens,
            "temperature": self.params.temperature,
            "system": system_prompt,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::Status { status, body });
        }

        let parsed: serde_json::Value = response.json().await?;
        debug!(provider = "anthropic", usage = %parsed["usage"], "completion received");

        // Concatenate every text block; tool blocks are never requested.
        let text: String = parsed
            .get("content")
            .and_then(|c| c.as_array())
            .map(|blocks| {
                blocks
                    .iter()
                    .filter(|b| b.get("type").and_then(|t| t.as_str()) == Some("text"))
                    .filter_map(|b| b.get("text").and_then(|t| t.as_str()))
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(EngineError::EmptyReply);
        }
        Ok(text)
    }
}

/// Create a provider from config.
///
/// Returns `None` when generation is disabled or no API key is available;
/// the engine then decides with the fallback heuristic only.
pub fn from_config(config: &EngineConfig) -> anyhow::Result<Option<Box<dyn TextGenerator>>> {
    if !config.enabled {
        return Ok(None);
    }
    let Some(api_key) = config.api_key.clone() else {
        return Ok(None);
    };
    let params = GenerationParams::from(config);

    let provider: Box<dyn TextGenerator> = match config.provider.as_str() {
        "openai" => {
            let mut p = OpenAiProvider::new(api_key, params);
            if let Some(url) = &config.base_url {
                p = p.with_base_url(url.as_str());
            }
            Box::new(p)
        }
        "anthropic" => {
            let mut p = AnthropicProvider::new(api_key, params);
            if let Some(url) = &config.base_url {
                p = p.with_base_url(url.as_str());
            }
            Box::new(p)
        }
        other => anyhow::bail!("unknown provider: {other}"),
    };
    Ok(Some(provider))
}
