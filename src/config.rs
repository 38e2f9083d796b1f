use serde::Deserialize;
use std::path::PathBuf;
use tracing::info;

/// Top-level configuration loaded from TOML.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct MelingoConfig {
    pub server: ServerConfig,
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind(),
        }
    }
}

fn default_port() -> u16 {
    8000
}
fn default_bind() -> String {
    "0.0.0.0".into()
}

/// Settings for the external text-generation call.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// When false, every decision comes from the fallback heuristic.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    pub api_key: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Override the provider's API root, e.g. for a proxy or a local mock.
    pub base_url: Option<String>,
    pub system_prompt: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            provider: default_provider(),
            model: default_model(),
            api_key: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            base_url: None,
            system_prompt: None,
        }
    }
}

fn default_enabled() -> bool {
    true
}
fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-3.5-turbo".into()
}
fn default_max_tokens() -> u32 {
    200
}
fn default_temperature() -> f64 {
    0.7
}

pub const VALID_PROVIDERS: [&str; 2] = ["openai", "anthropic"];

/// Load configuration from file or use defaults.
///
/// Search order:
/// 1. `MELINGO_CONFIG` env var
/// 2. `~/.melingo/config.toml`
/// 3. Zero-config defaults (no file needed)
pub fn load() -> anyhow::Result<MelingoConfig> {
    let path = config_path();

    if path.exists() {
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
        let mut config = parse(&content)
            .map_err(|e| anyhow::anyhow!("invalid config at {}: {e}", path.display()))?;

        resolve_api_key(&mut config);

        info!("loaded config from {}", path.display());
        Ok(config)
    } else {
        info!("no config file found, using zero-config defaults");
        let mut config = MelingoConfig::default();
        resolve_api_key(&mut config);
        Ok(config)
    }
}

/// Parse and validate a TOML document. Does not touch the environment.
pub fn parse(content: &str) -> anyhow::Result<MelingoConfig> {
    let config: MelingoConfig = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("MELINGO_CONFIG") {
        return PathBuf::from(path);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
    PathBuf::from(home).join(".melingo").join("config.toml")
}

/// Name of the env var holding the key for a provider.
pub fn api_key_env_var(provider: &str) -> Option<&'static str> {
    match provider {
        "openai" => Some("OPENAI_API_KEY"),
        "anthropic" => Some("ANTHROPIC_API_KEY"),
        _ => None,
    }
}

/// Resolve API key from environment variables if not set in config.
/// Blank keys count as unset.
pub fn resolve_api_key(config: &mut MelingoConfig) {
    let engine = &mut config.engine;
    if engine.api_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
        engine.api_key = None;
    }
    if engine.api_key.is_none() {
        engine.api_key = api_key_env_var(&engine.provider)
            .and_then(|var| std::env::var(var).ok())
            .filter(|k| !k.trim().is_empty());
    }
}

/// Validate the config and return clear error messages.
pub fn validate(config: &MelingoConfig) -> anyhow::Result<()> {
    if !VALID_PROVIDERS.contains(&config.engine.provider.as_str()) {
        anyhow::bail!(
            "invalid provider '{}': must be one of {:?}",
            config.engine.provider,
            VALID_PROVIDERS
        );
    }

    if config.engine.max_tokens == 0 {
        anyhow::bail!("engine.max_tokens must be > 0");
    }

    if !(0.0..=2.0).contains(&config.engine.temperature) {
        anyhow::bail!(
            "engine.temperature must be within 0.0..=2.0, got {}",
            config.engine.temperature
        );
    }

    Ok(())
}
