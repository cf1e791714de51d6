//! dayplanner configuration types and loading
//!
//! Configuration is loaded once at startup (file chain, then environment
//! overrides) and handed to the planner and relay explicitly.

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Hosted chat API used for schedule generation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    OpenAI,
    Anthropic,
}

impl Provider {
    /// Wire name ("openai" / "anthropic")
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAI => "openai",
            Provider::Anthropic => "anthropic",
        }
    }

    /// Parse a loosely specified provider name
    ///
    /// Only "anthropic" selects Anthropic; anything else is OpenAI.
    pub fn from_lenient(s: &str) -> Self {
        debug!(%s, "Provider::from_lenient: called");
        if s.trim().eq_ignore_ascii_case("anthropic") {
            Provider::Anthropic
        } else {
            Provider::OpenAI
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::OpenAI => write!(f, "OpenAI"),
            Provider::Anthropic => write!(f, "Anthropic"),
        }
    }
}

/// Main dayplanner configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Schedule provider configuration
    pub llm: LlmConfig,

    /// Image provider configuration
    pub image: ImageConfig,

    /// Mock mode toggles
    pub mock: MockConfig,

    /// HTTP relay configuration
    pub server: ServerConfig,

    /// Directory holding prompt template overrides (`schedule.pmt`, `image.pmt`)
    #[serde(rename = "prompts-dir")]
    pub prompts_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration with fallback chain
    ///
    /// Environment overrides are applied on top of whichever source wins.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Self::load_without_env(config_path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn load_without_env(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .dayplanner.yml
        let local_config = PathBuf::from(".dayplanner.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/dayplanner/dayplanner.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("dayplanner").join("dayplanner.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialised
    ///
    /// Errors are swallowed; the caller falls back to its default level.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::load_without_env(config_path).ok().and_then(|c| c.log_level)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Apply process environment overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_with(|key| std::env::var(key).ok());
    }

    /// Apply environment overrides from an arbitrary lookup
    ///
    /// Recognised keys: `API_PROVIDER`, `USE_MOCK_RESPONSES`, `USE_MOCK_IMAGES`, `PORT`.
    pub fn apply_env_overrides_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(provider) = lookup("API_PROVIDER") {
            debug!(%provider, "apply_env_overrides_with: API_PROVIDER set");
            self.llm.provider = Provider::from_lenient(&provider);
        }
        if let Some(flag) = lookup("USE_MOCK_RESPONSES") {
            debug!(%flag, "apply_env_overrides_with: USE_MOCK_RESPONSES set");
            self.mock.schedule = flag == "true";
        }
        if let Some(flag) = lookup("USE_MOCK_IMAGES") {
            debug!(%flag, "apply_env_overrides_with: USE_MOCK_IMAGES set");
            self.mock.images = flag == "true";
        }
        if let Some(port) = lookup("PORT") {
            match port.parse::<u16>() {
                Ok(port) => {
                    debug!(%port, "apply_env_overrides_with: PORT set");
                    self.server.port = port;
                }
                Err(e) => {
                    tracing::warn!("Ignoring invalid PORT '{}': {}", port, e);
                }
            }
        }
    }

    /// Build the request-time API configuration from the process environment
    pub fn api_config(&self) -> ApiConfig {
        self.api_config_with(|key| std::env::var(key).ok())
    }

    /// Build the request-time API configuration from an arbitrary lookup
    ///
    /// A missing key yields an empty string; requests report it as a
    /// configuration error rather than failing startup.
    pub fn api_config_with<F>(&self, lookup: F) -> ApiConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let resolved = self.llm.resolve();
        let api_key = lookup(&resolved.api_key_env).unwrap_or_default().trim().to_string();
        debug!(provider = %resolved.provider, has_key = !api_key.is_empty(), "api_config_with: resolved");
        ApiConfig {
            api_key,
            api_provider: resolved.provider,
            use_mock_responses: self.mock.schedule,
        }
    }

    /// Resolve the image provider key from the process environment
    pub fn image_api_key(&self) -> String {
        self.image_api_key_with(|key| std::env::var(key).ok())
    }

    pub fn image_api_key_with<F>(&self, lookup: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(&self.image.api_key_env).unwrap_or_default().trim().to_string()
    }
}

/// Request-time view of provider selection, key and mock mode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiConfig {
    pub api_key: String,
    pub api_provider: Provider,
    pub use_mock_responses: bool,
}

impl ApiConfig {
    pub fn has_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Per-provider overrides; unset fields take the provider's defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Model identifier
    pub model: Option<String>,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: Option<String>,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: Option<String>,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: Option<u32>,
}

/// Schedule provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Selected provider
    pub provider: Provider,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    pub openai: ProviderConfig,

    pub anthropic: ProviderConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: Provider::OpenAI,
            timeout_ms: 30_000,
            openai: ProviderConfig::default(),
            anthropic: ProviderConfig::default(),
        }
    }
}

impl LlmConfig {
    /// Resolve the selected provider's settings
    pub fn resolve(&self) -> ResolvedLlmConfig {
        self.resolve_for(self.provider)
    }

    /// Resolve a specific provider's settings, filling in defaults
    pub fn resolve_for(&self, provider: Provider) -> ResolvedLlmConfig {
        debug!(%provider, "LlmConfig::resolve_for: called");
        let (overrides, model, key_env, base_url) = match provider {
            Provider::OpenAI => (&self.openai, "gpt-4o", "OPENAI_API_KEY", "https://api.openai.com"),
            Provider::Anthropic => (
                &self.anthropic,
                "claude-3-opus-20240229",
                "ANTHROPIC_API_KEY",
                "https://api.anthropic.com",
            ),
        };

        ResolvedLlmConfig {
            provider,
            model: overrides.model.clone().unwrap_or_else(|| model.to_string()),
            api_key_env: overrides.api_key_env.clone().unwrap_or_else(|| key_env.to_string()),
            base_url: overrides
                .base_url
                .clone()
                .unwrap_or_else(|| base_url.to_string())
                .trim_end_matches('/')
                .to_string(),
            max_tokens: overrides.max_tokens.unwrap_or(800),
            timeout_ms: self.timeout_ms,
        }
    }
}

/// Fully resolved settings for one schedule provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLlmConfig {
    pub provider: Provider,
    pub model: String,
    pub api_key_env: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub timeout_ms: u64,
}

/// Image provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub model: String,

    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    #[serde(rename = "base-url")]
    pub base_url: String,

    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    pub size: String,

    pub quality: String,

    pub style: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            model: "dall-e-3".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: "https://api.openai.com".to_string(),
            timeout_ms: 30_000,
            size: "1024x1024".to_string(),
            quality: "standard".to_string(),
            style: "vivid".to_string(),
        }
    }
}

/// Mock mode toggles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    /// Generate schedules locally instead of calling a provider
    pub schedule: bool,

    /// Return placeholder images instead of calling the image provider
    pub images: bool,

    /// Seed for the mock generator's hour increments
    pub seed: Option<u64>,
}

/// HTTP relay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,

    pub port: u16,

    /// Delay before reporting a rate-limit error, in milliseconds
    #[serde(rename = "rate-limit-delay-ms")]
    pub rate_limit_delay_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            rate_limit_delay_ms: 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.llm.provider, Provider::OpenAI);
        assert_eq!(config.llm.timeout_ms, 30_000);
        assert!(!config.mock.schedule);
        assert!(!config.mock.images);
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.rate_limit_delay_ms, 500);
        assert_eq!(config.image.model, "dall-e-3");
    }

    #[test]
    fn test_resolve_defaults_per_provider() {
        let llm = LlmConfig::default();

        let openai = llm.resolve_for(Provider::OpenAI);
        assert_eq!(openai.model, "gpt-4o");
        assert_eq!(openai.api_key_env, "OPENAI_API_KEY");
        assert_eq!(openai.base_url, "https://api.openai.com");
        assert_eq!(openai.max_tokens, 800);

        let anthropic = llm.resolve_for(Provider::Anthropic);
        assert_eq!(anthropic.model, "claude-3-opus-20240229");
        assert_eq!(anthropic.api_key_env, "ANTHROPIC_API_KEY");
        assert_eq!(anthropic.base_url, "https://api.anthropic.com");
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
log-level: debug
llm:
  provider: anthropic
  timeout-ms: 10000
  anthropic:
    model: claude-haiku
    base-url: http://localhost:9999/
mock:
  schedule: true
  seed: 7
server:
  port: 8080
  rate-limit-delay-ms: 0
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.llm.provider, Provider::Anthropic);
        let resolved = config.llm.resolve();
        assert_eq!(resolved.model, "claude-haiku");
        assert_eq!(resolved.base_url, "http://localhost:9999");
        assert_eq!(resolved.timeout_ms, 10_000);
        assert!(config.mock.schedule);
        assert_eq!(config.mock.seed, Some(7));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env_overrides_with(lookup_from(&[
            ("API_PROVIDER", "anthropic"),
            ("USE_MOCK_RESPONSES", "true"),
            ("USE_MOCK_IMAGES", "false"),
            ("PORT", "3000"),
        ]));

        assert_eq!(config.llm.provider, Provider::Anthropic);
        assert!(config.mock.schedule);
        assert!(!config.mock.images);
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_env_override_unknown_provider_is_openai() {
        let mut config = Config::default();
        config.llm.provider = Provider::Anthropic;
        config.apply_env_overrides_with(lookup_from(&[("API_PROVIDER", "gemini"), ("PORT", "not-a-port")]));

        assert_eq!(config.llm.provider, Provider::OpenAI);
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_api_config_reads_provider_key() {
        let mut config = Config::default();
        config.llm.provider = Provider::Anthropic;

        let api = config.api_config_with(lookup_from(&[("ANTHROPIC_API_KEY", " sk-ant "), ("OPENAI_API_KEY", "sk")]));
        assert_eq!(api.api_key, "sk-ant");
        assert_eq!(api.api_provider, Provider::Anthropic);
        assert!(api.has_key());
    }

    #[test]
    fn test_api_config_missing_key_is_empty() {
        let config = Config::default();
        let api = config.api_config_with(lookup_from(&[]));
        assert!(!api.has_key());
        assert!(!api.use_mock_responses);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("dayplanner.yml");
        std::fs::write(&path, "mock:\n  images: true\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert!(config.mock.images);
        assert!(!config.mock.schedule);
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_provider_display_and_wire_name() {
        assert_eq!(Provider::OpenAI.to_string(), "OpenAI");
        assert_eq!(Provider::Anthropic.as_str(), "anthropic");
        let json = serde_json::to_string(&Provider::OpenAI).unwrap();
        assert_eq!(json, "\"openai\"");
    }
}
