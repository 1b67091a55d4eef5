use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::copilot::remote::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub copilot: CopilotConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    /// Cloud region of the hosted model endpoint
    pub region: String,
    /// Explicit OpenAI-compatible base URL; derived from `region` when absent
    #[serde(default)]
    pub api_base: Option<String>,
    #[serde(default)]
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl LlmConfig {
    pub fn resolved_api_base(&self) -> String {
        match &self.api_base {
            Some(base) if !base.is_empty() => base.clone(),
            _ => format!(
                "https://bedrock-runtime.{}.amazonaws.com/openai/v1",
                self.region
            ),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CopilotConfig {
    /// Path the runtime is mounted on
    pub endpoint_path: String,
    /// Base URLs of remote agent/tool backends
    #[serde(default)]
    pub remote_endpoints: Vec<String>,
    #[serde(default = "default_connect_timeout_secs")]
    pub remote_connect_timeout_secs: u64,
    /// Limit for remote `/info` and action calls
    #[serde(default = "default_request_timeout_secs")]
    pub remote_request_timeout_secs: u64,
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT.as_secs()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT.as_secs()
}

impl CopilotConfig {
    pub fn remote_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_connect_timeout_secs)
    }

    pub fn remote_request_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_request_timeout_secs)
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000

[llm]
region = "us-east-1"
model = "anthropic.claude-3-sonnet-20240229-v1:0"
temperature = 0.7
max_tokens = 4096

[copilot]
endpoint_path = "/api/copilotkit"
remote_endpoints = ["http://localhost:8000/copilotkit"]
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
///
/// Environment variables (a `.env` file is honoured) override the file.
pub fn load_config() -> anyhow::Result<Config> {
    let mut config = load_file_config()?;
    let env: HashMap<String, String> = std::env::vars().collect();
    apply_env_overrides(&mut config, &env)?;
    Ok(config)
}

fn load_file_config() -> anyhow::Result<Config> {
    // Try to find config.toml next to the executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    // Fall back to default config
    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

fn apply_env_overrides(config: &mut Config, env: &HashMap<String, String>) -> anyhow::Result<()> {
    let get = |key: &str| env.get(key).filter(|v| !v.is_empty()).cloned();

    if let Some(port) = get("PORT") {
        config.server.port = port
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid PORT '{port}': {e}"))?;
    }
    if let Some(region) = get("AWS_REGION") {
        config.llm.region = region;
    }
    if let Some(key) = get("LLM_API_KEY").or_else(|| get("AWS_BEARER_TOKEN_BEDROCK")) {
        config.llm.api_key = key;
    }
    if let Some(model) = get("LLM_MODEL") {
        config.llm.model = model;
    }
    if let Some(base) = get("LLM_API_BASE") {
        config.llm.api_base = Some(base);
    }
    if let Some(server_url) = get("SERVER_API_URL") {
        config.copilot.remote_endpoints =
            vec![format!("{}/copilotkit", server_url.trim_end_matches('/'))];
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_config() -> Config {
        toml::from_str(DEFAULT_CONFIG).unwrap()
    }

    #[test]
    fn test_default_config_loads() {
        let config = default_config();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.copilot.endpoint_path, "/api/copilotkit");
        assert_eq!(config.llm.region, "us-east-1");
        assert!(config.llm.api_key.is_empty());
        assert_eq!(config.copilot.remote_connect_timeout(), Duration::from_secs(5));
        assert_eq!(config.copilot.remote_request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_api_base_from_region() {
        let mut config = default_config();
        config.llm.region = "eu-central-1".to_string();
        assert_eq!(
            config.llm.resolved_api_base(),
            "https://bedrock-runtime.eu-central-1.amazonaws.com/openai/v1"
        );
        config.llm.api_base = Some("http://localhost:4000/v1".to_string());
        assert_eq!(config.llm.resolved_api_base(), "http://localhost:4000/v1");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = default_config();
        let env: HashMap<String, String> = [
            ("AWS_REGION", "us-west-2"),
            ("AWS_BEARER_TOKEN_BEDROCK", "token"),
            ("SERVER_API_URL", "http://agents:8000/"),
            ("PORT", "4000"),
            ("LLM_MODEL", ""),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        apply_env_overrides(&mut config, &env).unwrap();
        assert_eq!(config.llm.region, "us-west-2");
        assert_eq!(config.llm.api_key, "token");
        assert_eq!(config.server.port, 4000);
        assert_eq!(
            config.copilot.remote_endpoints,
            vec!["http://agents:8000/copilotkit".to_string()]
        );
        // empty values are ignored
        assert_eq!(config.llm.model, "anthropic.claude-3-sonnet-20240229-v1:0");
    }

    #[test]
    fn test_invalid_port() {
        let mut config = default_config();
        let env = HashMap::from([("PORT".to_string(), "http".to_string())]);
        assert!(apply_env_overrides(&mut config, &env).is_err());
    }
}
