use std::env;
use std::path::PathBuf;

/// Runtime configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding bundled data files.
    pub assets_dir: String,
    /// Props CSV file name, resolved relative to `assets_dir`.
    pub props_file: String,
    /// Host to bind the web server to.
    pub host: String,
    /// Port to bind the web server to.
    pub port: u16,
    /// Base URL of an OpenAI-compatible completion endpoint,
    /// e.g. "http://llm:8000". Explanations are disabled when unset.
    pub vllm_base_url: Option<String>,
    /// Model name passed through to the completion endpoint.
    pub vllm_model: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            assets_dir: "assets".to_string(),
            props_file: "sample_props.csv".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8080,
            vllm_base_url: None,
            vllm_model: "mistral-7b-instruct".to_string(),
        }
    }
}

impl AppConfig {
    /// Read configuration from environment variables, falling back to
    /// defaults for anything unset. Call `dotenv::dotenv().ok()` first
    /// if a .env file should be honored.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            assets_dir: env_or("ASSETS_DIR", &defaults.assets_dir),
            props_file: env_or("PROPS_FILE", &defaults.props_file),
            host: env_or("HOST", &defaults.host),
            port: env_or("PORT", &defaults.port.to_string())
                .parse()
                .expect("PORT must be a number between 0 and 65535"),
            vllm_base_url: env::var("VLLM_BASE_URL").ok().filter(|s| !s.is_empty()),
            vllm_model: env_or("VLLM_MODEL", &defaults.vllm_model),
        }
    }

    /// Full path to the props CSV file.
    pub fn props_path(&self) -> PathBuf {
        PathBuf::from(&self.assets_dir).join(&self.props_file)
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
