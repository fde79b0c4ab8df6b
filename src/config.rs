use std::net::SocketAddr;

use clap::Parser;
use log::LevelFilter;

#[derive(Parser, Debug, Clone)]
#[command(name = "ollama-openai-gateway")]
#[command(about = "stateless gateway exposing the Ollama API over an OpenAI-compatible backend")]
pub struct Config {
    #[arg(
        long,
        env = "OPENAI_API_KEY",
        hide_env_values = true,
        help = "API key sent to the OpenAI-compatible backend"
    )]
    pub openai_api_key: String,

    #[arg(
        long,
        env = "OPENAI_API_BASE_URL",
        default_value = "https://api.openai.com/v1",
        help = "base URL of the OpenAI-compatible backend"
    )]
    pub openai_api_base_url: String,

    #[arg(
        long,
        env = "PROXY_PORT",
        default_value = "11434",
        help = "server listen port"
    )]
    pub port: u16,

    #[arg(
        long,
        env = "LOG_LEVEL",
        default_value = "INFO",
        help = "log level (DEBUG, INFO, WARNING, ERROR, CRITICAL)"
    )]
    pub log_level: String,

    #[arg(
        long,
        env = "REQUEST_TIMEOUT",
        default_value = "60",
        help = "timeout in seconds for unary backend calls"
    )]
    pub request_timeout_seconds: u64,

    #[arg(
        long,
        env = "STREAM_TIMEOUT",
        default_value = "300",
        help = "deadline in seconds bounding a whole streaming backend call"
    )]
    pub stream_timeout_seconds: u64,
}

impl Config {
    /// Canonicalize values that accept sloppy input (trailing slash on the
    /// base URL).
    pub fn normalize(&mut self) {
        while self.openai_api_base_url.ends_with('/') {
            self.openai_api_base_url.pop();
        }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    /// Accepts both Python-style level names (WARNING, CRITICAL) and the
    /// native LevelFilter names.
    pub fn level_filter(&self) -> LevelFilter {
        match self.log_level.to_ascii_uppercase().as_str() {
            "DEBUG" | "TRACE" => LevelFilter::Debug,
            "WARNING" | "WARN" => LevelFilter::Warn,
            "ERROR" | "CRITICAL" => LevelFilter::Error,
            "OFF" => LevelFilter::Off,
            _ => LevelFilter::Info,
        }
    }
}

pub fn validate_config(config: &Config) -> Result<(), String> {
    if config.openai_api_key.trim().is_empty() {
        return Err("OPENAI_API_KEY must not be empty".to_string());
    }
    if !config.openai_api_base_url.starts_with("http://")
        && !config.openai_api_base_url.starts_with("https://")
    {
        return Err(format!(
            "invalid backend URL (must start with http:// or https://): {}",
            config.openai_api_base_url
        ));
    }
    if let Err(e) = url::Url::parse(&config.openai_api_base_url) {
        return Err(format!("invalid backend URL format: {}", e));
    }
    if config.port == 0 {
        return Err("port must be in range 1-65535".to_string());
    }
    if config.request_timeout_seconds == 0 {
        return Err("request timeout must be at least 1 second".to_string());
    }
    if config.stream_timeout_seconds == 0 {
        return Err("stream timeout must be at least 1 second".to_string());
    }
    let known_level = matches!(
        config.log_level.to_ascii_uppercase().as_str(),
        "DEBUG" | "TRACE" | "INFO" | "WARNING" | "WARN" | "ERROR" | "CRITICAL" | "OFF"
    );
    if !known_level {
        return Err(format!("invalid log level: {}", config.log_level));
    }
    Ok(())
}
