use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::workflows::applications::evaluation::remote::{
    DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TEMPERATURE,
};
use crate::workflows::applications::evaluation::{EvaluatorKind, GeminiSettings};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub evaluator: EvaluatorConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let format = match env::var("APP_LOG_FORMAT") {
            Ok(value) => LogFormat::parse(&value).ok_or(ConfigError::InvalidLogFormat(value))?,
            Err(_) => LogFormat::Compact,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, format },
            evaluator: EvaluatorConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing output controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" => Some(Self::Compact),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Which evaluator the service scores with, plus the settings each variant needs.
#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    pub engine: EvaluatorKind,
    /// JSON override for the heuristic keyword tables.
    pub scoring_tables_path: Option<PathBuf>,
    pub remote: RemoteModelConfig,
}

impl EvaluatorConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let engine = match env::var("EVALUATOR_ENGINE") {
            Ok(value) => EvaluatorKind::parse(&value).ok_or(ConfigError::InvalidEngine(value))?,
            Err(_) => EvaluatorKind::Heuristic,
        };

        let scoring_tables_path = non_blank_var("SCORING_TABLES_PATH").map(PathBuf::from);

        let defaults = GeminiSettings::default();
        let gemini = GeminiSettings {
            endpoint: non_blank_var("GEMINI_ENDPOINT").unwrap_or(defaults.endpoint),
            model: non_blank_var("GEMINI_MODEL").unwrap_or(defaults.model),
            api_key: non_blank_var("GEMINI_API_KEY"),
            timeout: Duration::from_secs(parse_var(
                "GEMINI_TIMEOUT_SECS",
                defaults.timeout.as_secs(),
            )?),
        };

        Ok(Self {
            engine,
            scoring_tables_path,
            remote: RemoteModelConfig {
                gemini,
                temperature: parse_var("GEMINI_TEMPERATURE", DEFAULT_TEMPERATURE)?,
                max_output_tokens: parse_var("GEMINI_MAX_OUTPUT_TOKENS", DEFAULT_MAX_OUTPUT_TOKENS)?,
            },
        })
    }
}

/// Hosted model connection and sampling parameters.
#[derive(Debug, Clone)]
pub struct RemoteModelConfig {
    pub gemini: GeminiSettings,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

fn non_blank_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match non_blank_var(key) {
        Some(value) => value
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
        None => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLogFormat(String),
    InvalidEngine(String),
    InvalidNumber { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLogFormat(value) => {
                write!(f, "APP_LOG_FORMAT must be 'compact' or 'json', got '{value}'")
            }
            ConfigError::InvalidEngine(value) => {
                write!(
                    f,
                    "EVALUATOR_ENGINE must be 'heuristic' or 'remote', got '{value}'"
                )
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be numeric, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
