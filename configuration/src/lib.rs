use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Environment variable naming a config file when `--config` is not given.
pub const CONFIG_PATH_ENV: &str = "SPEECH_CLIENT_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub connection: GrpcEndpointConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directives used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub ansi: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrpcEndpointConfig {
    #[serde(default = "default_server")]
    pub server: String,
    #[serde(default)]
    pub use_ssl: bool,
    #[serde(default)]
    pub ssl_cert: Option<PathBuf>,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
    #[serde(default = "default_max_message_bytes")]
    pub max_decoding_message_bytes: usize,
    #[serde(default = "default_max_message_bytes")]
    pub max_encoding_message_bytes: usize,
    /// Metadata sent with every request, merged before `--metadata` pairs.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            ansi: false,
        }
    }
}

impl Default for GrpcEndpointConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            use_ssl: false,
            ssl_cert: None,
            connect_timeout_ms: default_connect_timeout_ms(),
            request_timeout_ms: None,
            max_decoding_message_bytes: default_max_message_bytes(),
            max_encoding_message_bytes: default_max_message_bytes(),
            metadata: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file `{}`: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file `{}`: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Loads the client config from `path`, falling back to `SPEECH_CLIENT_CONFIG` and then
/// to the built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<ClientConfig, ConfigError> {
    let path = path
        .map(Path::to_path_buf)
        .or_else(|| env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));
    match path {
        Some(path) => load_config_file(&path),
        None => Ok(ClientConfig::default()),
    }
}

pub fn load_config_file(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Installs the global subscriber. Logs go to stderr, stdout is reserved for results.
pub fn setup_logging(config: &ClientConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.as_str()));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(config.logging.ansi)
        .with_target(false)
        .try_init();
    if installed.is_err() {
        tracing::debug!("global subscriber already installed");
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_server() -> String {
    "localhost:50051".to_string()
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

fn default_max_message_bytes() -> usize {
    64 * 1024 * 1024
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_are_deterministic() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.connection.server, "localhost:50051");
        assert!(!cfg.connection.use_ssl);
        assert_eq!(cfg.connection.request_timeout_ms, None);
        assert_eq!(cfg.connection.max_decoding_message_bytes, 64 * 1024 * 1024);
        assert_eq!(cfg.logging.level, "warn");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: ClientConfig = toml::from_str(
            r#"
            [connection]
            server = "riva.internal:443"
            use_ssl = true

            [connection.metadata]
            x-api-key = "secret"
            "#,
        )
        .expect("config parses");

        assert_eq!(cfg.connection.server, "riva.internal:443");
        assert!(cfg.connection.use_ssl);
        assert_eq!(cfg.connection.connect_timeout_ms, 10_000);
        assert_eq!(
            cfg.connection.metadata.get("x-api-key").map(String::as_str),
            Some("secret")
        );
        assert_eq!(cfg.logging.level, "warn");
    }
}
