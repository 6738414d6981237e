//! Server configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional YAML
//! file, then `VITRINE_*` environment variables, then command-line flags
//! (which also read the legacy deployment variables).

use std::path::PathBuf;

use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use vitrine_client::RestClientConfig;
use vitrine_common::VitrineError;

use crate::startup::LoggingConfig;

pub const DEFAULT_CONFIG_FILE: &str = "conf/application.yml";

const SERVER_ADDRESS: &str = "server.address";
const SERVER_PORT: &str = "server.port";
const SERVER_JSON_LIMIT: &str = "server.json_limit";
const REMOTE_URL: &str = "remote.url";
const REMOTE_SERVICE_KEY: &str = "remote.service_key";
const REMOTE_CONNECT_TIMEOUT_MS: &str = "remote.connect_timeout_ms";
const REMOTE_READ_TIMEOUT_MS: &str = "remote.read_timeout_ms";
const FALLBACK_DATA_DIR: &str = "fallback.data_dir";
const AUTH_ADMIN_TOKEN: &str = "auth.admin_token";
const AUTH_ADMIN_USERNAME: &str = "auth.admin_username";
const LOGGING_LEVEL: &str = "logging.level";
const LOGGING_DIR: &str = "logging.dir";
const LOGGING_CONSOLE: &str = "logging.console";

const REQUIRED_KEYS: [&str; 3] = [REMOTE_URL, REMOTE_SERVICE_KEY, AUTH_ADMIN_TOKEN];

/// Command line arguments for the server
#[derive(Debug, Default, Parser)]
#[command(name = "vitrine-server", about = "Admin API for service blog posts and FAQs")]
pub struct Cli {
    /// Path of the YAML configuration file
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,
    #[arg(long = "remote-url", env = "SUPABASE_URL")]
    pub remote_url: Option<String>,
    #[arg(long = "service-key", env = "SUPABASE_SERVICE_KEY")]
    pub service_key: Option<String>,
    #[arg(long = "admin-token", env = "ADMIN_TOKEN")]
    pub admin_token: Option<String>,
    #[arg(long = "admin-username", env = "ADMIN_USERNAME")]
    pub admin_username: Option<String>,
    #[arg(short = 'p', long = "port", env = "PORT")]
    pub port: Option<u16>,
    #[arg(long = "data-dir", env = "DATA_DIR")]
    pub data_dir: Option<String>,
}

/// Application configuration loaded from defaults, file, environment and flags
#[derive(Clone, Debug)]
pub struct Configuration {
    pub config: Config,
}

fn config_error(err: ConfigError) -> VitrineError {
    VitrineError::Config(err.to_string())
}

impl Configuration {
    /// Load the configuration and check that every required key is present.
    pub fn load(cli: Cli) -> Result<Self, VitrineError> {
        let file = cli
            .config
            .clone()
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

        let mut builder = Config::builder()
            .set_default(SERVER_ADDRESS, "0.0.0.0")
            .and_then(|b| b.set_default(SERVER_PORT, 4000_i64))
            .and_then(|b| b.set_default(SERVER_JSON_LIMIT, 1_048_576_i64))
            .and_then(|b| b.set_default(REMOTE_CONNECT_TIMEOUT_MS, 5000_i64))
            .and_then(|b| b.set_default(REMOTE_READ_TIMEOUT_MS, 15000_i64))
            .and_then(|b| b.set_default(FALLBACK_DATA_DIR, "data"))
            .and_then(|b| b.set_default(AUTH_ADMIN_USERNAME, "admin"))
            .and_then(|b| b.set_default(LOGGING_LEVEL, "info"))
            .and_then(|b| b.set_default(LOGGING_CONSOLE, true))
            .map_err(config_error)?
            .add_source(File::with_name(&file).required(false))
            .add_source(
                Environment::with_prefix("VITRINE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let overrides = [
            (REMOTE_URL, cli.remote_url),
            (REMOTE_SERVICE_KEY, cli.service_key),
            (AUTH_ADMIN_TOKEN, cli.admin_token),
            (AUTH_ADMIN_USERNAME, cli.admin_username),
            (FALLBACK_DATA_DIR, cli.data_dir),
        ];
        for (key, value) in overrides {
            if let Some(v) = value {
                builder = builder.set_override(key, v).map_err(config_error)?;
            }
        }
        if let Some(port) = cli.port {
            builder = builder
                .set_override(SERVER_PORT, i64::from(port))
                .map_err(config_error)?;
        }

        let configuration = Self::from_config(builder.build().map_err(config_error)?);
        configuration.validate()?;
        Ok(configuration)
    }

    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Fail on the first required key that is missing or blank.
    pub fn validate(&self) -> Result<(), VitrineError> {
        for key in REQUIRED_KEYS {
            self.required(key)?;
        }
        Ok(())
    }

    fn required(&self, key: &str) -> Result<String, VitrineError> {
        match self.config.get_string(key) {
            Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
            _ => Err(VitrineError::Config(format!("missing required key: {}", key))),
        }
    }

    pub fn server_address(&self) -> String {
        self.config
            .get_string(SERVER_ADDRESS)
            .unwrap_or_else(|_| "0.0.0.0".to_string())
    }

    pub fn server_port(&self) -> u16 {
        self.config
            .get_int(SERVER_PORT)
            .ok()
            .and_then(|v| u16::try_from(v).ok())
            .unwrap_or(4000)
    }

    /// Maximum accepted JSON body size in bytes
    pub fn json_limit(&self) -> usize {
        self.config
            .get_int(SERVER_JSON_LIMIT)
            .ok()
            .and_then(|v| usize::try_from(v).ok())
            .unwrap_or(1_048_576)
    }

    pub fn remote_url(&self) -> Result<String, VitrineError> {
        self.required(REMOTE_URL)
    }

    pub fn service_key(&self) -> Result<String, VitrineError> {
        self.required(REMOTE_SERVICE_KEY)
    }

    pub fn connect_timeout_ms(&self) -> u64 {
        self.config
            .get_int(REMOTE_CONNECT_TIMEOUT_MS)
            .ok()
            .and_then(|v| u64::try_from(v).ok())
            .unwrap_or(5000)
    }

    pub fn read_timeout_ms(&self) -> u64 {
        self.config
            .get_int(REMOTE_READ_TIMEOUT_MS)
            .ok()
            .and_then(|v| u64::try_from(v).ok())
            .unwrap_or(15000)
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(
            self.config
                .get_string(FALLBACK_DATA_DIR)
                .unwrap_or_else(|_| "data".to_string()),
        )
    }

    pub fn admin_token(&self) -> Result<String, VitrineError> {
        self.required(AUTH_ADMIN_TOKEN)
    }

    pub fn admin_username(&self) -> String {
        self.config
            .get_string(AUTH_ADMIN_USERNAME)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "admin".to_string())
    }

    pub fn rest_client_config(&self) -> Result<RestClientConfig, VitrineError> {
        Ok(
            RestClientConfig::new(&self.remote_url()?, &self.service_key()?)
                .with_timeouts(self.connect_timeout_ms(), self.read_timeout_ms()),
        )
    }

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig::from_config(
            self.config.get_string(LOGGING_DIR).ok(),
            self.config.get_bool(LOGGING_CONSOLE).unwrap_or(true),
            self.config
                .get_string(LOGGING_LEVEL)
                .unwrap_or_else(|_| "info".to_string()),
        )
    }
}
