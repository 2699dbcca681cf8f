use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::recommendations::{
    EngineSettings, DEFAULT_LIMIT, DEFAULT_MIN_SCORE, FOCUS_MIN_SCORE, FOCUS_TOP_N,
};
use crate::scoring::CombinerWeights;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub server: ServerConfig,
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
}

#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub compatibility_weight: f64,
    pub profitability_weight: f64,
    pub default_limit: usize,
    pub default_min_score: f64,
    pub focus_min_score: f64,
    pub focus_top_n: usize,
    /// Fixed seed for maturity jitter. `None` draws fresh entropy per request.
    pub maturity_seed: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Memory,
    Sqlite,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub storage_backend: Option<StorageBackend>,
    pub storage_url: Option<String>,
    pub server_port: Option<u16>,
    pub log_level: Option<String>,
    pub maturity_seed: Option<u64>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                url: "sqlite://partnerfit.db".to_string(),
                max_connections: 5,
                timeout_secs: 30,
            },
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 8000,
                graceful_shutdown_secs: 15,
            },
            engine: EngineConfig {
                compatibility_weight: CombinerWeights::DEFAULT.compatibility,
                profitability_weight: CombinerWeights::DEFAULT.profitability,
                default_limit: DEFAULT_LIMIT,
                default_min_score: DEFAULT_MIN_SCORE,
                focus_min_score: FOCUS_MIN_SCORE,
                focus_top_n: FOCUS_TOP_N,
                maturity_seed: None,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl EngineConfig {
    pub fn weights(&self) -> CombinerWeights {
        CombinerWeights {
            compatibility: self.compatibility_weight,
            profitability: self.profitability_weight,
        }
    }

    pub fn settings(&self) -> EngineSettings {
        EngineSettings {
            weights: self.weights(),
            default_min_score: self.default_min_score,
            focus_min_score: self.focus_min_score,
            focus_top_n: self.focus_top_n,
        }
    }
}

impl StorageBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Sqlite => "sqlite",
        }
    }
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(ConfigError::Validation(format!(
                "unsupported storage backend `{other}` (expected memory|sqlite)"
            ))),
        }
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("partnerfit.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(storage) = patch.storage {
            if let Some(backend) = storage.backend {
                self.storage.backend = backend;
            }
            if let Some(url) = storage.url {
                self.storage.url = url;
            }
            if let Some(max_connections) = storage.max_connections {
                self.storage.max_connections = max_connections;
            }
            if let Some(timeout_secs) = storage.timeout_secs {
                self.storage.timeout_secs = timeout_secs;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
        }

        if let Some(engine) = patch.engine {
            if let Some(compatibility_weight) = engine.compatibility_weight {
                self.engine.compatibility_weight = compatibility_weight;
            }
            if let Some(profitability_weight) = engine.profitability_weight {
                self.engine.profitability_weight = profitability_weight;
            }
            if let Some(default_limit) = engine.default_limit {
                self.engine.default_limit = default_limit;
            }
            if let Some(default_min_score) = engine.default_min_score {
                self.engine.default_min_score = default_min_score;
            }
            if let Some(focus_min_score) = engine.focus_min_score {
                self.engine.focus_min_score = focus_min_score;
            }
            if let Some(focus_top_n) = engine.focus_top_n {
                self.engine.focus_top_n = focus_top_n;
            }
            if let Some(maturity_seed) = engine.maturity_seed {
                self.engine.maturity_seed = Some(maturity_seed);
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("PARTNERFIT_STORAGE_BACKEND") {
            self.storage.backend = value.parse()?;
        }
        if let Some(value) = read_env("PARTNERFIT_STORAGE_URL") {
            self.storage.url = value;
        }
        if let Some(value) = read_env("PARTNERFIT_STORAGE_MAX_CONNECTIONS") {
            self.storage.max_connections = parse_env("PARTNERFIT_STORAGE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("PARTNERFIT_STORAGE_TIMEOUT_SECS") {
            self.storage.timeout_secs = parse_env("PARTNERFIT_STORAGE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("PARTNERFIT_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("PARTNERFIT_SERVER_PORT") {
            self.server.port = parse_env("PARTNERFIT_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("PARTNERFIT_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_env("PARTNERFIT_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        if let Some(value) = read_env("PARTNERFIT_ENGINE_COMPATIBILITY_WEIGHT") {
            self.engine.compatibility_weight =
                parse_env("PARTNERFIT_ENGINE_COMPATIBILITY_WEIGHT", &value)?;
        }
        if let Some(value) = read_env("PARTNERFIT_ENGINE_PROFITABILITY_WEIGHT") {
            self.engine.profitability_weight =
                parse_env("PARTNERFIT_ENGINE_PROFITABILITY_WEIGHT", &value)?;
        }
        if let Some(value) = read_env("PARTNERFIT_ENGINE_DEFAULT_LIMIT") {
            self.engine.default_limit = parse_env("PARTNERFIT_ENGINE_DEFAULT_LIMIT", &value)?;
        }
        if let Some(value) = read_env("PARTNERFIT_ENGINE_DEFAULT_MIN_SCORE") {
            self.engine.default_min_score =
                parse_env("PARTNERFIT_ENGINE_DEFAULT_MIN_SCORE", &value)?;
        }
        if let Some(value) = read_env("PARTNERFIT_ENGINE_FOCUS_MIN_SCORE") {
            self.engine.focus_min_score = parse_env("PARTNERFIT_ENGINE_FOCUS_MIN_SCORE", &value)?;
        }
        if let Some(value) = read_env("PARTNERFIT_ENGINE_FOCUS_TOP_N") {
            self.engine.focus_top_n = parse_env("PARTNERFIT_ENGINE_FOCUS_TOP_N", &value)?;
        }
        if let Some(value) = read_env("PARTNERFIT_ENGINE_MATURITY_SEED") {
            self.engine.maturity_seed = Some(parse_env("PARTNERFIT_ENGINE_MATURITY_SEED", &value)?);
        }

        let log_level =
            read_env("PARTNERFIT_LOGGING_LEVEL").or_else(|| read_env("PARTNERFIT_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("PARTNERFIT_LOGGING_FORMAT").or_else(|| read_env("PARTNERFIT_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(backend) = overrides.storage_backend {
            self.storage.backend = backend;
        }
        if let Some(url) = overrides.storage_url {
            self.storage.url = url;
        }
        if let Some(port) = overrides.server_port {
            self.server.port = port;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(maturity_seed) = overrides.maturity_seed {
            self.engine.maturity_seed = Some(maturity_seed);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_storage(&self.storage)?;
        validate_server(&self.server)?;
        validate_engine(&self.engine)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("partnerfit.toml"), PathBuf::from("config/partnerfit.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_storage(storage: &StorageConfig) -> Result<(), ConfigError> {
    if storage.backend == StorageBackend::Memory {
        return Ok(());
    }

    let url = storage.url.trim();
    let sqlite_url =
        url.starts_with("sqlite://") || url.starts_with("sqlite::") || url == ":memory:";
    if !sqlite_url {
        return Err(ConfigError::Validation(
            "storage.url must be a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`)"
                .to_string(),
        ));
    }

    if storage.max_connections == 0 {
        return Err(ConfigError::Validation(
            "storage.max_connections must be greater than zero".to_string(),
        ));
    }

    if storage.timeout_secs == 0 || storage.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "storage.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_engine(engine: &EngineConfig) -> Result<(), ConfigError> {
    engine
        .weights()
        .validate()
        .map_err(|error| ConfigError::Validation(format!("engine weights: {error}")))?;

    for (field, value) in [
        ("engine.default_min_score", engine.default_min_score),
        ("engine.focus_min_score", engine.focus_min_score),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::Validation(format!("{field} must be in range 0..=1")));
        }
    }

    if engine.default_limit == 0 {
        return Err(ConfigError::Validation(
            "engine.default_limit must be greater than zero".to_string(),
        ));
    }

    if engine.focus_top_n == 0 {
        return Err(ConfigError::Validation(
            "engine.focus_top_n must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse::<T>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    storage: Option<StoragePatch>,
    server: Option<ServerPatch>,
    engine: Option<EnginePatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct StoragePatch {
    backend: Option<StorageBackend>,
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct EnginePatch {
    compatibility_weight: Option<f64>,
    profitability_weight: Option<f64>,
    default_limit: Option<usize>,
    default_min_score: Option<f64>,
    focus_min_score: Option<f64>,
    focus_top_n: Option<usize>,
    maturity_seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
