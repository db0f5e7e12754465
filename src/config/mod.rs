//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `RANKER_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_DATASET_FILE, DEFAULT_ENCODERS_FILE, DEFAULT_FEATURE_COLUMNS_FILE, DEFAULT_MAX_TOP_K,
    DEFAULT_MODEL_FILE,
};

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `RANKER_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Directory holding the four artifact files. Default: `./artifacts`.
    pub artifact_dir: PathBuf,

    /// LightGBM text model. Default: `{artifact_dir}/model.txt`.
    pub model_path: Option<PathBuf>,

    /// Encoder registry JSON. Default: `{artifact_dir}/encoders.json`.
    pub encoders_path: Option<PathBuf>,

    /// Ordered feature column list JSON. Default: `{artifact_dir}/feature_columns.json`.
    pub feature_columns_path: Option<PathBuf>,

    /// Reference dataset JSON. Default: `{artifact_dir}/reference_data.json`.
    pub dataset_path: Option<PathBuf>,

    /// Number of boosting iterations used at inference. `None` uses every tree.
    pub num_iteration: Option<usize>,

    /// Upper bound accepted for `top_k`. Default: `1000`.
    pub max_top_k: usize,

    /// Refuse to start when the reference dataset violates the first-row join assumption.
    pub strict_joins: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            artifact_dir: PathBuf::from("./artifacts"),
            model_path: None,
            encoders_path: None,
            feature_columns_path: None,
            dataset_path: None,
            num_iteration: None,
            max_top_k: DEFAULT_MAX_TOP_K,
            strict_joins: false,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "RANKER_PORT";
    const ENV_BIND_ADDR: &'static str = "RANKER_BIND_ADDR";
    const ENV_ARTIFACT_DIR: &'static str = "RANKER_ARTIFACT_DIR";
    const ENV_MODEL_PATH: &'static str = "RANKER_MODEL_PATH";
    const ENV_ENCODERS_PATH: &'static str = "RANKER_ENCODERS_PATH";
    const ENV_FEATURE_COLUMNS_PATH: &'static str = "RANKER_FEATURE_COLUMNS_PATH";
    const ENV_DATASET_PATH: &'static str = "RANKER_DATASET_PATH";
    const ENV_NUM_ITERATION: &'static str = "RANKER_NUM_ITERATION";
    const ENV_MAX_TOP_K: &'static str = "RANKER_MAX_TOP_K";
    const ENV_STRICT_JOINS: &'static str = "RANKER_STRICT_JOINS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let artifact_dir = Self::parse_path_from_env(Self::ENV_ARTIFACT_DIR, defaults.artifact_dir);
        let model_path = Self::parse_optional_path_from_env(Self::ENV_MODEL_PATH);
        let encoders_path = Self::parse_optional_path_from_env(Self::ENV_ENCODERS_PATH);
        let feature_columns_path =
            Self::parse_optional_path_from_env(Self::ENV_FEATURE_COLUMNS_PATH);
        let dataset_path = Self::parse_optional_path_from_env(Self::ENV_DATASET_PATH);
        let num_iteration = Self::parse_optional_usize_from_env(Self::ENV_NUM_ITERATION)?;
        let max_top_k = Self::parse_usize_from_env(Self::ENV_MAX_TOP_K, defaults.max_top_k)?;
        let strict_joins = Self::parse_bool_from_env(Self::ENV_STRICT_JOINS, defaults.strict_joins);

        Ok(Self {
            port,
            bind_addr,
            artifact_dir,
            model_path,
            encoders_path,
            feature_columns_path,
            dataset_path,
            num_iteration,
            max_top_k,
            strict_joins,
        })
    }

    /// Validates that every artifact file exists (does not parse them).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.artifact_dir.exists() && !self.artifact_dir.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.artifact_dir.clone(),
            });
        }

        for path in [
            self.model_path(),
            self.encoders_path(),
            self.feature_columns_path(),
            self.dataset_path(),
        ] {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path });
            }
            if !path.is_file() {
                return Err(ConfigError::NotAFile { path });
            }
        }

        if self.max_top_k == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_MAX_TOP_K,
                value: "0".to_string(),
            });
        }

        if self.num_iteration == Some(0) {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_NUM_ITERATION,
                value: "0".to_string(),
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    pub fn model_path(&self) -> PathBuf {
        self.resolve(self.model_path.as_ref(), DEFAULT_MODEL_FILE)
    }

    pub fn encoders_path(&self) -> PathBuf {
        self.resolve(self.encoders_path.as_ref(), DEFAULT_ENCODERS_FILE)
    }

    pub fn feature_columns_path(&self) -> PathBuf {
        self.resolve(
            self.feature_columns_path.as_ref(),
            DEFAULT_FEATURE_COLUMNS_FILE,
        )
    }

    pub fn dataset_path(&self) -> PathBuf {
        self.resolve(self.dataset_path.as_ref(), DEFAULT_DATASET_FILE)
    }

    fn resolve(&self, explicit: Option<&PathBuf>, file_name: &str) -> PathBuf {
        explicit
            .cloned()
            .unwrap_or_else(|| self.artifact_dir.join(file_name))
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_usize_from_env(var_name: &'static str, default: usize) -> Result<usize, ConfigError> {
        Ok(Self::parse_optional_usize_from_env(var_name)?.unwrap_or(default))
    }

    fn parse_optional_usize_from_env(var_name: &'static str) -> Result<Option<usize>, ConfigError> {
        match env::var(var_name) {
            Ok(value) if value.trim().is_empty() => Ok(None),
            Ok(value) => value
                .trim()
                .parse()
                .map(Some)
                .map_err(|e| ConfigError::IntParseError {
                    name: var_name,
                    value,
                    source: e,
                }),
            Err(_) => Ok(None),
        }
    }

    fn parse_bool_from_env(var_name: &str, default: bool) -> bool {
        env::var(var_name)
            .ok()
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(default)
    }
}
