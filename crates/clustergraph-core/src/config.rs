use std::{
    env,
    path::{Path, PathBuf},
};

use config as cfg;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{Credentials, Result, TopologyError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Upper bound on members queried at the same time.
    #[serde(default = "CollectionConfig::default_workers")]
    pub workers: usize,
    #[serde(default = "CollectionConfig::default_member_timeout_secs")]
    pub member_timeout_secs: u64,
    #[serde(default)]
    pub collect_queues: bool,
}

impl CollectionConfig {
    fn default_workers() -> usize {
        4
    }

    fn default_member_timeout_secs() -> u64 {
        60
    }
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            workers: Self::default_workers(),
            member_timeout_secs: Self::default_member_timeout_secs(),
            collect_queues: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SnapshotConfig {
    #[serde(default)]
    pub prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub user_id: Option<String>,
    // Never written back out; only read from config files or the environment.
    #[serde(default, skip_serializing)]
    pub password: Option<SecretString>,
    #[serde(default)]
    pub cipher_suite: Option<String>,
}

impl From<&CredentialsConfig> for Credentials {
    fn from(c: &CredentialsConfig) -> Self {
        Credentials {
            user_id: c.user_id.clone(),
            password: c.password.clone(),
            cipher_suite: c.cipher_suite.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub collection: CollectionConfig,
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if !(1..=256).contains(&self.collection.workers) {
            return Err(TopologyError::Config(
                "collection.workers must be 1..=256".into(),
            ));
        }
        if self.collection.member_timeout_secs == 0 {
            return Err(TopologyError::Config(
                "collection.member_timeout_secs must be > 0".into(),
            ));
        }
        if self.logging.level.trim().is_empty() {
            return Err(TopologyError::Config("logging.level cannot be empty".into()));
        }
        Ok(())
    }

    /// Get the default configuration directory.
    ///
    /// Priority order:
    /// 1. ~/.clustergraph/
    /// 2. ./config/
    /// 3. Current directory
    pub fn default_config_dir() -> PathBuf {
        if let Some(home_dir) = dirs::home_dir() {
            let dir = home_dir.join(".clustergraph");
            if dir.exists() {
                return dir;
            }
        }

        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let project_config = cwd.join("config");
        if project_config.exists() {
            return project_config;
        }
        cwd
    }

    /// Layers `default.toml` from the config directory, then `extra` (which
    /// must exist when given), then `CLUSTERGRAPH__*` environment variables.
    pub fn load(extra: Option<&Path>) -> Result<Settings> {
        Self::load_from_sources(&Self::default_config_dir(), extra)
    }

    pub fn load_from_sources(config_dir: &Path, extra: Option<&Path>) -> Result<Settings> {
        let mut builder = cfg::Config::builder()
            .add_source(cfg::File::from(config_dir.join("default.toml")).required(false));

        if let Some(path) = extra {
            if !path.exists() {
                return Err(TopologyError::NotFound(path.to_path_buf()));
            }
            info!("Using configuration file {:?}", path);
            builder = builder.add_source(cfg::File::from(path.to_path_buf()).required(true));
        }

        builder = builder.add_source(
            cfg::Environment::with_prefix("CLUSTERGRAPH")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Settings = builder
            .build()
            .map_err(|e| TopologyError::Config(format!("building configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| TopologyError::Config(format!("deserializing configuration: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::from(&self.credentials)
    }
}
