use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::client::{
    config::{ClientConfig, StatusMapping},
    error::{ClientError, Result},
};

/// Connection settings as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JenkinsConfig {
    /// The URL of the Jenkins instance
    pub url: String,
    /// The user owning the API token
    pub username: String,
    /// The API token to authenticate with
    pub token: String,
    /// Skip TLS certificate verification
    #[serde(default)]
    pub accept_invalid_certs: bool,
    #[serde(default)]
    pub status_mapping: StatusMapping,
    /// Queue resolution bound; `0` looks the queue item up once
    #[serde(default)]
    pub queue_timeout_secs: Option<u64>,
}

pub fn default_config_path() -> PathBuf {
    if let Some(dirs) = BaseDirs::new() {
        dirs.config_dir().join("jenkins-client.toml")
    } else {
        PathBuf::from("jenkins-client.toml")
    }
}

/// Read and validate a configuration file
pub fn load_config(config_file: &Path) -> Result<JenkinsConfig> {
    let config: JenkinsConfig =
        confy::load_path(config_file).map_err(|e| ClientError::ConfigFile(e.to_string()))?;

    ClientConfig::from(config.clone()).validate()?;
    Ok(config)
}

pub fn save_config(config_file: &Path, config: &JenkinsConfig) -> Result<()> {
    confy::store_path(config_file, config).map_err(|e| ClientError::ConfigFile(e.to_string()))?;

    Ok(())
}
