//! Operator configuration: optional TOML file layered under `UNICRED_*`
//! environment variables. Command-line flags override both.

use anyhow::{Context, Result};
use config::{Config, Environment, File as ConfigFile};
use std::path::{Path, PathBuf};
use unicred_types::Address;

pub const DEFAULT_CONFIG_PATH: &str = "unicred.toml";
pub const ENV_PREFIX: &str = "UNICRED";

#[derive(Debug, Clone)]
pub struct AdminConfig {
    // Storage
    pub data_dir: PathBuf,
    pub deployment_info: PathBuf,

    // Admins used by `deploy --init` and `initialize` when no flag is given
    pub platform_admin: Option<Address>,
    pub college_admin: Option<Address>,

    // Logging
    pub log_level: String,
    pub log_format: String,
}

impl AdminConfig {
    pub fn load(config_path_override: Option<&Path>) -> Result<Self> {
        let resolved_path = match config_path_override {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!(
                        "Configuration file {} not found (specified via --config)",
                        path.display()
                    );
                }
                Some(path.to_path_buf())
            }
            None => Some(PathBuf::from(DEFAULT_CONFIG_PATH)).filter(|path| path.exists()),
        };

        let mut builder = Config::builder();
        if let Some(path) = &resolved_path {
            builder = builder.add_source(ConfigFile::from(path.as_path()));
        }
        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX));
        let config = builder.build().context("Failed to build configuration")?;

        Self::from_config(&config)
    }

    fn from_config(config: &Config) -> Result<Self> {
        let data_dir = get_string_value(config, &["data_dir"])
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data/admin-registry"));
        let deployment_info = get_string_value(config, &["deployment_info"])
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("DEPLOYMENT_INFO.txt"));

        let platform_admin = parse_address(config, "platform_admin")?;
        let college_admin = parse_address(config, "college_admin")?;

        Ok(Self {
            data_dir,
            deployment_info,
            platform_admin,
            college_admin,
            log_level: get_string_value(config, &["log_level"])
                .unwrap_or_else(|| "warn".to_string()),
            log_format: get_string_value(config, &["log_format"])
                .unwrap_or_else(|| "plain".to_string()),
        })
    }
}

fn get_string_value(config: &Config, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| config.get_string(key).ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_address(config: &Config, key: &str) -> Result<Option<Address>> {
    get_string_value(config, &[key])
        .map(|value| {
            value
                .parse::<Address>()
                .with_context(|| format!("Invalid {key} address in configuration: {value}"))
        })
        .transpose()
}
