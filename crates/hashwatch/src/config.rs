//! Layered run configuration.
//!
//! Precedence, lowest first: built-in defaults, the TOML file
//! (`hashwatch.toml` or `--config`), `HASHWATCH_*` environment variables,
//! command-line flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use hashwatch_fetch::FetchOptions;
use hashwatch_store::AtomicWriteOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::monitor::MonitorOptions;

pub const DEFAULT_ENDPOINT: &str = "https://r.sine.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    Missing(PathBuf),

    #[error(transparent)]
    Figment(#[from] Box<figment::Error>),

    #[error("max_attempts must be at least 1")]
    ZeroAttempts,

    #[error("invalid endpoint {endpoint}: {reason}")]
    Endpoint { endpoint: String, reason: String },
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self { ConfigError::Figment(Box::new(e)) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// URL fetched on every pass.
    pub endpoint:          String,
    /// Content store directory.
    pub cache_dir:         PathBuf,
    /// Pause between passes; 0 disables it.
    pub delay_secs:        u64,
    pub max_attempts:      u32,
    pub timeout_secs:      u64,
    pub user_agent:        Option<String>,
    /// Compare colliding payloads with the stored item.
    pub verify_collisions: bool,
    /// Detect file types; when off every item is stored as `.unknown`.
    pub sniff:             bool,
    /// fsync each stored item before it is renamed into place.
    pub fsync:             bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint:          DEFAULT_ENDPOINT.to_owned(),
            cache_dir:         PathBuf::from("cache"),
            delay_secs:        5,
            max_attempts:      1,
            timeout_secs:      30,
            user_agent:        None,
            verify_collisions: true,
            sniff:             true,
            fsync:             false,
        }
    }
}

/// Command-line values layered over everything else. Unset fields leave
/// the lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint:          Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir:         Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_secs:        Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_attempts:      Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_collisions: Option<bool>,
}

impl Config {
    pub const FILE_NAME: &str = "hashwatch.toml";
    pub const ENV_PREFIX: &str = "HASHWATCH_";

    /// Defaults, file and environment, without command-line overrides.
    pub fn figment(file: Option<&Path>) -> Result<Figment, ConfigError> {
        let figment = Figment::from(Serialized::defaults(Config::default()));
        let figment = match file {
            Some(path) if !path.exists() => return Err(ConfigError::Missing(path.to_path_buf())),
            Some(path) => figment.merge(Toml::file(path)),
            None => figment.merge(Toml::file(Self::FILE_NAME)),
        };
        Ok(figment.merge(Env::prefixed(Self::ENV_PREFIX)))
    }

    pub fn load(file: Option<&Path>, overrides: &Overrides) -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment(file)?.merge(Serialized::defaults(overrides)))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        let url = url::Url::parse(&self.endpoint).map_err(|e| ConfigError::Endpoint {
            endpoint: self.endpoint.clone(),
            reason:   e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Endpoint {
                endpoint: self.endpoint.clone(),
                reason:   format!("unsupported scheme `{}`", url.scheme()),
            });
        }
        Ok(())
    }

    pub fn delay(&self) -> Duration { Duration::from_secs(self.delay_secs) }

    pub fn fetch_options(&self) -> FetchOptions {
        let options = FetchOptions::default()
            .max_attempts(self.max_attempts)
            .timeout(Duration::from_secs(self.timeout_secs));
        match &self.user_agent {
            Some(agent) => options.user_agent(agent.clone()),
            None => options,
        }
    }

    pub fn store_options(&self) -> AtomicWriteOptions { AtomicWriteOptions::new().sync(self.fsync) }

    pub fn monitor_options(&self) -> MonitorOptions {
        MonitorOptions {
            delay:             self.delay(),
            verify_collisions: self.verify_collisions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str, overrides: &Overrides) -> Result<Config, ConfigError> {
        Config::from_figment(
            Figment::from(Serialized::defaults(Config::default()))
                .merge(Toml::string(toml))
                .merge(Serialized::defaults(overrides)),
        )
    }

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.delay(), Duration::from_secs(5));
        assert_eq!(config.fetch_options().max_attempts, 1);
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = from_toml("delay_secs = 0\nmax_attempts = 4\nsniff = false", &Overrides::default()).unwrap();
        assert_eq!(config.delay_secs, 0);
        assert_eq!(config.max_attempts, 4);
        assert!(!config.sniff);
        assert_eq!(config.cache_dir, PathBuf::from("cache"));
    }

    #[test]
    fn cli_overrides_toml() {
        let overrides = Overrides {
            delay_secs: Some(9),
            cache_dir: Some(PathBuf::from("/tmp/elsewhere")),
            ..Overrides::default()
        };
        let config = from_toml("delay_secs = 1\nmax_attempts = 2", &overrides).unwrap();
        assert_eq!(config.delay_secs, 9);
        assert_eq!(config.max_attempts, 2);
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/elsewhere"));
    }

    #[test]
    fn zero_attempts_rejected() {
        let err = from_toml("max_attempts = 0", &Overrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroAttempts));
    }

    #[test]
    fn bad_endpoint_rejected() {
        let err = from_toml("endpoint = \"ftp://example.test\"", &Overrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Endpoint { .. }));

        let err = from_toml("endpoint = \"not a url\"", &Overrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Endpoint { .. }));
    }

    #[test]
    fn missing_explicit_file() {
        let err = Config::figment(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn layers_apply_in_order() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("layered.toml", "max_attempts = 2\ndelay_secs = 7\nsniff = false")?;
            jail.set_env("HASHWATCH_MAX_ATTEMPTS", "3");
            jail.set_env("HASHWATCH_USER_AGENT", "env-agent/1");
            let file = Path::new("layered.toml");

            let config = Config::load(Some(file), &Overrides::default()).map_err(|e| e.to_string())?;
            assert_eq!(config.max_attempts, 3);
            assert_eq!(config.delay_secs, 7);
            assert!(!config.sniff);
            assert!(!config.fsync);
            assert_eq!(config.timeout_secs, 30);
            assert_eq!(config.fetch_options().user_agent, "env-agent/1");

            let overrides = Overrides {
                max_attempts: Some(5),
                ..Overrides::default()
            };
            let config = Config::load(Some(file), &overrides).map_err(|e| e.to_string())?;
            assert_eq!(config.max_attempts, 5);
            assert_eq!(config.delay_secs, 7);
            Ok(())
        });
    }

    #[test]
    fn default_file_is_picked_up() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(Config::FILE_NAME, "delay_secs = 11\nfsync = true")?;
            let config = Config::load(None, &Overrides::default()).map_err(|e| e.to_string())?;
            assert_eq!(config.delay_secs, 11);
            assert!(config.store_options().sync);
            Ok(())
        });
    }

    #[test]
    fn user_agent_flows_to_fetch_options() {
        let config = from_toml("user_agent = \"probe/1\"\ntimeout_secs = 3", &Overrides::default()).unwrap();
        let options = config.fetch_options();
        assert_eq!(options.user_agent, "probe/1");
        assert_eq!(options.timeout, Duration::from_secs(3));
    }
}
