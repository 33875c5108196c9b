use std::env;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{GfiError, Result};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8000;

const CREDENTIAL_DIR: &str = ".gfi";
const CREDENTIAL_FILE: &str = "good-first-issues";

/// Runtime configuration, passed explicitly to every component that touches
/// the filesystem or the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub home_dir: PathBuf,
    pub api_url: String,
    pub graphql_url: String,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Defaults for everything except the home directory.
    pub fn with_home(home_dir: impl Into<PathBuf>) -> Self {
        Config {
            home_dir: home_dir.into(),
            api_url: DEFAULT_API_URL.to_string(),
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }

    /// Build the configuration from the user's home directory and `GFI_*`
    /// environment variables.
    pub fn from_env() -> Result<Self> {
        let home = dirs::home_dir().ok_or(GfiError::NoHomeDir)?;
        Ok(Self::from_lookup(home, |key| env::var(key).ok()))
    }

    pub fn from_lookup<F>(home_dir: impl Into<PathBuf>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::with_home(home_dir);

        if let Some(url) = non_empty(lookup("GFI_API_URL")) {
            config.api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(url) = non_empty(lookup("GFI_GRAPHQL_URL")) {
            config.graphql_url = url;
        }
        if let Some(host) = non_empty(lookup("GFI_HOST")) {
            config.host = host;
        }
        if let Some(port) = non_empty(lookup("GFI_PORT")) {
            match port.parse::<u16>() {
                Ok(port) => config.port = port,
                Err(_) => warn!(
                    "Ignoring invalid GFI_PORT '{}', using {}",
                    port, DEFAULT_PORT
                ),
            }
        }

        config
    }

    pub fn credential_dir(&self) -> PathBuf {
        self.home_dir.join(CREDENTIAL_DIR)
    }

    pub fn credential_file(&self) -> PathBuf {
        credential_file_in(&self.credential_dir())
    }
}

pub(crate) fn credential_file_in(dir: &Path) -> PathBuf {
    dir.join(CREDENTIAL_FILE)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_overrides() {
        let config = Config::from_lookup("/home/dev", lookup_from(&[]));
        assert_eq!(config, Config::with_home("/home/dev"));
        assert_eq!(config.port, 8000);
        assert_eq!(config.host, "localhost");
    }

    #[test]
    fn credential_path_lives_under_home() {
        let config = Config::with_home("/home/dev");
        assert_eq!(
            config.credential_file(),
            PathBuf::from("/home/dev/.gfi/good-first-issues")
        );
    }

    #[test]
    fn env_overrides_are_applied() {
        let config = Config::from_lookup(
            "/home/dev",
            lookup_from(&[
                ("GFI_API_URL", "http://127.0.0.1:9999/"),
                ("GFI_GRAPHQL_URL", "http://127.0.0.1:9999/graphql"),
                ("GFI_HOST", "127.0.0.1"),
                ("GFI_PORT", "8080"),
            ]),
        );
        assert_eq!(config.api_url, "http://127.0.0.1:9999");
        assert_eq!(config.graphql_url, "http://127.0.0.1:9999/graphql");
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn invalid_port_keeps_default() {
        let config = Config::from_lookup("/home/dev", lookup_from(&[("GFI_PORT", "eighty")]));
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = Config::from_lookup("/home/dev", lookup_from(&[("GFI_API_URL", "  ")]));
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }
}
