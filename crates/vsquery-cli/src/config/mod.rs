//! Configuration management for the vsquery CLI
//!
//! Settings are layered, lowest priority first:
//! 1. Built-in defaults
//! 2. TOML file (`--config` or `<config dir>/vsquery/config.toml`)
//! 3. `VSQUERY_` environment variables, nested keys split on `__`
//!    (e.g. `VSQUERY_CACHE__ENABLED=true`)
//!
//! Command-line flags are applied on top by the handlers.

use crate::error::{CliError, Result};
use etcetera::{choose_base_strategy, BaseStrategy};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use vsquery_common::{API_BASE_URL, DEFAULT_CACHE_DIR, DEFAULT_REDIRECT_URI, IAM_BASE_URL};
use vsquery_sdk::{CacheKeyScope, Endpoints};

const ENV_PREFIX: &str = "VSQUERY_";

/// CLI configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CliConfig {
    /// Identity provider configuration
    #[serde(default)]
    pub iam: IamConfig,

    /// Resource API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// OAuth client configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Token cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Identity provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IamConfig {
    /// Base URL of the Viessmann IAM
    pub base_url: String,
}

impl Default for IamConfig {
    fn default() -> Self {
        Self {
            base_url: IAM_BASE_URL.to_string(),
        }
    }
}

/// Resource API configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the Viessmann IoT API
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: API_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Redirect URI registered for the OAuth client
    pub redirect_uri: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
        }
    }
}

/// Token cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Reuse access tokens across invocations
    pub enabled: bool,

    /// Directory holding `<key>.cache` files
    pub path: PathBuf,

    /// How the cache key is derived from the client ID
    pub scope: CacheKeyScope,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: PathBuf::from(DEFAULT_CACHE_DIR),
            scope: CacheKeyScope::default(),
        }
    }
}

impl CliConfig {
    /// Load configuration from `path`, or from the default location
    ///
    /// An explicitly given file must exist; the default one is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => {
                let path = expand_path(path);
                if !path.is_file() {
                    return Err(CliError::Config(figment::Error::from(format!(
                        "configuration file not found: {}",
                        path.display()
                    ))));
                }
                Some(path)
            }
            None => Self::default_path().ok(),
        };

        Self::extract(Self::figment(path.as_deref()))
    }

    /// Provider stack for the given file, without extracting it
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            debug!("Loading configuration from: {}", path.display());
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Extract and normalize a configuration
    pub fn extract(figment: Figment) -> Result<Self> {
        let mut config: Self = figment.extract()?;
        config.cache.path = expand_path(&config.cache.path);
        Ok(config)
    }

    /// Base URLs for the SDK client
    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            iam_base_url: self.iam.base_url.clone(),
            api_base_url: self.api.base_url.clone(),
        }
    }

    /// Get configuration directory
    pub fn config_dir() -> Result<PathBuf> {
        let strategy = choose_base_strategy().map_err(|e| {
            CliError::internal(format!("Failed to determine base directories: {}", e))
        })?;
        Ok(strategy.config_dir().join("vsquery"))
    }

    /// Default configuration file path
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}

/// Expand `~` and environment variables in a path
pub fn expand_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(path_str) => match shellexpand::full(path_str) {
            Ok(expanded) => PathBuf::from(expanded.as_ref()),
            Err(_) => PathBuf::from(shellexpand::tilde(path_str).as_ref()),
        },
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        Jail::expect_with(|_jail| {
            let config =
                CliConfig::extract(CliConfig::figment(None)).map_err(|e| e.to_string())?;

            assert_eq!(config.iam.base_url, "https://iam.viessmann.com");
            assert_eq!(config.api.base_url, "https://api.viessmann-platform.io");
            assert_eq!(config.auth.redirect_uri, "http://localhost:4200/");
            assert!(!config.cache.enabled);
            assert_eq!(config.cache.path, PathBuf::from("/tmp"));
            assert_eq!(config.cache.scope, CacheKeyScope::Shared);
            Ok(())
        });
    }

    #[test]
    fn test_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "vsquery.toml",
                r#"
                [api]
                base_url = "http://localhost:9000"

                [cache]
                enabled = true
                path = "/var/cache/vsquery"
                scope = "per-client"
                "#,
            )?;

            let config =
                CliConfig::load(Some(Path::new("vsquery.toml"))).map_err(|e| e.to_string())?;

            assert_eq!(config.api.base_url, "http://localhost:9000");
            assert_eq!(config.iam.base_url, "https://iam.viessmann.com");
            assert!(config.cache.enabled);
            assert_eq!(config.cache.path, PathBuf::from("/var/cache/vsquery"));
            assert_eq!(config.cache.scope, CacheKeyScope::PerClient);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "vsquery.toml",
                r#"
                [iam]
                base_url = "http://file.example"
                "#,
            )?;
            jail.set_env("VSQUERY_IAM__BASE_URL", "http://env.example");
            jail.set_env("VSQUERY_CACHE__ENABLED", "true");
            // Credential variables share the prefix and must not break extraction
            jail.set_env("VSQUERY_USER", "someone");

            let config =
                CliConfig::load(Some(Path::new("vsquery.toml"))).map_err(|e| e.to_string())?;

            assert_eq!(config.iam.base_url, "http://env.example");
            assert!(config.cache.enabled);
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        Jail::expect_with(|_jail| {
            let result = CliConfig::load(Some(Path::new("absent.toml")));
            assert!(matches!(result, Err(CliError::Config(_))));
            Ok(())
        });
    }

    #[test]
    fn test_invalid_scope_is_error() {
        Jail::expect_with(|jail| {
            jail.create_file("vsquery.toml", "[cache]\nscope = \"global\"\n")?;
            let result = CliConfig::load(Some(Path::new("vsquery.toml")));
            assert!(matches!(result, Err(CliError::Config(_))));
            Ok(())
        });
    }

    #[test]
    fn test_expand_path() {
        Jail::expect_with(|jail| {
            jail.set_env("HOME", "/home/tester");
            assert_eq!(
                expand_path(Path::new("~/.cache/vsquery")),
                PathBuf::from("/home/tester/.cache/vsquery")
            );
            assert_eq!(expand_path(Path::new("/tmp")), PathBuf::from("/tmp"));
            Ok(())
        });
    }

    #[test]
    fn test_endpoints() {
        let mut config = CliConfig::default();
        config.iam.base_url = "http://iam.local".to_string();

        let endpoints = config.endpoints();
        assert_eq!(endpoints.iam_base_url, "http://iam.local");
        assert_eq!(endpoints.api_base_url, "https://api.viessmann-platform.io");
    }
}
