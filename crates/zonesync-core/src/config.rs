//! Configuration types for zonesync
//!
//! This module defines all configuration structures used throughout the workspace.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Main zonesync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Zone provider configuration
    pub provider: ProviderConfig,

    /// Zones to manage (absolute names, e.g. "example.com.")
    pub zones: Vec<String>,
}

impl SyncConfig {
    /// Create a new configuration for a provider with no zones
    pub fn new(provider: ProviderConfig) -> Self {
        Self {
            provider,
            zones: Vec::new(),
        }
    }

    /// Load and validate a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, crate::Error> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: SyncConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.zones.is_empty() {
            return Err(crate::Error::config("No zones configured"));
        }

        for zone in &self.zones {
            if !zone.ends_with('.') || zone.len() < 2 {
                return Err(crate::Error::config(format!(
                    "Zone name must be absolute (end with '.'): {}",
                    zone
                )));
            }
        }

        self.provider.validate()
    }
}

/// Zone provider configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Google Cloud DNS provider
    #[serde(rename = "googledns")]
    GoogleDns {
        /// Cloud project that owns the managed zones
        project_id: String,
        /// OAuth2 bearer token, acquired outside zonesync
        access_token: String,
        /// API endpoint override (emulators, proxies)
        #[serde(default)]
        endpoint: Option<String>,
        /// Per-request timeout in seconds
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
        /// Perform reads but only log writes
        #[serde(default)]
        dry_run: bool,
    },

    /// Custom provider
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::GoogleDns {
                project_id,
                access_token,
                timeout_secs,
                ..
            } => {
                if project_id.is_empty() {
                    return Err(crate::Error::config("Google Cloud DNS project_id cannot be empty"));
                }
                if access_token.is_empty() {
                    return Err(crate::Error::config(
                        "Google Cloud DNS access_token cannot be empty",
                    ));
                }
                if *timeout_secs == 0 {
                    return Err(crate::Error::config("Provider timeout must be > 0"));
                }
                Ok(())
            }
            ProviderConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom provider factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom provider config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::GoogleDns { .. } => "googledns",
            ProviderConfig::Custom { factory, .. } => factory,
        }
    }
}

// Keeps the access token out of logs
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderConfig::GoogleDns {
                project_id,
                endpoint,
                timeout_secs,
                dry_run,
                ..
            } => f
                .debug_struct("GoogleDns")
                .field("project_id", project_id)
                .field("access_token", &"<REDACTED>")
                .field("endpoint", endpoint)
                .field("timeout_secs", timeout_secs)
                .field("dry_run", dry_run)
                .finish(),
            ProviderConfig::Custom { factory, config } => f
                .debug_struct("Custom")
                .field("factory", factory)
                .field("config", config)
                .finish(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn google(token: &str) -> ProviderConfig {
        ProviderConfig::GoogleDns {
            project_id: "my-project".to_string(),
            access_token: token.to_string(),
            endpoint: None,
            timeout_secs: default_timeout_secs(),
            dry_run: false,
        }
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "provider": {{ "type": "googledns", "project_id": "p", "access_token": "t" }},
                "zones": ["example.com.", "example.net."]
            }}"#
        )
        .unwrap();

        let config = SyncConfig::from_file(file.path()).unwrap();
        assert_eq!(config.zones.len(), 2);
        assert_eq!(config.provider.type_name(), "googledns");

        match config.provider {
            ProviderConfig::GoogleDns {
                timeout_secs,
                dry_run,
                endpoint,
                ..
            } => {
                assert_eq!(timeout_secs, 30);
                assert!(!dry_run);
                assert!(endpoint.is_none());
            }
            other => panic!("unexpected provider {:?}", other),
        }
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SyncConfig::from_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }

    #[test]
    fn test_validation() {
        let mut config = SyncConfig::new(google("token"));
        assert!(config.validate().is_err(), "no zones");

        config.zones.push("example.com".to_string());
        assert!(config.validate().is_err(), "relative zone name");

        config.zones[0] = "example.com.".to_string();
        assert!(config.validate().is_ok());

        config.provider = google("");
        assert!(config.validate().is_err(), "empty token");
    }

    #[test]
    fn test_token_not_exposed_in_debug() {
        let debug_str = format!("{:?}", google("secret_token_12345"));
        assert!(!debug_str.contains("secret_token"));
        assert!(debug_str.contains("my-project"));
    }
}
