//! Configuration management for ddns-daddy.

use crate::error::{DdnsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// IP detection services to try, in order.
    #[serde(default = "default_ip_services")]
    pub ip_services: Vec<String>,

    /// Registrar credentials and record settings.
    pub registrar: RegistrarConfig,

    /// Managed records: domain -> subdomains. An empty list means the
    /// zone apex only. BTreeMap keeps domain traversal order stable.
    #[serde(default)]
    pub domains: BTreeMap<String, Vec<String>>,
}

fn default_ip_services() -> Vec<String> {
    vec![
        "https://ipv4.icanhazip.com".to_string(),
        "https://api.ipify.org".to_string(),
        "https://ifconfig.me/ip".to_string(),
    ]
}

/// GoDaddy API credentials and record defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrarConfig {
    /// API key (or environment variable name if prefixed with $).
    pub api_key: String,
    /// API secret (or environment variable name if prefixed with $).
    pub api_secret: String,
    /// TTL in seconds for written records (default: 600).
    #[serde(default = "default_ttl")]
    pub ttl: u32,
}

fn default_ttl() -> u32 {
    600
}

impl Config {
    /// Get the default config file path.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| DdnsError::Config("Could not find config directory".to_string()))?;

        Ok(config_dir.join("ddns-daddy").join("config.toml"))
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DdnsError::Config(format!("Could not read {}: {}", path.display(), e))
        })?;
        let mut config: Config = toml::from_str(&content)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Fill in apex defaults: a domain configured with no subdomains
    /// manages just its zone apex.
    fn normalize(&mut self) {
        for subdomains in self.domains.values_mut() {
            if subdomains.is_empty() {
                subdomains.push("@".to_string());
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.domains.is_empty() {
            return Err(DdnsError::Config(
                "No domains configured; nothing to synchronize".to_string(),
            ));
        }
        if self.ip_services.is_empty() {
            return Err(DdnsError::Config(
                "No IP detection services configured".to_string(),
            ));
        }
        if self.registrar.resolved_api_key().is_empty()
            || self.registrar.resolved_api_secret().is_empty()
        {
            return Err(DdnsError::Config(
                "Registrar API key and secret must be set".to_string(),
            ));
        }
        Ok(())
    }

    /// All managed (domain, subdomain) pairs in deterministic order:
    /// domains sorted, subdomains as configured.
    pub fn targets(&self) -> Vec<(String, String)> {
        self.domains
            .iter()
            .flat_map(|(domain, subdomains)| {
                subdomains
                    .iter()
                    .map(move |sub| (domain.clone(), sub.clone()))
            })
            .collect()
    }
}

impl RegistrarConfig {
    /// API key with $ENV_VAR indirection resolved.
    pub fn resolved_api_key(&self) -> String {
        resolve_env(&self.api_key)
    }

    /// API secret with $ENV_VAR indirection resolved.
    pub fn resolved_api_secret(&self) -> String {
        resolve_env(&self.api_secret)
    }
}

/// Resolve environment variable references (values starting with $).
fn resolve_env(value: &str) -> String {
    if let Some(var_name) = value.strip_prefix('$') {
        std::env::var(var_name).unwrap_or_else(|_| {
            tracing::warn!("Environment variable {} not set", var_name);
            value.to_string()
        })
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_str: &str) -> Config {
        let mut config: Config = toml::from_str(toml_str).unwrap();
        config.normalize();
        config
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse(
            r#"
            ip_services = ["https://ipv4.icanhazip.com"]

            [registrar]
            api_key = "key"
            api_secret = "secret"

            [domains]
            "example.com" = ["@", "www"]
            "#,
        );

        assert_eq!(config.registrar.ttl, 600);
        assert_eq!(
            config.targets(),
            vec![
                ("example.com".to_string(), "@".to_string()),
                ("example.com".to_string(), "www".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_subdomains_default_to_apex() {
        let config = parse(
            r#"
            [registrar]
            api_key = "key"
            api_secret = "secret"

            [domains]
            "example.org" = []
            "#,
        );

        assert_eq!(
            config.targets(),
            vec![("example.org".to_string(), "@".to_string())]
        );
    }

    #[test]
    fn test_targets_sorted_by_domain() {
        let config = parse(
            r#"
            [registrar]
            api_key = "key"
            api_secret = "secret"

            [domains]
            "zeta.net" = ["@"]
            "alpha.net" = ["@"]
            "#,
        );

        let domains: Vec<_> = config.targets().into_iter().map(|(d, _)| d).collect();
        assert_eq!(domains, vec!["alpha.net", "zeta.net"]);
    }

    #[test]
    fn test_validate_rejects_empty_domains() {
        let config = parse(
            r#"
            [registrar]
            api_key = "key"
            api_secret = "secret"
            "#,
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolve_env_with_value() {
        assert_eq!(resolve_env("plain_value"), "plain_value");
    }

    #[test]
    fn test_resolve_env_with_existing_var() {
        std::env::set_var("TEST_DDNS_DADDY_VAR", "resolved_value");
        assert_eq!(resolve_env("$TEST_DDNS_DADDY_VAR"), "resolved_value");
        std::env::remove_var("TEST_DDNS_DADDY_VAR");
    }
}
