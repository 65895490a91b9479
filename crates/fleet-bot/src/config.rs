//! Configuration management for the satellite fleet

#[path = "config_tests.rs"]
mod config_tests;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

use fleet_types::{SenderPolicy, SenderPolicyKind};

/// The six satellite personas used when identities are configured from
/// the environment (`<NAME>_TOKEN` variables).
pub const DEFAULT_IDENTITY_NAMES: [&str; 6] =
    ["Shaka", "Lilith", "Edison", "Pythagoras", "Atlas", "York"];

/// Complete fleet configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// One entry per connected identity.
    pub identities: Vec<IdentityConfig>,
    pub relay: RelayConfig,
    #[serde(default)]
    pub access: SenderPolicy,
    #[serde(default)]
    pub rate: RateConfig,
    #[serde(default)]
    pub audit: AuditConfig,
}

/// One identity's connection credential
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    pub name: String,
    pub token: String,
}

/// Relay and timer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Shared destination channel all identities post into.
    pub channel_id: u64,
    #[serde(default = "default_dispatch_interval_secs")]
    pub dispatch_interval_secs: u64,
    #[serde(default = "default_presence_interval_secs")]
    pub presence_interval_secs: u64,
}

/// Per-sender rate limit settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateConfig {
    #[serde(default = "default_rate_window_secs")]
    pub window_secs: u64,
    #[serde(default = "default_rate_cap")]
    pub max_per_window: usize,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            window_secs: default_rate_window_secs(),
            max_per_window: default_rate_cap(),
        }
    }
}

/// Audit trail settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Audit file path; `None` disables the file (events still go to the
    /// structured logs).
    #[serde(default = "default_audit_path")]
    pub path: Option<String>,
    #[serde(default = "default_audit_max_bytes")]
    pub max_bytes: u64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            path: default_audit_path(),
            max_bytes: default_audit_max_bytes(),
        }
    }
}

/// Environment access, injectable so config loading tests don't touch
/// the process environment.
pub trait ReadEnv {
    fn var(&self, key: &str) -> Option<String>;
}

/// Live environment
pub struct SystemEnv;

impl ReadEnv for SystemEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_env_impl(&SystemEnv)
    }

    pub fn from_env_impl(env: &impl ReadEnv) -> Result<Self> {
        let channel_id = env
            .var("RELAY_CHANNEL_ID")
            .context("RELAY_CHANNEL_ID not set")?
            .parse::<u64>()
            .context("RELAY_CHANNEL_ID is not a numeric channel id")?;

        let identities: Vec<IdentityConfig> = DEFAULT_IDENTITY_NAMES
            .iter()
            .filter_map(|name| {
                env.var(&format!("{}_TOKEN", name.to_uppercase()))
                    .map(|token| IdentityConfig {
                        name: name.to_string(),
                        token,
                    })
            })
            .collect();

        let kind = match env
            .var("RELAY_SENDER_POLICY")
            .unwrap_or_else(|| "allowlist".to_string())
            .to_lowercase()
            .as_str()
        {
            "open" => SenderPolicyKind::Open,
            _ => SenderPolicyKind::Allowlist,
        };
        let allowed_senders = parse_id_list(&env.var("RELAY_ALLOWED_SENDERS").unwrap_or_default());

        let dispatch_interval_secs = env
            .var("RELAY_DISPATCH_INTERVAL_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_dispatch_interval_secs);

        let audit_path = env.var("RELAY_AUDIT_PATH").or_else(default_audit_path);
        let audit_max_bytes = env
            .var("RELAY_AUDIT_MAX_BYTES")
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_audit_max_bytes);

        let config = Config {
            identities,
            relay: RelayConfig {
                channel_id,
                dispatch_interval_secs,
                presence_interval_secs: default_presence_interval_secs(),
            },
            access: SenderPolicy {
                kind,
                allowed_senders,
            },
            rate: RateConfig::default(),
            audit: AuditConfig {
                path: audit_path,
                max_bytes: audit_max_bytes,
            },
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.identities.is_empty() {
            bail!("no identities configured (no <NAME>_TOKEN set and no [[identities]] entries)");
        }
        if self.relay.channel_id == 0 {
            bail!("relay.channel_id must be a nonzero channel id");
        }
        let mut names: Vec<&str> = self.identities.iter().map(|i| i.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        if names.len() != self.identities.len() {
            bail!("identity names must be unique");
        }
        Ok(())
    }
}

fn parse_id_list(s: &str) -> Vec<u64> {
    s.split(',')
        .map(|x| x.trim())
        .filter(|x| !x.is_empty())
        .filter_map(|x| x.parse::<u64>().ok())
        .collect()
}

fn default_dispatch_interval_secs() -> u64 {
    1
}

fn default_presence_interval_secs() -> u64 {
    60
}

fn default_rate_window_secs() -> u64 {
    60
}

fn default_rate_cap() -> usize {
    25
}

fn default_audit_path() -> Option<String> {
    Some("logs/relay-audit.log".to_string())
}

fn default_audit_max_bytes() -> u64 {
    1024 * 1024
}
