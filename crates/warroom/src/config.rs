//! Configuration management for Warroom.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use spectre_common::constants::{DEFAULT_LISTEN_ADDR, DEFAULT_REDIS_URL, MISSION_TTL_SECS};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// HTTP listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// This node's unique ID (auto-generated if not set)
    #[serde(default = "generate_node_id")]
    pub node_id: String,

    /// Mission engine configuration
    #[serde(default)]
    pub mission: MissionConfig,
}

/// Mission-engine specific configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MissionConfig {
    /// Mission document TTL in seconds
    #[serde(default = "default_mission_ttl")]
    pub ttl_secs: u64,

    /// Request timeout for the route layer, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_mission_ttl(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

// Default value functions
fn default_redis_url() -> String { DEFAULT_REDIS_URL.to_string() }
fn default_listen_addr() -> String { DEFAULT_LISTEN_ADDR.to_string() }
fn default_mission_ttl() -> u64 { MISSION_TTL_SECS }
fn default_request_timeout() -> u64 { 10 }

fn generate_node_id() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    format!("node-{:08x}", rng.random::<u32>())
}

impl AppConfig {
    /// Load configuration from file, with CLI overrides
    pub fn load(config_path: &str, args: &super::Args) -> Result<Self> {
        let mut config = if Path::new(config_path).exists() {
            let settings = config::Config::builder()
                .add_source(config::File::with_name(config_path))
                .build()
                .context("Failed to load config file")?;

            settings
                .try_deserialize()
                .context("Failed to parse config")?
        } else {
            // Use defaults if config file doesn't exist
            tracing::warn!("Config file not found, using defaults");
            Self::default()
        };

        // Apply CLI overrides
        if let Some(ref redis_url) = args.redis_url {
            config.redis_url = redis_url.clone();
        }
        if let Some(ref listen) = args.listen {
            config.listen_addr = listen.clone();
        }

        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            redis_url: default_redis_url(),
            listen_addr: default_listen_addr(),
            node_id: generate_node_id(),
            mission: MissionConfig::default(),
        }
    }
}
