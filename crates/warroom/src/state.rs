//! Application state and shared resources.

use anyhow::{Context, Result};
use redis::aio::ConnectionManager;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::engine::catalog::Catalog;
use crate::engine::synthesizer::Synthesizer;
use crate::store::{MissionStore, PlayerStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Redis connection manager (auto-reconnecting)
    pub redis: ConnectionManager,

    /// Node identifier, for logs and metrics
    pub node_id: String,

    /// Mission content synthesizer (owns the template catalog)
    pub synthesizer: Arc<Synthesizer>,

    /// Mission document store
    pub missions: Arc<MissionStore>,

    /// Player record store
    pub players: Arc<PlayerStore>,
}

impl AppState {
    /// Create new application state, connecting to Redis
    pub async fn new(config: AppConfig) -> Result<Self> {
        // Connect to Redis with connection manager (handles reconnection)
        let client = redis::Client::open(config.redis_url.as_str())
            .context("Failed to create Redis client")?;

        let redis = ConnectionManager::new(client)
            .await
            .context("Failed to connect to Redis")?;

        let node_id = config.node_id.clone();
        let synthesizer = Arc::new(Synthesizer::new(Arc::new(Catalog::builtin())));
        let missions = Arc::new(MissionStore::new(config.mission.ttl_secs));
        let players = Arc::new(PlayerStore::new());

        Ok(Self {
            config,
            redis,
            node_id,
            synthesizer,
            missions,
            players,
        })
    }
}
