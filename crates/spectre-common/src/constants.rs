//! Shared constants for Spectre components.

/// Default Redis connection URL
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Default Warroom HTTP listen address
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8990";

/// Mission document expiry in Redis (7 days)
pub const MISSION_TTL_SECS: u64 = 604_800;

/// Base mission score before bonuses and penalties
pub const BASE_SCORE: f64 = 1000.0;

/// Bonus for finishing under 80% of the estimated duration
pub const FAST_FINISH_BONUS: f64 = 200.0;

/// Penalty for exceeding 150% of the estimated duration
pub const SLOW_FINISH_PENALTY: f64 = 100.0;

/// Score penalty per hint consumed
pub const HINT_PENALTY: f64 = 50.0;

/// Score penalty per extra attempt on a step
pub const RETRY_PENALTY: f64 = 25.0;

/// Flat skill-point bonus granted when the player's level increases
pub const LEVEL_UP_SKILL_BONUS: u32 = 5;

/// Redis key prefixes
pub mod redis_keys {
    /// Mission instance document: mission:{mission_id}
    pub const MISSION_PREFIX: &str = "mission:";

    /// Player progression record: player:{player_id}
    pub const PLAYER_PREFIX: &str = "player:";
}
