//! Redis-backed persistence for mission instances and player records.
//!
//! Documents are stored as JSON strings under prefixed keys. Mission writes go
//! through a Lua compare-and-swap on the document's `version` field so that
//! two racing submits can never both resolve the same mission.

use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use spectre_common::constants::redis_keys::{MISSION_PREFIX, PLAYER_PREFIX};
use spectre_common::{MissionInstance, PlayerRecord, SpectreError};

/// Compares the stored document's version against ARGV[1]; writes ARGV[2]
/// with TTL ARGV[3] only on match (or when the key is new).
const MISSION_CAS_SCRIPT: &str = r#"
local current = redis.call('GET', KEYS[1])
if current then
    local doc = cjson.decode(current)
    if tostring(doc.version) ~= ARGV[1] then
        return 0
    end
end
redis.call('SET', KEYS[1], ARGV[2], 'EX', ARGV[3])
return 1
"#;

/// Mission document store
pub struct MissionStore {
    /// Mission document TTL in seconds
    ttl_secs: u64,
    cas_script: redis::Script,
}

impl MissionStore {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            ttl_secs,
            cas_script: redis::Script::new(MISSION_CAS_SCRIPT),
        }
    }

    /// Persist a freshly activated mission
    pub async fn create(
        &self,
        redis: &mut ConnectionManager,
        mission: &MissionInstance,
    ) -> Result<(), SpectreError> {
        let key = format!("{MISSION_PREFIX}{}", mission.id);
        let data = serde_json::to_string(mission)
            .map_err(|e| SpectreError::Internal(e.to_string()))?;
        redis
            .set_ex::<_, _, ()>(&key, &data, self.ttl_secs)
            .await
            .map_err(|e| SpectreError::Storage(e.to_string()))?;

        tracing::debug!(mission_id = %mission.id, "Mission persisted");
        Ok(())
    }

    /// Load a mission (if it exists)
    pub async fn get(
        &self,
        redis: &mut ConnectionManager,
        mission_id: &str,
    ) -> Result<Option<MissionInstance>, SpectreError> {
        let key = format!("{MISSION_PREFIX}{mission_id}");
        let data: Option<String> = redis
            .get(&key)
            .await
            .map_err(|e| SpectreError::Storage(e.to_string()))?;

        match data {
            Some(d) => Ok(Some(
                serde_json::from_str(&d).map_err(|e| SpectreError::Internal(e.to_string()))?,
            )),
            None => Ok(None),
        }
    }

    /// Write back a mutated mission, guarded by its version counter.
    ///
    /// Bumps the in-memory version before writing; on a lost race the caller
    /// gets `CasConflict` and must reload before retrying.
    pub async fn save(
        &self,
        redis: &mut ConnectionManager,
        mission: &mut MissionInstance,
    ) -> Result<(), SpectreError> {
        let key = format!("{MISSION_PREFIX}{}", mission.id);
        let expected = mission.version;
        mission.version += 1;
        let data = serde_json::to_string(mission)
            .map_err(|e| SpectreError::Internal(e.to_string()))?;

        let written: i64 = self
            .cas_script
            .key(&key)
            .arg(expected)
            .arg(&data)
            .arg(self.ttl_secs)
            .invoke_async(redis)
            .await
            .map_err(|e| SpectreError::Storage(e.to_string()))?;

        if written == 1 {
            Ok(())
        } else {
            tracing::warn!(
                mission_id = %mission.id,
                expected_version = expected,
                "Mission write lost a concurrent update race"
            );
            Err(SpectreError::CasConflict(mission.id.clone()))
        }
    }
}

/// Player record store
pub struct PlayerStore;

impl PlayerStore {
    pub fn new() -> Self {
        Self
    }

    /// Load a player record, creating a fresh level-1 record on first sight
    pub async fn get_or_create(
        &self,
        redis: &mut ConnectionManager,
        player_id: &str,
    ) -> Result<PlayerRecord, SpectreError> {
        let key = format!("{PLAYER_PREFIX}{player_id}");
        let data: Option<String> = redis
            .get(&key)
            .await
            .map_err(|e| SpectreError::Storage(e.to_string()))?;

        if let Some(d) = data {
            return serde_json::from_str(&d).map_err(|e| SpectreError::Internal(e.to_string()));
        }

        let player = PlayerRecord::new(player_id.to_string());
        self.save(redis, &player).await?;
        tracing::debug!(player_id = %player_id, "New player record created");
        Ok(player)
    }

    /// Persist a player record. Progression documents never expire.
    pub async fn save(
        &self,
        redis: &mut ConnectionManager,
        player: &PlayerRecord,
    ) -> Result<(), SpectreError> {
        let key = format!("{PLAYER_PREFIX}{}", player.player_id);
        let data = serde_json::to_string(player)
            .map_err(|e| SpectreError::Internal(e.to_string()))?;
        redis
            .set::<_, _, ()>(&key, &data)
            .await
            .map_err(|e| SpectreError::Storage(e.to_string()))?;
        Ok(())
    }
}

impl Default for PlayerStore {
    fn default() -> Self {
        Self::new()
    }
}
