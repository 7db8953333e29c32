//! Player progression record.
//!
//! Owned by the player-account subsystem; the engine mutates only the bounded
//! subset of fields below, and only through the progression ledger.

use serde::{Deserialize, Serialize};

use crate::types::SkillCategory;

/// Per-skill levels, each capped at 100
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillSet {
    pub reconnaissance: u8,
    pub exploitation: u8,
    pub web_applications: u8,
    pub networking: u8,
    pub social_engineering: u8,
    pub forensics: u8,
}

impl SkillSet {
    pub const CAP: u8 = 100;

    pub fn get(&self, skill: SkillCategory) -> u8 {
        match skill {
            SkillCategory::Reconnaissance => self.reconnaissance,
            SkillCategory::Exploitation => self.exploitation,
            SkillCategory::WebApplications => self.web_applications,
            SkillCategory::Networking => self.networking,
            SkillCategory::SocialEngineering => self.social_engineering,
            SkillCategory::Forensics => self.forensics,
        }
    }

    /// Raise a skill, clamped to the cap
    pub fn raise(&mut self, skill: SkillCategory, amount: u8) {
        let slot = match skill {
            SkillCategory::Reconnaissance => &mut self.reconnaissance,
            SkillCategory::Exploitation => &mut self.exploitation,
            SkillCategory::WebApplications => &mut self.web_applications,
            SkillCategory::Networking => &mut self.networking,
            SkillCategory::SocialEngineering => &mut self.social_engineering,
            SkillCategory::Forensics => &mut self.forensics,
        };
        *slot = slot.saturating_add(amount).min(Self::CAP);
    }
}

/// The player progression record the engine is allowed to mutate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub player_id: String,
    /// Unix timestamp of first contact with the engine
    pub created_at: i64,
    pub level: u32,
    pub experience: u64,
    pub skills: SkillSet,
    pub skill_points: u32,
    pub credits: u64,
    /// Consecutive successfully completed missions
    pub current_streak: u32,
    pub best_streak: u32,
    pub missions_completed: u32,
    pub missions_failed: u32,
    pub unlocked_tools: Vec<String>,
    pub achievements: Vec<String>,
}

impl PlayerRecord {
    pub fn new(player_id: String) -> Self {
        Self {
            player_id,
            created_at: chrono::Utc::now().timestamp(),
            level: 1,
            experience: 0,
            skills: SkillSet::default(),
            skill_points: 0,
            credits: 0,
            current_streak: 0,
            best_streak: 0,
            missions_completed: 0,
            missions_failed: 0,
            unlocked_tools: Vec::new(),
            achievements: Vec::new(),
        }
    }

    /// Add a tool to the unlocked list if it is not already there
    pub fn unlock_tool(&mut self, tool: &str) {
        if !self.unlocked_tools.iter().any(|t| t == tool) {
            self.unlocked_tools.push(tool.to_string());
        }
    }

    /// Add an achievement, returning true if newly unlocked
    pub fn unlock_achievement(&mut self, id: &str) -> bool {
        if self.achievements.iter().any(|a| a == id) {
            false
        } else {
            self.achievements.push(id.to_string());
            true
        }
    }

    pub fn meets_skill(&self, skill: SkillCategory, min_level: u8) -> bool {
        self.skills.get(skill) >= min_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_raise_clamps_at_cap() {
        let mut skills = SkillSet::default();
        skills.raise(SkillCategory::Exploitation, 95);
        assert_eq!(skills.get(SkillCategory::Exploitation), 95);
        skills.raise(SkillCategory::Exploitation, 20);
        assert_eq!(skills.get(SkillCategory::Exploitation), 100);
    }

    #[test]
    fn test_unlocks_are_deduplicated() {
        let mut player = PlayerRecord::new("p1".to_string());
        player.unlock_tool("nmap");
        player.unlock_tool("nmap");
        assert_eq!(player.unlocked_tools.len(), 1);

        assert!(player.unlock_achievement("elite_forensics"));
        assert!(!player.unlock_achievement("elite_forensics"));
    }
}
