//! Progression ledger.
//!
//! The only code path allowed to mutate a `PlayerRecord`. Experience, credits,
//! and skill points only ever increase here; level is recomputed from lifetime
//! experience so it can never drift out of sync with it.

use spectre_common::constants::LEVEL_UP_SKILL_BONUS;
use spectre_common::{PlayerRecord, RewardBundle, SkillCategory, StepReward};

/// Credit a solved step and nudge the skill it trains
pub fn apply_step_reward(
    player: &mut PlayerRecord,
    reward: StepReward,
    skill: SkillCategory,
    skill_nudge: u8,
) {
    player.experience += reward.experience;
    player.skill_points += reward.skill_points;
    player.credits += reward.credits;
    player.skills.raise(skill, skill_nudge);
    recompute_level(player);
}

/// Credit the mission-completion bundle and bump the streak.
/// Returns true when the player gained at least one level.
pub fn apply_mission_reward(player: &mut PlayerRecord, rewards: &RewardBundle) -> bool {
    player.experience += rewards.experience;
    player.skill_points += rewards.skill_points;
    player.credits += rewards.credits;
    for tool in &rewards.unlocked_tools {
        player.unlock_tool(tool);
    }
    for achievement in &rewards.achievements {
        player.unlock_achievement(achievement);
    }
    player.missions_completed += 1;
    player.current_streak += 1;
    player.best_streak = player.best_streak.max(player.current_streak);
    recompute_level(player)
}

/// Record a failed mission. Nothing earned is ever taken back; only the
/// streak resets.
pub fn apply_failure(player: &mut PlayerRecord) {
    player.missions_failed += 1;
    player.current_streak = 0;
}

/// Recompute level from lifetime experience: floor(sqrt(xp / 100)) + 1.
/// Each level gained grants a flat skill-point bonus. Returns true if the
/// level increased.
pub fn recompute_level(player: &mut PlayerRecord) -> bool {
    let level = (player.experience as f64 / 100.0).sqrt().floor() as u32 + 1;
    if level > player.level {
        player.skill_points += LEVEL_UP_SKILL_BONUS * (level - player.level);
        player.level = level;
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> PlayerRecord {
        PlayerRecord::new("p1".to_string())
    }

    #[test]
    fn test_level_curve() {
        let mut p = player();
        p.experience = 2500;
        assert!(recompute_level(&mut p));
        assert_eq!(p.level, 6);
        // five levels gained from level 1
        assert_eq!(p.skill_points, LEVEL_UP_SKILL_BONUS * 5);

        // level never decreases even if xp were rolled back elsewhere
        p.experience = 0;
        assert!(!recompute_level(&mut p));
        assert_eq!(p.level, 6);
    }

    #[test]
    fn test_step_reward_accumulates_and_trains_skill() {
        let mut p = player();
        let reward = StepReward { experience: 50, skill_points: 10, credits: 25 };
        apply_step_reward(&mut p, reward, SkillCategory::Networking, 3);
        assert_eq!(p.experience, 50);
        assert_eq!(p.skill_points, 10);
        assert_eq!(p.credits, 25);
        assert_eq!(p.skills.get(SkillCategory::Networking), 3);
    }

    #[test]
    fn test_mission_reward_streak_and_level_up() {
        let mut p = player();
        let rewards = RewardBundle {
            experience: 450,
            skill_points: 45,
            credits: 225,
            unlocked_tools: vec!["exploit_framework".to_string()],
            achievements: Vec::new(),
        };
        let leveled = apply_mission_reward(&mut p, &rewards);
        assert!(leveled);
        assert_eq!(p.level, 3);
        assert_eq!(p.current_streak, 1);
        assert_eq!(p.best_streak, 1);
        assert_eq!(p.missions_completed, 1);
        assert_eq!(p.unlocked_tools, vec!["exploit_framework"]);

        apply_failure(&mut p);
        assert_eq!(p.current_streak, 0);
        assert_eq!(p.best_streak, 1);
        assert_eq!(p.missions_failed, 1);
    }
}
