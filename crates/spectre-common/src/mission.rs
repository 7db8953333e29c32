//! Mission blueprint and instance documents.
//!
//! A `MissionBlueprint` is the fully generated, not-yet-persisted content for
//! a mission. A `MissionInstance` is a persisted blueprint plus live mutable
//! progress state (status, per-step progress, version counter for optimistic
//! concurrency at the storage layer).

use serde::{Deserialize, Serialize};

use crate::types::{
    DefenseKind, Difficulty, MissionCategory, MissionOutcome, MissionStatus, PortState, PuzzleKind,
    Severity, SkillCategory, StepType, TargetKind,
};

/// Generated narrative wrapper for a mission. Display only, never
/// authoritative for gameplay decisions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Storyline {
    pub background: String,
    pub objective: String,
    pub briefing: String,
    pub debriefing: String,
}

/// A (port, service, version, state) tuple on a target system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortInfo {
    pub number: u16,
    pub service: String,
    pub version: String,
    pub state: PortState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
}

/// A vulnerability present on a target, drawn from the reference tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vulnerability {
    pub cve: String,
    pub description: String,
    pub severity: Severity,
    pub exploitable: bool,
}

/// Synthetic credentials planted on a target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

/// A defensive measure running on a target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defense {
    pub kind: DefenseKind,
    /// Strength level in 1..=mission difficulty
    pub strength: u8,
    pub active: bool,
}

/// A materialized target system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetSystem {
    pub name: String,
    pub kind: TargetKind,
    pub ip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    pub ports: Vec<PortInfo>,
    pub vulnerabilities: Vec<Vulnerability>,
    pub credentials: Vec<Credential>,
    pub defenses: Vec<Defense>,
}

/// What counts as a correct answer for a step or puzzle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolutionDescriptor {
    /// Submission must equal or contain this output token
    ExpectedOutput(String),
    /// Submission must contain any one of these commands as a substring
    AcceptedCommands(Vec<String>),
}

/// Mutable per-step attempt state.
///
/// Modeled as a tagged variant rather than loose booleans/counters so that
/// illegal combinations (completed with zero attempts started, attempts on a
/// never-started step) are unrepresentable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StepProgress {
    NotStarted,
    InProgress {
        started_at: i64,
        attempts: u32,
        hints_used: u32,
    },
    Completed {
        started_at: i64,
        completed_at: i64,
        attempts: u32,
        hints_used: u32,
    },
    FailedExhausted {
        started_at: i64,
        attempts: u32,
        hints_used: u32,
    },
}

impl StepProgress {
    pub fn attempts(&self) -> u32 {
        match self {
            Self::NotStarted => 0,
            Self::InProgress { attempts, .. }
            | Self::Completed { attempts, .. }
            | Self::FailedExhausted { attempts, .. } => *attempts,
        }
    }

    pub fn hints_used(&self) -> u32 {
        match self {
            Self::NotStarted => 0,
            Self::InProgress { hints_used, .. }
            | Self::Completed { hints_used, .. }
            | Self::FailedExhausted { hints_used, .. } => *hints_used,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::FailedExhausted { .. })
    }
}

/// One ordered hacking step within a mission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionStep {
    /// Stable identifier within the mission ("step-1", "step-2", ...)
    pub id: String,
    pub step_type: StepType,
    pub description: String,
    pub tools: Vec<String>,
    /// Mission difficulty plus jitter, clamped to [1, 10]
    pub difficulty: Difficulty,
    pub time_budget_secs: u32,
    pub hints: Vec<String>,
    pub solution: SolutionDescriptor,
    pub progress: StepProgress,
}

/// Optional bonus challenge, present only at difficulty >= 3
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusPuzzle {
    pub kind: PuzzleKind,
    pub description: String,
    pub trigger: String,
    pub solution: SolutionDescriptor,
    pub reward: StepReward,
    pub completed: bool,
}

/// Per-step reward, computed deterministically at resolution time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReward {
    pub experience: u64,
    pub skill_points: u32,
    pub credits: u64,
}

/// Mission-completion bonus, computed once at generation time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RewardBundle {
    pub experience: u64,
    pub skill_points: u32,
    pub credits: u64,
    pub unlocked_tools: Vec<String>,
    pub achievements: Vec<String>,
}

/// Per-mission gameplay settings derived from difficulty at synthesis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionSettings {
    pub hints_allowed: bool,
    pub max_attempts: u32,
    /// 1.5x the estimated duration
    pub time_limit_secs: u32,
    pub dynamic_difficulty: bool,
}

/// Entry requirements for a mission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prerequisites {
    pub min_level: u32,
    pub required_skills: Vec<(SkillCategory, u8)>,
}

/// Optional scheduling window and capacity counters for multi-participant
/// missions. Solo missions leave everything unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Availability {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opens_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closes_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub occupancy: u32,
}

impl Availability {
    pub fn window_open(&self, now: i64) -> bool {
        let opened = self.opens_at.is_none_or(|t| now >= t);
        let not_closed = self.closes_at.is_none_or(|t| now < t);
        opened && not_closed
    }

    pub fn has_capacity(&self) -> bool {
        self.capacity.is_none_or(|cap| self.occupancy < cap)
    }
}

/// The fully generated content for a mission, before persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionBlueprint {
    pub category: MissionCategory,
    pub difficulty: Difficulty,
    pub title: String,
    pub storyline: Storyline,
    pub targets: Vec<TargetSystem>,
    pub steps: Vec<MissionStep>,
    pub bonus_puzzles: Vec<BonusPuzzle>,
    pub rewards: RewardBundle,
    pub settings: MissionSettings,
    pub prerequisites: Prerequisites,
    pub availability: Availability,
    pub estimated_duration_mins: u32,
}

/// A persisted mission plus live progress state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionInstance {
    pub id: String,
    pub status: MissionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<MissionOutcome>,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    /// Accumulated solve time reported by submit operations, in seconds
    #[serde(default)]
    pub time_spent_secs: u64,
    /// Optimistic concurrency token, bumped on every store write
    pub version: u64,
    #[serde(flatten)]
    pub blueprint: MissionBlueprint,
}

impl MissionInstance {
    /// Persist-ready instance from a blueprint. Missions go live immediately;
    /// there is no draft-review workflow.
    pub fn activate(id: String, blueprint: MissionBlueprint, now: i64) -> Self {
        Self {
            id,
            status: MissionStatus::Active,
            outcome: None,
            created_at: now,
            completed_at: None,
            time_spent_secs: 0,
            version: 0,
            blueprint,
        }
    }

    pub fn step(&self, step_id: &str) -> Option<&MissionStep> {
        self.blueprint.steps.iter().find(|s| s.id == step_id)
    }

    pub fn step_mut(&mut self, step_id: &str) -> Option<&mut MissionStep> {
        self.blueprint.steps.iter_mut().find(|s| s.id == step_id)
    }

    /// True once every step has been completed successfully
    pub fn all_steps_completed(&self) -> bool {
        self.blueprint.steps.iter().all(|s| s.progress.is_completed())
    }

    pub fn total_hints_used(&self) -> u32 {
        self.blueprint.steps.iter().map(|s| s.progress.hints_used()).sum()
    }

    pub fn total_attempts(&self) -> u32 {
        self.blueprint.steps.iter().map(|s| s.progress.attempts()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_progress_counters() {
        let p = StepProgress::NotStarted;
        assert_eq!(p.attempts(), 0);
        assert!(!p.is_terminal());

        let p = StepProgress::InProgress { started_at: 100, attempts: 2, hints_used: 1 };
        assert_eq!(p.attempts(), 2);
        assert_eq!(p.hints_used(), 1);
        assert!(!p.is_terminal());

        let p = StepProgress::FailedExhausted { started_at: 100, attempts: 3, hints_used: 0 };
        assert!(p.is_terminal());
        assert!(!p.is_completed());
    }

    #[test]
    fn test_step_progress_wire_format() {
        let p = StepProgress::InProgress { started_at: 100, attempts: 2, hints_used: 1 };
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["state"], "in_progress");
        assert_eq!(json["attempts"], 2);

        let s = SolutionDescriptor::AcceptedCommands(vec!["nmap".to_string()]);
        let json = serde_json::to_value(&s).unwrap();
        assert!(json.get("accepted_commands").is_some());
    }

    #[test]
    fn test_availability_window_and_capacity() {
        let open = Availability::default();
        assert!(open.window_open(0));
        assert!(open.has_capacity());

        let scheduled = Availability {
            opens_at: Some(100),
            closes_at: Some(200),
            capacity: Some(2),
            occupancy: 2,
        };
        assert!(!scheduled.window_open(50));
        assert!(scheduled.window_open(150));
        assert!(!scheduled.window_open(200));
        assert!(!scheduled.has_capacity());
    }
}
