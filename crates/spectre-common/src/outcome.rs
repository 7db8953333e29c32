//! Typed results for state-machine operations.
//!
//! Every expected gameplay result (wrong answer, attempt cap hit, hints
//! exhausted, eligibility failure) is a value here, never an error: the error
//! taxonomy is reserved for malformed requests and infrastructure faults.

use serde::{Deserialize, Serialize};

use crate::mission::{RewardBundle, StepReward};
use crate::types::SkillCategory;

/// Why a mission could not be started
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum NotAvailableReason {
    LevelTooLow { required: u32, actual: u32 },
    SkillTooLow { skill: SkillCategory, required: u8, actual: u8 },
    WindowClosed,
    CapacityFull,
    /// Mission is not in a startable state (already resolved or archived)
    AlreadyResolved,
}

/// Result of a start operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum StartOutcome {
    Started,
    NotAvailable(NotAvailableReason),
}

/// Result of a step submission
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// Step solved; more steps remain
    StepCompleted { reward: StepReward },
    /// Last step solved; mission resolved successfully
    MissionCompleted {
        score: u32,
        rewards: RewardBundle,
        leveled_up: bool,
    },
    /// Wrong answer, attempts remain
    IncorrectSolution {
        attempts_remaining: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        hint: Option<String>,
    },
    /// Attempt cap reached; mission resolved as a failure
    MissionFailed,
    /// Step was already solved; no mutation performed
    AlreadyCompleted,
    /// Mission is not active, or the step was never started
    InvalidState,
}

/// Result of a hint request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum HintOutcome {
    Hint { text: String, remaining: u32 },
    HintsDisallowed,
    NoHintsRemaining,
    AlreadyCompleted,
    InvalidState,
}
