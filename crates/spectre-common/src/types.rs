//! Core types shared across Spectre components.

use serde::{Deserialize, Serialize};

use crate::SpectreError;

/// Mission Difficulty (1-10)
/// Drives every downstream scaling decision in mission synthesis and scoring.
///
/// - 1-2: Tutorial missions
/// - 3-5: Standard contracts
/// - 6-7: High-stakes operations
/// - 8-10: Elite contracts (achievement unlocks)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: Difficulty = Difficulty(1);
    pub const MAX: Difficulty = Difficulty(10);

    /// Create a new Difficulty, clamping to valid range [1, 10]
    pub fn new(level: u8) -> Self {
        Self(level.clamp(1, 10))
    }

    /// Create a Difficulty, rejecting out-of-range input.
    ///
    /// Used at the request boundary; internal code uses `new` and clamps.
    pub fn try_new(level: u8) -> Result<Self, SpectreError> {
        if (1..=10).contains(&level) {
            Ok(Self(level))
        } else {
            Err(SpectreError::InvalidInput(format!(
                "difficulty must be in 1..=10, got {level}"
            )))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Whether hint requests are permitted at this difficulty
    pub fn hints_allowed(&self) -> bool {
        self.0 <= 7
    }

    /// Per-step attempt cap at this difficulty
    pub fn max_attempts(&self) -> u32 {
        if self.0 <= 5 { 3 } else { 2 }
    }

    /// Bonus puzzles only appear from difficulty 3 upward
    pub fn has_bonus_puzzles(&self) -> bool {
        self.0 >= 3
    }

    /// Number of bonus puzzles generated at this difficulty
    pub fn bonus_puzzle_count(&self) -> usize {
        if self.has_bonus_puzzles() {
            (self.0 as usize / 3).min(2)
        } else {
            0
        }
    }

    /// Minimum player level required to start a mission of this difficulty
    pub fn prerequisite_level(&self) -> u32 {
        (self.0 as u32).saturating_sub(2).max(1)
    }

    /// Minimum level for each required skill
    pub fn required_skill_level(&self) -> u8 {
        (self.0 * 5).saturating_sub(10)
    }

    /// Score multiplier applied at mission completion
    pub fn score_multiplier(&self) -> f64 {
        1.0 + (self.0 as f64 - 1.0) * 0.1
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self(5)
    }
}

impl From<u8> for Difficulty {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

/// Mission categories available in the template catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionCategory {
    WebSecurity,
    NetworkPenetration,
    SocialEngineering,
    MalwareAnalysis,
    Forensics,
}

impl MissionCategory {
    pub const ALL: [MissionCategory; 5] = [
        Self::WebSecurity,
        Self::NetworkPenetration,
        Self::SocialEngineering,
        Self::MalwareAnalysis,
        Self::Forensics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WebSecurity => "web_security",
            Self::NetworkPenetration => "network_penetration",
            Self::SocialEngineering => "social_engineering",
            Self::MalwareAnalysis => "malware_analysis",
            Self::Forensics => "forensics",
        }
    }
}

impl std::str::FromStr for MissionCategory {
    type Err = SpectreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "web_security" => Ok(Self::WebSecurity),
            "network_penetration" => Ok(Self::NetworkPenetration),
            "social_engineering" => Ok(Self::SocialEngineering),
            "malware_analysis" => Ok(Self::MalwareAnalysis),
            "forensics" => Ok(Self::Forensics),
            other => Err(SpectreError::UnknownCategory(other.to_string())),
        }
    }
}

impl std::fmt::Display for MissionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Step archetypes a mission can be assembled from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    Reconnaissance,
    PortScan,
    VulnerabilityScan,
    Exploitation,
    PrivilegeEscalation,
    LateralMovement,
    DataExfiltration,
    CoverTracks,
    Phishing,
    Cryptanalysis,
}

impl StepType {
    /// The skill this step trains when completed
    pub fn skill(&self) -> SkillCategory {
        match self {
            Self::Reconnaissance | Self::PortScan => SkillCategory::Reconnaissance,
            Self::VulnerabilityScan => SkillCategory::WebApplications,
            Self::Exploitation | Self::PrivilegeEscalation => SkillCategory::Exploitation,
            Self::LateralMovement => SkillCategory::Networking,
            Self::Phishing => SkillCategory::SocialEngineering,
            Self::DataExfiltration | Self::CoverTracks | Self::Cryptanalysis => {
                SkillCategory::Forensics
            }
        }
    }
}

/// The six fixed player skill categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Reconnaissance,
    Exploitation,
    WebApplications,
    Networking,
    SocialEngineering,
    Forensics,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 6] = [
        Self::Reconnaissance,
        Self::Exploitation,
        Self::WebApplications,
        Self::Networking,
        Self::SocialEngineering,
        Self::Forensics,
    ];
}

/// Mission instance lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionStatus {
    /// Generated but not yet playable. Instances are persisted directly as
    /// Active; Draft exists for document fidelity only.
    Draft,
    /// Accepting start/submit/hint operations
    Active,
    /// Terminal: resolved with a success or failure outcome
    Completed,
    /// Terminal: withdrawn without resolution
    Archived,
}

impl MissionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Archived)
    }
}

/// How a completed mission resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionOutcome {
    Success,
    Failure,
}

/// Target system archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    WebServer,
    DatabaseServer,
    MailServer,
    Workstation,
    FileServer,
    DomainController,
    Router,
}

/// Simulated port state on a target system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortState {
    Open,
    Filtered,
}

/// Vulnerability severity buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Defensive measures a target can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefenseKind {
    Firewall,
    Ids,
    Antivirus,
    Honeypot,
    Encryption,
    Siem,
}

impl DefenseKind {
    pub const ALL: [DefenseKind; 6] = [
        Self::Firewall,
        Self::Ids,
        Self::Antivirus,
        Self::Honeypot,
        Self::Encryption,
        Self::Siem,
    ];
}

/// Bonus puzzle archetypes, cycled in a fixed rotation during synthesis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PuzzleKind {
    CipherDecode,
    SignalTrace,
    MemoryDump,
}

impl PuzzleKind {
    pub const ROTATION: [PuzzleKind; 3] = [Self::CipherDecode, Self::SignalTrace, Self::MemoryDump];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_clamps() {
        assert_eq!(Difficulty::new(0).value(), 1);
        assert_eq!(Difficulty::new(15).value(), 10);
        assert_eq!(Difficulty::new(7).value(), 7);
    }

    #[test]
    fn test_difficulty_try_new_rejects() {
        assert!(Difficulty::try_new(0).is_err());
        assert!(Difficulty::try_new(11).is_err());
        assert!(Difficulty::try_new(10).is_ok());
    }

    #[test]
    fn test_difficulty_derived_knobs() {
        assert!(Difficulty::new(7).hints_allowed());
        assert!(!Difficulty::new(8).hints_allowed());
        assert_eq!(Difficulty::new(5).max_attempts(), 3);
        assert_eq!(Difficulty::new(6).max_attempts(), 2);
        assert_eq!(Difficulty::new(2).bonus_puzzle_count(), 0);
        assert_eq!(Difficulty::new(3).bonus_puzzle_count(), 1);
        assert_eq!(Difficulty::new(9).bonus_puzzle_count(), 2);
        assert_eq!(Difficulty::new(1).prerequisite_level(), 1);
        assert_eq!(Difficulty::new(10).prerequisite_level(), 8);
        assert_eq!(Difficulty::new(2).required_skill_level(), 0);
        assert_eq!(Difficulty::new(6).required_skill_level(), 20);
    }

    #[test]
    fn test_category_round_trip() {
        for cat in MissionCategory::ALL {
            assert_eq!(cat.as_str().parse::<MissionCategory>().unwrap(), cat);
        }
        assert!("base_jumping".parse::<MissionCategory>().is_err());
    }
}
