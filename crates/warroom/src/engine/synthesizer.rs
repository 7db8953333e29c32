//! Mission content synthesis.
//!
//! Turns a (category, difficulty, player level) request into a complete
//! `MissionBlueprint` by drawing from the catalog templates and reference
//! tables. All randomness flows through the caller-injectable `Rng` so a
//! seeded generator reproduces a mission exactly.

use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng;
use rand::seq::IndexedRandom;

use spectre_common::{
    Availability, BonusPuzzle, Credential, Defense, DefenseKind, Difficulty, MissionBlueprint,
    MissionCategory, MissionSettings, MissionStep, PortInfo, PortState, Prerequisites, PuzzleKind,
    RewardBundle, SolutionDescriptor, SpectreError, StepProgress, StepReward, Storyline,
    TargetSystem, Vulnerability,
};

use super::catalog::{
    Catalog, MissionTemplate, PASSWORD_POOL, TOOL_UNLOCKS, USERNAME_POOL, common_ports,
    puzzle_template, service_banners, step_descriptions, step_hints, step_solution, step_tools,
    vulnerability_table,
};

/// Fresh mission identifier: 16 random bytes, URL-safe base64
pub fn new_mission_id() -> String {
    let mut bytes = [0u8; 16];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

pub struct Synthesizer {
    catalog: Arc<Catalog>,
}

impl Synthesizer {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Generate a blueprint using the system randomness source
    pub fn synthesize(
        &self,
        category: MissionCategory,
        difficulty: Difficulty,
        player_level: u32,
    ) -> Result<MissionBlueprint, SpectreError> {
        self.synthesize_with(&mut rand::rng(), category, difficulty, player_level)
    }

    /// Generate a blueprint from an explicit random source
    pub fn synthesize_with(
        &self,
        rng: &mut impl Rng,
        category: MissionCategory,
        difficulty: Difficulty,
        player_level: u32,
    ) -> Result<MissionBlueprint, SpectreError> {
        let template = self
            .catalog
            .template(category)
            .ok_or_else(|| SpectreError::UnknownCategory(category.as_str().to_string()))?;
        let d = difficulty.value();

        // Title and background are authored as matched pairs
        let narrative = rng.random_range(0..template.titles.len());
        let storyline = Storyline {
            background: template.backgrounds[narrative].to_string(),
            objective: template.objective.to_string(),
            briefing: template.briefing.to_string(),
            debriefing: template.debriefing.to_string(),
        };

        let targets = self.materialize_targets(rng, template, d);
        let steps = self.materialize_steps(rng, template, difficulty);
        let bonus_puzzles = self.materialize_puzzles(difficulty);

        let estimated_duration_mins =
            ((steps.len() as u32) * (5 + 2 * d as u32)).max(10);

        let rewards = RewardBundle {
            experience: d as u64 * 50 + rng.random_range(0..100),
            skill_points: d as u32 * 5 + rng.random_range(0..10),
            credits: d as u64 * 25 + rng.random_range(0..50),
            unlocked_tools: TOOL_UNLOCKS
                .iter()
                .filter(|(threshold, _)| *threshold <= d)
                .map(|(_, tool)| tool.to_string())
                .take((d as usize / 2).max(1))
                .collect(),
            achievements: if d >= 8 {
                vec![format!("{}_elite", category.as_str())]
            } else {
                Vec::new()
            },
        };

        let skill_level = difficulty.required_skill_level();
        let (skill_a, skill_b) = template.skill_pairing;

        Ok(MissionBlueprint {
            category,
            difficulty,
            title: template.titles[narrative].to_string(),
            storyline,
            targets,
            steps,
            bonus_puzzles,
            rewards,
            settings: MissionSettings {
                hints_allowed: difficulty.hints_allowed(),
                max_attempts: difficulty.max_attempts(),
                // 1.5x the estimated duration, in seconds
                time_limit_secs: estimated_duration_mins * 90,
                // Far from the player's level in either direction, the host
                // may rescale rewards and hints at runtime
                dynamic_difficulty: (player_level as i64 - d as i64).abs() >= 3,
            },
            prerequisites: Prerequisites {
                min_level: difficulty.prerequisite_level(),
                required_skills: vec![(skill_a, skill_level), (skill_b, skill_level)],
            },
            availability: Availability::default(),
            estimated_duration_mins,
        })
    }

    fn materialize_targets(
        &self,
        rng: &mut impl Rng,
        template: &MissionTemplate,
        d: u8,
    ) -> Vec<TargetSystem> {
        let count = (d as usize).min(template.target_archetypes.len());
        template.target_archetypes[..count]
            .iter()
            .map(|&(name, kind)| {
                let port_table = common_ports(kind);
                let port_count = rng.random_range(1..=3usize).min(port_table.len());
                let ports = port_table
                    .choose_multiple(rng, port_count)
                    .map(|&(number, service)| PortInfo {
                        number,
                        service: service.to_string(),
                        version: synth_version(rng),
                        state: if rng.random_bool(0.8) {
                            PortState::Open
                        } else {
                            PortState::Filtered
                        },
                        banner: service_banners(service)
                            .choose(rng)
                            .map(|b| b.to_string()),
                    })
                    .collect();

                let vuln_table = vulnerability_table(kind);
                let vulnerabilities = vuln_table
                    .choose_multiple(rng, (d as usize).min(vuln_table.len()))
                    .map(|&(cve, description, severity)| Vulnerability {
                        cve: cve.to_string(),
                        description: description.to_string(),
                        severity,
                        exploitable: rng.random_bool(0.7),
                    })
                    .collect();

                let credentials = (0..(d as usize / 3).max(1))
                    .map(|_| Credential {
                        username: pick(rng, USERNAME_POOL),
                        password: pick(rng, PASSWORD_POOL),
                    })
                    .collect();

                let defenses = DefenseKind::ALL
                    .choose_multiple(rng, (d as usize).min(DefenseKind::ALL.len()))
                    .map(|&kind| Defense {
                        kind,
                        strength: rng.random_range(1..=d),
                        active: rng.random_bool(0.8),
                    })
                    .collect();

                TargetSystem {
                    name: name.to_string(),
                    kind,
                    ip: private_ip(rng),
                    hostname: rng
                        .random_bool(0.7)
                        .then(|| format!("{name}.corp.internal")),
                    ports,
                    vulnerabilities,
                    credentials,
                    defenses,
                }
            })
            .collect()
    }

    fn materialize_steps(
        &self,
        rng: &mut impl Rng,
        template: &MissionTemplate,
        difficulty: Difficulty,
    ) -> Vec<MissionStep> {
        let d = difficulty.value();
        let count = (d as usize + 2).min(template.step_palette.len());
        template.step_palette[..count]
            .iter()
            .enumerate()
            .map(|(idx, &step_type)| {
                let jitter = rng.random_range(-1i8..=1);
                let step_difficulty = Difficulty::new((d as i8 + jitter).clamp(1, 10) as u8);

                let descriptions = step_descriptions(step_type);
                let bucket = match step_difficulty.value() {
                    1..=3 => 0,
                    4..=7 => 1,
                    _ => 2,
                };

                let hint_count = ((4.0 - d as f64 / 3.0).floor() as usize).max(1);
                let spec = step_solution(step_type);
                let solution = if spec.commands.is_empty() {
                    SolutionDescriptor::ExpectedOutput(spec.expected_output.to_string())
                } else {
                    SolutionDescriptor::AcceptedCommands(
                        spec.commands.iter().map(|c| c.to_string()).collect(),
                    )
                };

                MissionStep {
                    id: format!("step-{}", idx + 1),
                    step_type,
                    description: descriptions[bucket].to_string(),
                    tools: step_tools(step_type).iter().map(|t| t.to_string()).collect(),
                    difficulty: step_difficulty,
                    time_budget_secs: (d as u32 + idx as u32) * 30,
                    hints: step_hints(step_type)[..hint_count]
                        .iter()
                        .map(|h| h.to_string())
                        .collect(),
                    solution,
                    progress: StepProgress::NotStarted,
                }
            })
            .collect()
    }

    fn materialize_puzzles(&self, difficulty: Difficulty) -> Vec<BonusPuzzle> {
        let d = difficulty.value();
        (0..difficulty.bonus_puzzle_count())
            .map(|i| {
                let kind = PuzzleKind::ROTATION[i % PuzzleKind::ROTATION.len()];
                let template = puzzle_template(kind);
                BonusPuzzle {
                    kind,
                    description: template.description.to_string(),
                    trigger: template.trigger.to_string(),
                    solution: SolutionDescriptor::ExpectedOutput(
                        template.expected_output.to_string(),
                    ),
                    reward: StepReward {
                        experience: d as u64 * 25,
                        skill_points: d as u32 * 2,
                        credits: d as u64 * 10,
                    },
                    completed: false,
                }
            })
            .collect()
    }
}

fn pick(rng: &mut impl Rng, pool: &[&str]) -> String {
    pool.choose(rng).copied().unwrap_or_default().to_string()
}

/// Plausible private-range address for a simulated target
fn private_ip(rng: &mut impl Rng) -> String {
    match rng.random_range(0..3) {
        0 => format!(
            "192.168.{}.{}",
            rng.random_range(0..=255u8),
            rng.random_range(1..=254u8)
        ),
        1 => format!(
            "10.{}.{}.{}",
            rng.random_range(0..=255u8),
            rng.random_range(0..=255u8),
            rng.random_range(1..=254u8)
        ),
        _ => format!(
            "172.{}.{}.{}",
            rng.random_range(16..=31u8),
            rng.random_range(0..=255u8),
            rng.random_range(1..=254u8)
        ),
    }
}

fn synth_version(rng: &mut impl Rng) -> String {
    format!(
        "{}.{}.{}",
        rng.random_range(1..=9u8),
        rng.random_range(0..=20u8),
        rng.random_range(0..=9u8)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn synthesizer() -> Synthesizer {
        Synthesizer::new(Arc::new(Catalog::builtin()))
    }

    #[test]
    fn test_web_security_tutorial_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let blueprint = synthesizer()
            .synthesize_with(&mut rng, MissionCategory::WebSecurity, Difficulty::new(1), 1)
            .unwrap();

        assert_eq!(blueprint.steps.len(), 3);
        assert_eq!(blueprint.targets.len(), 1);
        assert!(blueprint.bonus_puzzles.is_empty());
        assert!((50..150).contains(&blueprint.rewards.experience));
        assert!(blueprint.settings.hints_allowed);
        assert_eq!(blueprint.settings.max_attempts, 3);
        assert_eq!(blueprint.prerequisites.min_level, 1);
    }

    #[test]
    fn test_shape_invariants_every_category_and_difficulty() {
        let synth = synthesizer();
        let catalog = Catalog::builtin();
        for category in MissionCategory::ALL {
            let template = catalog.template(category).unwrap();
            for level in 1..=10u8 {
                let difficulty = Difficulty::new(level);
                let mut rng = StdRng::seed_from_u64(level as u64);
                let bp = synth
                    .synthesize_with(&mut rng, category, difficulty, 1)
                    .unwrap();

                assert_eq!(
                    bp.steps.len(),
                    (level as usize + 2).min(template.step_palette.len())
                );
                assert_eq!(
                    bp.targets.len(),
                    (level as usize).min(template.target_archetypes.len())
                );
                assert_eq!(bp.bonus_puzzles.len(), difficulty.bonus_puzzle_count());
                assert_eq!(bp.settings.time_limit_secs, bp.estimated_duration_mins * 90);
                assert!(bp.estimated_duration_mins >= 10);
                for (idx, step) in bp.steps.iter().enumerate() {
                    assert_eq!(step.id, format!("step-{}", idx + 1));
                    assert!((1..=10).contains(&step.difficulty.value()));
                    assert!(!step.hints.is_empty());
                    assert!(!step.tools.is_empty());
                }
                for target in &bp.targets {
                    assert!(!target.ports.is_empty());
                    assert!(!target.credentials.is_empty());
                    assert!(target.defenses.iter().all(|def| def.strength <= level));
                }
                assert_eq!(bp.prerequisites.required_skills.len(), 2);
            }
        }
    }

    #[test]
    fn test_seeded_synthesis_reproduces_exactly() {
        let synth = synthesizer();
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        let first = synth
            .synthesize_with(&mut a, MissionCategory::Forensics, Difficulty::new(6), 4)
            .unwrap();
        let second = synth
            .synthesize_with(&mut b, MissionCategory::Forensics, Difficulty::new(6), 4)
            .unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_rewards_scale_with_difficulty() {
        let synth = synthesizer();
        for seed in 0..25 {
            let mut low_rng = StdRng::seed_from_u64(seed);
            let mut high_rng = StdRng::seed_from_u64(seed + 1000);
            let low = synth
                .synthesize_with(
                    &mut low_rng,
                    MissionCategory::NetworkPenetration,
                    Difficulty::new(2),
                    1,
                )
                .unwrap();
            let high = synth
                .synthesize_with(
                    &mut high_rng,
                    MissionCategory::NetworkPenetration,
                    Difficulty::new(9),
                    8,
                )
                .unwrap();
            assert!(high.rewards.experience > low.rewards.experience);
            assert!(high.rewards.credits > low.rewards.credits);
            assert!(high.rewards.unlocked_tools.len() >= low.rewards.unlocked_tools.len());
        }
    }

    #[test]
    fn test_elite_missions_carry_achievements() {
        let synth = synthesizer();
        let mut rng = StdRng::seed_from_u64(3);
        let bp = synth
            .synthesize_with(&mut rng, MissionCategory::MalwareAnalysis, Difficulty::new(8), 6)
            .unwrap();
        assert_eq!(bp.rewards.achievements, vec!["malware_analysis_elite"]);
        assert!(!bp.settings.hints_allowed);
        assert_eq!(bp.settings.max_attempts, 2);
    }

    #[test]
    fn test_mission_ids_are_url_safe_and_unique() {
        let a = new_mission_id();
        let b = new_mission_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 22);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
