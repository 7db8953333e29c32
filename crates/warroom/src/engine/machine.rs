//! Mission state machine.
//!
//! Pure transitions over a `MissionInstance` and the acting `PlayerRecord`.
//! Persistence and concurrency live in the store; everything here is
//! deterministic given its inputs, which keeps the whole gameplay surface
//! unit-testable without Redis.

use spectre_common::constants::{
    BASE_SCORE, FAST_FINISH_BONUS, HINT_PENALTY, RETRY_PENALTY, SLOW_FINISH_PENALTY,
};
use spectre_common::{
    HintOutcome, MissionInstance, MissionOutcome, MissionStatus, NotAvailableReason, PlayerRecord,
    SolutionDescriptor, SpectreError, StartOutcome, StepProgress, StepReward, SubmitOutcome,
};

use super::progression;

/// Start a mission for a player: eligibility checks first, and on any failure
/// nothing is mutated.
pub fn start(mission: &mut MissionInstance, player: &PlayerRecord, now: i64) -> StartOutcome {
    if mission.status != MissionStatus::Active {
        return StartOutcome::NotAvailable(NotAvailableReason::AlreadyResolved);
    }

    let prereq = &mission.blueprint.prerequisites;
    if player.level < prereq.min_level {
        return StartOutcome::NotAvailable(NotAvailableReason::LevelTooLow {
            required: prereq.min_level,
            actual: player.level,
        });
    }
    for &(skill, required) in &prereq.required_skills {
        if !player.meets_skill(skill, required) {
            return StartOutcome::NotAvailable(NotAvailableReason::SkillTooLow {
                skill,
                required,
                actual: player.skills.get(skill),
            });
        }
    }
    if !mission.blueprint.availability.window_open(now) {
        return StartOutcome::NotAvailable(NotAvailableReason::WindowClosed);
    }
    if !mission.blueprint.availability.has_capacity() {
        return StartOutcome::NotAvailable(NotAvailableReason::CapacityFull);
    }

    for step in &mut mission.blueprint.steps {
        step.progress = StepProgress::InProgress { started_at: now, attempts: 0, hints_used: 0 };
    }
    for puzzle in &mut mission.blueprint.bonus_puzzles {
        puzzle.completed = false;
    }
    mission.time_spent_secs = 0;
    if mission.blueprint.availability.capacity.is_some() {
        mission.blueprint.availability.occupancy += 1;
    }
    StartOutcome::Started
}

/// Submit a candidate solution for a step.
///
/// `elapsed_secs` is the client-reported solve time for this attempt and
/// accumulates into the mission's total for scoring.
pub fn submit_step(
    mission: &mut MissionInstance,
    player: &mut PlayerRecord,
    step_id: &str,
    submission: &str,
    elapsed_secs: u64,
    now: i64,
) -> Result<SubmitOutcome, SpectreError> {
    if mission.status.is_terminal() {
        return Ok(SubmitOutcome::InvalidState);
    }
    let max_attempts = mission.blueprint.settings.max_attempts;
    let hints_allowed = mission.blueprint.settings.hints_allowed;

    let step = mission
        .step_mut(step_id)
        .ok_or_else(|| SpectreError::StepNotFound(step_id.to_string()))?;
    let (started_at, attempts, hints_used) = match step.progress {
        StepProgress::Completed { .. } => return Ok(SubmitOutcome::AlreadyCompleted),
        StepProgress::NotStarted | StepProgress::FailedExhausted { .. } => {
            return Ok(SubmitOutcome::InvalidState);
        }
        StepProgress::InProgress { started_at, attempts, hints_used } => {
            (started_at, attempts + 1, hints_used)
        }
    };

    if solution_matches(&step.solution, submission) {
        step.progress = StepProgress::Completed {
            started_at,
            completed_at: now,
            attempts,
            hints_used,
        };
        let sd = step.difficulty.value();
        let skill = step.step_type.skill();
        let reward = StepReward {
            experience: sd as u64 * 10,
            skill_points: sd as u32 * 2,
            credits: sd as u64 * 5,
        };
        mission.time_spent_secs += elapsed_secs;
        progression::apply_step_reward(player, reward, skill, sd / 2);

        if mission.all_steps_completed() {
            let score = compute_score(mission);
            mission.status = MissionStatus::Completed;
            mission.outcome = Some(MissionOutcome::Success);
            mission.completed_at = Some(now);
            let leveled_up = progression::apply_mission_reward(player, &mission.blueprint.rewards);
            return Ok(SubmitOutcome::MissionCompleted {
                score,
                rewards: mission.blueprint.rewards.clone(),
                leveled_up,
            });
        }
        return Ok(SubmitOutcome::StepCompleted { reward });
    }

    // Unmatched submissions are always rejected
    if attempts >= max_attempts {
        step.progress = StepProgress::FailedExhausted { started_at, attempts, hints_used };
        mission.time_spent_secs += elapsed_secs;
        mission.status = MissionStatus::Completed;
        mission.outcome = Some(MissionOutcome::Failure);
        mission.completed_at = Some(now);
        progression::apply_failure(player);
        return Ok(SubmitOutcome::MissionFailed);
    }

    step.progress = StepProgress::InProgress { started_at, attempts, hints_used };
    // Courtesy echo of the next unused hint; it is not charged until the
    // player requests it explicitly
    let hint = (hints_allowed && (hints_used as usize) < step.hints.len())
        .then(|| step.hints[hints_used as usize].clone());
    mission.time_spent_secs += elapsed_secs;
    Ok(SubmitOutcome::IncorrectSolution {
        attempts_remaining: max_attempts - attempts,
        hint,
    })
}

/// Consume and return the next hint for a step
pub fn request_hint(
    mission: &mut MissionInstance,
    step_id: &str,
) -> Result<HintOutcome, SpectreError> {
    if !mission.blueprint.settings.hints_allowed {
        return Ok(HintOutcome::HintsDisallowed);
    }
    if mission.status.is_terminal() {
        return Ok(HintOutcome::InvalidState);
    }
    let step = mission
        .step_mut(step_id)
        .ok_or_else(|| SpectreError::StepNotFound(step_id.to_string()))?;
    match step.progress {
        StepProgress::Completed { .. } => Ok(HintOutcome::AlreadyCompleted),
        StepProgress::NotStarted | StepProgress::FailedExhausted { .. } => {
            Ok(HintOutcome::InvalidState)
        }
        StepProgress::InProgress { started_at, attempts, hints_used } => {
            if hints_used as usize >= step.hints.len() {
                return Ok(HintOutcome::NoHintsRemaining);
            }
            let text = step.hints[hints_used as usize].clone();
            step.progress = StepProgress::InProgress {
                started_at,
                attempts,
                hints_used: hints_used + 1,
            };
            Ok(HintOutcome::Hint {
                text,
                remaining: (step.hints.len() as u32) - hints_used - 1,
            })
        }
    }
}

/// Deterministic solution matching
fn solution_matches(solution: &SolutionDescriptor, submission: &str) -> bool {
    match solution {
        SolutionDescriptor::ExpectedOutput(expected) => {
            let sub = submission.trim().to_lowercase();
            let want = expected.trim().to_lowercase();
            sub == want || sub.contains(&want)
        }
        SolutionDescriptor::AcceptedCommands(commands) => {
            commands.iter().any(|cmd| submission.contains(cmd.as_str()))
        }
    }
}

/// Final score for a successfully completed mission.
///
/// Base 1000, +200 under 80% of the estimate, -100 over 150%, -50 per hint,
/// -25 per extra attempt per step, scaled by the difficulty multiplier,
/// floored at zero.
fn compute_score(mission: &MissionInstance) -> u32 {
    let mut score = BASE_SCORE;

    let estimate_secs = (mission.blueprint.estimated_duration_mins as f64) * 60.0;
    if estimate_secs > 0.0 {
        let ratio = mission.time_spent_secs as f64 / estimate_secs;
        if ratio < 0.8 {
            score += FAST_FINISH_BONUS;
        } else if ratio > 1.5 {
            score -= SLOW_FINISH_PENALTY;
        }
    }

    score -= HINT_PENALTY * mission.total_hints_used() as f64;
    let extra_attempts: u32 = mission
        .blueprint
        .steps
        .iter()
        .map(|s| s.progress.attempts().saturating_sub(1))
        .sum();
    score -= RETRY_PENALTY * extra_attempts as f64;

    score *= mission.blueprint.difficulty.score_multiplier();
    score.max(0.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::catalog::Catalog;
    use crate::engine::synthesizer::Synthesizer;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use spectre_common::{Difficulty, MissionCategory, MissionInstance};
    use std::sync::Arc;

    fn mission(category: MissionCategory, difficulty: u8, seed: u64) -> MissionInstance {
        let synth = Synthesizer::new(Arc::new(Catalog::builtin()));
        let mut rng = StdRng::seed_from_u64(seed);
        let blueprint = synth
            .synthesize_with(&mut rng, category, Difficulty::new(difficulty), 10)
            .unwrap();
        MissionInstance::activate("m-test".to_string(), blueprint, 1_000)
    }

    fn veteran() -> PlayerRecord {
        let mut p = PlayerRecord::new("p1".to_string());
        p.level = 10;
        for skill in spectre_common::SkillCategory::ALL {
            p.skills.raise(skill, 60);
        }
        p
    }

    fn correct_submission(mission: &MissionInstance, step_id: &str) -> String {
        match &mission.step(step_id).unwrap().solution {
            SolutionDescriptor::ExpectedOutput(text) => text.clone(),
            SolutionDescriptor::AcceptedCommands(cmds) => {
                format!("$ {} # run against the target", cmds[0])
            }
        }
    }

    #[test]
    fn test_start_rejects_underleveled_player_without_mutation() {
        let mut m = mission(MissionCategory::WebSecurity, 8, 1);
        let rookie = PlayerRecord::new("p1".to_string());
        let outcome = start(&mut m, &rookie, 1_000);
        assert!(matches!(
            outcome,
            StartOutcome::NotAvailable(NotAvailableReason::LevelTooLow { required: 6, actual: 1 })
        ));
        assert!(m.blueprint.steps.iter().all(|s| matches!(s.progress, StepProgress::NotStarted)));
    }

    #[test]
    fn test_start_rejects_missing_skill() {
        let mut m = mission(MissionCategory::WebSecurity, 8, 1);
        let mut p = PlayerRecord::new("p1".to_string());
        p.level = 10;
        let outcome = start(&mut m, &p, 1_000);
        assert!(matches!(
            outcome,
            StartOutcome::NotAvailable(NotAvailableReason::SkillTooLow { required: 30, .. })
        ));
    }

    #[test]
    fn test_start_respects_window_and_capacity() {
        let mut m = mission(MissionCategory::Forensics, 1, 2);
        m.blueprint.availability.opens_at = Some(5_000);
        let p = veteran();
        assert!(matches!(
            start(&mut m, &p, 1_000),
            StartOutcome::NotAvailable(NotAvailableReason::WindowClosed)
        ));

        m.blueprint.availability.opens_at = None;
        m.blueprint.availability.capacity = Some(1);
        m.blueprint.availability.occupancy = 1;
        assert!(matches!(
            start(&mut m, &p, 1_000),
            StartOutcome::NotAvailable(NotAvailableReason::CapacityFull)
        ));

        m.blueprint.availability.occupancy = 0;
        assert!(matches!(start(&mut m, &p, 1_000), StartOutcome::Started));
        assert_eq!(m.blueprint.availability.occupancy, 1);
        assert!(m.blueprint.steps.iter().all(|s| !s.progress.is_terminal()));
    }

    #[test]
    fn test_port_scan_command_matcher() {
        let mut m = mission(MissionCategory::WebSecurity, 1, 3);
        let mut p = veteran();
        assert!(matches!(start(&mut m, &p, 1_000), StartOutcome::Started));

        // step-2 in the web palette is the port scan
        let step = m.step("step-2").unwrap();
        assert_eq!(step.step_type, spectre_common::StepType::PortScan);

        let outcome =
            submit_step(&mut m, &mut p, "step-2", "nmap -sS -O target_ip -p1-1024", 60, 1_100)
                .unwrap();
        assert!(matches!(outcome, SubmitOutcome::StepCompleted { .. }));

        let outcome = submit_step(&mut m, &mut p, "step-2", "anything", 10, 1_200).unwrap();
        assert!(matches!(outcome, SubmitOutcome::AlreadyCompleted));
    }

    #[test]
    fn test_wrong_answers_exhaust_attempts_and_fail_mission() {
        let mut m = mission(MissionCategory::WebSecurity, 1, 4);
        let mut p = veteran();
        p.current_streak = 4;
        p.best_streak = 4;
        assert!(matches!(start(&mut m, &p, 1_000), StartOutcome::Started));

        let r1 = submit_step(&mut m, &mut p, "step-1", "ls -la", 30, 1_100).unwrap();
        match r1 {
            SubmitOutcome::IncorrectSolution { attempts_remaining, hint } => {
                assert_eq!(attempts_remaining, 2);
                assert!(hint.is_some());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        // courtesy hint was not charged
        assert_eq!(m.step("step-1").unwrap().progress.hints_used(), 0);

        let r2 = submit_step(&mut m, &mut p, "step-1", "pwd", 30, 1_200).unwrap();
        assert!(matches!(r2, SubmitOutcome::IncorrectSolution { attempts_remaining: 1, .. }));

        let r3 = submit_step(&mut m, &mut p, "step-1", "whoami", 30, 1_300).unwrap();
        assert!(matches!(r3, SubmitOutcome::MissionFailed));
        assert_eq!(m.status, MissionStatus::Completed);
        assert_eq!(m.outcome, Some(MissionOutcome::Failure));
        assert_eq!(p.current_streak, 0);
        assert_eq!(p.best_streak, 4);
        assert_eq!(p.missions_failed, 1);

        // resolved missions accept nothing further
        let after = submit_step(&mut m, &mut p, "step-1", "whoami", 5, 1_400).unwrap();
        assert!(matches!(after, SubmitOutcome::InvalidState));
    }

    #[test]
    fn test_full_run_completes_mission_and_credits_player() {
        let mut m = mission(MissionCategory::SocialEngineering, 1, 5);
        let mut p = veteran();
        assert!(matches!(start(&mut m, &p, 1_000), StartOutcome::Started));

        let step_ids: Vec<String> = m.blueprint.steps.iter().map(|s| s.id.clone()).collect();
        let before_xp = p.experience;
        let mut last = None;
        for id in &step_ids {
            let answer = correct_submission(&m, id);
            last = Some(submit_step(&mut m, &mut p, id, &answer, 60, 2_000).unwrap());
        }

        match last.unwrap() {
            SubmitOutcome::MissionCompleted { score, rewards, .. } => {
                assert!(score > 0);
                assert_eq!(rewards.experience, m.blueprint.rewards.experience);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(m.status, MissionStatus::Completed);
        assert_eq!(m.outcome, Some(MissionOutcome::Success));
        assert!(p.experience > before_xp);
        assert_eq!(p.missions_completed, 1);
        assert_eq!(p.current_streak, 1);
    }

    #[test]
    fn test_score_worked_example() {
        // difficulty 5, 30 minute estimate, finished in 20 with no hints and
        // no retries: (1000 + 200) * 1.4 = 1680
        let mut m = mission(MissionCategory::WebSecurity, 5, 6);
        m.blueprint.estimated_duration_mins = 30;
        m.time_spent_secs = 1_200;
        m.blueprint.difficulty = Difficulty::new(5);
        for step in &mut m.blueprint.steps {
            step.progress = StepProgress::Completed {
                started_at: 1_000,
                completed_at: 2_200,
                attempts: 1,
                hints_used: 0,
            };
        }
        assert_eq!(compute_score(&m), 1680);
    }

    #[test]
    fn test_score_penalties_floor_at_zero() {
        let mut m = mission(MissionCategory::WebSecurity, 1, 7);
        m.blueprint.estimated_duration_mins = 10;
        m.time_spent_secs = 7_200;
        for step in &mut m.blueprint.steps {
            step.progress = StepProgress::Completed {
                started_at: 0,
                completed_at: 7_200,
                attempts: 3,
                hints_used: 3,
            };
        }
        // 1000 - 100 - 9*50 - 6*25 = 300 at multiplier 1.0
        assert_eq!(compute_score(&m), 300);

        for step in &mut m.blueprint.steps {
            step.progress = StepProgress::Completed {
                started_at: 0,
                completed_at: 7_200,
                attempts: 10,
                hints_used: 10,
            };
        }
        assert_eq!(compute_score(&m), 0);
    }

    #[test]
    fn test_hint_flow_charges_and_exhausts() {
        let mut m = mission(MissionCategory::NetworkPenetration, 1, 8);
        let mut p = veteran();
        assert!(matches!(start(&mut m, &p, 1_000), StartOutcome::Started));

        let total = m.step("step-1").unwrap().hints.len() as u32;
        for used in 0..total {
            match request_hint(&mut m, "step-1").unwrap() {
                HintOutcome::Hint { remaining, .. } => {
                    assert_eq!(remaining, total - used - 1);
                }
                other => panic!("unexpected outcome: {other:?}"),
            }
        }
        assert!(matches!(request_hint(&mut m, "step-1").unwrap(), HintOutcome::NoHintsRemaining));
        assert_eq!(m.step("step-1").unwrap().progress.hints_used(), total);

        let answer = correct_submission(&m, "step-1");
        submit_step(&mut m, &mut p, "step-1", &answer, 30, 1_500).unwrap();
        assert!(matches!(request_hint(&mut m, "step-1").unwrap(), HintOutcome::AlreadyCompleted));
    }

    #[test]
    fn test_hints_disallowed_at_high_difficulty() {
        let mut m = mission(MissionCategory::Forensics, 9, 9);
        assert!(matches!(request_hint(&mut m, "step-1").unwrap(), HintOutcome::HintsDisallowed));
    }

    #[test]
    fn test_submit_before_start_is_invalid() {
        let mut m = mission(MissionCategory::WebSecurity, 3, 10);
        let mut p = veteran();
        let outcome = submit_step(&mut m, &mut p, "step-1", "nmap", 10, 1_000).unwrap();
        assert!(matches!(outcome, SubmitOutcome::InvalidState));

        let err = submit_step(&mut m, &mut p, "step-99", "nmap", 10, 1_000).unwrap_err();
        assert!(matches!(err, SpectreError::StepNotFound(_)));
    }
}
