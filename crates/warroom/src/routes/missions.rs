//! Mission lifecycle endpoints.
//!
//! Responses use a redacted view of the mission document: solutions, hint
//! texts, planted credentials, and vulnerability details never leave the
//! server. The game client discovers those through play.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use spectre_common::{
    Defense, Difficulty, HintOutcome, MissionCategory, MissionInstance, MissionOutcome,
    MissionSettings, MissionStatus, PortInfo, Prerequisites, PuzzleKind, RewardBundle,
    SpectreError, StartOutcome, StepProgress, StepReward, StepType, Storyline, SubmitOutcome,
    TargetKind,
};

use super::ApiError;
use crate::engine::{machine, synthesizer::new_mission_id};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateMissionRequest {
    pub category: String,
    pub difficulty: u8,
    pub player_id: String,
}

#[derive(Deserialize)]
pub struct StartRequest {
    pub player_id: String,
}

#[derive(Deserialize)]
pub struct SubmitRequest {
    pub player_id: String,
    pub submission: String,
    /// Client-reported solve time for this attempt, in seconds
    #[serde(default)]
    pub elapsed_secs: u64,
}

/// Synthesize a new mission and persist it as active
pub async fn create_mission(
    State(state): State<AppState>,
    Json(payload): Json<CreateMissionRequest>,
) -> Result<(StatusCode, Json<MissionView>), ApiError> {
    let category: MissionCategory = payload.category.parse()?;
    let difficulty = Difficulty::try_new(payload.difficulty)?;
    if payload.player_id.is_empty() {
        return Err(SpectreError::InvalidInput("player_id must not be empty".to_string()).into());
    }

    let mut redis = state.redis.clone();
    let player = state.players.get_or_create(&mut redis, &payload.player_id).await?;
    let blueprint = state.synthesizer.synthesize(category, difficulty, player.level)?;

    let now = chrono::Utc::now().timestamp();
    let mission = MissionInstance::activate(new_mission_id(), blueprint, now);
    state.missions.create(&mut redis, &mission).await?;

    tracing::info!(
        mission_id = %mission.id,
        category = %category,
        difficulty = difficulty.value(),
        player_id = %payload.player_id,
        "Mission synthesized"
    );

    Ok((StatusCode::CREATED, Json(MissionView::from(&mission))))
}

/// Fetch the redacted view of a mission
pub async fn get_mission(
    State(state): State<AppState>,
    Path(mission_id): Path<String>,
) -> Result<Json<MissionView>, ApiError> {
    let mut redis = state.redis.clone();
    let mission = state
        .missions
        .get(&mut redis, &mission_id)
        .await?
        .ok_or(SpectreError::MissionNotFound(mission_id))?;
    Ok(Json(MissionView::from(&mission)))
}

/// Begin a mission for a player
pub async fn start_mission(
    State(state): State<AppState>,
    Path(mission_id): Path<String>,
    Json(payload): Json<StartRequest>,
) -> Result<Json<StartOutcome>, ApiError> {
    let mut redis = state.redis.clone();
    let mut mission = state
        .missions
        .get(&mut redis, &mission_id)
        .await?
        .ok_or_else(|| SpectreError::MissionNotFound(mission_id.clone()))?;
    let player = state.players.get_or_create(&mut redis, &payload.player_id).await?;

    let now = chrono::Utc::now().timestamp();
    let outcome = machine::start(&mut mission, &player, now);

    if matches!(outcome, StartOutcome::Started) {
        state.missions.save(&mut redis, &mut mission).await?;
        tracing::info!(
            mission_id = %mission_id,
            player_id = %payload.player_id,
            "Mission started"
        );
    }

    Ok(Json(outcome))
}

/// Submit a candidate solution for a step.
///
/// Reloads and replays once if the mission write loses a concurrent update
/// race; a second loss surfaces as 409.
pub async fn submit_step(
    State(state): State<AppState>,
    Path((mission_id, step_id)): Path<(String, String)>,
    Json(payload): Json<SubmitRequest>,
) -> Result<Json<SubmitOutcome>, ApiError> {
    let mut redis = state.redis.clone();

    for attempt in 0..2 {
        let mut mission = state
            .missions
            .get(&mut redis, &mission_id)
            .await?
            .ok_or_else(|| SpectreError::MissionNotFound(mission_id.clone()))?;
        let mut player = state.players.get_or_create(&mut redis, &payload.player_id).await?;

        let now = chrono::Utc::now().timestamp();
        let outcome = machine::submit_step(
            &mut mission,
            &mut player,
            &step_id,
            &payload.submission,
            payload.elapsed_secs,
            now,
        )?;

        let mission_mutated = !matches!(
            outcome,
            SubmitOutcome::AlreadyCompleted | SubmitOutcome::InvalidState
        );
        if !mission_mutated {
            return Ok(Json(outcome));
        }

        match state.missions.save(&mut redis, &mut mission).await {
            Ok(()) => {
                if matches!(
                    outcome,
                    SubmitOutcome::StepCompleted { .. }
                        | SubmitOutcome::MissionCompleted { .. }
                        | SubmitOutcome::MissionFailed
                ) {
                    state.players.save(&mut redis, &player).await?;
                }
                if let SubmitOutcome::MissionCompleted { score, leveled_up, .. } = &outcome {
                    tracing::info!(
                        mission_id = %mission_id,
                        player_id = %payload.player_id,
                        score,
                        leveled_up,
                        "Mission completed"
                    );
                }
                return Ok(Json(outcome));
            }
            Err(SpectreError::CasConflict(_)) if attempt == 0 => {
                tracing::debug!(mission_id = %mission_id, "Replaying submit after version conflict");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(SpectreError::CasConflict(mission_id).into())
}

/// Consume the next hint for a step
pub async fn request_hint(
    State(state): State<AppState>,
    Path((mission_id, step_id)): Path<(String, String)>,
) -> Result<Json<HintOutcome>, ApiError> {
    let mut redis = state.redis.clone();
    let mut mission = state
        .missions
        .get(&mut redis, &mission_id)
        .await?
        .ok_or_else(|| SpectreError::MissionNotFound(mission_id.clone()))?;

    let outcome = machine::request_hint(&mut mission, &step_id)?;
    if matches!(outcome, HintOutcome::Hint { .. }) {
        state.missions.save(&mut redis, &mut mission).await?;
    }
    Ok(Json(outcome))
}

// === Redacted response views ===

#[derive(Serialize)]
pub struct MissionView {
    pub id: String,
    pub status: MissionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<MissionOutcome>,
    pub category: MissionCategory,
    pub difficulty: u8,
    pub title: String,
    pub storyline: Storyline,
    pub estimated_duration_mins: u32,
    pub settings: MissionSettings,
    pub prerequisites: Prerequisites,
    pub rewards: RewardBundle,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    pub time_spent_secs: u64,
    pub steps: Vec<StepView>,
    pub targets: Vec<TargetView>,
    pub bonus_puzzles: Vec<PuzzleView>,
}

#[derive(Serialize)]
pub struct StepView {
    pub id: String,
    pub step_type: StepType,
    pub description: String,
    pub tools: Vec<String>,
    pub difficulty: u8,
    pub time_budget_secs: u32,
    pub hints_total: u32,
    pub progress: StepProgress,
}

#[derive(Serialize)]
pub struct TargetView {
    pub name: String,
    pub kind: TargetKind,
    pub ip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    pub ports: Vec<PortInfo>,
    pub defenses: Vec<Defense>,
}

#[derive(Serialize)]
pub struct PuzzleView {
    pub kind: PuzzleKind,
    pub description: String,
    pub trigger: String,
    pub reward: StepReward,
    pub completed: bool,
}

impl From<&MissionInstance> for MissionView {
    fn from(mission: &MissionInstance) -> Self {
        let bp = &mission.blueprint;
        Self {
            id: mission.id.clone(),
            status: mission.status,
            outcome: mission.outcome,
            category: bp.category,
            difficulty: bp.difficulty.value(),
            title: bp.title.clone(),
            storyline: bp.storyline.clone(),
            estimated_duration_mins: bp.estimated_duration_mins,
            settings: bp.settings.clone(),
            prerequisites: bp.prerequisites.clone(),
            rewards: bp.rewards.clone(),
            created_at: mission.created_at,
            completed_at: mission.completed_at,
            time_spent_secs: mission.time_spent_secs,
            steps: bp
                .steps
                .iter()
                .map(|s| StepView {
                    id: s.id.clone(),
                    step_type: s.step_type,
                    description: s.description.clone(),
                    tools: s.tools.clone(),
                    difficulty: s.difficulty.value(),
                    time_budget_secs: s.time_budget_secs,
                    hints_total: s.hints.len() as u32,
                    progress: s.progress.clone(),
                })
                .collect(),
            targets: bp
                .targets
                .iter()
                .map(|t| TargetView {
                    name: t.name.clone(),
                    kind: t.kind,
                    ip: t.ip.clone(),
                    hostname: t.hostname.clone(),
                    ports: t.ports.clone(),
                    defenses: t.defenses.clone(),
                })
                .collect(),
            bonus_puzzles: bp
                .bonus_puzzles
                .iter()
                .map(|p| PuzzleView {
                    kind: p.kind,
                    description: p.description.clone(),
                    trigger: p.trigger.clone(),
                    reward: p.reward,
                    completed: p.completed,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::catalog::Catalog;
    use crate::engine::synthesizer::Synthesizer;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::Arc;

    #[test]
    fn test_view_redacts_sensitive_fields() {
        let synth = Synthesizer::new(Arc::new(Catalog::builtin()));
        let mut rng = StdRng::seed_from_u64(11);
        let blueprint = synth
            .synthesize_with(&mut rng, MissionCategory::WebSecurity, Difficulty::new(5), 3)
            .unwrap();
        let mission = MissionInstance::activate("m-view".to_string(), blueprint, 1_000);

        let view = MissionView::from(&mission);
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("solution"));
        assert!(!json.contains("credentials"));
        assert!(!json.contains("vulnerabilities"));
        assert!(!json.contains("\"hints\""));
        assert!(json.contains("hints_total"));
        assert_eq!(view.steps.len(), mission.blueprint.steps.len());
    }
}
