//! Savings goal endpoints.

use api_types::goal::{Goal, GoalList, GoalNew, GoalUpdate};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    Payload, ServerError,
    convert::{currency_from_api, goal_view},
    server::{Principal, ServerState},
};

pub async fn goal_new(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Payload(payload): Payload<GoalNew>,
) -> Result<(StatusCode, Json<Goal>), ServerError> {
    let goal = state
        .engine
        .create_goal(
            principal.user_id(),
            &payload.title,
            &payload.target,
            currency_from_api(payload.currency),
            payload.deadline,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(goal_view(goal))))
}

/// Goals with a deadline first, soonest first.
pub async fn list(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
) -> Result<Json<GoalList>, ServerError> {
    let goals = state.engine.goals(principal.user_id()).await?;
    Ok(Json(GoalList {
        goals: goals.into_iter().map(goal_view).collect(),
    }))
}

pub async fn goal_update(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Payload(payload): Payload<GoalUpdate>,
) -> Result<Json<Goal>, ServerError> {
    let goal = state
        .engine
        .update_goal_progress(principal.user_id(), id, &payload.current)
        .await?;
    Ok(Json(goal_view(goal)))
}
