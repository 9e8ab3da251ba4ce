//! Cash agent directory. Agents are registered by operators through the
//! admin CLI; users only look them up.

use api_types::agent::{CashAgent, CashAgentList, CashAgentQuery};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use uuid::Uuid;

use crate::{ServerError, convert::cash_agent_view, server::ServerState};

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<CashAgentQuery>,
) -> Result<Json<CashAgentList>, ServerError> {
    let agents = state.engine.cash_agents(query.location.as_deref()).await?;
    Ok(Json(CashAgentList {
        cash_agents: agents.into_iter().map(cash_agent_view).collect(),
    }))
}

pub async fn get_detail(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CashAgent>, ServerError> {
    let agent = state.engine.cash_agent(id).await?;
    Ok(Json(cash_agent_view(agent)))
}
