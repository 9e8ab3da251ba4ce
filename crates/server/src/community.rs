//! Community savings group endpoints.

use api_types::{
    community::{
        ContributionNew, Group, GroupList, GroupNew, Member, Proposal, ProposalList, ProposalNew,
        VoteNew,
    },
    transaction::TransactionView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::ContributionCmd;
use uuid::Uuid;

use crate::{
    Payload, ServerError,
    convert::{currency_from_api, group_view, member_view, proposal_view, transaction_view},
    server::{Principal, ServerState},
};

pub async fn group_new(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Payload(payload): Payload<GroupNew>,
) -> Result<(StatusCode, Json<Group>), ServerError> {
    let group = state
        .engine
        .create_group(
            principal.user_id(),
            &payload.name,
            payload.description.as_deref(),
            currency_from_api(payload.currency),
            payload.target.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(group_view(group))))
}

pub async fn list_groups(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
) -> Result<Json<GroupList>, ServerError> {
    let groups = state.engine.groups(principal.user_id()).await?;
    Ok(Json(GroupList {
        groups: groups.into_iter().map(group_view).collect(),
    }))
}

pub async fn join(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<Member>), ServerError> {
    let member = state.engine.join_group(principal.user_id(), id).await?;
    let group = state.engine.group(principal.user_id(), id).await?;
    Ok((
        StatusCode::CREATED,
        Json(member_view(member, group.currency)),
    ))
}

pub async fn list_members(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Member>>, ServerError> {
    let group = state.engine.group(principal.user_id(), id).await?;
    let members = state.engine.members(principal.user_id(), id).await?;
    Ok(Json(
        members
            .into_iter()
            .map(|member| member_view(member, group.currency))
            .collect(),
    ))
}

pub async fn contribute(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Payload(payload): Payload<ContributionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let tx = state
        .engine
        .contribute(ContributionCmd {
            user_id: principal.0,
            group_id: id,
            from_wallet_id: payload.wallet_id,
            amount: payload.amount,
            description: payload.description,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(transaction_view(tx))))
}

pub async fn proposal_new(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Payload(payload): Payload<ProposalNew>,
) -> Result<(StatusCode, Json<Proposal>), ServerError> {
    let proposal = state
        .engine
        .create_proposal(
            principal.user_id(),
            id,
            &payload.title,
            &payload.description,
            payload.amount.as_deref(),
        )
        .await?;
    let group = state.engine.group(principal.user_id(), id).await?;
    Ok((
        StatusCode::CREATED,
        Json(proposal_view(proposal, group.currency)),
    ))
}

pub async fn list_proposals(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProposalList>, ServerError> {
    let group = state.engine.group(principal.user_id(), id).await?;
    let proposals = state.engine.proposals(principal.user_id(), id).await?;
    Ok(Json(ProposalList {
        proposals: proposals
            .into_iter()
            .map(|proposal| proposal_view(proposal, group.currency))
            .collect(),
    }))
}

pub async fn vote(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Payload(payload): Payload<VoteNew>,
) -> Result<Json<Proposal>, ServerError> {
    let proposal = state
        .engine
        .vote(principal.user_id(), id, payload.approve)
        .await?;
    let group = state
        .engine
        .group(principal.user_id(), proposal.group_id)
        .await?;
    Ok(Json(proposal_view(proposal, group.currency)))
}
