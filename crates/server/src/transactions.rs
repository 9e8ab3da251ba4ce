//! Transaction API endpoints: transfers, conversions, money requests and
//! history.

use api_types::transaction::{
    ConvertNew, MoneyRequestNew, RequestAnswer, TransactionList, TransactionListQuery,
    TransactionView, TransferNew,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{ConvertCmd, MoneyRequestCmd, RequestResponseCmd, TransferCmd};
use uuid::Uuid;

use crate::{
    Payload, ServerError,
    convert::{currency_from_api, kind_from_api, transaction_view},
    server::{Principal, ServerState},
};

/// Page size when the client sends no `limit`.
const DEFAULT_LIMIT: u64 = 50;

pub async fn transfer_new(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Payload(payload): Payload<TransferNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let mut cmd = TransferCmd::new(
        principal.user_id(),
        payload.from_wallet_id,
        payload.amount,
        currency_from_api(payload.currency),
    );
    if let Some(kind) = payload.kind {
        cmd = cmd.kind(kind_from_api(kind));
    }
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    if let Some(metadata) = payload.metadata {
        if !metadata.is_object() {
            return Err(ServerError::Generic(
                "metadata must be a JSON object".to_string(),
            ));
        }
        cmd = cmd.metadata(metadata);
    }
    if let Some(recipient) = payload.recipient {
        cmd = cmd.recipient(recipient);
    }

    let tx = state.engine.create_transfer(cmd).await?;
    Ok((StatusCode::CREATED, Json(transaction_view(tx))))
}

pub async fn convert_new(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Payload(payload): Payload<ConvertNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let mut cmd = ConvertCmd::new(
        principal.user_id(),
        payload.from_wallet_id,
        payload.to_wallet_id,
        payload.amount,
        payload.rate,
    );
    cmd.description = payload.description;

    let tx = state.engine.convert(cmd).await?;
    Ok((StatusCode::CREATED, Json(transaction_view(tx))))
}

pub async fn request_new(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Payload(payload): Payload<MoneyRequestNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let tx = state
        .engine
        .request_money(MoneyRequestCmd {
            user_id: principal.0,
            payer: payload.payer,
            amount: payload.amount,
            currency: currency_from_api(payload.currency),
            description: payload.description,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(transaction_view(tx))))
}

pub async fn respond(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Payload(payload): Payload<RequestAnswer>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state
        .engine
        .respond_to_request(RequestResponseCmd {
            user_id: principal.0,
            transaction_id: id,
            accept: payload.accept,
            from_wallet_id: payload.wallet_id,
        })
        .await?;
    Ok(Json(transaction_view(tx)))
}

pub async fn list(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<TransactionList>, ServerError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let transactions = state
        .engine
        .list_transactions(principal.user_id(), limit)
        .await?;

    Ok(Json(TransactionList {
        transactions: transactions.into_iter().map(transaction_view).collect(),
    }))
}

pub async fn get_detail(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state.engine.transaction(principal.user_id(), id).await?;
    Ok(Json(transaction_view(tx)))
}
