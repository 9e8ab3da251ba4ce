//! Wallets API endpoints.

use api_types::wallet::{Wallet, WalletList, WalletNew, WalletUpdate};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    Payload, ServerError,
    convert::{currency_from_api, wallet_kind_from_api, wallet_view},
    server::{Principal, ServerState},
};

fn wallet_list(wallets: Vec<engine::Wallet>) -> WalletList {
    WalletList {
        wallets: wallets.into_iter().map(wallet_view).collect(),
    }
}

/// Creates the default wallets on first call; later calls return the
/// existing ones unchanged.
pub async fn initialize(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
) -> Result<Json<WalletList>, ServerError> {
    let wallets = state
        .engine
        .initialize_wallets(principal.user_id())
        .await?;
    Ok(Json(wallet_list(wallets)))
}

pub async fn list(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
) -> Result<Json<WalletList>, ServerError> {
    let wallets = state.engine.wallets(principal.user_id()).await?;
    Ok(Json(wallet_list(wallets)))
}

pub async fn wallet_new(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Payload(payload): Payload<WalletNew>,
) -> Result<(StatusCode, Json<Wallet>), ServerError> {
    let wallet = state
        .engine
        .open_wallet(
            principal.user_id(),
            wallet_kind_from_api(payload.kind),
            currency_from_api(payload.currency),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(wallet_view(wallet))))
}

pub async fn wallet_update(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Payload(payload): Payload<WalletUpdate>,
) -> Result<Json<Wallet>, ServerError> {
    let wallet = state
        .engine
        .set_wallet_active(principal.user_id(), id, payload.active)
        .await?;
    Ok(Json(wallet_view(wallet)))
}
