use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, SqlErr, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{Currency, EngineError, ResultEngine, Wallet, WalletKind, wallets};

use super::{Engine, with_tx};

/// Wallets created on first initialization, with their seed balance in
/// minor units: `14500.00 KES`, `0.00250000 BTC`, `1250.00 CREDITS`.
pub(crate) const SEED_WALLETS: [(Currency, i64); 3] = [
    (Currency::Kes, 1_450_000),
    (Currency::Btc, 250_000),
    (Currency::Credits, 125_000),
];

impl Engine {
    /// Return the caller's wallets, oldest first.
    pub async fn wallets(&self, user_id: &str) -> ResultEngine<Vec<Wallet>> {
        wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(user_id))
            .order_by_asc(wallets::Column::CreatedAt)
            .order_by_asc(wallets::Column::Kind)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Wallet::try_from)
            .collect()
    }

    /// Return one of the caller's wallets.
    pub async fn wallet(&self, user_id: &str, wallet_id: Uuid) -> ResultEngine<Wallet> {
        self.owned_wallet(&self.database, user_id, wallet_id).await
    }

    /// Creates the default fiat, crypto and credits wallets for a user.
    ///
    /// Idempotent: if the user already owns any wallet, the existing set is
    /// returned unchanged and no balance is touched. A concurrent first
    /// initialization loses on the `(user, kind, currency)` unique index and
    /// returns the winner's set.
    pub async fn initialize_wallets(&self, user_id: &str) -> ResultEngine<Vec<Wallet>> {
        let existing = self.wallets(user_id).await?;
        if !existing.is_empty() {
            return Ok(existing);
        }

        match self.insert_seed_wallets(user_id).await {
            Ok(created) => {
                tracing::info!(user_id, count = created.len(), "initialized wallets");
                Ok(created)
            }
            Err(EngineError::Database(err))
                if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) =>
            {
                tracing::debug!(user_id, "wallets initialized concurrently");
                self.wallets(user_id).await
            }
            Err(err) => Err(err),
        }
    }

    async fn insert_seed_wallets(&self, user_id: &str) -> ResultEngine<Vec<Wallet>> {
        with_tx!(self, |db_tx| {
            let mut created = Vec::with_capacity(SEED_WALLETS.len());
            for (currency, balance) in SEED_WALLETS {
                let wallet = Wallet::new(user_id.to_string(), currency, balance);
                wallets::ActiveModel::from(&wallet).insert(&db_tx).await?;
                created.push(wallet);
            }
            Ok(created)
        })
    }

    /// Opens an extra zero-balance wallet.
    pub async fn open_wallet(
        &self,
        user_id: &str,
        kind: WalletKind,
        currency: Currency,
    ) -> ResultEngine<Wallet> {
        if currency.kind() != kind {
            return Err(EngineError::InvalidKind(format!(
                "{currency} is held in {} wallets, not {kind}",
                currency.kind()
            )));
        }

        let exists = wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(user_id))
            .filter(wallets::Column::Kind.eq(kind.as_str()))
            .filter(wallets::Column::Currency.eq(currency.code()))
            .one(&self.database)
            .await?
            .is_some();
        if exists {
            return Err(EngineError::ExistingKey(format!("{kind} {currency} wallet")));
        }

        let wallet = Wallet::new(user_id.to_string(), currency, 0);
        match wallets::ActiveModel::from(&wallet)
            .insert(&self.database)
            .await
        {
            Ok(_) => {}
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                return Err(EngineError::ExistingKey(format!("{kind} {currency} wallet")));
            }
            Err(err) => return Err(err.into()),
        }

        tracing::info!(user_id, wallet_id = %wallet.id, %currency, "opened wallet");
        Ok(wallet)
    }

    /// Activates or deactivates one of the caller's wallets.
    ///
    /// Wallets are never deleted; an inactive wallet rejects debits and
    /// credits but keeps its balance and history.
    pub async fn set_wallet_active(
        &self,
        user_id: &str,
        wallet_id: Uuid,
        active: bool,
    ) -> ResultEngine<Wallet> {
        let mut wallet = self.owned_wallet(&self.database, user_id, wallet_id).await?;

        let model = wallets::ActiveModel {
            id: ActiveValue::Set(wallet.id.to_string()),
            active: ActiveValue::Set(active),
            ..Default::default()
        };
        model.update(&self.database).await?;
        wallet.active = active;

        tracing::info!(user_id, wallet_id = %wallet.id, active, "wallet state changed");
        Ok(wallet)
    }
}
