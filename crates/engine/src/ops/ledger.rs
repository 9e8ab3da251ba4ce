//! Balance primitives shared by every money-moving operation.
//!
//! Reads here run on the pool, outside any write transaction. Inside a
//! write transaction the first statement must be [`Engine::debit`], so the
//! store takes its write lock before the transaction reads anything.

use sea_orm::{ConnectionTrait, DatabaseTransaction, QueryFilter, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{Currency, EngineError, Money, ResultEngine, Transaction, Wallet, transactions, wallets};

use super::Engine;

impl Engine {
    /// Loads a wallet owned by `user_id`.
    ///
    /// Unknown ids and wallets of other users yield the same
    /// `UnauthorizedWallet`, so callers cannot tell which ids exist.
    pub(super) async fn owned_wallet<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: &str,
        wallet_id: Uuid,
    ) -> ResultEngine<Wallet> {
        let model = wallets::Entity::find_by_id(wallet_id.to_string())
            .one(db)
            .await?
            .filter(|model| model.user_id == user_id)
            .ok_or_else(|| EngineError::UnauthorizedWallet(wallet_id.to_string()))?;
        Wallet::try_from(model)
    }

    /// Finds the active wallet of `user_id` holding `currency`.
    pub(super) async fn receiving_wallet<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: &str,
        currency: Currency,
    ) -> ResultEngine<Wallet> {
        let model = wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(user_id))
            .filter(wallets::Column::Kind.eq(currency.kind().as_str()))
            .filter(wallets::Column::Currency.eq(currency.code()))
            .filter(wallets::Column::Active.eq(true))
            .one(db)
            .await?
            .ok_or_else(|| {
                EngineError::KeyNotFound(format!("{currency} wallet of {user_id}"))
            })?;
        Wallet::try_from(model)
    }

    /// Conditionally decrements a wallet balance.
    ///
    /// The balance check and the decrement are one statement; zero affected
    /// rows means the balance was short when the store evaluated it.
    pub(super) async fn debit(
        &self,
        db_tx: &DatabaseTransaction,
        wallet: &Wallet,
        amount: Money,
    ) -> ResultEngine<()> {
        let result = wallets::Entity::update_many()
            .col_expr(
                wallets::Column::Balance,
                Expr::cust_with_values("balance - ?", [amount.minor()]),
            )
            .filter(wallets::Column::Id.eq(wallet.id.to_string()))
            .filter(wallets::Column::UserId.eq(wallet.user_id.as_str()))
            .filter(wallets::Column::Currency.eq(amount.currency().code()))
            .filter(wallets::Column::Active.eq(true))
            .filter(wallets::Column::Balance.gte(amount.minor()))
            .exec(db_tx)
            .await?;

        if result.rows_affected == 0 {
            return Err(EngineError::InsufficientBalance(format!(
                "wallet {} cannot cover {amount}",
                wallet.id
            )));
        }
        Ok(())
    }

    /// Increments an active wallet balance.
    pub(super) async fn credit(
        &self,
        db_tx: &DatabaseTransaction,
        wallet: &Wallet,
        amount: Money,
    ) -> ResultEngine<()> {
        let result = wallets::Entity::update_many()
            .col_expr(
                wallets::Column::Balance,
                Expr::cust_with_values("balance + ?", [amount.minor()]),
            )
            .filter(wallets::Column::Id.eq(wallet.id.to_string()))
            .filter(wallets::Column::Currency.eq(amount.currency().code()))
            .filter(wallets::Column::Active.eq(true))
            .exec(db_tx)
            .await?;

        if result.rows_affected == 0 {
            return Err(EngineError::InactiveWallet(wallet.id.to_string()));
        }
        Ok(())
    }

    /// Appends a transaction row.
    pub(super) async fn record(
        &self,
        db_tx: &DatabaseTransaction,
        tx: &Transaction,
    ) -> ResultEngine<()> {
        transactions::ActiveModel::from(tx).insert(db_tx).await?;
        Ok(())
    }
}
