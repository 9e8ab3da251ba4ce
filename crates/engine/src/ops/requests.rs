use sea_orm::{DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*, sea_query::Expr};
use serde_json::json;

use crate::{
    EngineError, Money, MoneyRequestCmd, RequestResponseCmd, ResultEngine, Transaction,
    TransactionKind, TransactionStatus, transactions, users,
    util::{ensure_currency, normalize_optional_text},
};

use super::{Engine, with_tx};

impl Engine {
    /// Records a `pending` request asking `payer` to pay the caller.
    ///
    /// Nothing moves until the payer accepts through
    /// [`Engine::respond_to_request`].
    pub async fn request_money(&self, cmd: MoneyRequestCmd) -> ResultEngine<Transaction> {
        let amount = Money::parse_positive(&cmd.amount, cmd.currency)?;
        let payer = cmd.payer.trim();
        if payer == cmd.user_id {
            return Err(EngineError::InvalidAmount(
                "cannot request money from yourself".to_string(),
            ));
        }
        if users::Entity::find_by_id(payer.to_string())
            .one(&self.database)
            .await?
            .is_none()
        {
            return Err(EngineError::KeyNotFound(format!("user {payer}")));
        }

        let mut tx = Transaction::new(
            TransactionKind::Request,
            TransactionStatus::Pending,
            amount,
            normalize_optional_text(cmd.description.as_deref()),
            json!({}),
        )?;
        tx.from_user_id = Some(payer.to_string());
        tx.to_user_id = Some(cmd.user_id.clone());

        transactions::ActiveModel::from(&tx)
            .insert(&self.database)
            .await?;

        tracing::info!(
            user_id = %cmd.user_id,
            payer,
            transaction_id = %tx.id,
            %amount,
            "money requested"
        );
        Ok(tx)
    }

    /// Accepts or declines a pending request as its payer.
    ///
    /// Declining marks it `failed`. Accepting debits `from_wallet_id`,
    /// credits the requester's wallet in the request currency and marks it
    /// `completed`, all in one commit; a short balance leaves it `pending`.
    pub async fn respond_to_request(&self, cmd: RequestResponseCmd) -> ResultEngine<Transaction> {
        let mut tx = self.pending_request(&cmd.user_id, cmd.transaction_id).await?;

        if !cmd.accept {
            let status = tx.status.transition(TransactionStatus::Failed)?;
            with_tx!(self, |db_tx| {
                self.settle_request(&db_tx, &tx, status).await
            })?;
            tx.status = status;
            tracing::info!(user_id = %cmd.user_id, transaction_id = %tx.id, "request declined");
            return Ok(tx);
        }

        let status = tx.status.transition(TransactionStatus::Completed)?;
        let wallet_id = cmd.from_wallet_id.ok_or_else(|| {
            EngineError::InvalidAmount("from_wallet_id is required to accept".to_string())
        })?;
        let source = self
            .owned_wallet(&self.database, &cmd.user_id, wallet_id)
            .await?;
        ensure_currency(source.currency, tx.currency)?;
        source.ensure_active()?;

        let requester = tx
            .to_user_id
            .clone()
            .ok_or_else(|| EngineError::KeyNotFound("requester".to_string()))?;
        let target = self
            .receiving_wallet(&self.database, &requester, tx.currency)
            .await?;

        tx = tx
            .from_wallet(&cmd.user_id, source.id)
            .to_wallet(&requester, target.id);
        let amount = tx.amount();

        with_tx!(self, |db_tx| {
            self.debit(&db_tx, &source, amount).await?;
            self.credit(&db_tx, &target, amount).await?;
            self.settle_request(&db_tx, &tx, status).await
        })?;
        tx.status = status;

        tracing::info!(
            user_id = %cmd.user_id,
            transaction_id = %tx.id,
            %amount,
            "request paid"
        );
        Ok(tx)
    }

    /// Loads a request the caller is the payer of.
    async fn pending_request(&self, user_id: &str, transaction_id: Uuid) -> ResultEngine<Transaction> {
        let model = transactions::Entity::find_by_id(transaction_id.to_string())
            .filter(transactions::Column::Kind.eq(TransactionKind::Request.as_str()))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("request not exists".to_string()))?;

        let tx = Transaction::try_from(model)?;
        match (tx.from_user_id.as_deref(), tx.to_user_id.as_deref()) {
            (Some(payer), _) if payer == user_id => Ok(tx),
            (_, Some(requester)) if requester == user_id => Err(EngineError::Forbidden(
                "only the payer can answer a request".to_string(),
            )),
            _ => Err(EngineError::KeyNotFound("request not exists".to_string())),
        }
    }

    /// Moves a request out of `pending`, guarded on the stored status so a
    /// concurrent answer cannot settle it twice.
    async fn settle_request(
        &self,
        db_tx: &DatabaseTransaction,
        tx: &Transaction,
        status: TransactionStatus,
    ) -> ResultEngine<()> {
        let result = transactions::Entity::update_many()
            .col_expr(transactions::Column::Status, Expr::value(status.as_str()))
            .col_expr(
                transactions::Column::FromWalletId,
                Expr::value(tx.from_wallet_id.map(|id| id.to_string())),
            )
            .col_expr(
                transactions::Column::ToWalletId,
                Expr::value(tx.to_wallet_id.map(|id| id.to_string())),
            )
            .filter(transactions::Column::Id.eq(tx.id.to_string()))
            .filter(transactions::Column::Status.eq(TransactionStatus::Pending.as_str()))
            .exec(db_tx)
            .await?;

        if result.rows_affected == 0 {
            return Err(EngineError::InvalidTransition(format!(
                "request {} is no longer pending",
                tx.id
            )));
        }
        Ok(())
    }
}
