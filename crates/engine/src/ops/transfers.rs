use sea_orm::{Condition, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*};
use serde_json::json;

use crate::{
    ConvertCmd, EngineError, Money, ResultEngine, Transaction, TransactionKind,
    TransactionStatus, TransferCmd, parse_rate, transactions,
    util::{ensure_currency, normalize_optional_text},
};

use super::{Engine, with_tx};

/// Upper bound for a single history page.
pub const MAX_HISTORY_LIMIT: u64 = 200;

impl Engine {
    /// Debits one of the caller's wallets and records a `completed`
    /// transaction, optionally crediting `recipient` in the same currency.
    ///
    /// Every precondition is checked before the write transaction opens.
    /// The debit is a conditional update, so a balance that shrank since the
    /// checks still fails with `InsufficientBalance` and nothing is written.
    pub async fn create_transfer(&self, cmd: TransferCmd) -> ResultEngine<Transaction> {
        let TransferCmd {
            user_id,
            from_wallet_id,
            amount,
            currency,
            kind,
            description,
            metadata,
            recipient,
        } = cmd;

        if !kind.is_debit_transfer() {
            return Err(EngineError::InvalidKind(format!(
                "{} cannot be submitted as a transfer",
                kind.as_str()
            )));
        }
        let amount = Money::parse_positive(&amount, currency)?;

        let source = self
            .owned_wallet(&self.database, &user_id, from_wallet_id)
            .await?;
        ensure_currency(source.currency, currency)?;
        source.ensure_active()?;

        let target = match recipient.as_deref().map(str::trim) {
            Some(recipient) if recipient == user_id => {
                return Err(EngineError::InvalidAmount(
                    "cannot transfer to yourself".to_string(),
                ));
            }
            Some(recipient) if !recipient.is_empty() => Some(
                self.receiving_wallet(&self.database, recipient, currency)
                    .await?,
            ),
            _ => None,
        };

        let mut tx = Transaction::new(
            kind,
            TransactionStatus::Completed,
            amount,
            normalize_optional_text(description.as_deref()),
            metadata,
        )?
        .from_wallet(&user_id, source.id);
        if let Some(target) = &target {
            tx = tx.to_wallet(&target.user_id, target.id);
        }

        with_tx!(self, |db_tx| {
            self.debit(&db_tx, &source, amount).await?;
            if let Some(target) = &target {
                self.credit(&db_tx, target, amount).await?;
            }
            self.record(&db_tx, &tx).await?;
            Ok::<(), EngineError>(())
        })?;

        tracing::info!(
            user_id = %user_id,
            transaction_id = %tx.id,
            kind = kind.as_str(),
            %amount,
            "transfer completed"
        );
        Ok(tx)
    }

    /// Moves value between two of the caller's wallets at `rate`.
    ///
    /// The source is debited `amount`; the destination is credited
    /// `amount × rate`, truncated to its precision. A single `convert`
    /// transaction records both sides with the rate in its metadata.
    pub async fn convert(&self, cmd: ConvertCmd) -> ResultEngine<Transaction> {
        let rate = parse_rate(&cmd.rate)?;
        if cmd.from_wallet_id == cmd.to_wallet_id {
            return Err(EngineError::InvalidAmount(
                "from_wallet_id and to_wallet_id must differ".to_string(),
            ));
        }

        let source = self
            .owned_wallet(&self.database, &cmd.user_id, cmd.from_wallet_id)
            .await?;
        let target = self
            .owned_wallet(&self.database, &cmd.user_id, cmd.to_wallet_id)
            .await?;
        source.ensure_active()?;
        target.ensure_active()?;

        let debit = Money::parse_positive(&cmd.amount, source.currency)?;
        let credit = debit.convert(rate, target.currency)?;
        if !credit.is_positive() {
            return Err(EngineError::InvalidAmount(format!(
                "{debit} at rate {rate} is below the smallest {} unit",
                target.currency
            )));
        }

        let metadata = json!({
            "rate": rate.to_string(),
            "from_currency": source.currency.code(),
            "to_currency": target.currency.code(),
            "to_amount": credit.amount_string(),
        });
        let tx = Transaction::new(
            TransactionKind::Convert,
            TransactionStatus::Completed,
            debit,
            normalize_optional_text(cmd.description.as_deref()),
            metadata,
        )?
        .from_wallet(&cmd.user_id, source.id)
        .to_wallet(&cmd.user_id, target.id);

        with_tx!(self, |db_tx| {
            self.debit(&db_tx, &source, debit).await?;
            self.credit(&db_tx, &target, credit).await?;
            self.record(&db_tx, &tx).await?;
            Ok::<(), EngineError>(())
        })?;

        tracing::info!(
            user_id = %cmd.user_id,
            transaction_id = %tx.id,
            %debit,
            %credit,
            "conversion completed"
        );
        Ok(tx)
    }

    /// Returns the newest transactions where the caller is source or
    /// destination, newest first, at most `limit` (capped at
    /// [`MAX_HISTORY_LIMIT`]).
    pub async fn list_transactions(
        &self,
        user_id: &str,
        limit: u64,
    ) -> ResultEngine<Vec<Transaction>> {
        let limit = limit.min(MAX_HISTORY_LIMIT);
        if limit == 0 {
            return Ok(Vec::new());
        }

        transactions::Entity::find()
            .filter(
                Condition::any()
                    .add(transactions::Column::FromUserId.eq(user_id))
                    .add(transactions::Column::ToUserId.eq(user_id)),
            )
            .order_by_desc(transactions::Column::CreatedAt)
            .order_by_desc(transactions::Column::Id)
            .limit(limit)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }

    /// Returns one transaction the caller took part in.
    pub async fn transaction(
        &self,
        user_id: &str,
        transaction_id: Uuid,
    ) -> ResultEngine<Transaction> {
        let model = transactions::Entity::find_by_id(transaction_id.to_string())
            .one(&self.database)
            .await?
            .filter(|model| {
                model.from_user_id.as_deref() == Some(user_id)
                    || model.to_user_id.as_deref() == Some(user_id)
            })
            .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))?;
        Transaction::try_from(model)
    }
}
