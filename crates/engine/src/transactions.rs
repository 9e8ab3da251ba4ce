//! Transaction primitives.
//!
//! A `Transaction` is the append-only record of one money-movement event.
//! Rows are never deleted; the only mutation a stored row accepts is the
//! status change out of `pending`.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Currency, EngineError, Money, ResultEngine,
    util::{model_currency, parse_uuid},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Send,
    Receive,
    Convert,
    Mesh,
    CommunityContribution,
    Request,
    Deposit,
    Withdrawal,
    Payment,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Send => "send",
            Self::Receive => "receive",
            Self::Convert => "convert",
            Self::Mesh => "mesh",
            Self::CommunityContribution => "community_contribution",
            Self::Request => "request",
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
            Self::Payment => "payment",
        }
    }

    /// Kinds a caller may submit through a plain debit transfer.
    ///
    /// `convert`, `request` and `community_contribution` have dedicated
    /// operations; `receive` and `deposit` never debit the caller.
    pub fn is_debit_transfer(self) -> bool {
        matches!(
            self,
            Self::Send | Self::Mesh | Self::Payment | Self::Withdrawal
        )
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "send" => Ok(Self::Send),
            "receive" => Ok(Self::Receive),
            "convert" => Ok(Self::Convert),
            "mesh" => Ok(Self::Mesh),
            "community_contribution" => Ok(Self::CommunityContribution),
            "request" => Ok(Self::Request),
            "deposit" => Ok(Self::Deposit),
            "withdrawal" => Ok(Self::Withdrawal),
            "payment" => Ok(Self::Payment),
            other => Err(EngineError::InvalidKind(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

/// Lifecycle of a transaction: `pending → completed | failed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Validates a status change. Only `pending` may move, and only forward.
    pub fn transition(self, next: TransactionStatus) -> ResultEngine<TransactionStatus> {
        match (self, next) {
            (Self::Pending, Self::Completed | Self::Failed) => Ok(next),
            (from, to) => Err(EngineError::InvalidTransition(format!(
                "{} -> {}",
                from.as_str(),
                to.as_str()
            ))),
        }
    }
}

impl TryFrom<&str> for TransactionStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(EngineError::InvalidTransition(format!(
                "invalid transaction status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub from_user_id: Option<String>,
    pub to_user_id: Option<String>,
    pub from_wallet_id: Option<Uuid>,
    pub to_wallet_id: Option<Uuid>,
    pub amount_minor: i64,
    pub currency: Currency,
    pub kind: TransactionKind,
    pub status: TransactionStatus,
    pub description: Option<String>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Builds a new transaction record; `amount` must be positive.
    pub fn new(
        kind: TransactionKind,
        status: TransactionStatus,
        amount: Money,
        description: Option<String>,
        metadata: serde_json::Value,
    ) -> ResultEngine<Self> {
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "amount must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            from_user_id: None,
            to_user_id: None,
            from_wallet_id: None,
            to_wallet_id: None,
            amount_minor: amount.minor(),
            currency: amount.currency(),
            kind,
            status,
            description,
            metadata,
            created_at: Utc::now(),
        })
    }

    #[must_use]
    pub fn from_wallet(mut self, user_id: &str, wallet_id: Uuid) -> Self {
        self.from_user_id = Some(user_id.to_string());
        self.from_wallet_id = Some(wallet_id);
        self
    }

    #[must_use]
    pub fn to_wallet(mut self, user_id: &str, wallet_id: Uuid) -> Self {
        self.to_user_id = Some(user_id.to_string());
        self.to_wallet_id = Some(wallet_id);
        self
    }

    #[must_use]
    pub fn amount(&self) -> Money {
        Money::new(self.amount_minor, self.currency)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub from_user_id: Option<String>,
    pub to_user_id: Option<String>,
    pub from_wallet_id: Option<String>,
    pub to_wallet_id: Option<String>,
    pub amount_minor: i64,
    pub currency: String,
    pub kind: String,
    pub status: String,
    pub description: Option<String>,
    pub metadata: Json,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            from_user_id: ActiveValue::Set(tx.from_user_id.clone()),
            to_user_id: ActiveValue::Set(tx.to_user_id.clone()),
            from_wallet_id: ActiveValue::Set(tx.from_wallet_id.map(|id| id.to_string())),
            to_wallet_id: ActiveValue::Set(tx.to_wallet_id.map(|id| id.to_string())),
            amount_minor: ActiveValue::Set(tx.amount_minor),
            currency: ActiveValue::Set(tx.currency.code().to_string()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            status: ActiveValue::Set(tx.status.as_str().to_string()),
            description: ActiveValue::Set(tx.description.clone()),
            metadata: ActiveValue::Set(tx.metadata.clone()),
            created_at: ActiveValue::Set(tx.created_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "transaction")?,
            from_user_id: model.from_user_id,
            to_user_id: model.to_user_id,
            from_wallet_id: model
                .from_wallet_id
                .as_deref()
                .map(|id| parse_uuid(id, "wallet"))
                .transpose()?,
            to_wallet_id: model
                .to_wallet_id
                .as_deref()
                .map(|id| parse_uuid(id, "wallet"))
                .transpose()?,
            amount_minor: model.amount_minor,
            currency: model_currency(&model.currency)?,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            status: TransactionStatus::try_from(model.status.as_str())?,
            description: model.description,
            metadata: model.metadata,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_moves_forward_only() {
        let pending = TransactionStatus::Pending;
        assert_eq!(
            pending.transition(TransactionStatus::Completed).unwrap(),
            TransactionStatus::Completed
        );
        assert_eq!(
            pending.transition(TransactionStatus::Failed).unwrap(),
            TransactionStatus::Failed
        );
        assert!(pending.transition(TransactionStatus::Pending).is_err());
    }

    #[test]
    fn terminal_states_are_frozen() {
        for terminal in [TransactionStatus::Completed, TransactionStatus::Failed] {
            assert!(terminal.is_terminal());
            for next in [
                TransactionStatus::Pending,
                TransactionStatus::Completed,
                TransactionStatus::Failed,
            ] {
                assert!(terminal.transition(next).is_err());
            }
        }
    }

    #[test]
    fn new_rejects_non_positive_amounts() {
        let err = Transaction::new(
            TransactionKind::Send,
            TransactionStatus::Completed,
            Money::zero(Currency::Kes),
            None,
            serde_json::Value::Null,
        )
        .unwrap_err();
        assert_eq!(err, EngineError::InvalidAmount("amount must be > 0".to_string()));
    }

    #[test]
    fn only_plain_debits_are_transferable() {
        assert!(TransactionKind::Send.is_debit_transfer());
        assert!(TransactionKind::Mesh.is_debit_transfer());
        assert!(!TransactionKind::Convert.is_debit_transfer());
        assert!(!TransactionKind::CommunityContribution.is_debit_transfer());
        assert!(!TransactionKind::Receive.is_debit_transfer());
    }
}
