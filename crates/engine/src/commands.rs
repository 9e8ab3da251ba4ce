//! Command structs for ledger write operations.
//!
//! These types group the parameters of balance-affecting operations and
//! carry the caller's `user_id` explicitly, so every call is evaluated
//! against the principal resolved at the boundary.

use uuid::Uuid;

use crate::{Currency, TransactionKind};

/// Debit one of the caller's wallets, optionally crediting another user.
///
/// `amount` is the raw decimal string as submitted; it is parsed in the
/// wallet's precision before anything is written.
#[derive(Clone, Debug)]
pub struct TransferCmd {
    pub user_id: String,
    pub from_wallet_id: Uuid,
    pub amount: String,
    pub currency: Currency,
    pub kind: TransactionKind,
    pub description: Option<String>,
    pub metadata: serde_json::Value,
    /// Username of the user to credit, if any.
    pub recipient: Option<String>,
}

impl TransferCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        from_wallet_id: Uuid,
        amount: impl Into<String>,
        currency: Currency,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            from_wallet_id,
            amount: amount.into(),
            currency,
            kind: TransactionKind::Send,
            description: None,
            metadata: serde_json::Value::Object(serde_json::Map::new()),
            recipient: None,
        }
    }

    #[must_use]
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }

    #[must_use]
    pub fn recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = Some(recipient.into());
        self
    }
}

/// Move value between two of the caller's wallets at a given rate.
#[derive(Clone, Debug)]
pub struct ConvertCmd {
    pub user_id: String,
    pub from_wallet_id: Uuid,
    pub to_wallet_id: Uuid,
    pub amount: String,
    pub rate: String,
    pub description: Option<String>,
}

impl ConvertCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        from_wallet_id: Uuid,
        to_wallet_id: Uuid,
        amount: impl Into<String>,
        rate: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            from_wallet_id,
            to_wallet_id,
            amount: amount.into(),
            rate: rate.into(),
            description: None,
        }
    }
}

/// Ask another user to pay the caller.
#[derive(Clone, Debug)]
pub struct MoneyRequestCmd {
    pub user_id: String,
    pub payer: String,
    pub amount: String,
    pub currency: Currency,
    pub description: Option<String>,
}

/// Answer a pending money request as its payer.
#[derive(Clone, Debug)]
pub struct RequestResponseCmd {
    pub user_id: String,
    pub transaction_id: Uuid,
    pub accept: bool,
    /// Wallet to pay from; required when `accept` is true.
    pub from_wallet_id: Option<Uuid>,
}

/// Pay into a community group's pool.
#[derive(Clone, Debug)]
pub struct ContributionCmd {
    pub user_id: String,
    pub group_id: Uuid,
    pub from_wallet_id: Uuid,
    pub amount: String,
    pub description: Option<String>,
}
