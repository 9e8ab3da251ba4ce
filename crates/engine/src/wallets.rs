//! The module contains `Wallet` struct and its persistence model.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Currency, EngineError, Money, ResultEngine, WalletKind,
    util::{model_currency, parse_uuid},
};

/// A wallet.
///
/// A wallet holds the balance of one user in one currency. A user owns at
/// most one wallet per `(kind, currency)` pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    /// Stable identifier for this wallet.
    pub id: Uuid,
    pub user_id: String,
    pub kind: WalletKind,
    pub currency: Currency,
    /// Balance in minor units of `currency`. Never negative.
    pub balance: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Wallet {
    pub fn new(user_id: String, currency: Currency, balance: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind: currency.kind(),
            currency,
            balance,
            active: true,
            created_at: Utc::now(),
        }
    }

    /// The balance as a typed money value.
    #[must_use]
    pub fn money(&self) -> Money {
        Money::new(self.balance, self.currency)
    }

    /// Ensures the wallet can take part in a balance change.
    pub(crate) fn ensure_active(&self) -> ResultEngine<()> {
        if !self.active {
            return Err(EngineError::InactiveWallet(self.id.to_string()));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "wallets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub kind: String,
    pub currency: String,
    pub balance: i64,
    pub active: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Username",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Wallet> for ActiveModel {
    fn from(value: &Wallet) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            user_id: ActiveValue::Set(value.user_id.clone()),
            kind: ActiveValue::Set(value.kind.as_str().to_string()),
            currency: ActiveValue::Set(value.currency.code().to_string()),
            balance: ActiveValue::Set(value.balance),
            active: ActiveValue::Set(value.active),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for Wallet {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "wallet")?,
            user_id: model.user_id,
            kind: WalletKind::try_from(model.kind.as_str())?,
            currency: model_currency(&model.currency)?,
            balance: model.balance,
            active: model.active,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_wallet_derives_kind_from_currency() {
        let wallet = Wallet::new("amina".to_string(), Currency::Btc, 250_000);
        assert_eq!(wallet.kind, WalletKind::Crypto);
        assert!(wallet.active);
        assert_eq!(wallet.money().to_string(), "0.00250000 BTC");
    }

    #[test]
    fn inactive_wallet_is_rejected() {
        let mut wallet = Wallet::new("amina".to_string(), Currency::Kes, 0);
        wallet.active = false;
        assert!(matches!(
            wallet.ensure_active(),
            Err(EngineError::InactiveWallet(_))
        ));
    }

    #[test]
    fn model_round_trip_keeps_fields() {
        let wallet = Wallet::new("amina".to_string(), Currency::Credits, 125_000);
        let active: ActiveModel = (&wallet).into();
        let model = Model {
            id: active.id.unwrap(),
            user_id: active.user_id.unwrap(),
            kind: active.kind.unwrap(),
            currency: active.currency.unwrap(),
            balance: active.balance.unwrap(),
            active: active.active.unwrap(),
            created_at: active.created_at.unwrap(),
        };
        assert_eq!(Wallet::try_from(model).unwrap(), wallet);
    }
}
