//! Cash-in/cash-out agents users can visit to deposit or withdraw fiat.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Currency, EngineError,
    util::{model_currency, parse_uuid},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashAgent {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub location: String,
    pub currency: Currency,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cash_agents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub phone: String,
    pub location: String,
    pub currency: String,
    pub active: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&CashAgent> for ActiveModel {
    fn from(agent: &CashAgent) -> Self {
        Self {
            id: ActiveValue::Set(agent.id.to_string()),
            name: ActiveValue::Set(agent.name.clone()),
            phone: ActiveValue::Set(agent.phone.clone()),
            location: ActiveValue::Set(agent.location.clone()),
            currency: ActiveValue::Set(agent.currency.code().to_string()),
            active: ActiveValue::Set(agent.active),
            created_at: ActiveValue::Set(agent.created_at),
        }
    }
}

impl TryFrom<Model> for CashAgent {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "cash agent")?,
            name: model.name,
            phone: model.phone,
            location: model.location,
            currency: model_currency(&model.currency)?,
            active: model.active,
            created_at: model.created_at,
        })
    }
}
