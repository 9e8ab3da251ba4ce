//! Community savings groups.
//!
//! A group owns a pooled balance fed only by member contributions. Pools
//! are never paid out by the engine.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Currency, EngineError, Money,
    util::{model_currency, parse_uuid},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityGroup {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub currency: Currency,
    pub pool_minor: i64,
    pub target_minor: Option<i64>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl CommunityGroup {
    pub fn new(
        name: String,
        description: Option<String>,
        currency: Currency,
        target_minor: Option<i64>,
        created_by: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            currency,
            pool_minor: 0,
            target_minor,
            created_by: created_by.to_string(),
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn pool(&self) -> Money {
        Money::new(self.pool_minor, self.currency)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "community_groups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub currency: String,
    pub pool_minor: i64,
    pub target_minor: Option<i64>,
    pub created_by: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::community_members::Entity")]
    Members,
    #[sea_orm(has_many = "super::community_proposals::Entity")]
    Proposals,
}

impl Related<super::community_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl Related<super::community_proposals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Proposals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&CommunityGroup> for ActiveModel {
    fn from(group: &CommunityGroup) -> Self {
        Self {
            id: ActiveValue::Set(group.id.to_string()),
            name: ActiveValue::Set(group.name.clone()),
            description: ActiveValue::Set(group.description.clone()),
            currency: ActiveValue::Set(group.currency.code().to_string()),
            pool_minor: ActiveValue::Set(group.pool_minor),
            target_minor: ActiveValue::Set(group.target_minor),
            created_by: ActiveValue::Set(group.created_by.clone()),
            created_at: ActiveValue::Set(group.created_at),
        }
    }
}

impl TryFrom<Model> for CommunityGroup {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "group")?,
            name: model.name,
            description: model.description,
            currency: model_currency(&model.currency)?,
            pool_minor: model.pool_minor,
            target_minor: model.target_minor,
            created_by: model.created_by,
            created_at: model.created_at,
        })
    }
}
