//! Log of AI coaching exchanges. Written after the advisor answers; it has
//! no link to wallets.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoachingSession {
    pub id: Uuid,
    pub user_id: String,
    pub question: String,
    pub response: String,
    pub category: String,
    pub language: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ai_coaching_sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub question: String,
    pub response: String,
    pub category: String,
    pub language: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&CoachingSession> for ActiveModel {
    fn from(s: &CoachingSession) -> Self {
        Self {
            id: ActiveValue::Set(s.id.to_string()),
            user_id: ActiveValue::Set(s.user_id.clone()),
            question: ActiveValue::Set(s.question.clone()),
            response: ActiveValue::Set(s.response.clone()),
            category: ActiveValue::Set(s.category.clone()),
            language: ActiveValue::Set(s.language.clone()),
            created_at: ActiveValue::Set(s.created_at),
        }
    }
}

impl TryFrom<Model> for CoachingSession {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "coaching session")?,
            user_id: model.user_id,
            question: model.question,
            response: model.response,
            category: model.category,
            language: model.language,
            created_at: model.created_at,
        })
    }
}
