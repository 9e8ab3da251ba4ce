//! Personal savings goals.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Currency, EngineError, Money,
    util::{model_currency, parse_uuid},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialGoal {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub target_minor: i64,
    pub current_minor: i64,
    pub currency: Currency,
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl FinancialGoal {
    /// Progress in percent, capped at 100.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        if self.target_minor <= 0 {
            return 0;
        }
        let pct = (i128::from(self.current_minor.max(0)) * 100) / i128::from(self.target_minor);
        pct.min(100) as u8
    }

    #[must_use]
    pub fn target(&self) -> Money {
        Money::new(self.target_minor, self.currency)
    }

    #[must_use]
    pub fn current(&self) -> Money {
        Money::new(self.current_minor, self.currency)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "financial_goals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub target_minor: i64,
    pub current_minor: i64,
    pub currency: String,
    pub deadline: Option<Date>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&FinancialGoal> for ActiveModel {
    fn from(goal: &FinancialGoal) -> Self {
        Self {
            id: ActiveValue::Set(goal.id.to_string()),
            user_id: ActiveValue::Set(goal.user_id.clone()),
            title: ActiveValue::Set(goal.title.clone()),
            target_minor: ActiveValue::Set(goal.target_minor),
            current_minor: ActiveValue::Set(goal.current_minor),
            currency: ActiveValue::Set(goal.currency.code().to_string()),
            deadline: ActiveValue::Set(goal.deadline),
            created_at: ActiveValue::Set(goal.created_at),
        }
    }
}

impl TryFrom<Model> for FinancialGoal {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "goal")?,
            user_id: model.user_id,
            title: model.title,
            target_minor: model.target_minor,
            current_minor: model.current_minor,
            currency: model_currency(&model.currency)?,
            deadline: model.deadline,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(current_minor: i64) -> FinancialGoal {
        FinancialGoal {
            id: Uuid::new_v4(),
            user_id: "amina".to_string(),
            title: "School fees".to_string(),
            target_minor: 50_000_00,
            current_minor,
            currency: Currency::Kes,
            deadline: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn progress_is_capped() {
        assert_eq!(goal(0).progress_percent(), 0);
        assert_eq!(goal(12_500_00).progress_percent(), 25);
        assert_eq!(goal(80_000_00).progress_percent(), 100);
    }
}
