use chrono::NaiveDate;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    Currency, EngineError, FinancialGoal, Money, ResultEngine, goals,
    util::normalize_required_text,
};

use super::Engine;

impl Engine {
    pub async fn create_goal(
        &self,
        user_id: &str,
        title: &str,
        target: &str,
        currency: Currency,
        deadline: Option<NaiveDate>,
    ) -> ResultEngine<FinancialGoal> {
        let title = normalize_required_text(title, "goal title")?;
        let target = Money::parse_positive(target, currency)?;

        let goal = FinancialGoal {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            title,
            target_minor: target.minor(),
            current_minor: 0,
            currency,
            deadline,
            created_at: chrono::Utc::now(),
        };
        goals::ActiveModel::from(&goal).insert(&self.database).await?;

        tracing::info!(user_id, goal_id = %goal.id, %target, "goal created");
        Ok(goal)
    }

    /// The caller's goals, nearest deadline first; goals without one last.
    pub async fn goals(&self, user_id: &str) -> ResultEngine<Vec<FinancialGoal>> {
        let mut list: Vec<FinancialGoal> = goals::Entity::find()
            .filter(goals::Column::UserId.eq(user_id))
            .order_by_asc(goals::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(FinancialGoal::try_from)
            .collect::<ResultEngine<_>>()?;
        list.sort_by_key(|goal| (goal.deadline.is_none(), goal.deadline));
        Ok(list)
    }

    /// Overwrites the saved amount of a goal. Goals are not linked to any
    /// wallet, so no balance moves.
    pub async fn update_goal_progress(
        &self,
        user_id: &str,
        goal_id: Uuid,
        current: &str,
    ) -> ResultEngine<FinancialGoal> {
        let mut goal = goals::Entity::find_by_id(goal_id.to_string())
            .one(&self.database)
            .await?
            .filter(|model| model.user_id == user_id)
            .ok_or_else(|| EngineError::KeyNotFound("goal not exists".to_string()))
            .and_then(FinancialGoal::try_from)?;

        let current = Money::parse(current, goal.currency)?;
        if current.minor() < 0 {
            return Err(EngineError::InvalidAmount(
                "progress must be >= 0".to_string(),
            ));
        }

        goals::ActiveModel {
            id: ActiveValue::Set(goal.id.to_string()),
            current_minor: ActiveValue::Set(current.minor()),
            ..Default::default()
        }
        .update(&self.database)
        .await?;
        goal.current_minor = current.minor();

        tracing::info!(
            user_id,
            %goal_id,
            progress = goal.progress_percent(),
            "goal progress updated"
        );
        Ok(goal)
    }
}
