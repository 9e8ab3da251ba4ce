use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{
    CashAgent, Currency, EngineError, ResultEngine, WalletKind, cash_agents,
    util::normalize_required_text,
};

use super::Engine;

impl Engine {
    /// Registers an agent handling cash in one fiat currency.
    pub async fn register_cash_agent(
        &self,
        name: &str,
        phone: &str,
        location: &str,
        currency: Currency,
    ) -> ResultEngine<CashAgent> {
        if currency.kind() != WalletKind::Fiat {
            return Err(EngineError::InvalidKind(format!(
                "cash agents only handle fiat, got {currency}"
            )));
        }
        let agent = CashAgent {
            id: Uuid::new_v4(),
            name: normalize_required_text(name, "agent name")?,
            phone: normalize_required_text(phone, "agent phone")?,
            location: normalize_required_text(location, "agent location")?,
            currency,
            active: true,
            created_at: chrono::Utc::now(),
        };
        cash_agents::ActiveModel::from(&agent)
            .insert(&self.database)
            .await?;

        tracing::info!(
            agent_id = %agent.id,
            location = %agent.location,
            %currency,
            "cash agent registered"
        );
        Ok(agent)
    }

    /// Active agents ordered by name, optionally narrowed to a location
    /// (case-insensitive exact match).
    pub async fn cash_agents(&self, location: Option<&str>) -> ResultEngine<Vec<CashAgent>> {
        let mut query = cash_agents::Entity::find()
            .filter(cash_agents::Column::Active.eq(true))
            .order_by_asc(cash_agents::Column::Name);
        if let Some(location) = location.map(str::trim).filter(|l| !l.is_empty()) {
            query = query.filter(
                Expr::cust_with_values("lower(location) = ?", [location.to_lowercase()]),
            );
        }

        query
            .all(&self.database)
            .await?
            .into_iter()
            .map(CashAgent::try_from)
            .collect()
    }

    pub async fn cash_agent(&self, agent_id: Uuid) -> ResultEngine<CashAgent> {
        cash_agents::Entity::find_by_id(agent_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("cash agent not exists".to_string()))
            .and_then(CashAgent::try_from)
    }

    pub async fn set_cash_agent_active(
        &self,
        agent_id: Uuid,
        active: bool,
    ) -> ResultEngine<CashAgent> {
        let mut agent = self.cash_agent(agent_id).await?;
        cash_agents::ActiveModel {
            id: ActiveValue::Set(agent.id.to_string()),
            active: ActiveValue::Set(active),
            ..Default::default()
        }
        .update(&self.database)
        .await?;
        agent.active = active;

        tracing::info!(%agent_id, active, "cash agent updated");
        Ok(agent)
    }
}
