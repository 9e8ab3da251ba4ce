use chrono::Utc;
use sea_orm::{QueryFilter, QueryOrder, QuerySelect, prelude::*};
use uuid::Uuid;

use crate::{CoachingSession, ResultEngine, coaching_sessions, util::normalize_required_text};

use super::{Engine, MAX_HISTORY_LIMIT};

impl Engine {
    /// Stores one question/answer exchange with the advisor.
    pub async fn log_coaching_session(
        &self,
        user_id: &str,
        question: &str,
        response: &str,
        category: &str,
        language: &str,
    ) -> ResultEngine<CoachingSession> {
        let session = CoachingSession {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            question: normalize_required_text(question, "question")?,
            response: response.to_string(),
            category: category.to_string(),
            language: language.to_string(),
            created_at: Utc::now(),
        };
        coaching_sessions::ActiveModel::from(&session)
            .insert(&self.database)
            .await?;

        tracing::debug!(user_id, session_id = %session.id, "coaching session logged");
        Ok(session)
    }

    /// The caller's most recent sessions, newest first.
    pub async fn coaching_sessions(
        &self,
        user_id: &str,
        limit: u64,
    ) -> ResultEngine<Vec<CoachingSession>> {
        let limit = limit.min(MAX_HISTORY_LIMIT);
        if limit == 0 {
            return Ok(Vec::new());
        }
        coaching_sessions::Entity::find()
            .filter(coaching_sessions::Column::UserId.eq(user_id))
            .order_by_desc(coaching_sessions::Column::CreatedAt)
            .order_by_desc(coaching_sessions::Column::Id)
            .limit(limit)
            .all(&self.database)
            .await?
            .into_iter()
            .map(CoachingSession::try_from)
            .collect()
    }
}
