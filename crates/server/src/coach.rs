//! AI coaching endpoints.
//!
//! The advisor only ever receives a [`FinancialContext`] built here from
//! the caller's wallets and latest transactions.

use advisor::{ActivityLine, BalanceLine, FinancialContext, Language};
use api_types::coach::{
    Answer, DailyTip, DailyTipQuery, Question, SessionList, SessionListQuery,
};
use axum::{
    Extension, Json,
    extract::{Query, State},
};

use crate::{
    Payload, ServerError,
    convert::session_view,
    server::{Principal, ServerState},
};

/// Transactions summarized for the advisor.
const CONTEXT_TRANSACTIONS: u64 = 10;
const DEFAULT_LIMIT: u64 = 20;

async fn financial_context(
    state: &ServerState,
    user_id: &str,
    language: Language,
) -> Result<FinancialContext, ServerError> {
    let balances = state
        .engine
        .wallets(user_id)
        .await?
        .into_iter()
        .filter(|wallet| wallet.active)
        .map(|wallet| BalanceLine {
            currency: wallet.currency.code().to_string(),
            amount: wallet.money().amount_string(),
        })
        .collect();
    let recent = state
        .engine
        .list_transactions(user_id, CONTEXT_TRANSACTIONS)
        .await?
        .into_iter()
        .map(|tx| ActivityLine {
            kind: tx.kind.as_str().to_string(),
            amount: tx.amount().amount_string(),
            currency: tx.currency.code().to_string(),
            status: tx.status.as_str().to_string(),
        })
        .collect();

    Ok(FinancialContext {
        language,
        balances,
        recent,
    })
}

pub async fn daily_tip(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Query(query): Query<DailyTipQuery>,
) -> Result<Json<DailyTip>, ServerError> {
    let language = query
        .language
        .as_deref()
        .map(Language::parse)
        .unwrap_or_default();
    let ctx = financial_context(&state, principal.user_id(), language).await?;
    let tip = state.advisor.daily_tip(&ctx).await;

    Ok(Json(DailyTip {
        tip: tip.tip,
        category: tip.category,
        actionable_steps: tip.actionable_steps,
        confidence: tip.confidence,
    }))
}

/// Answers a question and records the exchange in the coaching log.
pub async fn ask(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Payload(payload): Payload<Question>,
) -> Result<Json<Answer>, ServerError> {
    let question = payload.question.trim();
    if question.is_empty() {
        return Err(ServerError::Generic("question must not be empty".to_string()));
    }
    let language = payload
        .language
        .as_deref()
        .map(Language::parse)
        .unwrap_or_default();

    let ctx = financial_context(&state, principal.user_id(), language).await?;
    let answer = state.advisor.answer(&ctx, question).await;
    state
        .engine
        .log_coaching_session(
            principal.user_id(),
            question,
            &answer.response,
            &answer.category,
            language.as_str(),
        )
        .await?;

    Ok(Json(Answer {
        response: answer.response,
        category: answer.category,
    }))
}

pub async fn sessions(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Query(query): Query<SessionListQuery>,
) -> Result<Json<SessionList>, ServerError> {
    let sessions = state
        .engine
        .coaching_sessions(principal.user_id(), query.limit.unwrap_or(DEFAULT_LIMIT))
        .await?;
    Ok(Json(SessionList {
        sessions: sessions.into_iter().map(session_view).collect(),
    }))
}
