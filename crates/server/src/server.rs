use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, patch, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{agents, coach, community, goals, transactions, voice, wallets};
use advisor::Advisor;
use engine::{Engine, users};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
    pub advisor: Arc<Advisor>,
}

impl ServerState {
    pub fn new(engine: Engine, db: DatabaseConnection, advisor: Advisor) -> Self {
        Self {
            engine: Arc::new(engine),
            db,
            advisor: Arc::new(advisor),
        }
    }
}

/// The authenticated caller, resolved once per request.
///
/// Handlers pass its username to the engine as `user_id`; nothing in a
/// request body can name another principal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Principal(pub String);

impl Principal {
    pub fn user_id(&self) -> &str {
        &self.0
    }
}

async fn auth(
    auth_header: TypedHeader<Authorization<Basic>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user = users::Entity::find()
        .filter(users::Column::Username.eq(auth_header.username()))
        .filter(users::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(|err| {
            tracing::error!("failed to look up user: {err}");
            StatusCode::UNAUTHORIZED
        })?;

    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(Principal(user.username));
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/wallets", get(wallets::list).post(wallets::wallet_new))
        .route("/wallets/initialize", post(wallets::initialize))
        .route("/wallets/{id}", patch(wallets::wallet_update))
        .route(
            "/transactions",
            get(transactions::list).post(transactions::transfer_new),
        )
        .route("/transactions/convert", post(transactions::convert_new))
        .route("/transactions/requests", post(transactions::request_new))
        .route("/transactions/{id}", get(transactions::get_detail))
        .route("/transactions/{id}/respond", post(transactions::respond))
        .route("/ai-coach/daily-tip", get(coach::daily_tip))
        .route("/ai-coach/ask", post(coach::ask))
        .route("/ai-coach/sessions", get(coach::sessions))
        .route("/voice/process", post(voice::process))
        .route(
            "/community/groups",
            get(community::list_groups).post(community::group_new),
        )
        .route("/community/groups/{id}/join", post(community::join))
        .route("/community/groups/{id}/members", get(community::list_members))
        .route("/community/groups/{id}/contribute", post(community::contribute))
        .route(
            "/community/groups/{id}/proposals",
            get(community::list_proposals).post(community::proposal_new),
        )
        .route("/community/proposals/{id}/vote", post(community::vote))
        .route("/goals", get(goals::list).post(goals::goal_new))
        .route("/cash-agents", get(agents::list))
        .route("/cash-agents/{id}", get(agents::get_detail))
        .route("/goals/{id}", patch(goals::goal_update))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    advisor: Advisor,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState::new(engine, db, advisor);

    axum::serve(listener, router(state)).await
}
