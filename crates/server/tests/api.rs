use advisor::Advisor;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::{ConnectionTrait, Database, Statement};
use serde_json::{Value, json};
use server::{ServerState, router};
use tower::ServiceExt;

async fn app() -> Router {
    app_with_engine().await.0
}

async fn app_with_engine() -> (Router, engine::Engine) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for user in ["amina", "baraka"] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec![user.into(), format!("{user}-secret").into()],
        ))
        .await
        .unwrap();
    }
    let engine = engine::Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    let app = router(ServerState::new(engine.clone(), db, Advisor::offline()));
    (app, engine)
}

fn basic(user: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{user}:{password}")))
}

async fn call_raw(
    app: &Router,
    method: Method,
    uri: &str,
    auth: Option<String>,
    body: Option<String>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    user: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    call_raw(
        app,
        method,
        uri,
        Some(basic(user, &format!("{user}-secret"))),
        body.map(|body| body.to_string()),
    )
    .await
}

fn wallet<'a>(wallets: &'a Value, currency: &str) -> &'a Value {
    wallets["wallets"]
        .as_array()
        .unwrap()
        .iter()
        .find(|wallet| wallet["currency"] == currency)
        .unwrap()
}

fn wallet_ids(wallets: &Value) -> Vec<String> {
    let mut ids: Vec<String> = wallets["wallets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|wallet| wallet["id"].as_str().unwrap().to_string())
        .collect();
    ids.sort();
    ids
}

#[tokio::test]
async fn requests_without_valid_credentials_are_rejected() {
    let app = app().await;

    let (status, _) = call_raw(&app, Method::GET, "/wallets", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call_raw(
        &app,
        Method::GET,
        "/wallets",
        Some(basic("amina", "wrong")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A prefix of a real username is not a match.
    let (status, _) = call_raw(
        &app,
        Method::GET,
        "/wallets",
        Some(basic("ami", "amina-secret")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn initialize_is_idempotent() {
    let app = app().await;

    let (status, first) = call(&app, Method::POST, "/wallets/initialize", "amina", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["wallets"].as_array().unwrap().len(), 3);
    assert_eq!(wallet(&first, "KES")["balance"], "14500.00");
    assert_eq!(wallet(&first, "BTC")["balance"], "0.00250000");
    assert_eq!(wallet(&first, "CREDITS")["kind"], "credits");

    let (_, second) = call(&app, Method::POST, "/wallets/initialize", "amina", None).await;
    assert_eq!(wallet_ids(&second), wallet_ids(&first));
    assert_eq!(wallet(&second, "KES")["balance"], "14500.00");

    let (_, listed) = call(&app, Method::GET, "/wallets", "amina", None).await;
    assert_eq!(wallet_ids(&listed), wallet_ids(&first));
}

#[tokio::test]
async fn transfer_debits_and_shows_in_history() {
    let app = app().await;
    let (_, wallets) = call(&app, Method::POST, "/wallets/initialize", "amina", None).await;
    let kes = wallet(&wallets, "KES")["id"].clone();

    let (status, tx) = call(
        &app,
        Method::POST,
        "/transactions",
        "amina",
        Some(json!({
            "fromWalletId": kes,
            "amount": "5000.00",
            "currency": "KES",
            "type": "send",
            "description": "rent"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(tx["status"], "completed");
    assert_eq!(tx["amount"], "5000.00");
    assert_eq!(tx["type"], "send");
    assert_eq!(tx["fromUserId"], "amina");

    let (_, wallets) = call(&app, Method::GET, "/wallets", "amina", None).await;
    assert_eq!(wallet(&wallets, "KES")["balance"], "9500.00");

    let (status, history) = call(&app, Method::GET, "/transactions?limit=10", "amina", None).await;
    assert_eq!(status, StatusCode::OK);
    let history = history["transactions"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["id"], tx["id"]);

    let uri = format!("/transactions/{}", tx["id"].as_str().unwrap());
    let (status, _) = call(&app, Method::GET, &uri, "amina", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, Method::GET, &uri, "baraka", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rejected_transfers_map_to_client_errors() {
    let app = app().await;
    let (_, wallets) = call(&app, Method::POST, "/wallets/initialize", "amina", None).await;
    let kes = wallet(&wallets, "KES")["id"].clone();

    let (status, body) = call(
        &app,
        Method::POST,
        "/transactions",
        "amina",
        Some(json!({ "fromWalletId": kes, "amount": "20000.00", "currency": "KES" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().starts_with("Insufficient balance"));

    let (status, _) = call(
        &app,
        Method::POST,
        "/transactions",
        "amina",
        Some(json!({ "fromWalletId": kes, "amount": "abc", "currency": "KES" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // baraka may not spend from amina's wallet.
    let (status, _) = call(
        &app,
        Method::POST,
        "/transactions",
        "baraka",
        Some(json!({ "fromWalletId": kes, "amount": "1.00", "currency": "KES" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call_raw(
        &app,
        Method::POST,
        "/transactions",
        Some(basic("amina", "amina-secret")),
        Some("{not json".to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    // The source wallet is `fromWalletId`; a body without it is malformed.
    let (status, body) = call(
        &app,
        Method::POST,
        "/transactions",
        "amina",
        Some(json!({ "walletId": kes, "amount": "1.00", "currency": "KES" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("fromWalletId"));

    let (_, wallets) = call(&app, Method::GET, "/wallets", "amina", None).await;
    assert_eq!(wallet(&wallets, "KES")["balance"], "14500.00");
}

#[tokio::test]
async fn convert_between_own_wallets() {
    let app = app().await;
    let (_, wallets) = call(&app, Method::POST, "/wallets/initialize", "amina", None).await;
    let kes = wallet(&wallets, "KES")["id"].clone();
    let btc = wallet(&wallets, "BTC")["id"].clone();

    let (status, tx) = call(
        &app,
        Method::POST,
        "/transactions/convert",
        "amina",
        Some(json!({
            "fromWalletId": kes,
            "toWalletId": btc,
            "amount": "1000.00",
            "rate": "0.0000001"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(tx["type"], "convert");
    assert_eq!(tx["metadata"]["to_currency"], "BTC");
    assert_eq!(tx["metadata"]["to_amount"], "0.00010000");

    let (_, wallets) = call(&app, Method::GET, "/wallets", "amina", None).await;
    assert_eq!(wallet(&wallets, "KES")["balance"], "13500.00");
    assert_eq!(wallet(&wallets, "BTC")["balance"], "0.00260000");
}

#[tokio::test]
async fn money_request_round_trip() {
    let app = app().await;
    call(&app, Method::POST, "/wallets/initialize", "amina", None).await;
    let (_, baraka_wallets) =
        call(&app, Method::POST, "/wallets/initialize", "baraka", None).await;
    let baraka_kes = wallet(&baraka_wallets, "KES")["id"].clone();

    let (status, request) = call(
        &app,
        Method::POST,
        "/transactions/requests",
        "amina",
        Some(json!({ "payer": "baraka", "amount": "250.00", "currency": "KES" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(request["status"], "pending");

    let uri = format!("/transactions/{}/respond", request["id"].as_str().unwrap());
    let (status, _) = call(
        &app,
        Method::POST,
        &uri,
        "amina",
        Some(json!({ "accept": true, "walletId": baraka_kes })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, settled) = call(
        &app,
        Method::POST,
        &uri,
        "baraka",
        Some(json!({ "accept": true, "walletId": baraka_kes })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settled["status"], "completed");

    let (status, _) = call(
        &app,
        Method::POST,
        &uri,
        "baraka",
        Some(json!({ "accept": false })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, wallets) = call(&app, Method::GET, "/wallets", "amina", None).await;
    assert_eq!(wallet(&wallets, "KES")["balance"], "14750.00");
}

#[tokio::test]
async fn coaching_uses_fallback_and_logs_sessions() {
    let app = app().await;

    let (status, tip) = call(
        &app,
        Method::GET,
        "/ai-coach/daily-tip?language=sw",
        "amina",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tip["category"], "savings");
    assert_eq!(tip["confidence"], 0.5);
    assert_eq!(tip["actionableSteps"].as_array().unwrap().len(), 3);

    let (status, answer) = call(
        &app,
        Method::POST,
        "/ai-coach/ask",
        "amina",
        Some(json!({ "question": "How do I start saving?" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!answer["response"].as_str().unwrap().is_empty());

    let (status, _) = call(
        &app,
        Method::POST,
        "/ai-coach/ask",
        "amina",
        Some(json!({ "question": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, sessions) = call(&app, Method::GET, "/ai-coach/sessions", "amina", None).await;
    let sessions = sessions["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["question"], "How do I start saving?");
    assert_eq!(sessions[0]["language"], "en");
}

#[tokio::test]
async fn voice_commands_are_parsed_not_executed() {
    let app = app().await;
    call(&app, Method::POST, "/wallets/initialize", "amina", None).await;

    let (status, parsed) = call(
        &app,
        Method::POST,
        "/voice/process",
        "amina",
        Some(json!({ "audioText": "send 500 shillings to baraka", "language": "en" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parsed["intent"], "send");
    assert_eq!(parsed["action"], "send_money");
    assert_eq!(parsed["parameters"]["amount"], "500");
    assert_eq!(parsed["parameters"]["recipient"], "baraka");

    let (status, parsed) = call(
        &app,
        Method::POST,
        "/voice/process",
        "amina",
        Some(json!({ "transcript": "send 500 shillings to baraka" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parsed["intent"], "send");

    let (status, body) = call(
        &app,
        Method::POST,
        "/voice/process",
        "amina",
        Some(json!({ "audioText": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (_, history) = call(&app, Method::GET, "/transactions", "amina", None).await;
    assert!(history["transactions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn community_group_flow() {
    let app = app().await;
    let (_, wallets) = call(&app, Method::POST, "/wallets/initialize", "baraka", None).await;
    let kes = wallet(&wallets, "KES")["id"].clone();

    let (status, group) = call(
        &app,
        Method::POST,
        "/community/groups",
        "amina",
        Some(json!({ "name": "Chama", "currency": "KES", "target": "50000" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(group["pool"], "0.00");
    assert_eq!(group["target"], "50000.00");
    let group_id = group["id"].as_str().unwrap().to_string();

    let contribute = format!("/community/groups/{group_id}/contribute");
    let body = json!({ "walletId": kes, "amount": "1000.00" });
    let (status, _) = call(&app, Method::POST, &contribute, "baraka", Some(body.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let join = format!("/community/groups/{group_id}/join");
    let (status, member) = call(&app, Method::POST, &join, "baraka", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(member["role"], "member");
    let (status, _) = call(&app, Method::POST, &join, "baraka", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, tx) = call(&app, Method::POST, &contribute, "baraka", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(tx["type"], "community_contribution");

    let (_, groups) = call(&app, Method::GET, "/community/groups", "amina", None).await;
    assert_eq!(groups["groups"][0]["pool"], "1000.00");

    let proposals = format!("/community/groups/{group_id}/proposals");
    let (status, proposal) = call(
        &app,
        Method::POST,
        &proposals,
        "amina",
        Some(json!({ "title": "Buy a water tank", "amount": "800" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(proposal["amount"], "800.00");
    assert_eq!(proposal["status"], "open");

    let vote = format!("/community/proposals/{}/vote", proposal["id"].as_str().unwrap());
    let (_, proposal) = call(&app, Method::POST, &vote, "amina", Some(json!({ "approve": true }))).await;
    assert_eq!(proposal["votesFor"], 1);
    assert_eq!(proposal["status"], "open");
    let (_, proposal) = call(&app, Method::POST, &vote, "baraka", Some(json!({ "approve": true }))).await;
    assert_eq!(proposal["status"], "approved");
}

#[tokio::test]
async fn goals_track_progress() {
    let app = app().await;

    let (status, goal) = call(
        &app,
        Method::POST,
        "/goals",
        "amina",
        Some(json!({
            "title": "School fees",
            "target": "20000",
            "currency": "KES",
            "deadline": "2027-01-15"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(goal["progress"], 0);

    let uri = format!("/goals/{}", goal["id"].as_str().unwrap());
    let (status, goal) = call(
        &app,
        Method::PATCH,
        &uri,
        "amina",
        Some(json!({ "current": "5000" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(goal["current"], "5000.00");
    assert_eq!(goal["progress"], 25);

    let (status, _) = call(
        &app,
        Method::PATCH,
        &uri,
        "baraka",
        Some(json!({ "current": "1" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, goals) = call(&app, Method::GET, "/goals", "amina", None).await;
    assert_eq!(goals["goals"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn cash_agents_are_listed_by_location() {
    let (app, engine) = app_with_engine().await;
    let westlands = engine
        .register_cash_agent("Wanjiru Shop", "+254700000001", "Westlands", engine::Currency::Kes)
        .await
        .unwrap();
    engine
        .register_cash_agent("Accra Central", "+233200000002", "Accra", engine::Currency::Ghs)
        .await
        .unwrap();
    let closed = engine
        .register_cash_agent("Kibera Kiosk", "+254700000003", "westlands", engine::Currency::Kes)
        .await
        .unwrap();
    engine.set_cash_agent_active(closed.id, false).await.unwrap();

    let (status, all) = call(&app, Method::GET, "/cash-agents", "amina", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all["cashAgents"].as_array().unwrap().len(), 2);

    let (_, nearby) = call(
        &app,
        Method::GET,
        "/cash-agents?location=WESTLANDS",
        "amina",
        None,
    )
    .await;
    let nearby = nearby["cashAgents"].as_array().unwrap();
    assert_eq!(nearby.len(), 1);
    assert_eq!(nearby[0]["name"], "Wanjiru Shop");
    assert_eq!(nearby[0]["currency"], "KES");

    let uri = format!("/cash-agents/{}", westlands.id);
    let (status, agent) = call(&app, Method::GET, &uri, "baraka", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(agent["phone"], "+254700000001");

    let uri = format!("/cash-agents/{}", uuid::Uuid::new_v4());
    let (status, _) = call(&app, Method::GET, &uri, "amina", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
