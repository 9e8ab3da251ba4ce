mod common;

use common::engine_with_db;
use engine::{Currency, EngineError};
use uuid::Uuid;

#[tokio::test]
async fn agents_handle_fiat_only() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .register_cash_agent("Chain Desk", "+254700000009", "Nairobi", Currency::Btc)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidKind(_)));

    let err = engine
        .register_cash_agent("  ", "+254700000009", "Nairobi", Currency::Kes)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    assert!(engine.cash_agents(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn directory_lists_active_agents_by_name() {
    let (engine, _db) = engine_with_db().await;
    let zawadi = engine
        .register_cash_agent(" Zawadi Agency ", "+254700000001", " Kisumu ", Currency::Kes)
        .await
        .unwrap();
    assert_eq!(zawadi.name, "Zawadi Agency");
    assert_eq!(zawadi.location, "Kisumu");
    assert!(zawadi.active);

    let akili = engine
        .register_cash_agent("Akili Cash", "+254700000002", "kisumu", Currency::Kes)
        .await
        .unwrap();
    engine
        .register_cash_agent("Lagos Point", "+234800000003", "Lagos", Currency::Ngn)
        .await
        .unwrap();

    let names: Vec<String> = engine
        .cash_agents(Some("KISUMU"))
        .await
        .unwrap()
        .into_iter()
        .map(|agent| agent.name)
        .collect();
    assert_eq!(names, ["Akili Cash", "Zawadi Agency"]);
    assert_eq!(engine.cash_agents(None).await.unwrap().len(), 3);
    assert_eq!(engine.cash_agents(Some("  ")).await.unwrap().len(), 3);

    let paused = engine.set_cash_agent_active(akili.id, false).await.unwrap();
    assert!(!paused.active);
    assert_eq!(engine.cash_agents(Some("kisumu")).await.unwrap().len(), 1);

    // Lookup by id still finds a paused agent.
    let stored = engine.cash_agent(akili.id).await.unwrap();
    assert!(!stored.active);

    let missing = engine.cash_agent(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(missing, EngineError::KeyNotFound(_)));
}
