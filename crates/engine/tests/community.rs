mod common;

use chrono::NaiveDate;

use common::{add_user, engine_with_db, wallet_for};
use engine::{ContributionCmd, Currency, EngineError, MemberRole, ProposalStatus, TransactionKind};

#[tokio::test]
async fn contribution_moves_money_into_the_pool() {
    let (engine, _db) = engine_with_db().await;
    let wallets = engine.initialize_wallets("amina").await.unwrap();
    let kes = wallet_for(&wallets, Currency::Kes);

    let group = engine
        .create_group("amina", "Chama Umoja", Some("school fees"), Currency::Kes, Some("50000"))
        .await
        .unwrap();
    assert_eq!(group.target_minor, Some(5_000_000));

    let members = engine.members("amina", group.id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].role, MemberRole::Admin);

    let tx = engine
        .contribute(ContributionCmd {
            user_id: "amina".to_string(),
            group_id: group.id,
            from_wallet_id: kes.id,
            amount: "1500.00".to_string(),
            description: None,
        })
        .await
        .unwrap();
    assert_eq!(tx.kind, TransactionKind::CommunityContribution);
    assert_eq!(tx.metadata["group_id"], group.id.to_string());

    let groups = engine.groups("amina").await.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].pool().to_string(), "1500.00 KES");
    assert_eq!(
        engine.members("amina", group.id).await.unwrap()[0].contributed_minor,
        150_000
    );
    assert_eq!(engine.wallet("amina", kes.id).await.unwrap().balance, 1_300_000);
}

#[tokio::test]
async fn only_members_contribute_in_the_group_currency() {
    let (engine, _db) = engine_with_db().await;
    engine.initialize_wallets("amina").await.unwrap();
    let baraka = engine.initialize_wallets("baraka").await.unwrap();
    let group = engine
        .create_group("amina", "Chama", None, Currency::Kes, None)
        .await
        .unwrap();

    let outsider = engine
        .contribute(ContributionCmd {
            user_id: "baraka".to_string(),
            group_id: group.id,
            from_wallet_id: wallet_for(&baraka, Currency::Kes).id,
            amount: "10.00".to_string(),
            description: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(outsider, EngineError::Forbidden(_)));

    engine.join_group("baraka", group.id).await.unwrap();
    let twice = engine.join_group("baraka", group.id).await.unwrap_err();
    assert!(matches!(twice, EngineError::ExistingKey(_)));

    let wrong_currency = engine
        .contribute(ContributionCmd {
            user_id: "baraka".to_string(),
            group_id: group.id,
            from_wallet_id: wallet_for(&baraka, Currency::Credits).id,
            amount: "10.00".to_string(),
            description: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(wrong_currency, EngineError::CurrencyMismatch(_)));

    let too_much = engine
        .contribute(ContributionCmd {
            user_id: "baraka".to_string(),
            group_id: group.id,
            from_wallet_id: wallet_for(&baraka, Currency::Kes).id,
            amount: "20000.00".to_string(),
            description: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(too_much, EngineError::InsufficientBalance(_)));
    assert_eq!(engine.groups("baraka").await.unwrap()[0].pool_minor, 0);
}

#[tokio::test]
async fn proposal_closes_on_strict_majority() {
    let (engine, db) = engine_with_db().await;
    add_user(&db, "chiku").await;
    add_user(&db, "dalia").await;

    let group = engine
        .create_group("amina", "Chama", None, Currency::Kes, None)
        .await
        .unwrap();
    for user in ["baraka", "chiku", "dalia"] {
        engine.join_group(user, group.id).await.unwrap();
    }

    let proposal = engine
        .create_proposal("amina", group.id, "Buy a water tank", "Shared tank", Some("8000"))
        .await
        .unwrap();
    assert_eq!(proposal.amount_minor, Some(800_000));

    let after_one = engine.vote("amina", proposal.id, true).await.unwrap();
    assert_eq!(after_one.votes_for, 1);
    // 2 of 4 is not a majority.
    let after_two = engine.vote("baraka", proposal.id, true).await.unwrap();
    assert_eq!(after_two.votes_for, 2);
    assert_eq!(after_two.status, ProposalStatus::Open);

    let dup = engine.vote("amina", proposal.id, false).await.unwrap_err();
    assert!(matches!(dup, EngineError::ExistingKey(_)));

    let approved = engine.vote("chiku", proposal.id, true).await.unwrap();
    assert_eq!(approved.status, ProposalStatus::Approved);

    let late = engine.vote("dalia", proposal.id, false).await.unwrap_err();
    assert!(matches!(late, EngineError::InvalidTransition(_)));

    let listed = engine.proposals("baraka", group.id).await.unwrap();
    assert_eq!(listed[0].status, ProposalStatus::Approved);

    let outsider = engine.proposals("zawadi", group.id).await.unwrap_err();
    assert!(matches!(outsider, EngineError::Forbidden(_)));
}

#[tokio::test]
async fn goals_track_progress_without_touching_wallets() {
    let (engine, _db) = engine_with_db().await;
    let wallets = engine.initialize_wallets("amina").await.unwrap();

    let later = engine
        .create_goal("amina", "Laptop", "60000", Currency::Kes, None)
        .await
        .unwrap();
    let sooner = engine
        .create_goal(
            "amina",
            "School fees",
            "20000.00",
            Currency::Kes,
            NaiveDate::from_ymd_opt(2027, 1, 5),
        )
        .await
        .unwrap();

    let goals = engine.goals("amina").await.unwrap();
    assert_eq!(goals[0].id, sooner.id);
    assert_eq!(goals[1].id, later.id);

    let updated = engine
        .update_goal_progress("amina", sooner.id, "5000.00")
        .await
        .unwrap();
    assert_eq!(updated.progress_percent(), 25);

    let negative = engine
        .update_goal_progress("amina", sooner.id, "-1")
        .await
        .unwrap_err();
    assert!(matches!(negative, EngineError::InvalidAmount(_)));

    let foreign = engine
        .update_goal_progress("baraka", sooner.id, "1")
        .await
        .unwrap_err();
    assert!(matches!(foreign, EngineError::KeyNotFound(_)));

    for wallet in engine.wallets("amina").await.unwrap() {
        let seeded = wallet_for(&wallets, wallet.currency);
        assert_eq!(wallet.balance, seeded.balance);
    }
}

#[tokio::test]
async fn coaching_log_is_per_user_and_newest_first() {
    let (engine, _db) = engine_with_db().await;

    engine
        .log_coaching_session("amina", "How do I save?", "Start small.", "savings", "en")
        .await
        .unwrap();
    engine
        .log_coaching_session("amina", "Nitaokoaje?", "Anza kidogo.", "savings", "sw")
        .await
        .unwrap();

    let sessions = engine.coaching_sessions("amina", 10).await.unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].language, "sw");
    assert!(engine.coaching_sessions("baraka", 10).await.unwrap().is_empty());

    let blank = engine
        .log_coaching_session("amina", "  ", "-", "savings", "en")
        .await
        .unwrap_err();
    assert!(matches!(blank, EngineError::InvalidAmount(_)));
}
