//! End-to-end protocol properties over a real SQLite file
//!
//! Issue → stamp → replay / cooldown / full → redeem → reissue, plus the
//! concurrency guarantees of the replay guard and card store.

mod common;

use common::{T0, spawn_app, staff};
use punch_server::db::{cards, events};
use punch_server::{LoyaltyError, TokenSigner};
use shared::models::CardStatus;

#[tokio::test]
async fn stamp_replay_cooldown_scenario() {
    let app = spawn_app(5_000).await;
    app.publish("vendor", 10).await;
    let (issuer, engine) = (&app.state.issuer, &app.state.engine);

    let t1 = issuer.issue_at("vendor", "member", T0).await.unwrap();
    let r = engine.stamp_at(&staff("vendor"), &t1.token, T0).await.unwrap();
    assert_eq!(r.stamp_count, 1);

    let err = engine
        .stamp_at(&staff("vendor"), &t1.token, T0 + 100)
        .await
        .unwrap_err();
    assert!(matches!(err, LoyaltyError::TokenReplayed { .. }));

    let t2 = issuer.issue_at("vendor", "member", T0 + 1_000).await.unwrap();
    let err = engine
        .stamp_at(&staff("vendor"), &t2.token, T0 + 2_000)
        .await
        .unwrap_err();
    assert!(matches!(err, LoyaltyError::RateLimited { .. }));

    let t3 = issuer.issue_at("vendor", "member", T0 + 6_000).await.unwrap();
    let r = engine
        .stamp_at(&staff("vendor"), &t3.token, T0 + 6_000)
        .await
        .unwrap();
    assert_eq!(r.stamp_count, 2);

    // Rate-limited T2 was rolled back, T1 and T3 are consumed
    assert_eq!(app.token_use_count("vendor").await, 2);
}

#[tokio::test]
async fn full_card_then_redeem_with_same_token() {
    let app = spawn_app(5_000).await;
    app.publish("vendor", 3).await;
    let (issuer, engine) = (&app.state.issuer, &app.state.engine);

    let mut now = T0;
    for expected in 1..=3 {
        let t = issuer.issue_at("vendor", "member", now).await.unwrap();
        let r = engine.stamp_at(&staff("vendor"), &t.token, now).await.unwrap();
        assert_eq!(r.stamp_count, expected);
        now += 6_000;
    }

    let t = issuer.issue_at("vendor", "member", now).await.unwrap();
    let err = engine
        .stamp_at(&staff("vendor"), &t.token, now)
        .await
        .unwrap_err();
    assert!(matches!(err, LoyaltyError::CardFull { .. }));

    let outcome = engine
        .redeem_at(&staff("vendor"), &t.token, now + 1)
        .await
        .unwrap();
    assert_eq!(outcome.redeemed_card_id, t.card.card_id);
    let new_card = outcome.new_card.expect("program still active");
    assert_eq!(new_card.stamp_count, 0);
    assert_eq!(new_card.status, CardStatus::Active);

    let old = cards::find_progress(&app.state.db.pool, "vendor", t.card.card_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(old.status, CardStatus::Redeemed);
    assert_eq!(old.stamp_count, 3);

    let current = issuer.current_card("vendor", "member").await.unwrap().unwrap();
    assert_eq!(current.card_id, new_card.id);
    assert_eq!(issuer.card_history("vendor", "member").await.unwrap().len(), 2);
}

#[tokio::test]
async fn token_is_single_use_across_operations() {
    let app = spawn_app(0).await;
    app.publish("vendor", 1).await;
    let (issuer, engine) = (&app.state.issuer, &app.state.engine);

    let t1 = issuer.issue_at("vendor", "member", T0).await.unwrap();
    engine.stamp_at(&staff("vendor"), &t1.token, T0).await.unwrap();

    // Card is now eligible, but T1 is spent
    let err = engine
        .redeem_at(&staff("vendor"), &t1.token, T0 + 1)
        .await
        .unwrap_err();
    assert!(matches!(err, LoyaltyError::TokenReplayed { .. }));

    let t2 = issuer.issue_at("vendor", "member", T0 + 2).await.unwrap();
    engine.redeem_at(&staff("vendor"), &t2.token, T0 + 2).await.unwrap();
    let err = engine
        .stamp_at(&staff("vendor"), &t2.token, T0 + 3)
        .await
        .unwrap_err();
    assert!(matches!(err, LoyaltyError::TokenReplayed { .. }));
}

#[tokio::test]
async fn tenant_mismatch_leaves_no_claim() {
    let app = spawn_app(0).await;
    app.publish("vendor-a", 10).await;
    app.publish("vendor-b", 10).await;

    let t = app
        .state
        .issuer
        .issue_at("vendor-a", "member", T0)
        .await
        .unwrap();
    let err = app
        .state
        .engine
        .stamp_at(&staff("vendor-b"), &t.token, T0)
        .await
        .unwrap_err();
    assert!(matches!(err, LoyaltyError::TokenTenantMismatch { .. }));
    assert_eq!(app.token_use_count("vendor-a").await, 0);
    assert_eq!(app.token_use_count("vendor-b").await, 0);

    // Still good at its own tenant
    let r = app
        .state
        .engine
        .stamp_at(&staff("vendor-a"), &t.token, T0)
        .await
        .unwrap();
    assert_eq!(r.stamp_count, 1);
}

#[tokio::test]
async fn redeem_ineligible_card_is_unmodified() {
    let app = spawn_app(0).await;
    app.publish("vendor", 5).await;
    let (issuer, engine) = (&app.state.issuer, &app.state.engine);

    for i in 0..4 {
        let t = issuer.issue_at("vendor", "member", T0 + i).await.unwrap();
        engine.stamp_at(&staff("vendor"), &t.token, T0 + i).await.unwrap();
    }

    let t = issuer.issue_at("vendor", "member", T0 + 10).await.unwrap();
    let err = engine
        .redeem_at(&staff("vendor"), &t.token, T0 + 10)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LoyaltyError::CardNotEligible {
            stamp_count: 4,
            stamps_required: 5,
            ..
        }
    ));

    let card = cards::find_progress(&app.state.db.pool, "vendor", t.card.card_id)
        .await
        .unwrap()
        .unwrap();
    assert!(card.is_active());
    assert_eq!(card.stamp_count, 4);
    assert!(
        events::redemption_for_card(&app.state.db.pool, "vendor", card.card_id)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn redeem_without_active_program_reports_no_replacement() {
    let app = spawn_app(0).await;
    app.publish("vendor", 1).await;
    let (issuer, engine) = (&app.state.issuer, &app.state.engine);

    let t = issuer.issue_at("vendor", "member", T0).await.unwrap();
    engine.stamp_at(&staff("vendor"), &t.token, T0).await.unwrap();
    punch_server::db::programs::deactivate(&app.state.db.pool, "vendor")
        .await
        .unwrap();

    let t = issuer.issue_at("vendor", "member", T0 + 1).await.unwrap();
    let outcome = engine
        .redeem_at(&staff("vendor"), &t.token, T0 + 1)
        .await
        .unwrap();
    assert!(outcome.new_card.is_none());

    let err = issuer.issue_at("vendor", "member", T0 + 2).await.unwrap_err();
    assert!(matches!(err, LoyaltyError::NoActiveProgram { .. }));

    // A new program version lets the member start over
    app.publish("vendor", 8).await;
    let fresh = issuer.issue_at("vendor", "member", T0 + 3).await.unwrap();
    assert_eq!(fresh.card.stamp_count, 0);
    assert_eq!(fresh.card.stamps_required, 8);
}

#[tokio::test]
async fn stateless_rejections_leave_no_trace() {
    let app = spawn_app(0).await;
    app.publish("vendor", 5).await;
    let (issuer, engine) = (&app.state.issuer, &app.state.engine);
    let t = issuer.issue_at("vendor", "member", T0).await.unwrap();

    let err = engine
        .stamp_at(&staff("vendor"), &t.token, T0 + 30_001)
        .await
        .unwrap_err();
    assert!(matches!(err, LoyaltyError::TokenExpired));

    let err = engine
        .redeem_at(&staff("vendor"), "not-a-token", T0)
        .await
        .unwrap_err();
    assert!(matches!(err, LoyaltyError::TokenInvalid(_)));

    let forged = TokenSigner::new(b"some-other-secret-0123456789abcdef", 30)
        .mint("vendor", "member", t.card.card_id, "forged-jti", T0)
        .unwrap();
    let err = engine
        .stamp_at(&staff("vendor"), &forged, T0)
        .await
        .unwrap_err();
    assert!(matches!(err, LoyaltyError::TokenInvalid(_)));

    let mut disabled = staff("vendor");
    disabled.enabled = false;
    let err = engine
        .stamp_at(&disabled, &t.token, T0)
        .await
        .unwrap_err();
    assert!(matches!(err, LoyaltyError::StaffDisabled { .. }));

    assert_eq!(app.token_use_count("vendor").await, 0);
    let card = cards::find_progress(&app.state.db.pool, "vendor", t.card.card_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(card.stamp_count, 0);
    assert!(
        events::stamps_for_card(&app.state.db.pool, "vendor", card.card_id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn disabled_staff_cannot_stamp() {
    let app = spawn_app(0).await;
    app.publish("vendor", 5).await;
    let t = app
        .state
        .issuer
        .issue_at("vendor", "member", T0)
        .await
        .unwrap();

    let mut disabled = staff("vendor");
    disabled.enabled = false;
    let err = app
        .state
        .engine
        .stamp_at(&disabled, &t.token, T0)
        .await
        .unwrap_err();
    assert!(matches!(err, LoyaltyError::StaffDisabled { .. }));
    assert_eq!(app.token_use_count("vendor").await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_stamps_have_no_lost_updates() {
    const ATTEMPTS: usize = 12;
    const REQUIRED: i32 = 5;

    let app = spawn_app(0).await;
    app.publish("vendor", REQUIRED).await;

    let mut tokens = Vec::new();
    for i in 0..ATTEMPTS {
        let t = app
            .state
            .issuer
            .issue_at("vendor", "member", T0 + i as i64)
            .await
            .unwrap();
        tokens.push(t);
    }
    let card_id = tokens[0].card.card_id;
    assert!(tokens.iter().all(|t| t.card.card_id == card_id));

    let handles: Vec<_> = tokens
        .into_iter()
        .map(|t| {
            let engine = app.state.engine.clone();
            tokio::spawn(async move { engine.stamp_at(&staff("vendor"), &t.token, T0 + 100).await })
        })
        .collect();

    let results = futures::future::join_all(handles).await;
    let mut successes = 0;
    let mut full = 0;
    for result in results {
        match result.unwrap() {
            Ok(_) => successes += 1,
            Err(LoyaltyError::CardFull { .. }) => full += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(successes, REQUIRED as usize);
    assert_eq!(full, ATTEMPTS - REQUIRED as usize);

    let card = cards::find_progress(&app.state.db.pool, "vendor", card_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(card.stamp_count, REQUIRED);
    let stamps = events::stamps_for_card(&app.state.db.pool, "vendor", card_id)
        .await
        .unwrap();
    assert_eq!(stamps.len(), REQUIRED as usize);
    assert_eq!(app.token_use_count("vendor").await, REQUIRED as i64);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_presentations_of_one_token_consume_it_once() {
    let app = spawn_app(0).await;
    app.publish("vendor", 10).await;
    let t = app
        .state
        .issuer
        .issue_at("vendor", "member", T0)
        .await
        .unwrap();

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let engine = app.state.engine.clone();
            let token = t.token.clone();
            tokio::spawn(async move { engine.stamp_at(&staff("vendor"), &token, T0).await })
        })
        .collect();

    let mut successes = 0;
    for result in futures::future::join_all(handles).await {
        match result.unwrap() {
            Ok(_) => successes += 1,
            Err(LoyaltyError::TokenReplayed { .. }) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(successes, 1);

    let card = app
        .state
        .issuer
        .current_card("vendor", "member")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(card.stamp_count, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_issue_creates_one_card() {
    let app = spawn_app(0).await;
    app.publish("vendor", 10).await;

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let issuer = app.state.issuer.clone();
            tokio::spawn(async move { issuer.issue_at("vendor", "member", T0).await })
        })
        .collect();

    let mut ids = std::collections::HashSet::new();
    for result in futures::future::join_all(handles).await {
        ids.insert(result.unwrap().unwrap().card.card_id);
    }
    assert_eq!(ids.len(), 1);
    assert_eq!(
        app.state
            .issuer
            .card_history("vendor", "member")
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_stamps_respect_cooldown() {
    const ATTEMPTS: usize = 8;

    let app = spawn_app(5_000).await;
    app.publish("vendor", 10).await;

    let mut tokens = Vec::new();
    for i in 0..ATTEMPTS {
        let t = app
            .state
            .issuer
            .issue_at("vendor", "member", T0 + i as i64)
            .await
            .unwrap();
        tokens.push(t);
    }
    let card_id = tokens[0].card.card_id;

    let handles: Vec<_> = tokens
        .into_iter()
        .map(|t| {
            let engine = app.state.engine.clone();
            tokio::spawn(async move { engine.stamp_at(&staff("vendor"), &t.token, T0 + 100).await })
        })
        .collect();

    let mut successes = 0;
    let mut rate_limited = 0;
    for result in futures::future::join_all(handles).await {
        match result.unwrap() {
            Ok(_) => successes += 1,
            Err(LoyaltyError::RateLimited { .. }) => rate_limited += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(successes, 1);
    assert_eq!(rate_limited, ATTEMPTS - 1);

    let card = cards::find_progress(&app.state.db.pool, "vendor", card_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(card.stamp_count, 1);
    assert_eq!(app.token_use_count("vendor").await, 1);
}

#[tokio::test]
async fn card_activity_shows_audit_trail() {
    let app = spawn_app(0).await;
    app.publish("vendor", 2).await;
    let (issuer, engine) = (&app.state.issuer, &app.state.engine);

    let mut card_id = 0;
    for i in 0..2 {
        let t = issuer.issue_at("vendor", "member", T0 + i).await.unwrap();
        engine.stamp_at(&staff("vendor"), &t.token, T0 + i).await.unwrap();
        card_id = t.card.card_id;
    }
    let t = issuer.issue_at("vendor", "member", T0 + 10).await.unwrap();
    engine.redeem_at(&staff("vendor"), &t.token, T0 + 10).await.unwrap();

    let activity = issuer
        .card_activity("vendor", "member", card_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(activity.card.status, CardStatus::Redeemed);
    assert_eq!(activity.stamps.len(), 2);
    assert!(activity.stamps[0].created_at < activity.stamps[1].created_at);
    let redemption = activity.redemption.unwrap();
    assert_eq!(redemption.staff_id, "staff-1");
    assert_eq!(redemption.created_at, T0 + 10);

    // Another member's card is invisible
    assert!(
        issuer
            .card_activity("vendor", "someone-else", card_id)
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        issuer
            .card_activity("other-vendor", "member", card_id)
            .await
            .unwrap()
            .is_none()
    );
}
