//! Full Relay Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Environment variable: DATABASE_URL
//!
//! A ban inserted into the database travels through the notify trigger, the
//! listener and the processor before reaching the mock webhook host.
//!
//! Run with: cargo test -p integration-tests --test relay_tests

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use chrono::Utc;
use integration_tests::{session_of, test_config, test_database_url, wait_until, MockWebhook};
use relay_core::{BanRepository, NewBan, NoteSeverity};
use relay_db::{PgBanRepository, PgPool};
use relay_server::start_relay;
use uuid::Uuid;

const WAIT: Duration = Duration::from_secs(10);

fn new_ban(user_id: Uuid, reason: &str) -> NewBan {
    NewBan {
        user_id: Some(user_id),
        address: None,
        hwid: None,
        round_id: None,
        expires_at: Some(Utc::now() + chrono::Duration::hours(1)),
        reason: reason.to_string(),
        severity: NoteSeverity::Medium,
        banning_admin: None,
    }
}

#[tokio::test]
async fn test_database_ban_reaches_webhook() {
    let Some(database_url) = test_database_url() else {
        return;
    };

    let host = MockWebhook::start().await.unwrap();
    let mut config = test_config(&database_url).unwrap();
    config.database.run_migrations = true;
    config.webhook.url = host.url(4242);
    config.notifications.reconnect_delay_ms = 100;

    let runtime = start_relay(config).await.expect("relay failed to start");
    assert!(wait_until(WAIT, || host.descriptor_fetches() == 1).await);

    let player = Uuid::new_v4();
    runtime.state.sessions().connect(session_of(
        player,
        "Urist",
        IpAddr::V4(Ipv4Addr::new(10, 9, 8, 7)),
    ));

    // Give the listener time to issue LISTEN
    tokio::time::sleep(Duration::from_millis(500)).await;

    let pool = PgPool::connect(&database_url).await.unwrap();
    let bans = PgBanRepository::new(pool);
    let reason = format!("relay test {}", Uuid::new_v4());
    bans.create_ban(&new_ban(player, &reason)).await.unwrap();

    assert!(
        wait_until(WAIT, || host
            .posts()
            .iter()
            .any(|p| p.payload.embeds[0].description == reason))
        .await,
        "webhook post not received"
    );
    assert!(runtime.state.sessions().get(player).is_none());

    runtime.shutdown().await;
}

#[tokio::test]
async fn test_relay_shuts_down_cleanly() {
    let Some(database_url) = test_database_url() else {
        return;
    };

    let mut config = test_config(&database_url).unwrap();
    config.database.run_migrations = true;

    let runtime = start_relay(config).await.expect("relay failed to start");
    tokio::time::timeout(WAIT, runtime.shutdown())
        .await
        .expect("shutdown hung");
}
