//! Notification Pipeline Tests
//!
//! Notifications enter through the processor exactly as the database listener
//! delivers them and leave as HTTP posts to a mock webhook host.
//!
//! Run with: cargo test -p integration-tests --test notification_tests

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use integration_tests::{ban_of, session_of, wait_until, MockWebhook, Pipeline, SERVER_ID};
use relay_core::{NotificationHandler, BAN_NOTIFICATION_CHANNEL, UNBAN_NOTIFICATION_CHANNEL};
use relay_service::{BAN_COLOR, UNBAN_COLOR};
use uuid::Uuid;

const WAIT: Duration = Duration::from_secs(5);

fn ban_payload(ban_id: i32, server_id: Option<i32>) -> String {
    match server_id {
        Some(server_id) => format!(r#"{{"ban_id":{ban_id},"server_id":{server_id}}}"#),
        None => format!(r#"{{"ban_id":{ban_id}}}"#),
    }
}

fn unban_payload(unban_id: i32) -> String {
    format!(r#"{{"unban_id":{unban_id}}}"#)
}

// ============================================================================
// Ban Notifications
// ============================================================================

#[tokio::test]
async fn test_ban_kicks_session_and_posts_webhook() {
    let host = MockWebhook::start().await.unwrap();
    let pipeline = Pipeline::start(&host.url(555)).await;

    let admin = pipeline.players.add("GameMaster", None);
    let player = pipeline.players.add("Urist", None);
    let mut ban = ban_of(player, "Self-antagging");
    ban.banning_admin = Some(admin);
    let ban_id = ban.id;
    pipeline.bans.insert(ban);

    let address = IpAddr::V4(Ipv4Addr::new(10, 1, 1, 1));
    pipeline.sessions.connect(session_of(player, "Urist", address));
    let mut kicks = pipeline.sessions.subscribe();

    pipeline
        .processor
        .on_notification(BAN_NOTIFICATION_CHANNEL, &ban_payload(ban_id, Some(99)));

    let kick = tokio::time::timeout(WAIT, kicks.recv())
        .await
        .expect("kick not published")
        .unwrap();
    assert_eq!(kick.user_id, player);
    assert!(kick.reason.contains("Self-antagging"));
    assert!(pipeline.sessions.get(player).is_none());

    assert!(wait_until(WAIT, || host.posts().len() == 1).await);
    let post = &host.posts()[0];
    assert_eq!(post.id, "555");
    assert_eq!(post.token, "test-token");
    assert_eq!(post.query.as_deref(), Some("wait=true"));
    assert_eq!(post.payload.username, "GameMaster");

    let embed = &post.payload.embeds[0];
    assert_eq!(embed.title, "Urist");
    assert_eq!(embed.description, "Self-antagging");
    assert_eq!(embed.color, BAN_COLOR);
    assert!(embed.footer.text.ends_with("(round 12)"));

    pipeline.finish().await;
}

#[tokio::test]
async fn test_ban_from_this_server_is_skipped() {
    let host = MockWebhook::start().await.unwrap();
    let pipeline = Pipeline::start(&host.url(1)).await;

    let player = Uuid::new_v4();
    let ban = ban_of(player, "griefing");
    let ban_id = ban.id;
    pipeline.bans.insert(ban);
    pipeline
        .sessions
        .connect(session_of(player, "Urist", IpAddr::V4(Ipv4Addr::LOCALHOST)));

    pipeline
        .processor
        .on_notification(BAN_NOTIFICATION_CHANNEL, &ban_payload(ban_id, Some(SERVER_ID)));

    let bans = pipeline.bans.clone();
    let sessions = pipeline.sessions.clone();
    pipeline.finish().await;

    assert_eq!(bans.lookups(), 0);
    assert!(sessions.get(player).is_some());
    assert!(host.posts().is_empty());
}

#[tokio::test]
async fn test_ban_without_server_id_is_processed() {
    let host = MockWebhook::start().await.unwrap();
    let pipeline = Pipeline::start(&host.url(2)).await;

    let ban = ban_of(Uuid::new_v4(), "chat filter");
    let ban_id = ban.id;
    pipeline.bans.insert(ban);

    pipeline
        .processor
        .on_notification(BAN_NOTIFICATION_CHANNEL, &ban_payload(ban_id, None));
    pipeline.finish().await;

    assert_eq!(host.posts().len(), 1);
}

#[tokio::test]
async fn test_missing_ban_makes_no_request() {
    let host = MockWebhook::start().await.unwrap();
    let pipeline = Pipeline::start(&host.url(3)).await;

    pipeline
        .processor
        .on_notification(BAN_NOTIFICATION_CHANNEL, &ban_payload(404_404, Some(99)));

    let bans = pipeline.bans.clone();
    pipeline.finish().await;

    assert_eq!(bans.lookups(), 1);
    assert!(host.posts().is_empty());
}

#[tokio::test]
async fn test_unknown_names_use_placeholders() {
    let host = MockWebhook::start().await.unwrap();
    let pipeline = Pipeline::start(&host.url(4)).await;

    let mut ban = ban_of(Uuid::new_v4(), "ban evasion");
    ban.banning_admin = Some(Uuid::new_v4());
    let ban_id = ban.id;
    pipeline.bans.insert(ban);

    pipeline
        .processor
        .on_notification(BAN_NOTIFICATION_CHANNEL, &ban_payload(ban_id, Some(99)));
    pipeline.finish().await;

    let posts = host.posts();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].payload.username, "АДМИН");
    assert_eq!(posts[0].payload.embeds[0].title, "ИГРОК");
}

#[tokio::test]
async fn test_expired_ban_posts_without_kicking() {
    let host = MockWebhook::start().await.unwrap();
    let pipeline = Pipeline::start(&host.url(5)).await;

    let player = Uuid::new_v4();
    let mut ban = ban_of(player, "old news");
    ban.expires_at = Some(ban.banned_at - chrono::Duration::minutes(1));
    let ban_id = ban.id;
    pipeline.bans.insert(ban);
    pipeline
        .sessions
        .connect(session_of(player, "Urist", IpAddr::V4(Ipv4Addr::LOCALHOST)));

    pipeline
        .processor
        .on_notification(BAN_NOTIFICATION_CHANNEL, &ban_payload(ban_id, None));

    let sessions = pipeline.sessions.clone();
    pipeline.finish().await;

    assert!(sessions.get(player).is_some());
    assert_eq!(host.posts().len(), 1);
}

// ============================================================================
// Unban Notifications
// ============================================================================

#[tokio::test]
async fn test_unban_posts_with_unbanning_admin() {
    let host = MockWebhook::start().await.unwrap();
    let pipeline = Pipeline::start(&host.url(6)).await;

    let banning = pipeline.players.add("Strict", None);
    let lifting = pipeline.players.add("Lenient", None);
    let player = pipeline.players.add("Urist", None);

    let mut ban = ban_of(player, "misunderstanding");
    ban.banning_admin = Some(banning);
    let ban_id = ban.id;
    pipeline.bans.insert(ban);
    let unban = pipeline.bans.lift(ban_id, Some(lifting));

    pipeline
        .processor
        .on_notification(UNBAN_NOTIFICATION_CHANNEL, &unban_payload(unban.id));
    pipeline.finish().await;

    let posts = host.posts();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].payload.username, "Lenient");
    assert_eq!(posts[0].payload.embeds[0].title, "Urist");
    assert_eq!(posts[0].payload.embeds[0].color, UNBAN_COLOR);
}

#[tokio::test]
async fn test_missing_unban_makes_no_request() {
    let host = MockWebhook::start().await.unwrap();
    let pipeline = Pipeline::start(&host.url(7)).await;

    pipeline
        .processor
        .on_notification(UNBAN_NOTIFICATION_CHANNEL, &unban_payload(77_777));
    pipeline.finish().await;

    assert!(host.posts().is_empty());
}

// ============================================================================
// Delivery
// ============================================================================

#[tokio::test]
async fn test_rejected_post_is_not_retried() {
    let host = MockWebhook::start().await.unwrap();
    host.respond_with(500);
    let pipeline = Pipeline::start(&host.url(8)).await;

    let ban = ban_of(Uuid::new_v4(), "griefing");
    let ban_id = ban.id;
    pipeline.bans.insert(ban);

    pipeline
        .processor
        .on_notification(BAN_NOTIFICATION_CHANNEL, &ban_payload(ban_id, None));
    pipeline.finish().await;

    assert_eq!(host.posts().len(), 1);
}

#[tokio::test]
async fn test_descriptor_is_fetched_on_configuration() {
    let host = MockWebhook::start().await.unwrap();
    let pipeline = Pipeline::start(&host.url(9)).await;

    assert_eq!(host.descriptor_fetches(), 1);
    assert_eq!(pipeline.webhook.current_url(), host.url(9));

    pipeline.finish().await;
}

#[tokio::test]
async fn test_no_webhook_configured() {
    let host = MockWebhook::start().await.unwrap();
    let pipeline = Pipeline::start("").await;

    let player = Uuid::new_v4();
    let ban = ban_of(player, "griefing");
    let ban_id = ban.id;
    pipeline.bans.insert(ban);
    pipeline
        .sessions
        .connect(session_of(player, "Urist", IpAddr::V4(Ipv4Addr::LOCALHOST)));

    pipeline
        .processor
        .on_notification(BAN_NOTIFICATION_CHANNEL, &ban_payload(ban_id, None));

    let sessions = pipeline.sessions.clone();
    pipeline.finish().await;

    // Kicking does not depend on the webhook
    assert!(sessions.get(player).is_none());
    assert!(host.posts().is_empty());
    assert_eq!(host.descriptor_fetches(), 0);
}

// ============================================================================
// Rate Limiting and Parsing
// ============================================================================

#[tokio::test]
async fn test_rate_limit_drops_excess_notifications() {
    let host = MockWebhook::start().await.unwrap();
    let pipeline = Pipeline::start_with_limits(&host.url(10), 2, 1).await;

    let mut ids = Vec::new();
    for _ in 0..4 {
        let ban = ban_of(Uuid::new_v4(), "spam");
        ids.push(ban.id);
        pipeline.bans.insert(ban);
    }

    for id in &ids[..3] {
        pipeline
            .processor
            .on_notification(BAN_NOTIFICATION_CHANNEL, &ban_payload(*id, None));
    }

    // Unbans are limited separately
    let unban = pipeline.bans.lift(ids[0], None);
    pipeline
        .processor
        .on_notification(UNBAN_NOTIFICATION_CHANNEL, &unban_payload(unban.id));

    // A new window admits again
    pipeline.advance(Duration::from_secs(60));
    pipeline
        .processor
        .on_notification(BAN_NOTIFICATION_CHANNEL, &ban_payload(ids[3], None));

    let bans = pipeline.bans.clone();
    pipeline.finish().await;

    // 2 bans, 1 unban (two lookups) and 1 ban after the reset
    assert_eq!(bans.lookups(), 5);
    assert_eq!(host.posts().len(), 4);
}

#[tokio::test]
async fn test_malformed_notifications_are_ignored() {
    let host = MockWebhook::start().await.unwrap();
    let pipeline = Pipeline::start(&host.url(11)).await;

    pipeline
        .processor
        .on_notification(BAN_NOTIFICATION_CHANNEL, "not json");
    pipeline
        .processor
        .on_notification(UNBAN_NOTIFICATION_CHANNEL, r#"{"ban_id":1}"#);
    pipeline
        .processor
        .on_notification("round_notification", r#"{"ban_id":1}"#);

    let bans = pipeline.bans.clone();
    pipeline.finish().await;

    assert_eq!(bans.lookups(), 0);
    assert!(host.posts().is_empty());
}
