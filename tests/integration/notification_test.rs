//! Inbox tests: read-state bookkeeping plus the three push shapes the
//! notification store understands (single, bundled alert, dispatch).

use std::sync::Arc;

use chrono::Utc;

use aidlink::client::ReliefClient;
use aidlink::core::events::{EventEnvelope, EventKind};
use aidlink::core::types::{NotificationId, UserId};
use aidlink::entity::notification::{Notification, NotificationKind};
use aidlink::realtime::MemoryTransport;
use aidlink::Session;

use crate::helpers::{envelope_for, settle, victim_session, MockGateway};

fn client_on(
    backend: &Arc<MockGateway>,
    bus: &Arc<MemoryTransport>,
    session: Session,
) -> ReliefClient {
    ReliefClient::new(backend.for_user(&session), bus.clone(), session)
}

fn pushed_notification(user_id: UserId, title: &str) -> Notification {
    Notification {
        id: NotificationId::new(),
        user_id,
        kind: NotificationKind::Generic,
        title: title.to_string(),
        message: format!("{title} body"),
        link: None,
        read: false,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn inbox_read_state_round_trip() {
    let backend = MockGateway::new();
    let session = victim_session();
    let client = client_on(&backend, &Arc::new(MemoryTransport::new(16)), session.clone());

    let first = backend.seed_notification(&session, "Match proposed").await;
    backend.seed_notification(&session, "Offer nearby").await;
    backend.seed_notification(&session, "Shelter update").await;

    let inbox = client
        .notifications
        .fetch_notifications()
        .await
        .expect("fetch inbox");
    assert_eq!(inbox.len(), 3);
    assert_eq!(client.notifications.unread_count().await, 3);

    let read = client
        .notifications
        .mark_read(first.id)
        .await
        .expect("mark read");
    assert!(read.read);
    assert_eq!(client.notifications.unread_count().await, 2);

    let affected = client
        .notifications
        .mark_all_read()
        .await
        .expect("mark all read");
    assert_eq!(affected, 2);
    assert_eq!(client.notifications.unread_count().await, 0);

    client
        .notifications
        .delete_notification(first.id)
        .await
        .expect("delete");
    assert_eq!(client.notifications.notifications().await.len(), 2);
}

#[tokio::test]
async fn pushed_notification_is_inserted_once() {
    let backend = MockGateway::new();
    let bus = Arc::new(MemoryTransport::new(16));
    let session = victim_session();
    let client = client_on(&backend, &bus, session.clone());
    client.start().await.expect("start");

    let incoming = pushed_notification(session.user_id, "Match proposed");
    bus.push(envelope_for(EventKind::Notification, &incoming));
    // A second delivery of the same notification under a fresh envelope
    // id gets past the transport dedup but not the store.
    bus.push(envelope_for(EventKind::Notification, &incoming));
    settle().await;

    let inbox = client.notifications.notifications().await;
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].id, incoming.id);
    assert!(inbox[0].is_unread());
}

#[tokio::test]
async fn system_alert_accepts_single_and_bundled_payloads() {
    let backend = MockGateway::new();
    let bus = Arc::new(MemoryTransport::new(16));
    let session = victim_session();
    let client = client_on(&backend, &bus, session.clone());
    client.start().await.expect("start");

    let mut single = pushed_notification(session.user_id, "Aftershock warning");
    single.kind = NotificationKind::SystemAlert;
    bus.push(envelope_for(EventKind::SystemAlert, &single));

    let mut a = pushed_notification(session.user_id, "Road closure");
    a.kind = NotificationKind::SystemAlert;
    let mut b = pushed_notification(session.user_id, "Water advisory");
    b.kind = NotificationKind::SystemAlert;
    let bundle = serde_json::to_value([a.clone(), b.clone()]).expect("encode bundle");
    bus.push(EventEnvelope::new(EventKind::SystemAlert, bundle));
    settle().await;

    let inbox = client.notifications.notifications().await;
    assert_eq!(inbox.len(), 3);
    assert_eq!(client.notifications.unread_count().await, 3);
}

#[tokio::test]
async fn emergency_dispatch_refetches_the_inbox() {
    let backend = MockGateway::new();
    let bus = Arc::new(MemoryTransport::new(16));
    let session = victim_session();
    let client = client_on(&backend, &bus, session.clone());
    client.start().await.expect("start");

    backend.seed_notification(&session, "Evacuate zone 3").await;
    backend.seed_notification(&session, "Supply drop at 14:00").await;
    assert!(client.notifications.notifications().await.is_empty());

    bus.push(EventEnvelope::new(
        EventKind::EmergencyDispatch,
        serde_json::json!({ "region": "tohoku" }),
    ));
    settle().await;

    assert_eq!(client.notifications.notifications().await.len(), 2);
}

#[tokio::test]
async fn unread_count_tracks_pushes_and_reads() {
    let backend = MockGateway::new();
    let bus = Arc::new(MemoryTransport::new(16));
    let session = victim_session();
    let client = client_on(&backend, &bus, session.clone());
    client.start().await.expect("start");
    assert_eq!(client.notifications.unread_count().await, 0);

    let seeded = backend.seed_notification(&session, "Match proposed").await;
    bus.push(envelope_for(EventKind::Notification, &seeded));
    settle().await;
    assert_eq!(client.notifications.unread_count().await, 1);

    client
        .notifications
        .mark_read(seeded.id)
        .await
        .expect("mark read");
    assert_eq!(client.notifications.unread_count().await, 0);
}
