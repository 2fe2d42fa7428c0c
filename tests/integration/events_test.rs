//! Push-channel tests: envelope dedup, snapshot merge ordering, and
//! the reconciler's handling of match events and divergent statuses.
//!
//! Clients in these tests share one [`MemoryTransport`] as the event
//! bus. Server-side state is mutated through raw gateway handles so no
//! client emits anything on its own; every envelope the pumps see is
//! pushed explicitly, which keeps the delivery order under test
//! control.

use std::sync::Arc;

use tokio::sync::broadcast::error::TryRecvError;

use aidlink::client::api::CoordinationApi;
use aidlink::client::ReliefClient;
use aidlink::core::error::ErrorKind;
use aidlink::core::events::{EventEnvelope, EventKind};
use aidlink::core::types::RequestId;
use aidlink::entity::matching::MatchStatus;
use aidlink::entity::offer::OfferStatus;
use aidlink::entity::request::{RequestStatus, UpdateRequestInput};
use aidlink::realtime::MemoryTransport;
use aidlink::Session;
use aidlink::Transport;

use crate::helpers::{
    envelope_for, food_offer_input, food_request_input, ngo_session, settle, victim_session,
    MockGateway,
};

fn client_on(
    backend: &Arc<MockGateway>,
    bus: &Arc<MemoryTransport>,
    session: Session,
) -> ReliefClient {
    ReliefClient::new(backend.for_user(&session), bus.clone(), session)
}

fn status_change<I: serde::Serialize, S: serde::Serialize>(
    event: EventKind,
    id: I,
    status: S,
) -> EventEnvelope {
    EventEnvelope::new(event, serde_json::json!({ "id": id, "status": status }))
}

#[tokio::test]
async fn start_and_shutdown_roundtrip() {
    let backend = MockGateway::new();
    let bus = Arc::new(MemoryTransport::new(16));
    let client = client_on(&backend, &bus, victim_session());

    client.start().await.expect("start");
    assert!(client.is_connected());
    assert!(bus.joined_rooms().contains(&client.session().user_room()));

    client.shutdown().await;
    assert!(!client.is_connected());
}

#[tokio::test]
async fn pushed_snapshot_lands_in_the_local_store() {
    let backend = MockGateway::new();
    let bus = Arc::new(MemoryTransport::new(16));
    let client = client_on(&backend, &bus, victim_session());
    client.start().await.expect("start");

    let server = backend.for_user(client.session());
    let request = server
        .create_request(&food_request_input())
        .await
        .expect("server create");
    assert!(client.requests.get(request.id).await.is_none());

    bus.push(envelope_for(EventKind::NewRequest, &request));
    settle().await;

    let held = client
        .requests
        .get(request.id)
        .await
        .expect("pushed request held locally");
    assert_eq!(held.description, request.description);
    assert_eq!(held.status, RequestStatus::Pending);
}

#[tokio::test]
async fn duplicate_envelopes_are_delivered_once() {
    let backend = MockGateway::new();
    let bus = Arc::new(MemoryTransport::new(16));
    let client = client_on(&backend, &bus, victim_session());
    client.start().await.expect("start");
    let mut rx = client.subscribe_all().await.expect("subscribe");

    let server = backend.for_user(client.session());
    let request = server
        .create_request(&food_request_input())
        .await
        .expect("server create");
    let envelope = envelope_for(EventKind::NewRequest, &request);

    bus.push(envelope.clone());
    bus.push(envelope);
    settle().await;

    assert!(rx.try_recv().is_ok());
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn stale_snapshots_never_regress_local_state() {
    let backend = MockGateway::new();
    let bus = Arc::new(MemoryTransport::new(16));
    let client = client_on(&backend, &bus, victim_session());
    client.start().await.expect("start");

    let server = backend.for_user(client.session());
    let request = server
        .create_request(&food_request_input())
        .await
        .expect("server create");
    bus.push(envelope_for(EventKind::NewRequest, &request));
    settle().await;

    // An older snapshot with different content is dropped on merge.
    let mut stale = request.clone();
    stale.description = "outdated description".to_string();
    stale.updated_at = request.updated_at - chrono::Duration::seconds(30);
    bus.push(envelope_for(EventKind::RequestUpdated, &stale));
    settle().await;
    let held = client.requests.get(request.id).await.expect("held");
    assert_eq!(held.description, request.description);

    // A strictly newer snapshot replaces it.
    let fresh = server
        .update_request(
            request.id,
            &UpdateRequestInput {
                description: Some("updated after the aftershock".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("server update");
    bus.push(envelope_for(EventKind::RequestUpdated, &fresh));
    settle().await;
    let held = client.requests.get(request.id).await.expect("held");
    assert_eq!(held.description, "updated after the aftershock");
}

#[tokio::test]
async fn emitted_mutation_reaches_the_peer_client() {
    let backend = MockGateway::new();
    let bus = Arc::new(MemoryTransport::new(16));
    let victim = client_on(&backend, &bus, victim_session());
    let ngo = client_on(&backend, &bus, ngo_session());
    victim.start().await.expect("start victim");
    ngo.start().await.expect("start ngo");

    let offer = ngo
        .offers
        .create_offer(&food_offer_input(38.27, 140.88))
        .await
        .expect("create offer");
    settle().await;

    // The store's post-mutation emit looped back through the bus and
    // landed in the other client's cache.
    let held = victim.offers.get(offer.id).await.expect("peer holds offer");
    assert_eq!(held.description, offer.description);
}

#[tokio::test]
async fn match_events_move_the_linked_aggregates() {
    let backend = MockGateway::new();
    let bus = Arc::new(MemoryTransport::new(16));
    let client = client_on(&backend, &bus, victim_session());
    client.start().await.expect("start");

    let server = backend.for_user(client.session());
    let ngo = backend.for_user(&ngo_session());
    let request = server
        .create_request(&food_request_input())
        .await
        .expect("server request");
    let offer = ngo
        .create_offer(&food_offer_input(38.27, 140.88))
        .await
        .expect("server offer");
    bus.push(envelope_for(EventKind::NewRequest, &request));
    bus.push(envelope_for(EventKind::NewOffer, &offer));

    let m = server
        .create_match(request.id, offer.id)
        .await
        .expect("server match");
    bus.push(envelope_for(EventKind::MatchCreated, &m));
    settle().await;

    let held = client.requests.get(request.id).await.expect("request held");
    assert_eq!(held.status, RequestStatus::Matched);
    let held = client.offers.get(offer.id).await.expect("offer held");
    assert_eq!(held.status, OfferStatus::Matched);

    let accepted = server.accept_match(m.id).await.expect("server accept");
    bus.push(envelope_for(EventKind::MatchAccepted, &accepted));
    settle().await;

    let held = client.requests.get(request.id).await.expect("request held");
    assert_eq!(held.status, RequestStatus::Accepted);
    // Acceptance commits the request; the offer stays matched.
    let held = client.offers.get(offer.id).await.expect("offer held");
    assert_eq!(held.status, OfferStatus::Matched);

    let fulfilled = server.fulfill_match(m.id).await.expect("server fulfill");
    bus.push(envelope_for(EventKind::MatchFulfilled, &fulfilled));
    settle().await;

    let held = client.requests.get(request.id).await.expect("request held");
    assert_eq!(held.status, RequestStatus::Fulfilled);
    let held = client.offers.get(offer.id).await.expect("offer held");
    assert_eq!(held.status, OfferStatus::Fulfilled);
    let held = client.matches.get(m.id).await.expect("match held");
    assert_eq!(held.status, MatchStatus::Fulfilled);
}

#[tokio::test]
async fn offer_fulfillment_cascades_to_accepted_matches() {
    let backend = MockGateway::new();
    let bus = Arc::new(MemoryTransport::new(16));
    let client = client_on(&backend, &bus, victim_session());
    client.start().await.expect("start");

    let server = backend.for_user(client.session());
    let ngo = backend.for_user(&ngo_session());
    let request = server
        .create_request(&food_request_input())
        .await
        .expect("server request");
    let offer = ngo
        .create_offer(&food_offer_input(38.27, 140.88))
        .await
        .expect("server offer");
    bus.push(envelope_for(EventKind::NewRequest, &request));
    bus.push(envelope_for(EventKind::NewOffer, &offer));

    let m = server
        .create_match(request.id, offer.id)
        .await
        .expect("server match");
    bus.push(envelope_for(EventKind::MatchCreated, &m));
    let accepted = server.accept_match(m.id).await.expect("server accept");
    bus.push(envelope_for(EventKind::MatchAccepted, &accepted));
    settle().await;

    // The delivery is confirmed offer-first; the backend pushes only
    // the offer event and leaves the rest to the clients.
    let delivered = ngo.fulfill_offer(offer.id).await.expect("server fulfill");
    bus.push(envelope_for(EventKind::OfferFulfilled, &delivered));
    settle().await;

    let held = client.offers.get(offer.id).await.expect("offer held");
    assert_eq!(held.status, OfferStatus::Fulfilled);
    let held = client.matches.get(m.id).await.expect("match held");
    assert_eq!(held.status, MatchStatus::Fulfilled);
    let held = client.requests.get(request.id).await.expect("request held");
    assert_eq!(held.status, RequestStatus::Fulfilled);
    // The cascade was local; the backend record never moved.
    assert_eq!(backend.match_status(m.id).await, MatchStatus::Accepted);
}

#[tokio::test]
async fn legal_status_push_applies_directly() {
    let backend = MockGateway::new();
    let bus = Arc::new(MemoryTransport::new(16));
    let client = client_on(&backend, &bus, victim_session());
    client.start().await.expect("start");

    let server = backend.for_user(client.session());
    let request = server
        .create_request(&food_request_input())
        .await
        .expect("server create");
    bus.push(envelope_for(EventKind::NewRequest, &request));
    settle().await;

    bus.push(status_change(
        EventKind::RequestStatusChanged,
        request.id,
        RequestStatus::Cancelled,
    ));
    settle().await;

    let held = client.requests.get(request.id).await.expect("held");
    assert_eq!(held.status, RequestStatus::Cancelled);
}

#[tokio::test]
async fn divergent_status_push_is_repaired_by_refetch() {
    let backend = MockGateway::new();
    let bus = Arc::new(MemoryTransport::new(16));
    let client = client_on(&backend, &bus, victim_session());
    client.start().await.expect("start");

    let server = backend.for_user(client.session());
    let ngo = backend.for_user(&ngo_session());
    let request = server
        .create_request(&food_request_input())
        .await
        .expect("server create");
    bus.push(envelope_for(EventKind::NewRequest, &request));
    settle().await;

    // The request advanced server-side while this client missed the
    // match events.
    let offer = ngo
        .create_offer(&food_offer_input(38.27, 140.88))
        .await
        .expect("server offer");
    let m = server
        .create_match(request.id, offer.id)
        .await
        .expect("server match");
    server.accept_match(m.id).await.expect("server accept");

    // A push the stale local copy cannot apply forces a refetch.
    bus.push(status_change(
        EventKind::RequestStatusChanged,
        request.id,
        RequestStatus::Fulfilled,
    ));
    settle().await;

    let held = client.requests.get(request.id).await.expect("held");
    assert_eq!(held.status, RequestStatus::Accepted);
}

#[tokio::test]
async fn status_push_for_an_unknown_entity_is_ignored() {
    let backend = MockGateway::new();
    let bus = Arc::new(MemoryTransport::new(16));
    let client = client_on(&backend, &bus, victim_session());
    client.start().await.expect("start");

    bus.push(status_change(
        EventKind::RequestStatusChanged,
        RequestId::new(),
        RequestStatus::Cancelled,
    ));
    settle().await;

    assert!(client.requests.requests().await.is_empty());
}

#[tokio::test]
async fn fulfilling_without_an_accepted_match_is_a_conflict() {
    let backend = MockGateway::new();
    let bus = Arc::new(MemoryTransport::new(16));
    let client = client_on(&backend, &bus, victim_session());
    client.start().await.expect("start");

    let server = backend.for_user(client.session());
    let request = server
        .create_request(&food_request_input())
        .await
        .expect("server create");
    bus.push(envelope_for(EventKind::NewRequest, &request));
    // Status pushes walk the local copy to accepted, but the backend
    // never recorded a match.
    bus.push(status_change(
        EventKind::RequestStatusChanged,
        request.id,
        RequestStatus::Matched,
    ));
    bus.push(status_change(
        EventKind::RequestStatusChanged,
        request.id,
        RequestStatus::Accepted,
    ));
    settle().await;

    let err = client
        .requests
        .fulfill_request(request.id)
        .await
        .expect_err("no accepted match exists");
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(err.message, "request has no accepted match to fulfill");
}
