//! Request and offer lifecycle tests: role gates, edit windows, and
//! the full relief cycle from posting a request to confirming delivery.

use std::sync::Arc;

use aidlink::client::ReliefClient;
use aidlink::core::error::ErrorKind;
use aidlink::entity::matching::MatchStatus;
use aidlink::entity::offer::{OfferStatus, UpdateOfferInput};
use aidlink::entity::request::{RequestStatus, UpdateRequestInput};
use aidlink::realtime::MemoryTransport;
use aidlink::Session;

use crate::helpers::{
    food_offer_input, food_request_input, ngo_session, victim_session, MockGateway,
};

fn client_for(backend: &Arc<MockGateway>, session: Session) -> ReliefClient {
    let gateway = backend.for_user(&session);
    ReliefClient::new(gateway, Arc::new(MemoryTransport::new(16)), session)
}

#[tokio::test]
async fn victim_request_crud_lifecycle() {
    let backend = MockGateway::new();
    let victim = client_for(&backend, victim_session());

    let request = victim
        .requests
        .create_request(&food_request_input())
        .await
        .expect("create request");
    assert_eq!(request.status, RequestStatus::Pending);
    assert_eq!(victim.requests.requests().await.len(), 1);

    let updated = victim
        .requests
        .update_request(
            request.id,
            &UpdateRequestInput {
                description: Some("Rice, water, and baby formula".to_string()),
                quantity: Some(6),
                ..Default::default()
            },
        )
        .await
        .expect("update request");
    assert_eq!(updated.quantity, 6);
    assert_eq!(updated.description, "Rice, water, and baby formula");

    let cancelled = victim
        .requests
        .cancel_request(request.id)
        .await
        .expect("cancel request");
    assert_eq!(cancelled.status, RequestStatus::Cancelled);

    let err = victim
        .requests
        .update_request(
            request.id,
            &UpdateRequestInput {
                quantity: Some(2),
                ..Default::default()
            },
        )
        .await
        .expect_err("cancelled request must not be editable");
    assert_eq!(err.kind, ErrorKind::Transition);

    victim
        .requests
        .delete_request(request.id)
        .await
        .expect("delete request");
    assert!(victim.requests.requests().await.is_empty());
}

#[tokio::test]
async fn role_gates_refuse_the_wrong_caller() {
    let backend = MockGateway::new();
    let victim = client_for(&backend, victim_session());
    let ngo = client_for(&backend, ngo_session());

    let err = ngo
        .requests
        .fetch_requests()
        .await
        .expect_err("NGO must not read the request board");
    assert_eq!(err.kind, ErrorKind::Authorization);
    assert_eq!(err.message, "Access denied. Only victims can view requests.");

    let err = ngo
        .requests
        .create_request(&food_request_input())
        .await
        .expect_err("NGO must not post requests");
    assert_eq!(err.kind, ErrorKind::Authorization);

    let err = victim
        .offers
        .fetch_offers()
        .await
        .expect_err("victim must not read the offer board");
    assert_eq!(err.kind, ErrorKind::Authorization);
    assert_eq!(err.message, "Access denied. Only NGOs can manage offers.");

    let err = victim
        .offers
        .create_offer(&food_offer_input(38.26, 140.87))
        .await
        .expect_err("victim must not post offers");
    assert_eq!(err.kind, ErrorKind::Authorization);
}

#[tokio::test]
async fn offer_edit_window_closes_after_match() {
    let backend = MockGateway::new();
    let victim = client_for(&backend, victim_session());
    let ngo = client_for(&backend, ngo_session());

    let offer = ngo
        .offers
        .create_offer(&food_offer_input(38.26, 140.87))
        .await
        .expect("create offer");
    let request = victim
        .requests
        .create_request(&food_request_input())
        .await
        .expect("create request");

    let edited = ngo
        .offers
        .update_offer(
            offer.id,
            &UpdateOfferInput {
                quantity: Some(80),
                ..Default::default()
            },
        )
        .await
        .expect("pending offer is editable");
    assert_eq!(edited.quantity, 80);

    ngo.matches
        .create_match(request.id, offer.id)
        .await
        .expect("create match");
    ngo.offers.fetch_offers().await.expect("refresh offers");

    let err = ngo
        .offers
        .update_offer(
            offer.id,
            &UpdateOfferInput {
                quantity: Some(10),
                ..Default::default()
            },
        )
        .await
        .expect_err("matched offer must not be editable");
    assert_eq!(err.kind, ErrorKind::Transition);
}

#[tokio::test]
async fn fulfill_refuses_a_request_that_was_never_accepted() {
    let backend = MockGateway::new();
    let victim = client_for(&backend, victim_session());

    let request = victim
        .requests
        .create_request(&food_request_input())
        .await
        .expect("create request");

    let err = victim
        .requests
        .fulfill_request(request.id)
        .await
        .expect_err("pending request cannot be fulfilled");
    assert_eq!(err.kind, ErrorKind::Transition);
}

#[tokio::test]
async fn full_relief_cycle_reaches_fulfilled_everywhere() {
    let backend = MockGateway::new();
    let victim = client_for(&backend, victim_session());
    let ngo = client_for(&backend, ngo_session());

    let offer = ngo
        .offers
        .create_offer(&food_offer_input(38.27, 140.88))
        .await
        .expect("create offer");
    let request = victim
        .requests
        .create_request(&food_request_input())
        .await
        .expect("create request");

    let accepted = victim
        .requests
        .accept_offer(request.id, offer.id)
        .await
        .expect("accept offer");
    assert_eq!(accepted.status, RequestStatus::Accepted);
    // The offer stays committed until the delivery is confirmed.
    assert_eq!(backend.offer_status(offer.id).await, OfferStatus::Matched);

    let fulfilled = victim
        .requests
        .fulfill_request(request.id)
        .await
        .expect("fulfill request");
    assert_eq!(fulfilled.status, RequestStatus::Fulfilled);
    assert_eq!(backend.offer_status(offer.id).await, OfferStatus::Fulfilled);

    let matches = victim
        .requests
        .matches_for(request.id)
        .await
        .expect("list matches");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].status, MatchStatus::Fulfilled);
}

#[tokio::test]
async fn accepted_request_cannot_be_cancelled() {
    let backend = MockGateway::new();
    let victim = client_for(&backend, victim_session());
    let ngo = client_for(&backend, ngo_session());

    let offer = ngo
        .offers
        .create_offer(&food_offer_input(38.27, 140.88))
        .await
        .expect("create offer");
    let request = victim
        .requests
        .create_request(&food_request_input())
        .await
        .expect("create request");
    victim
        .requests
        .accept_offer(request.id, offer.id)
        .await
        .expect("accept offer");

    let err = victim
        .requests
        .cancel_request(request.id)
        .await
        .expect_err("accepted request must not be cancellable");
    assert_eq!(err.kind, ErrorKind::Transition);
}

#[tokio::test]
async fn offer_expiry_applies_only_while_pending() {
    let backend = MockGateway::new();
    let victim = client_for(&backend, victim_session());
    let ngo = client_for(&backend, ngo_session());

    let stale = ngo
        .offers
        .create_offer(&food_offer_input(38.20, 140.80))
        .await
        .expect("create offer");
    let expired = ngo.offers.expire_offer(stale.id).await.expect("expire");
    assert_eq!(expired.status, OfferStatus::Expired);

    let committed = ngo
        .offers
        .create_offer(&food_offer_input(38.27, 140.88))
        .await
        .expect("create offer");
    let request = victim
        .requests
        .create_request(&food_request_input())
        .await
        .expect("create request");
    ngo.matches
        .create_match(request.id, committed.id)
        .await
        .expect("create match");
    ngo.offers.fetch_offers().await.expect("refresh offers");

    let err = ngo
        .offers
        .expire_offer(committed.id)
        .await
        .expect_err("matched offer must not expire");
    assert_eq!(err.kind, ErrorKind::Transition);
}

#[tokio::test]
async fn sync_primes_the_stores_for_each_role() {
    let backend = MockGateway::new();
    let victim = client_for(&backend, victim_session());
    let ngo = client_for(&backend, ngo_session());

    victim
        .requests
        .create_request(&food_request_input())
        .await
        .expect("create request");
    ngo.offers
        .create_offer(&food_offer_input(38.26, 140.87))
        .await
        .expect("create offer");

    // Fresh clients for the same users, empty until synced.
    let victim_again = client_for(&backend, victim.session().clone());
    let ngo_again = client_for(&backend, ngo.session().clone());
    assert!(victim_again.requests.requests().await.is_empty());

    victim_again.sync().await.expect("victim sync");
    ngo_again.sync().await.expect("ngo sync");

    assert_eq!(victim_again.requests.requests().await.len(), 1);
    assert_eq!(ngo_again.offers.offers().await.len(), 1);
}
