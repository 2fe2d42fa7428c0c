//! Matching tests: candidate ranking, pair idempotency, and the
//! accept/reject decisions a victim takes over proposed matches.

use std::sync::Arc;

use aidlink::client::ReliefClient;
use aidlink::entity::matching::MatchStatus;
use aidlink::entity::offer::OfferStatus;
use aidlink::entity::request::RequestStatus;
use aidlink::entity::resource::ResourceType;
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
async fn candidates_are_ranked_by_distance_and_filtered() {
    let backend = MockGateway::new();
    let victim = client_for(&backend, victim_session());
    let ngo = client_for(&backend, ngo_session());

    // Offers at increasing distance from the Sendai request site.
    let near = ngo
        .offers
        .create_offer(&food_offer_input(38.27, 140.88))
        .await
        .expect("near offer");
    let mid = ngo
        .offers
        .create_offer(&food_offer_input(38.90, 141.57))
        .await
        .expect("mid offer");
    let far = ngo
        .offers
        .create_offer(&food_offer_input(35.68, 139.65))
        .await
        .expect("far offer");

    // Wrong resource type never shows up.
    let mut blankets = food_offer_input(38.27, 140.88);
    blankets.resource_type = ResourceType::Shelter;
    ngo.offers
        .create_offer(&blankets)
        .await
        .expect("shelter offer");

    // Nor does an offer that already aged out.
    let stale = ngo
        .offers
        .create_offer(&food_offer_input(38.27, 140.88))
        .await
        .expect("stale offer");
    ngo.offers.expire_offer(stale.id).await.expect("expire");

    let request = victim
        .requests
        .create_request(&food_request_input())
        .await
        .expect("create request");

    let candidates = victim
        .matches
        .find_matches(request.id)
        .await
        .expect("find matches");
    let ids: Vec<_> = candidates.iter().map(|c| c.offer.id).collect();
    assert_eq!(ids, vec![near.id, mid.id, far.id]);

    let distances: Vec<f64> = candidates
        .iter()
        .map(|c| c.distance_km.expect("ranked candidates carry distance"))
        .collect();
    assert!(distances[0] < 5.0);
    assert!(distances[0] < distances[1]);
    assert!(distances[1] < distances[2]);
    assert!(distances[2] > 100.0);
}

#[tokio::test]
async fn create_match_is_idempotent_per_pair() {
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

    let first = ngo
        .matches
        .create_match(request.id, offer.id)
        .await
        .expect("first create");
    let second = ngo
        .matches
        .create_match(request.id, offer.id)
        .await
        .expect("second create");
    assert_eq!(first.id, second.id);

    let recorded = victim
        .requests
        .matches_for(request.id)
        .await
        .expect("list matches");
    assert_eq!(recorded.len(), 1);
    assert_eq!(backend.request_status(request.id).await, RequestStatus::Matched);
    assert_eq!(backend.offer_status(offer.id).await, OfferStatus::Matched);
}

#[tokio::test]
async fn accepting_a_match_moves_the_request_but_not_the_offer() {
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
    let m = ngo
        .matches
        .create_match(request.id, offer.id)
        .await
        .expect("create match");

    let accepted = victim.matches.accept_match(m.id).await.expect("accept");
    assert_eq!(accepted.status, MatchStatus::Accepted);
    assert_eq!(backend.request_status(request.id).await, RequestStatus::Accepted);
    assert_eq!(backend.offer_status(offer.id).await, OfferStatus::Matched);
}

#[tokio::test]
async fn rejecting_a_match_does_not_regress_the_request() {
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
    let m = ngo
        .matches
        .create_match(request.id, offer.id)
        .await
        .expect("create match");

    let rejected = victim.matches.reject_match(m.id).await.expect("reject");
    assert_eq!(rejected.status, MatchStatus::Rejected);
    assert_eq!(backend.request_status(request.id).await, RequestStatus::Matched);
    assert_eq!(backend.match_status(m.id).await, MatchStatus::Rejected);
}

#[tokio::test]
async fn declining_an_unmatched_candidate_records_the_pairing() {
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

    // No match exists yet; rejecting creates the pairing first so the
    // decline is on record.
    let rejected = victim
        .requests
        .reject_offer(request.id, offer.id)
        .await
        .expect("reject offer");
    assert_eq!(rejected.status, MatchStatus::Rejected);
    assert!(rejected.links(request.id, offer.id));
    assert_eq!(backend.request_status(request.id).await, RequestStatus::Matched);
}

#[tokio::test]
async fn match_stats_roll_up_by_status() {
    let backend = MockGateway::new();
    let victim = client_for(&backend, victim_session());
    let ngo = client_for(&backend, ngo_session());

    let request = victim
        .requests
        .create_request(&food_request_input())
        .await
        .expect("create request");
    let mut match_ids = Vec::new();
    for lon in [140.88, 141.00, 141.10] {
        let offer = ngo
            .offers
            .create_offer(&food_offer_input(38.27, lon))
            .await
            .expect("create offer");
        let m = ngo
            .matches
            .create_match(request.id, offer.id)
            .await
            .expect("create match");
        match_ids.push(m.id);
    }

    victim
        .matches
        .accept_match(match_ids[0])
        .await
        .expect("accept");
    victim
        .matches
        .reject_match(match_ids[1])
        .await
        .expect("reject");

    victim
        .matches
        .fetch_my_matches()
        .await
        .expect("fetch my matches");
    let stats = victim.matches.stats().await;
    assert_eq!(stats.total, 3);
    assert_eq!(stats.accepted, 1);
    assert_eq!(stats.rejected, 1);
    assert_eq!(stats.pending, 1);
    assert_eq!(stats.fulfilled, 0);
}
