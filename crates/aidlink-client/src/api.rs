//! The REST seam between stores and the coordination server.
//!
//! Stores never construct HTTP requests themselves; they call through
//! [`CoordinationApi`]. Production wires in [`crate::http::HttpGateway`],
//! tests wire in a mock with the same server-side semantics.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use validator::Validate;

use aidlink_core::AppResult;
use aidlink_core::types::{MatchId, NotificationId, OfferId, RequestId};
use aidlink_entity::matching::{Match, MatchCandidate};
use aidlink_entity::notification::Notification;
use aidlink_entity::offer::{CreateOfferInput, Offer, UpdateOfferInput};
use aidlink_entity::request::{CreateRequestInput, Request, UpdateRequestInput};
use aidlink_entity::user::{UserProfile, UserRole};

/// Credentials for `/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginInput {
    /// Account email.
    #[validate(email)]
    pub email: String,
    /// Account password.
    #[validate(length(min = 1))]
    pub password: String,
}

/// Payload for `/auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    /// Display name.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Account email.
    #[validate(email)]
    pub email: String,
    /// Account password.
    #[validate(length(min = 8))]
    pub password: String,
    /// Requested role.
    pub role: UserRole,
    /// Contact phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A bearer token plus the profile it authenticates, as returned by the
/// auth endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    /// Bearer token for subsequent requests.
    pub token: String,
    /// The authenticated profile.
    pub user: UserProfile,
}

/// Everything the coordination server can be asked to do.
///
/// One method per endpoint; inputs are validated before they leave the
/// store layer, and every response is the server's authoritative entity
/// snapshot.
#[async_trait]
pub trait CoordinationApi: Send + Sync + 'static {
    // -- auth --------------------------------------------------------

    /// Exchange credentials for a token and profile.
    async fn login(&self, input: &LoginInput) -> AppResult<AuthSession>;

    /// Create an account and log it in.
    async fn register(&self, input: &RegisterInput) -> AppResult<AuthSession>;

    /// The profile behind the current token.
    async fn current_user(&self) -> AppResult<UserProfile>;

    // -- requests ----------------------------------------------------

    /// All help requests owned by the current victim.
    async fn list_requests(&self) -> AppResult<Vec<Request>>;

    /// One help request by id.
    async fn get_request(&self, id: RequestId) -> AppResult<Request>;

    /// Create a help request.
    async fn create_request(&self, input: &CreateRequestInput) -> AppResult<Request>;

    /// Edit a help request.
    async fn update_request(
        &self,
        id: RequestId,
        input: &UpdateRequestInput,
    ) -> AppResult<Request>;

    /// Delete a help request outright.
    async fn delete_request(&self, id: RequestId) -> AppResult<()>;

    /// Withdraw a help request.
    async fn cancel_request(&self, id: RequestId) -> AppResult<Request>;

    // -- offers ------------------------------------------------------

    /// All resource offers owned by the current NGO.
    async fn list_offers(&self) -> AppResult<Vec<Offer>>;

    /// One resource offer by id.
    async fn get_offer(&self, id: OfferId) -> AppResult<Offer>;

    /// Create a resource offer.
    async fn create_offer(&self, input: &CreateOfferInput) -> AppResult<Offer>;

    /// Edit a resource offer.
    async fn update_offer(&self, id: OfferId, input: &UpdateOfferInput) -> AppResult<Offer>;

    /// Delete a resource offer outright.
    async fn delete_offer(&self, id: OfferId) -> AppResult<()>;

    /// Mark an offer as aged out.
    async fn expire_offer(&self, id: OfferId) -> AppResult<Offer>;

    /// Mark a matched offer as delivered.
    async fn fulfill_offer(&self, id: OfferId) -> AppResult<Offer>;

    // -- matching ----------------------------------------------------

    /// Candidate offers for a request, nearest first.
    async fn find_matches(&self, request_id: RequestId) -> AppResult<Vec<MatchCandidate>>;

    /// Record a match between a request and an offer.
    async fn create_match(&self, request_id: RequestId, offer_id: OfferId) -> AppResult<Match>;

    /// Accept a proposed match.
    async fn accept_match(&self, id: MatchId) -> AppResult<Match>;

    /// Decline a proposed match.
    async fn reject_match(&self, id: MatchId) -> AppResult<Match>;

    /// Mark an accepted match as delivered.
    async fn fulfill_match(&self, id: MatchId) -> AppResult<Match>;

    /// All matches recorded against one request.
    async fn matches_by_request(&self, request_id: RequestId) -> AppResult<Vec<Match>>;

    /// All matches recorded against one offer.
    async fn matches_by_offer(&self, offer_id: OfferId) -> AppResult<Vec<Match>>;

    /// All matches involving the current user.
    async fn my_matches(&self) -> AppResult<Vec<Match>>;

    // -- notifications -----------------------------------------------

    /// The current user's inbox, newest first.
    async fn list_notifications(&self) -> AppResult<Vec<Notification>>;

    /// Unread notifications only.
    async fn unread_notifications(&self) -> AppResult<Vec<Notification>>;

    /// Mark one notification as read.
    async fn mark_notification_read(&self, id: NotificationId) -> AppResult<Notification>;

    /// Mark the whole inbox as read. Returns how many were affected.
    async fn mark_all_notifications_read(&self) -> AppResult<u64>;

    /// Delete one notification.
    async fn delete_notification(&self, id: NotificationId) -> AppResult<()>;
}
