//! `reqwest` implementation of the coordination server REST API.

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use aidlink_core::config::api::ApiConfig;
use aidlink_core::error::ErrorKind;
use aidlink_core::types::{ApiAck, ApiResponse, MatchId, NotificationId, OfferId, RequestId};
use aidlink_core::{AppError, AppResult};
use aidlink_entity::matching::{Match, MatchCandidate};
use aidlink_entity::notification::Notification;
use aidlink_entity::offer::{CreateOfferInput, Offer, UpdateOfferInput};
use aidlink_entity::request::{CreateRequestInput, Request, UpdateRequestInput};
use aidlink_entity::user::UserProfile;

use crate::api::{AuthSession, CoordinationApi, LoginInput, RegisterInput};

/// Body for match creation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateMatchBody {
    request_id: RequestId,
    offer_id: OfferId,
}

/// HTTP gateway to the coordination server.
///
/// Holds the base URL, a shared `reqwest` client, and the bearer token
/// of the logged-in session. All responses arrive wrapped in the
/// server's `{success, data, message}` envelope.
#[derive(Debug)]
pub struct HttpGateway {
    /// Shared HTTP client.
    http: reqwest::Client,
    /// API base URL without a trailing slash.
    base_url: String,
    /// Bearer token, absent until login.
    token: RwLock<Option<String>>,
}

impl HttpGateway {
    /// Build a gateway from configuration.
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    /// Install the bearer token used for subsequent requests.
    pub fn set_token(&self, token: impl Into<String>) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(token.into());
    }

    /// Drop the bearer token.
    pub fn clear_token(&self) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }

    fn bearer(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Issue a request and parse the enveloped response body.
    async fn execute<B, E>(&self, method: Method, path: &str, body: Option<&B>) -> AppResult<E>
    where
        B: Serialize + Sync,
        E: DeserializeOwned,
    {
        let mut builder = self.http.request(method.clone(), self.url(path));
        if let Some(token) = self.bearer() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            AppError::network(format!("{method} {path} failed before a response: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.status_error(status, path, response).await);
        }

        response
            .json::<E>()
            .await
            .map_err(|e| AppError::serialization(format!("Malformed response from {path}: {e}")))
    }

    /// Map an error status to an [`AppError`], preferring the server's
    /// own message when the body carries one.
    async fn status_error(
        &self,
        status: StatusCode,
        path: &str,
        response: reqwest::Response,
    ) -> AppError {
        let message = response
            .json::<ApiResponse<serde_json::Value>>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| format!("{path} answered {status}"));

        let kind = match status.as_u16() {
            400 | 422 => ErrorKind::Validation,
            401 => ErrorKind::Authentication,
            403 => ErrorKind::Authorization,
            404 => ErrorKind::NotFound,
            409 => ErrorKind::Conflict,
            502 | 503 | 504 => ErrorKind::ServiceUnavailable,
            _ => ErrorKind::Internal,
        };
        AppError::new(kind, message)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let envelope: ApiResponse<T> = self.execute::<(), _>(Method::GET, path, None).await?;
        envelope.into_result()
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<T> {
        let envelope: ApiResponse<T> = self.execute(Method::POST, path, Some(body)).await?;
        envelope.into_result()
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let envelope: ApiResponse<T> = self.execute::<(), _>(Method::POST, path, None).await?;
        envelope.into_result()
    }

    async fn put<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<T> {
        let envelope: ApiResponse<T> = self.execute(Method::PUT, path, Some(body)).await?;
        envelope.into_result()
    }

    async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let envelope: ApiResponse<T> = self.execute::<(), _>(Method::PUT, path, None).await?;
        envelope.into_result()
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        let ack: ApiAck = self.execute::<(), _>(Method::DELETE, path, None).await?;
        ack.into_result()
    }
}

#[async_trait]
impl CoordinationApi for HttpGateway {
    async fn login(&self, input: &LoginInput) -> AppResult<AuthSession> {
        let session: AuthSession = self.post("auth/login", input).await?;
        self.set_token(session.token.clone());
        Ok(session)
    }

    async fn register(&self, input: &RegisterInput) -> AppResult<AuthSession> {
        let session: AuthSession = self.post("auth/register", input).await?;
        self.set_token(session.token.clone());
        Ok(session)
    }

    async fn current_user(&self) -> AppResult<UserProfile> {
        self.get("auth/me").await
    }

    async fn list_requests(&self) -> AppResult<Vec<Request>> {
        self.get("requests").await
    }

    async fn get_request(&self, id: RequestId) -> AppResult<Request> {
        self.get(&format!("requests/{id}")).await
    }

    async fn create_request(&self, input: &CreateRequestInput) -> AppResult<Request> {
        self.post("requests", input).await
    }

    async fn update_request(
        &self,
        id: RequestId,
        input: &UpdateRequestInput,
    ) -> AppResult<Request> {
        self.put(&format!("requests/{id}"), input).await
    }

    async fn delete_request(&self, id: RequestId) -> AppResult<()> {
        self.delete(&format!("requests/{id}")).await
    }

    async fn cancel_request(&self, id: RequestId) -> AppResult<Request> {
        self.put_empty(&format!("requests/{id}/cancel")).await
    }

    async fn list_offers(&self) -> AppResult<Vec<Offer>> {
        self.get("offers").await
    }

    async fn get_offer(&self, id: OfferId) -> AppResult<Offer> {
        self.get(&format!("offers/{id}")).await
    }

    async fn create_offer(&self, input: &CreateOfferInput) -> AppResult<Offer> {
        self.post("offers", input).await
    }

    async fn update_offer(&self, id: OfferId, input: &UpdateOfferInput) -> AppResult<Offer> {
        self.put(&format!("offers/{id}"), input).await
    }

    async fn delete_offer(&self, id: OfferId) -> AppResult<()> {
        self.delete(&format!("offers/{id}")).await
    }

    async fn expire_offer(&self, id: OfferId) -> AppResult<Offer> {
        self.put_empty(&format!("offers/{id}/expire")).await
    }

    async fn fulfill_offer(&self, id: OfferId) -> AppResult<Offer> {
        self.put_empty(&format!("offers/{id}/fulfill")).await
    }

    async fn find_matches(&self, request_id: RequestId) -> AppResult<Vec<MatchCandidate>> {
        self.get(&format!("matching/find/{request_id}")).await
    }

    async fn create_match(&self, request_id: RequestId, offer_id: OfferId) -> AppResult<Match> {
        let body = CreateMatchBody {
            request_id,
            offer_id,
        };
        self.post("matching/match", &body).await
    }

    async fn accept_match(&self, id: MatchId) -> AppResult<Match> {
        self.put_empty(&format!("matching/accept/{id}")).await
    }

    async fn reject_match(&self, id: MatchId) -> AppResult<Match> {
        self.put_empty(&format!("matching/reject/{id}")).await
    }

    async fn fulfill_match(&self, id: MatchId) -> AppResult<Match> {
        self.put_empty(&format!("matching/fulfill/{id}")).await
    }

    async fn matches_by_request(&self, request_id: RequestId) -> AppResult<Vec<Match>> {
        self.get(&format!("matching/request/{request_id}")).await
    }

    async fn matches_by_offer(&self, offer_id: OfferId) -> AppResult<Vec<Match>> {
        self.get(&format!("matching/offer/{offer_id}")).await
    }

    async fn my_matches(&self) -> AppResult<Vec<Match>> {
        self.get("matching/my-matches").await
    }

    async fn list_notifications(&self) -> AppResult<Vec<Notification>> {
        self.get("notifications").await
    }

    async fn unread_notifications(&self) -> AppResult<Vec<Notification>> {
        self.get("notifications/unread").await
    }

    async fn mark_notification_read(&self, id: NotificationId) -> AppResult<Notification> {
        self.put_empty(&format!("notifications/{id}/read")).await
    }

    async fn mark_all_notifications_read(&self) -> AppResult<u64> {
        self.put_empty("notifications/read-all").await
    }

    async fn delete_notification(&self, id: NotificationId) -> AppResult<()> {
        self.delete(&format!("notifications/{id}")).await
    }
}
