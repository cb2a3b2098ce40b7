//! API client for communicating with the paraphrase backend.
//!
//! A successful login and an authorization failure are applied to the
//! session before the call returns. The watcher is then told the stored
//! credential changed, which it re-checks from storage.

use std::sync::Arc;

use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use crate::auth::{AuthSignal, SessionEvent, SessionManager, SignalSender};
use crate::config::Config;
use crate::forms;
use crate::models::{
    ParaphraseRequest, ParaphraseResponse, TokenResponse, UserLoginRequest, UserRegisterRequest,
    UserRegisterResponse,
};

use super::ApiError;

// ============================================================================
// Endpoints
// ============================================================================

const REGISTER_PATH: &str = "/v1/users/register";
const LOGIN_PATH: &str = "/v1/users/login";
const PARAPHRASE_PATH: &str = "/v1/paraphrase";

/// API client for the paraphrase backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<SessionManager>,
    signals: SignalSender,
}

impl ApiClient {
    /// Create a new API client bound to a session.
    pub fn new(
        config: &Config,
        session: Arc<SessionManager>,
        signals: SignalSender,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            session,
            signals,
        })
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Apply a signal to the session, then ask the watcher to re-check storage.
    fn dispatch(&self, signal: AuthSignal) {
        self.session.apply(signal);
        if !self.signals.send(AuthSignal::StorageChanged) {
            debug!("No signal listener");
        }
    }

    fn on_unauthorized(&self) {
        warn!("Backend rejected the credential, clearing session");
        self.dispatch(AuthSignal::ExternalLogout);
        self.session.notify(SessionEvent::Unauthorized);
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let mut request = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(body);

        if let Some(token) = self.session.bearer_token() {
            request = request.bearer_auth(token);
        }

        debug!(url = %url, "POST");
        let response = request.send().await?;

        match Self::check_response(response).await {
            Ok(response) => response
                .json()
                .await
                .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", url, e))),
            Err(e) => {
                if e.is_unauthorized() {
                    self.on_unauthorized();
                } else {
                    warn!(url = %url, error = %e, "Request failed");
                }
                Err(e)
            }
        }
    }

    /// Create an account. Does not log in.
    pub async fn register(
        &self,
        request: &UserRegisterRequest,
    ) -> Result<UserRegisterResponse, ApiError> {
        let response: UserRegisterResponse = self.post(REGISTER_PATH, request).await?;
        info!(user_id = %response.user_id, "Registered new account");
        Ok(response)
    }

    /// Exchange credentials for a bearer token and hand it to the session.
    pub async fn login(&self, request: &UserLoginRequest) -> Result<TokenResponse, ApiError> {
        let response: TokenResponse = self.post(LOGIN_PATH, request).await?;
        if response.access_token.is_empty() {
            return Err(ApiError::InvalidResponse(
                "Login succeeded without an access token".to_string(),
            ));
        }
        info!("Login succeeded");
        self.dispatch(AuthSignal::ExternalLogin(response.access_token.clone()));
        Ok(response)
    }

    /// Drop the credential. Purely local; the backend keeps no session.
    pub fn logout(&self) {
        self.dispatch(AuthSignal::ExternalLogout);
    }

    /// Paraphrase text. Works with or without a session.
    pub async fn paraphrase(
        &self,
        request: &ParaphraseRequest,
    ) -> Result<ParaphraseResponse, ApiError> {
        forms::validate_input_text(&request.text)
            .map_err(|e| ApiError::InvalidInput(e.message.to_string()))?;

        let response: ParaphraseResponse = self.post(PARAPHRASE_PATH, request).await?;
        debug!(
            mode = request.mode.as_str(),
            original = response.original_length,
            paraphrased = response.paraphrased_length,
            "Paraphrase complete"
        );
        Ok(response)
    }
}
