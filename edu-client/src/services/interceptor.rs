//! Bearer-token interceptor with a single refresh-and-retry on 401.
//!
//! Each request walks `Pending -> Refreshing -> Retrying -> Failed`, leaving
//! as soon as a response other than 401 arrives:
//!
//! | State | Action | On 401 |
//! |-------|--------|--------|
//! | `Pending` | send with the stored token | `Refreshing` |
//! | `Refreshing` | exchange the refresh token for a new pair | n/a |
//! | `Retrying` | resend once with the new token | `Failed` |
//! | `Failed` | end the session | n/a |
//!
//! The retry state lives on the request, not on the client, so concurrent
//! requests that hit 401 together each run their own refresh. The refresh
//! endpoint tolerates this.

use crate::auth::session::SessionSlot;
use crate::services::http::{RawResponse, Transport};
use crate::services::notify::{NotificationLevel, Notifier};
use crate::utils::jwt::decode_jwt_claims;
use client_core::token_store::{clear_pair, save_pair, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use client_core::{ApiError, TokenPair, TokenStore};
use reqwest::Method;
use serde::Deserialize;
use std::sync::Arc;

pub const REFRESH_PATH: &str = "/auth/refresh";

const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    /// Gateways that do not rotate refresh tokens omit it.
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestState {
    Pending,
    Refreshing,
    Retrying,
    Failed,
}

#[derive(Clone)]
pub(crate) struct AuthInterceptor {
    transport: Transport,
    tokens: Arc<dyn TokenStore>,
    session: SessionSlot,
    notifier: Arc<dyn Notifier>,
}

impl AuthInterceptor {
    pub fn new(
        transport: Transport,
        tokens: Arc<dyn TokenStore>,
        session: SessionSlot,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            transport,
            tokens,
            session,
            notifier,
        }
    }

    /// Send with the stored bearer token, refreshing once on 401.
    ///
    /// Non-401 responses are returned untouched for the caller to classify.
    pub async fn send(
        &self,
        method: &Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<RawResponse, ApiError> {
        let mut state = RequestState::Pending;

        loop {
            match state {
                RequestState::Pending => {
                    let response = self.attempt(method, path, body).await?;
                    if response.status != 401 {
                        return Ok(response);
                    }
                    tracing::debug!(
                        method = %method,
                        path = %path,
                        "Received 401, refreshing token"
                    );
                    state = RequestState::Refreshing;
                }
                RequestState::Refreshing => {
                    self.refresh().await?;
                    state = RequestState::Retrying;
                }
                RequestState::Retrying => {
                    let response = self.attempt(method, path, body).await?;
                    if response.status != 401 {
                        return Ok(response);
                    }
                    state = RequestState::Failed;
                }
                RequestState::Failed => {
                    tracing::warn!(
                        method = %method,
                        path = %path,
                        "Retried request rejected, ending session"
                    );
                    self.force_logout();
                    return Err(ApiError::Authentication(
                        "Request rejected after token refresh".to_string(),
                    ));
                }
            }
        }
    }

    async fn attempt(
        &self,
        method: &Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<RawResponse, ApiError> {
        let token = self.tokens.get(ACCESS_TOKEN_KEY);
        self.transport
            .dispatch(method, path, body, token.as_deref())
            .await
    }

    /// Exchange the stored refresh token for a new pair.
    ///
    /// Any failure (no refresh token, transport error, rejected or
    /// unreadable response) ends the session before the error is returned.
    pub async fn refresh(&self) -> Result<TokenPair, ApiError> {
        let Some(refresh_token) = self.tokens.get(REFRESH_TOKEN_KEY) else {
            tracing::info!("No refresh token stored, ending session");
            self.force_logout();
            return Err(ApiError::Authentication(
                "No refresh token available".to_string(),
            ));
        };

        match self.exchange(&refresh_token).await {
            Ok(pair) => {
                save_pair(self.tokens.as_ref(), &pair);
                let expires_at = decode_jwt_claims(&pair.access_token)
                    .ok()
                    .and_then(|claims| claims.expires_at());
                self.session.replace_tokens(&pair, expires_at);
                tracing::info!("Access token refreshed");
                Ok(pair)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh failed, ending session");
                self.force_logout();
                Err(ApiError::Authentication(format!(
                    "Token refresh failed: {}",
                    e.message()
                )))
            }
        }
    }

    async fn exchange(&self, refresh_token: &str) -> Result<TokenPair, ApiError> {
        let body = serde_json::json!({ "refresh_token": refresh_token });
        let response = self
            .transport
            .dispatch(&Method::POST, REFRESH_PATH, Some(&body), None)
            .await?;

        if !response.is_success() {
            return Err(ApiError::from_response(response.status, &response.body));
        }

        let refreshed: RefreshResponse = serde_json::from_str(&response.body)?;
        Ok(TokenPair {
            access_token: refreshed.access_token,
            refresh_token: refreshed
                .refresh_token
                .unwrap_or_else(|| refresh_token.to_string()),
        })
    }

    /// Clear both tokens and the session, then tell the user.
    pub fn force_logout(&self) {
        clear_pair(self.tokens.as_ref());
        self.session.clear();
        self.notifier
            .notify(NotificationLevel::Warning, SESSION_EXPIRED_MESSAGE);
    }
}
