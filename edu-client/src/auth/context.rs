use crate::auth::session::{Session, SessionSlot};
use crate::config::Settings;
use crate::models::user::{LoginRequest, RegisterRequest, Role, User, UserResponse};
use crate::services::http::{ApiClient, RequestConfig};
use crate::services::notify::{NotificationLevel, Notifier, TracingNotifier};
use crate::services::{PathService, QuizService, RewardService, StudentService};
use crate::utils::jwt::decode_jwt_claims;
use chrono::Utc;
use client_core::token_store::{clear_pair, save_pair, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use client_core::{ApiError, FileTokenStore, MemoryTokenStore, TokenPair, TokenStore};
use reqwest::Method;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Session state for one signed-in client.
///
/// Owns the token store and the session, and hands out an [`ApiClient`]
/// wired to the same interceptor so a forced logout anywhere is visible here.
pub struct AuthContext {
    api: ApiClient,
    tokens: Arc<dyn TokenStore>,
    session: SessionSlot,
    notifier: Arc<dyn Notifier>,
    initialized: AtomicBool,
}

impl AuthContext {
    pub fn new(
        settings: &Settings,
        tokens: Arc<dyn TokenStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ApiError> {
        let session = SessionSlot::new();
        let api = ApiClient::new(
            &settings.api,
            tokens.clone(),
            session.clone(),
            notifier.clone(),
        )?;

        Ok(Self {
            api,
            tokens,
            session,
            notifier,
            initialized: AtomicBool::new(false),
        })
    }

    /// Context using the configured token file (or memory) and log notifications.
    pub fn from_settings(settings: &Settings) -> Result<Self, ApiError> {
        let tokens: Arc<dyn TokenStore> = match &settings.storage.token_file {
            Some(path) => Arc::new(FileTokenStore::new(path)),
            None => Arc::new(MemoryTokenStore::new()),
        };
        Self::new(settings, tokens, Arc::new(TracingNotifier))
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn paths(&self) -> PathService {
        PathService::new(self.api.clone())
    }

    pub fn quizzes(&self) -> QuizService {
        QuizService::new(self.api.clone())
    }

    pub fn rewards(&self) -> RewardService {
        RewardService::new(self.api.clone())
    }

    pub fn students(&self) -> StudentService {
        StudentService::new(self.api.clone())
    }

    /// Restore a session from stored tokens. Runs once; later calls only
    /// report the current state.
    ///
    /// An expired access token gets one refresh attempt. Any failure leaves
    /// the store cleared and no session.
    pub async fn initialize(&self) -> bool {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return self.is_authenticated();
        }

        let Some(access_token) = self.tokens.get(ACCESS_TOKEN_KEY) else {
            tracing::debug!("No stored access token");
            return false;
        };

        let expired = match decode_jwt_claims(&access_token) {
            Ok(claims) => claims.is_expired_at(Utc::now()),
            Err(e) => {
                tracing::warn!(error = %e, "Stored access token unreadable");
                true
            }
        };

        if expired {
            tracing::info!("Stored access token expired, refreshing");
            if let Err(e) = self.api.interceptor().refresh().await {
                tracing::warn!(error = %e, "Could not restore session");
                self.teardown();
                return false;
            }
        }

        match self.fetch_current_user(RequestConfig::default().silent()).await {
            Ok(user) => {
                if self.establish(user).is_none() {
                    tracing::warn!("Access token vanished before the session was created");
                    self.teardown();
                    return false;
                }
                tracing::info!("Session restored");
                self.is_authenticated()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not restore session");
                self.teardown();
                false
            }
        }
    }

    /// Sign in with email and password.
    ///
    /// Rejected credentials fail with [`ApiError::Authentication`] and leave
    /// the token store as it was.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let body = serde_json::to_value(LoginRequest { email, password })?;
        let pair: TokenPair = self
            .api
            .request(
                Method::POST,
                "/auth/login",
                Some(body),
                RequestConfig::unauthenticated(),
            )
            .await
            .map_err(|e| match e {
                ApiError::Validation { status: 400, .. } | ApiError::Forbidden(_) => {
                    ApiError::Authentication(e.message().to_string())
                }
                other => other,
            })?;

        save_pair(self.tokens.as_ref(), &pair);

        let user = match self.fetch_current_user(RequestConfig::default()).await {
            Ok(user) => user,
            Err(e) => {
                tracing::error!(error = %e, "Login succeeded but profile fetch failed");
                self.teardown();
                return Err(e);
            }
        };

        let Some(user) = self.establish(user) else {
            tracing::error!("Login succeeded but the access token was not stored");
            self.teardown();
            return Err(ApiError::Authentication(
                "Could not store session credentials".to_string(),
            ));
        };
        tracing::info!(user_id = %user.id, role = %user.role, "User logged in successfully");
        self.notifier.notify(
            NotificationLevel::Success,
            &format!("Welcome back, {}", user.display_name()),
        );
        Ok(user)
    }

    /// Create an account. Does not sign in.
    pub async fn register(&self, data: &RegisterRequest) -> Result<(), ApiError> {
        let body = serde_json::to_value(data)?;
        self.api
            .request_empty(
                Method::POST,
                "/auth/register",
                Some(body),
                RequestConfig::unauthenticated(),
            )
            .await
            .map_err(|e| match e {
                ApiError::Conflict(_) | ApiError::Validation { .. } => e,
                other => ApiError::Registration(other.message().to_string()),
            })?;

        tracing::info!(role = %data.role, "Account registered");
        self.notifier.notify(
            NotificationLevel::Success,
            "Registration successful! You can now log in.",
        );
        Ok(())
    }

    /// Sign out. The server-side revocation is best effort; local state is
    /// always cleared.
    pub async fn logout(&self) {
        if let Some(refresh_token) = self.tokens.get(REFRESH_TOKEN_KEY) {
            let body = serde_json::json!({ "refresh_token": refresh_token });
            match self
                .api
                .request_empty(
                    Method::POST,
                    "/auth/logout",
                    Some(body),
                    RequestConfig::unauthenticated().silent(),
                )
                .await
            {
                Ok(()) => tracing::info!("Refresh token revoked"),
                Err(e) => tracing::warn!(error = %e, "Failed to revoke token during logout"),
            }
        }

        self.teardown();
        self.notifier
            .notify(NotificationLevel::Info, "You have been logged out");
    }

    /// False whenever the access token is gone, even if a stale session remains.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_set() && self.tokens.get(ACCESS_TOKEN_KEY).is_some()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.is_authenticated()
            && self
                .session
                .get()
                .is_some_and(|session| session.role() == role)
    }

    pub fn current_user(&self) -> Option<User> {
        if !self.is_authenticated() {
            return None;
        }
        self.session.get().map(|session| session.user)
    }

    pub fn session(&self) -> Option<Session> {
        self.session.get()
    }

    async fn fetch_current_user(&self, config: RequestConfig) -> Result<User, ApiError> {
        let profile: UserResponse = self
            .api
            .request(Method::GET, "/users/me", None, config)
            .await?;
        User::try_from(profile).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Bind `user` to the stored tokens. Tokens are re-read because the
    /// profile fetch may have refreshed them.
    ///
    /// Returns `None`, leaving no session, when no access token is stored.
    fn establish(&self, user: User) -> Option<User> {
        let Some(access_token) = self.tokens.get(ACCESS_TOKEN_KEY) else {
            self.session.clear();
            return None;
        };
        let refresh_token = self.tokens.get(REFRESH_TOKEN_KEY);

        let expires_at = decode_jwt_claims(&access_token)
            .ok()
            .and_then(|claims| claims.expires_at());
        self.session.set(Session::new(
            user.clone(),
            &access_token,
            refresh_token.as_deref(),
            expires_at,
        ));
        Some(user)
    }

    fn teardown(&self) {
        clear_pair(self.tokens.as_ref());
        self.session.clear();
    }
}
