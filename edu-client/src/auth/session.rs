use crate::models::user::{Role, User};
use chrono::{DateTime, Utc};
use client_core::TokenPair;
use secrecy::{ExposeSecret, Secret};
use std::sync::{Arc, RwLock};

/// An authenticated session: who is signed in and the credentials in use.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    access_token: Secret<String>,
    refresh_token: Option<Secret<String>>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// A session needs only the access token; the refresh token is optional.
    pub fn new(
        user: User,
        access_token: &str,
        refresh_token: Option<&str>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            user,
            access_token: Secret::new(access_token.to_string()),
            refresh_token: refresh_token.map(|token| Secret::new(token.to_string())),
            expires_at,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token
            .as_ref()
            .map(|token| token.expose_secret().as_str())
    }
}

/// Shared holder of the current session.
///
/// The auth context fills it; the interceptor updates tokens after a refresh
/// and empties it on a forced logout. The lock is never held across `.await`.
#[derive(Debug, Clone, Default)]
pub struct SessionSlot(Arc<RwLock<Option<Session>>>);

impl SessionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Session> {
        self.0
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn is_set(&self) -> bool {
        self.0
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_some()
    }

    pub fn set(&self, session: Session) {
        *self
            .0
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(session);
    }

    pub fn clear(&self) {
        *self
            .0
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }

    /// Swap in refreshed credentials, keeping the user. No-op when empty.
    pub fn replace_tokens(&self, tokens: &TokenPair, expires_at: Option<DateTime<Utc>>) {
        let mut guard = self
            .0
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(session) = guard.as_mut() {
            session.access_token = Secret::new(tokens.access_token.clone());
            session.refresh_token = Some(Secret::new(tokens.refresh_token.clone()));
            session.expires_at = expires_at;
        }
    }
}
