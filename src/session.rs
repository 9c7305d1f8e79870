//! The signed-in identity, held in memory and mirrored to durable storage.

use crate::api::ApiClient;
use crate::storage::Storage;
use crate::types::{LoginRequest, LoginResponse, RecordId, Session};
use std::sync::{Arc, PoisonError, RwLock};

/// Storage key holding the serialized session.
pub const SESSION_KEY: &str = "user";

#[derive(Clone)]
pub struct SessionStore {
    current: Arc<RwLock<Option<Session>>>,
    storage: Storage,
}

impl SessionStore {
    pub fn new(storage: Storage) -> Self {
        Self {
            current: Arc::new(RwLock::new(None)),
            storage,
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Bearer token for API calls. An empty token counts as none.
    pub fn token(&self) -> Option<String> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|session| session.token.clone())
            .filter(|token| !token.is_empty())
    }

    pub fn user_id(&self) -> Option<RecordId> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(|session| session.id.clone())
    }

    /// Reloads the durable copy into memory. The stored token is trusted
    /// as-is until a later API call rejects it.
    pub fn restore(&self) -> Option<Session> {
        let raw = self.storage.get(SESSION_KEY)?;
        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => {
                tracing::info!(username = %session.username, "restored saved session");
                *self.current.write().unwrap_or_else(PoisonError::into_inner) =
                    Some(session.clone());
                Some(session)
            }
            Err(err) => {
                tracing::warn!(error = %err, "ignoring unreadable saved session");
                None
            }
        }
    }

    /// Submits the credentials and, on success, stores the composed session.
    pub async fn login(&self, api: &ApiClient, email: &str, password: &str) -> Option<Session> {
        let token = self.token();
        let response: LoginResponse = api
            .post("/users/login", &LoginRequest { email, password }, token.as_deref())
            .await?;
        let user = response.user?;
        if response.token.as_deref().is_none_or(str::is_empty) {
            tracing::warn!("login response carried no token; requests will be unauthenticated");
        }
        let session = Session::from_login(user, response.token.unwrap_or_default());
        self.set(session.clone());
        Some(session)
    }

    pub fn set(&self, session: Session) {
        match serde_json::to_string(&session) {
            Ok(serialized) => {
                if let Err(err) = self.storage.set(SESSION_KEY, &serialized) {
                    tracing::warn!(error = %err, "failed to persist session");
                }
            }
            Err(err) => tracing::warn!(error = %err, "failed to serialize session"),
        }
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
    }

    pub fn logout(&self) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
        if let Err(err) = self.storage.remove(SESSION_KEY) {
            tracing::warn!(error = %err, "failed to remove saved session");
        }
    }
}
