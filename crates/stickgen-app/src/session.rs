//! Session resolution and gating.
//!
//! The auth collaborator is external: it owns the credential and its
//! rotation. This module holds one process-wide observable store over it so
//! components subscribe to auth-state changes instead of re-resolving the
//! session independently, and a gate that fails closed before any protected
//! operation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::watch;
use uuid::Uuid;

use stickgen_core::{ClientError, Session};

/// Login entry point, relative to the application origin.
pub const LOGIN_PATH: &str = "/login";

/// Seam to the external auth collaborator. Implementations resolve the
/// current session (or None when logged out); they never expose credential
/// storage or rotation.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn current_session(&self) -> Result<Option<Session>, ClientError>;
}

/// Process-wide observable session store.
///
/// Components read the latest resolved session or subscribe to changes;
/// `refresh` re-queries the provider and broadcasts. A provider error is
/// treated the same as "no session" - fail closed.
pub struct SessionStore {
    provider: Arc<dyn SessionProvider>,
    tx: watch::Sender<Option<Session>>,
}

impl SessionStore {
    pub fn new(provider: Arc<dyn SessionProvider>) -> Self {
        let (tx, _) = watch::channel(None);
        Self { provider, tx }
    }

    /// Re-resolve the session from the provider and broadcast the result.
    pub async fn refresh(&self) -> Option<Session> {
        let session = match self.provider.current_session().await {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!(error = %err, "session resolution failed; treating as logged out");
                None
            }
        };
        self.tx.send_replace(session.clone());
        session
    }

    /// Latest resolved session without touching the provider.
    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    /// Subscribe to auth-state changes (login/logout/refresh).
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }
}

/// Gates protected operations on a valid session.
#[derive(Clone)]
pub struct SessionGate {
    store: Arc<SessionStore>,
}

impl SessionGate {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    /// Resolve a valid session or fail closed with `AuthMissing`.
    ///
    /// The caller treats the error as a redirect to the login entry point
    /// and aborts the operation; no protected data is requested or rendered
    /// with a missing or expired credential.
    pub async fn require_session(&self) -> Result<Session, ClientError> {
        let session = match self.store.current() {
            Some(session) => Some(session),
            None => self.store.refresh().await,
        };

        match session {
            Some(session) if session.is_valid(Utc::now()) => Ok(session),
            _ => {
                tracing::debug!("no valid session; redirecting to login");
                Err(ClientError::AuthMissing)
            }
        }
    }

    /// Absolute login URL for the redirect on `AuthMissing`.
    pub fn login_url(origin: &str) -> String {
        format!("{}{}", origin.trim_end_matches('/'), LOGIN_PATH)
    }
}

/// Session provider backed by environment variables, for headless use:
/// STICKGEN_USER_ID (UUID) and STICKGEN_ACCESS_TOKEN.
pub struct EnvSessionProvider;

#[async_trait]
impl SessionProvider for EnvSessionProvider {
    async fn current_session(&self) -> Result<Option<Session>, ClientError> {
        let user_id = match std::env::var("STICKGEN_USER_ID") {
            Ok(raw) => Uuid::parse_str(&raw)?,
            Err(_) => return Ok(None),
        };
        let access_token = match std::env::var("STICKGEN_ACCESS_TOKEN") {
            Ok(token) if !token.is_empty() => token,
            _ => return Ok(None),
        };
        Ok(Some(Session::new(user_id, access_token)))
    }
}

/// Fixed-session provider for embedding and tests.
pub struct StaticSessionProvider {
    session: Option<Session>,
}

impl StaticSessionProvider {
    pub fn new(session: Option<Session>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl SessionProvider for StaticSessionProvider {
    async fn current_session(&self) -> Result<Option<Session>, ClientError> {
        Ok(self.session.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    struct FailingProvider;

    #[async_trait]
    impl SessionProvider for FailingProvider {
        async fn current_session(&self) -> Result<Option<Session>, ClientError> {
            Err(ClientError::Internal("network down".to_string()))
        }
    }

    fn store_with(session: Option<Session>) -> Arc<SessionStore> {
        Arc::new(SessionStore::new(Arc::new(StaticSessionProvider::new(
            session,
        ))))
    }

    #[tokio::test]
    async fn gate_returns_session_when_logged_in() {
        let session = Session::new(Uuid::new_v4(), "token");
        let gate = SessionGate::new(store_with(Some(session.clone())));
        let resolved = gate.require_session().await.unwrap();
        assert_eq!(resolved.user_id, session.user_id);
    }

    #[tokio::test]
    async fn gate_fails_closed_when_logged_out() {
        let gate = SessionGate::new(store_with(None));
        let err = gate.require_session().await.unwrap_err();
        assert!(matches!(err, ClientError::AuthMissing));
    }

    #[tokio::test]
    async fn gate_treats_expired_session_as_missing() {
        let expired = Session::new(Uuid::new_v4(), "token")
            .with_expiry(Utc::now() - Duration::minutes(5));
        let gate = SessionGate::new(store_with(Some(expired)));
        let err = gate.require_session().await.unwrap_err();
        assert!(matches!(err, ClientError::AuthMissing));
    }

    #[tokio::test]
    async fn provider_error_is_treated_as_no_session() {
        let store = Arc::new(SessionStore::new(Arc::new(FailingProvider)));
        let gate = SessionGate::new(store);
        let err = gate.require_session().await.unwrap_err();
        assert!(matches!(err, ClientError::AuthMissing));
    }

    #[tokio::test]
    async fn subscribers_observe_refresh() {
        let store = store_with(Some(Session::new(Uuid::new_v4(), "token")));
        let mut rx = store.subscribe();
        assert!(rx.borrow().is_none());

        store.refresh().await;
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_some());
    }

    #[test]
    fn login_url_joins_origin() {
        assert_eq!(
            SessionGate::login_url("http://localhost:3000/"),
            "http://localhost:3000/login"
        );
    }
}
