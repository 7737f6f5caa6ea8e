//! Authentication state.

use crate::error::{SyncError, SyncResult};
use crate::notifications::messages;
use crate::shared::Shared;
use dovah_types::{Credentials, Session, User};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Tracks whether a user is signed in and drives login/logout.
#[derive(Clone)]
pub struct SessionManager {
    shared: Arc<Shared>,
    session: Arc<RwLock<Session>>,
    last_login_error: Arc<RwLock<Option<String>>>,
}

impl SessionManager {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self {
            shared,
            session: Arc::new(RwLock::new(Session::anonymous())),
            last_login_error: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn current(&self) -> Session {
        self.session.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_authenticated()
    }

    pub async fn user(&self) -> Option<User> {
        self.session.read().await.user().cloned()
    }

    /// Message of the most recent failed login, cleared by a successful one.
    pub async fn last_login_error(&self) -> Option<String> {
        self.last_login_error.read().await.clone()
    }

    /// Asks the server whether the stored credentials are still valid.
    ///
    /// Any failure is treated as an anonymous session.
    pub async fn probe(&self) -> Session {
        let session = match self.shared.api.session(&self.shared.ctx).await {
            Ok(session) => session,
            Err(e) => {
                warn!("Session probe failed, continuing anonymously: {}", e);
                Session::anonymous()
            }
        };
        *self.session.write().await = session.clone();
        session
    }

    /// Signs in. Failures are returned, and kept in
    /// [`last_login_error`](Self::last_login_error), but never queued as
    /// notifications.
    pub async fn login(&self, credentials: &Credentials) -> SyncResult<User> {
        if credentials.is_incomplete() {
            return Err(self.reject(messages::INCOMPLETE_CREDENTIALS).await);
        }

        let session = match self.shared.api.login(&self.shared.ctx, credentials).await {
            Ok(session) => session,
            Err(e) => {
                warn!("Login rejected for {}: {}", credentials.username, e);
                let message = e.server_message().unwrap_or(messages::LOGIN_FALLBACK);
                return Err(self.reject(message).await);
            }
        };

        let Some(user) = session.user().cloned() else {
            return Err(self.reject(messages::LOGIN_FALLBACK).await);
        };

        *self.session.write().await = session;
        *self.last_login_error.write().await = None;
        info!("Signed in as {}", user.username);
        self.shared.notify(&messages::WELCOME).await;
        Ok(user)
    }

    async fn reject(&self, message: &str) -> SyncError {
        *self.last_login_error.write().await = Some(message.to_string());
        *self.session.write().await = Session::anonymous();
        SyncError::Auth {
            message: message.to_string(),
        }
    }

    /// Ends the server session and forgets the local credentials.
    ///
    /// On failure a warning is queued and the session is left untouched.
    pub async fn logout(&self) -> SyncResult<()> {
        if let Err(e) = self.shared.api.logout(&self.shared.ctx).await {
            warn!("Logout failed: {}", e);
            self.shared.notify(&messages::LOGOUT_FAILED).await;
            return Err(e.into());
        }
        self.shared.ctx.clear().await;
        *self.session.write().await = Session::anonymous();
        info!("Signed out");
        Ok(())
    }
}
