//! Signed-in session lifecycle.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::api::ApiGateway;
use crate::error::{Error, ErrorKind, Result};
use crate::models::{Credentials, NewUser, User, UserId};

use super::AppState;

/// Who is signed in, if anyone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user_id: Option<UserId>,
    profile: Option<User>,
}

impl Session {
    pub(crate) const fn signed_in(user_id: UserId, profile: Option<User>) -> Self {
        Self {
            user_id: Some(user_id),
            profile,
        }
    }

    pub const fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    /// Loaded profile; `None` while signed out or when the profile could not
    /// be fetched at boot.
    pub const fn profile(&self) -> Option<&User> {
        self.profile.as_ref()
    }

    pub const fn is_signed_in(&self) -> bool {
        self.user_id.is_some()
    }
}

/// What durable storage keeps between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub user_id: UserId,
    pub signed_in: bool,
}

/// Durable storage for the signed-in user id.
///
/// `save` and `clear` must be atomic: a reader never sees the id without the
/// flag or the other way round.
pub trait SessionStore {
    fn load(&self) -> Result<Option<StoredSession>>;
    fn save(&self, session: &StoredSession) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// In-process store, for tests and front ends without durable storage.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    inner: Arc<Mutex<Option<StoredSession>>>,
}

impl MemorySessionStore {
    pub fn with_session(session: StoredSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(session))),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<StoredSession>> {
        let guard = self
            .inner
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        Ok(*guard)
    }

    fn save(&self, session: &StoredSession) -> Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        *guard = Some(*session);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Drives login, logout and boot-time restore against a gateway and a store.
#[derive(Debug, Clone)]
pub struct SessionController<S: SessionStore> {
    store: S,
}

impl<S: SessionStore> SessionController<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Sign in, persist the user id and reset every view.
    ///
    /// A rejected login returns `Credentials` and leaves the state untouched.
    pub async fn login<G: ApiGateway>(
        &self,
        state: &mut AppState,
        gateway: &G,
        credentials: &Credentials,
    ) -> Result<User> {
        if !credentials.is_complete() {
            return Err(Error::Credentials(
                "username and password are required".to_string(),
            ));
        }

        let user_id = gateway.login(credentials).await.map_err(as_login_error)?;
        let profile = gateway.get_user(user_id).await.map_err(as_auth_error)?;
        self.store.save(&StoredSession {
            user_id,
            signed_in: true,
        })?;

        tracing::info!(user = %user_id, "signed in as {}", profile.username);
        state.sign_in(user_id, Some(profile.clone()));
        Ok(profile)
    }

    /// Create an account and sign straight into it.
    pub async fn register<G: ApiGateway>(
        &self,
        state: &mut AppState,
        gateway: &G,
        new_user: &NewUser,
    ) -> Result<User> {
        let credentials = Credentials::new(new_user.username.trim(), new_user.password.clone());
        if !credentials.is_complete() {
            return Err(Error::Credentials(
                "username and password are required".to_string(),
            ));
        }
        let user_id = gateway.create_user(new_user).await?;
        tracing::info!(user = %user_id, "registered new user");
        self.login(state, gateway, &credentials).await
    }

    /// Sign out locally even when the backend call fails.
    ///
    /// Only a failure to clear durable storage is returned, after the
    /// in-memory session has already been reset.
    pub async fn logout<G: ApiGateway>(&self, state: &mut AppState, gateway: &G) -> Result<()> {
        if let Err(error) = gateway.logout().await {
            tracing::warn!("Remote logout failed, clearing local session anyway: {}", error);
        }
        let cleared = self.store.clear();
        state.sign_out();
        tracing::info!("signed out");
        cleared
    }

    /// Pick up the session stored by a previous run.
    ///
    /// No stored session is the signed-out state, not an error. A stored user
    /// that no longer exists is forgotten. When the profile cannot be fetched
    /// for a transient reason the user stays signed in without a profile.
    pub async fn restore_on_boot<G: ApiGateway>(
        &self,
        state: &mut AppState,
        gateway: &G,
    ) -> Result<Option<UserId>> {
        let Some(stored) = self.store.load()? else {
            return Ok(None);
        };
        if !stored.signed_in {
            self.store.clear()?;
            return Ok(None);
        }

        match gateway.get_user(stored.user_id).await {
            Ok(profile) => {
                state.sign_in(stored.user_id, Some(profile));
                Ok(Some(stored.user_id))
            }
            Err(error) if matches!(error.kind(), ErrorKind::NotFound | ErrorKind::Auth) => {
                tracing::warn!(
                    "Stored user {} no longer resolves, signing out: {}",
                    stored.user_id,
                    error
                );
                self.store.clear()?;
                Ok(None)
            }
            Err(error) => {
                tracing::warn!("Failed to load profile for stored session: {}", error);
                state.sign_in(stored.user_id, None);
                Ok(Some(stored.user_id))
            }
        }
    }
}

fn as_login_error(error: Error) -> Error {
    match error {
        Error::NotFound(message) | Error::Rejected(message) | Error::Auth(message) => {
            Error::Credentials(message)
        }
        other => other,
    }
}

fn as_auth_error(error: Error) -> Error {
    match error {
        Error::NotFound(message) | Error::Rejected(message) => Error::Auth(message),
        other => other,
    }
}
