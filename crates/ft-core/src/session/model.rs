//! Authenticated session data model

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::store::KeyValueStore;
use crate::error::{FiscalError, Result};

/// Storage key holding the API token
pub const TOKEN_KEY: &str = "token";
/// Storage key holding the serialized user profile
pub const USER_KEY: &str = "user";

/// Logged-in user profile as returned by the login endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usuario {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub nome_completo: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub cargo: Option<String>,
    #[serde(default)]
    pub departamento: Option<String>,
}

impl Usuario {
    /// Name to greet the user with
    pub fn display_name(&self) -> &str {
        if self.nome_completo.is_empty() {
            &self.username
        } else {
            &self.nome_completo
        }
    }
}

/// Explicit session passed to whatever needs to know who is logged in.
///
/// Created from storage at startup, replaced on login and cleared on logout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
    user: Option<Usuario>,
}

impl Session {
    /// A logged-out session
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Restore the session persisted in `store`.
    ///
    /// A user profile that fails to parse is discarded with a warning and the
    /// session comes back logged out.
    pub fn init_from_storage(store: &dyn KeyValueStore) -> Result<Self> {
        let token = store.get(TOKEN_KEY)?;
        let user = match store.get(USER_KEY)? {
            Some(raw) => match serde_json::from_str::<Usuario>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!("Ignoring unreadable stored user profile: {}", e);
                    None
                }
            },
            None => None,
        };

        let session = match user {
            Some(user) => Self {
                token,
                user: Some(user),
            },
            None => Self::anonymous(),
        };
        debug!(authenticated = session.is_authenticated(), "restored session");
        Ok(session)
    }

    /// Start a session for `user` and persist it.
    ///
    /// Both keys are written even if the first write fails; the first error
    /// is returned.
    pub fn establish(store: &dyn KeyValueStore, token: String, user: Usuario) -> Result<Self> {
        let token_written = store.set(TOKEN_KEY, &token);
        let user_written = serde_json::to_string(&user)
            .map_err(FiscalError::from)
            .and_then(|raw| store.set(USER_KEY, &raw));
        token_written.and(user_written)?;
        debug!(username = %user.username, "session established");
        Ok(Self {
            token: Some(token),
            user: Some(user),
        })
    }

    /// Clear the session both in memory and in `store`.
    ///
    /// Every key is removed even if an earlier removal fails.
    pub fn logout(&mut self, store: &dyn KeyValueStore) -> Result<()> {
        self.token = None;
        self.user = None;
        let token_removed = store.remove(TOKEN_KEY);
        let user_removed = store.remove(USER_KEY);
        token_removed.and(user_removed)?;
        debug!("session cleared");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&Usuario> {
        self.user.as_ref()
    }
}
