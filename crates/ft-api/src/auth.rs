//! Login and logout against the auth endpoint

use ft_core::error::{FiscalError, Result};
use ft_core::session::{KeyValueStore, Session};
use tracing::{info, warn};

use crate::client::FiscalApi;

/// Authenticate and persist the new session in `store`.
///
/// Transport failures surface as a generic connection message; rejections
/// carry the server's own error text.
pub async fn login(
    api: &dyn FiscalApi,
    store: &dyn KeyValueStore,
    username: &str,
    senha: &str,
) -> Result<Session> {
    let username = username.trim();
    if username.is_empty() || senha.is_empty() {
        return Err(FiscalError::Validation(
            "Username and password are required".to_string(),
        ));
    }

    let response = match api.login(username, senha).await {
        Ok(response) => response,
        Err(e) if e.is_network() => {
            warn!("Login request failed: {}", e);
            return Err(FiscalError::Auth(
                "Could not connect to the server".to_string(),
            ));
        }
        Err(e) => return Err(e),
    };

    match (response.success, response.token, response.usuario) {
        (true, Some(token), Some(usuario)) => {
            info!(username = %usuario.username, "logged in");
            Session::establish(store, token, usuario)
        }
        _ => Err(FiscalError::Auth(
            response
                .error
                .or(response.message)
                .unwrap_or_else(|| "login failed".to_string()),
        )),
    }
}

/// Drop the session locally. The backend keeps no server-side state to clear.
pub fn logout(session: &mut Session, store: &dyn KeyValueStore) -> Result<()> {
    if let Some(user) = session.user() {
        info!(username = %user.username, "logging out");
    }
    session.logout(store)
}
