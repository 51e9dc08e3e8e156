//! Sign-in gate in front of the dashboard.

use crate::config::AccountConfig;

use tracing::{debug, info};

/// Route the user is sent to when nobody is signed in.
pub const SIGN_IN_ROUTE: &str = "/sign-in";

/// Identity source consulted before the dashboard is shown.
pub trait AuthProvider {
    /// False while the provider is still resolving the session.
    fn is_ready(&self) -> bool;

    /// Signed-in user, if any.
    fn current_user_id(&self) -> Option<String>;
}

/// What the dashboard should do given the provider's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Provider not ready yet; show a loading message.
    Loading,
    /// Nobody signed in; render nothing and go to `to`.
    Redirect {
        /// Target route.
        to: &'static str,
    },
    /// Dashboard may be shown.
    Granted {
        /// Signed-in user.
        user_id: String,
    },
}

/// Decide whether the dashboard may render.
pub fn check_access(provider: &impl AuthProvider) -> AccessDecision {
    if !provider.is_ready() {
        debug!("Auth provider not ready");
        return AccessDecision::Loading;
    }

    match provider.current_user_id() {
        Some(user_id) => {
            info!(user_id = %user_id, "Access granted");
            AccessDecision::Granted { user_id }
        }
        None => {
            info!(to = SIGN_IN_ROUTE, "No signed-in user, redirecting");
            AccessDecision::Redirect { to: SIGN_IN_ROUTE }
        }
    }
}

/// Account read from the local configuration file. Always ready.
#[derive(Debug, Clone, Default)]
pub struct LocalAuth {
    user_id: Option<String>,
}

impl LocalAuth {
    /// Blank user IDs count as signed out.
    pub fn from_config(account: &AccountConfig) -> Self {
        let user_id = account
            .user_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        Self { user_id }
    }
}

impl AuthProvider for LocalAuth {
    fn is_ready(&self) -> bool {
        true
    }

    fn current_user_id(&self) -> Option<String> {
        self.user_id.clone()
    }
}
