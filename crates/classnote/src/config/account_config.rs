use serde::{Deserialize, Serialize};

/// Local account used by the sign-in check.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Signed-in user (None = signed out).
    #[serde(default)]
    pub user_id: Option<String>,
}
