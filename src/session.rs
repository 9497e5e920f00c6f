//! Ambient session context
//!
//! Current user and OAuth client configuration, fetched together once per
//! view mount. This is an explicit context object, not a singleton: a view
//! that wants fresh session data fetches a new one. There is no push
//! channel and no invalidation.

use crate::api::{SheetsClient, User};
use crate::log_debug;

#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub user: Option<User>,
    /// Whether an OAuth client is configured on the backend. Only probed
    /// when signed out; the sign-in affordance is hidden otherwise.
    pub oauth_configured: bool,
}

impl SessionContext {
    /// Fetch the session context. Failures collapse to a signed-out,
    /// unconfigured context; they are logged, never surfaced.
    pub async fn fetch(client: &SheetsClient) -> Self {
        let user = match client.current_user().await {
            Ok(user) => user,
            Err(e) => {
                log_debug(&format!("ERROR [Session]: Failed to fetch user: {}", e));
                None
            }
        };

        let oauth_configured = if user.is_some() {
            false
        } else {
            match client.client_config().await {
                Ok(configured) => configured,
                Err(e) => {
                    log_debug(&format!(
                        "ERROR [Session]: Failed to fetch client config: {}",
                        e
                    ));
                    false
                }
            }
        };

        Self {
            user,
            oauth_configured,
        }
    }
}
