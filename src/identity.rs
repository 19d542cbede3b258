//! Current-user capability handed to the screens that need it
//!
//! Sign-in and session restoration live in an external identity service;
//! this crate only asks "who is signed in" and "sign out".

use anyhow::Result;
use parking_lot::RwLock;
use tracing::info;

pub trait Identity: Send + Sync {
    /// Identifier of the signed-in user, if any
    fn current_user_id(&self) -> Option<String>;

    /// End the current user's session
    fn sign_out(&self) -> Result<()>;
}

/// Identity fixed at startup (from configuration)
pub struct StaticIdentity {
    user_id: RwLock<Option<String>>,
}

impl StaticIdentity {
    pub fn new(user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        let user_id = if user_id.trim().is_empty() {
            None
        } else {
            Some(user_id)
        };

        Self {
            user_id: RwLock::new(user_id),
        }
    }
}

impl Identity for StaticIdentity {
    fn current_user_id(&self) -> Option<String> {
        self.user_id.read().clone()
    }

    fn sign_out(&self) -> Result<()> {
        if let Some(user_id) = self.user_id.write().take() {
            info!("Signed out {}", user_id);
        }
        Ok(())
    }
}
