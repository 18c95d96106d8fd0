//! Auth provider seam. Identities are returned to the caller and passed
//! explicitly from then on; there is no ambient current user.

mod memory;

pub use memory::MemoryAuthProvider;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use fintrack_domain::UserId;

const FALLBACK_GREETING_NAME: &str = "User";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("All fields are required (missing {0})")]
    MissingField(&'static str),
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
    #[error("Password should be at least {min} characters")]
    WeakPassword { min: usize },
    #[error("Email already in use: {0}")]
    EmailInUse(String),
    #[error("Invalid email or password. Please try again.")]
    InvalidCredentials,
    #[error("Auth provider unavailable: {0}")]
    Unavailable(String),
}

/// A signed-in user as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub user_id: UserId,
    pub email: String,
    pub display_name: Option<String>,
}

impl UserIdentity {
    /// First word of the display name, or `"User"`.
    pub fn first_name(&self) -> &str {
        self.display_name
            .as_deref()
            .and_then(|name| name.split_whitespace().next())
            .unwrap_or(FALLBACK_GREETING_NAME)
    }
}

pub trait AuthProvider: Send + Sync {
    fn sign_up(
        &self,
        display_name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserIdentity, AuthError>;

    fn log_in(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError>;

    fn log_out(&self, identity: &UserIdentity) -> Result<(), AuthError>;

    fn is_signed_in(&self, user: &UserId) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_name_falls_back_to_user() {
        let mut identity = UserIdentity {
            user_id: UserId::new("u"),
            email: "a@b.c".into(),
            display_name: Some("Asha Rao".into()),
        };
        assert_eq!(identity.first_name(), "Asha");
        identity.display_name = Some("   ".into());
        assert_eq!(identity.first_name(), "User");
        identity.display_name = None;
        assert_eq!(identity.first_name(), "User");
    }
}
