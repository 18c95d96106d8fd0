use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use sha2::{Digest, Sha256};

use fintrack_domain::UserId;

use super::{AuthError, AuthProvider, UserIdentity};

pub const MIN_PASSWORD_LEN: usize = 6;

struct Account {
    identity: UserIdentity,
    password_digest: Vec<u8>,
}

#[derive(Default)]
struct AuthState {
    accounts: HashMap<String, Account>,
    signed_in: HashSet<UserId>,
}

/// In-process [`AuthProvider`] keyed by lower-cased email.
#[derive(Default)]
pub struct MemoryAuthProvider {
    state: Mutex<AuthState>,
}

impl MemoryAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, AuthState>, AuthError> {
        self.state
            .lock()
            .map_err(|_| AuthError::Unavailable("auth state lock poisoned".into()))
    }
}

impl AuthProvider for MemoryAuthProvider {
    fn sign_up(
        &self,
        display_name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserIdentity, AuthError> {
        let display_name = require("name", display_name)?;
        let email = require("email", email)?;
        if password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }
        validate_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword {
                min: MIN_PASSWORD_LEN,
            });
        }

        let key = email.to_ascii_lowercase();
        let mut state = self.lock()?;
        if state.accounts.contains_key(&key) {
            return Err(AuthError::EmailInUse(email.to_string()));
        }

        let identity = UserIdentity {
            user_id: UserId::generate(),
            email: email.to_string(),
            display_name: Some(display_name.to_string()),
        };
        let password_digest = digest(&identity.user_id, password);
        state.signed_in.insert(identity.user_id.clone());
        state.accounts.insert(
            key,
            Account {
                identity: identity.clone(),
                password_digest,
            },
        );
        tracing::info!(user = %identity.user_id, "account created");
        Ok(identity)
    }

    fn log_in(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError> {
        let key = email.trim().to_ascii_lowercase();
        let mut state = self.lock()?;
        let identity = match state.accounts.get(&key) {
            Some(account) if account.password_digest == digest(&account.identity.user_id, password) => {
                account.identity.clone()
            }
            _ => {
                tracing::debug!("rejected log in attempt");
                return Err(AuthError::InvalidCredentials);
            }
        };
        state.signed_in.insert(identity.user_id.clone());
        Ok(identity)
    }

    fn log_out(&self, identity: &UserIdentity) -> Result<(), AuthError> {
        self.lock()?.signed_in.remove(&identity.user_id);
        Ok(())
    }

    fn is_signed_in(&self, user: &UserId) -> bool {
        self.lock()
            .map(|state| state.signed_in.contains(user))
            .unwrap_or(false)
    }
}

fn require<'a>(field: &'static str, value: &'a str) -> Result<&'a str, AuthError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(AuthError::MissingField(field))
    } else {
        Ok(trimmed)
    }
}

fn validate_email(email: &str) -> Result<(), AuthError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(AuthError::InvalidEmail(email.to_string()))
    }
}

fn digest(user: &UserId, password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(user.as_str().as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}
