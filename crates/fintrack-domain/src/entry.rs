//! Ledger entry model and the loosely typed record it is normalized from.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::Amounted;

/// Loosely typed record as handed over by the document store or a form.
pub type RawEntry = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
/// Owner identifier issued by the auth provider.
pub struct UserId(String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Issues a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A single income or expense record in canonical form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: String,
    pub user_id: UserId,
    pub amount: f64,
    pub label: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl LedgerEntry {
    pub fn new(amount: f64, label: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            user_id: UserId::default(),
            amount,
            label: label.into(),
            date: date.into(),
            created_at: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_owner(mut self, user_id: UserId) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Generates an identifier suitable for a newly stored entry.
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }
}

impl Amounted for LedgerEntry {
    fn amount(&self) -> f64 {
        self.amount
    }
}
