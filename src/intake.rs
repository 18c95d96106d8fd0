//! Form-level intake for new entries: required-field checks before the store
//! applies the lenient normalization.

use serde_json::{Map, Value};

use fintrack_domain::{Kind, LedgerEntry, RawEntry, UserId};

use crate::errors::{FinError, Result};
use crate::store::DocumentStore;

/// What a user typed into the add-income or add-expense form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryForm {
    pub amount: String,
    pub label: String,
    /// Blank means "today".
    pub date: Option<String>,
}

impl EntryForm {
    pub fn new(amount: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            label: label.into(),
            date: None,
        }
    }

    pub fn on(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Rejects a form with a blank amount or label.
    pub fn validate(&self) -> Result<()> {
        if self.amount.trim().is_empty() || self.label.trim().is_empty() {
            return Err(FinError::InvalidInput("Please fill all fields!".into()));
        }
        Ok(())
    }

    /// Builds the raw record stored under `kind`'s collection.
    pub fn to_raw(&self, kind: Kind) -> Result<RawEntry> {
        self.validate()?;
        let mut raw = Map::new();
        raw.insert("amount".into(), amount_value(self.amount.trim()));
        raw.insert(kind.label_key().into(), Value::String(self.label.trim().into()));
        if let Some(date) = self.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            raw.insert("date".into(), Value::String(date.into()));
        }
        Ok(raw)
    }
}

/// Validates `form` and adds it to `user`'s `kind` collection.
pub fn record_entry(
    store: &dyn DocumentStore,
    user: &UserId,
    kind: Kind,
    form: &EntryForm,
) -> Result<LedgerEntry> {
    let raw = form.to_raw(kind)?;
    let entry = store.add(user, kind, raw)?;
    tracing::info!(user = %user, kind = %kind, amount = entry.amount, "entry recorded");
    Ok(entry)
}

fn amount_value(text: &str) -> Value {
    text.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(text.into()))
}
