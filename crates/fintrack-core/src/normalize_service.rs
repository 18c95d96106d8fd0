//! Coerces loosely typed records into canonical [`LedgerEntry`] values.
//!
//! Data-quality problems never fail: missing or unusable fields fall back to
//! `0`, [`UNCATEGORIZED_LABEL`], today's date (intake) or [`UNKNOWN_DATE`]
//! (stored records). Only a wrongly shaped collection is an error.

use chrono::{DateTime, Utc};
use serde_json::Value;

use fintrack_domain::{
    Kind, LedgerEntry, NegativeAmountPolicy, RawEntry, UserId, DATE_FORMAT, UNCATEGORIZED_LABEL,
    UNKNOWN_DATE,
};

use crate::{Clock, CoreError};

const LABEL_KEY: &str = "label";

pub struct NormalizeService;

impl NormalizeService {
    /// Normalizes a record being created. A missing date becomes today's date.
    pub fn normalize(
        raw: &RawEntry,
        kind: Kind,
        clock: &dyn Clock,
        policy: NegativeAmountPolicy,
    ) -> LedgerEntry {
        let today = clock.today().format(DATE_FORMAT).to_string();
        Self::build(raw, kind, policy, today)
    }

    /// Normalizes a record read back from the store. A missing date becomes [`UNKNOWN_DATE`].
    pub fn normalize_stored(raw: &RawEntry, kind: Kind, policy: NegativeAmountPolicy) -> LedgerEntry {
        Self::build(raw, kind, policy, UNKNOWN_DATE.to_string())
    }

    /// Normalizes a whole collection of stored records.
    ///
    /// The collection must be a JSON array of objects; anything else is a caller
    /// contract violation and yields [`CoreError::InputShape`].
    pub fn normalize_snapshot(
        value: &Value,
        kind: Kind,
        policy: NegativeAmountPolicy,
    ) -> Result<Vec<LedgerEntry>, CoreError> {
        let records = value.as_array().ok_or_else(|| {
            CoreError::input_shape(
                kind,
                format!("expected an array of records, found {}", json_type(value)),
            )
        })?;
        records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                record
                    .as_object()
                    .map(|raw| Self::normalize_stored(raw, kind, policy))
                    .ok_or_else(|| {
                        CoreError::input_shape(
                            kind,
                            format!("record {index} is {}, not an object", json_type(record)),
                        )
                    })
            })
            .collect()
    }

    /// Parses an amount, yielding `0` for anything missing, non-numeric or non-finite.
    pub fn coerce_amount(value: Option<&Value>) -> f64 {
        let parsed = match value {
            Some(Value::Number(number)) => number.as_f64(),
            Some(Value::String(text)) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    trimmed.parse::<f64>().ok()
                }
            }
            _ => None,
        };
        parsed.filter(|amount| amount.is_finite()).unwrap_or(0.0)
    }

    /// Picks the label for `kind`: its own key, then `label`, then the other kind's key.
    pub fn coerce_label(raw: &RawEntry, kind: Kind) -> String {
        [kind.label_key(), LABEL_KEY, kind.other().label_key()]
            .iter()
            .filter_map(|key| text_field(raw.get(*key)))
            .next()
            .unwrap_or_else(|| UNCATEGORIZED_LABEL.to_string())
    }

    /// Returns the trimmed date string, or `None` when absent or blank.
    pub fn coerce_date(value: Option<&Value>) -> Option<String> {
        match value {
            Some(Value::String(text)) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            _ => None,
        }
    }

    fn build(
        raw: &RawEntry,
        kind: Kind,
        policy: NegativeAmountPolicy,
        fallback_date: String,
    ) -> LedgerEntry {
        let id = text_field(raw.get("id")).unwrap_or_default();
        let amount = Self::coerce_amount(raw.get("amount"));
        if amount < 0.0 {
            tracing::warn!(
                entry = %id,
                kind = %kind,
                amount,
                policy = %policy,
                "negative amount in ledger entry"
            );
        }

        LedgerEntry {
            user_id: UserId::new(text_field(raw.get("userId")).unwrap_or_default()),
            amount: policy.apply(amount),
            label: Self::coerce_label(raw, kind),
            date: Self::coerce_date(raw.get("date")).unwrap_or(fallback_date),
            created_at: raw.get("createdAt").and_then(parse_timestamp),
            id,
        }
    }
}

fn text_field(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let text = value.as_str()?;
    DateTime::parse_from_rfc3339(text.trim())
        .ok()
        .map(|stamp| stamp.with_timezone(&Utc))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
