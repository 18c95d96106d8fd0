//! Policy switches for the places where intake and grouping behaviour is a choice.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{de::Deserializer, Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
/// Order of the per-category sequences in an aggregate.
pub enum CategoryOrder {
    /// Insertion order of each label's first occurrence.
    #[default]
    FirstSeen,
    /// Byte-wise ascending label order.
    Alphabetical,
}

impl FromStr for CategoryOrder {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value.trim().to_ascii_lowercase().as_str() {
            "alphabetical" | "sorted" => CategoryOrder::Alphabetical,
            _ => CategoryOrder::FirstSeen,
        })
    }
}

impl fmt::Display for CategoryOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CategoryOrder::FirstSeen => "first_seen",
            CategoryOrder::Alphabetical => "alphabetical",
        };
        f.write_str(label)
    }
}

impl<'de> Deserialize<'de> for CategoryOrder {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.and_then(|v| v.parse().ok()).unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
/// What the normalizer does with a negative amount.
pub enum NegativeAmountPolicy {
    /// Keep the value as-is (treated as a reversal by the sums).
    #[default]
    PassThrough,
    /// Replace the value with zero.
    Zero,
}

impl FromStr for NegativeAmountPolicy {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value.trim().to_ascii_lowercase().as_str() {
            "zero" | "clamp" => NegativeAmountPolicy::Zero,
            _ => NegativeAmountPolicy::PassThrough,
        })
    }
}

impl NegativeAmountPolicy {
    pub fn apply(self, amount: f64) -> f64 {
        match self {
            NegativeAmountPolicy::PassThrough => amount,
            NegativeAmountPolicy::Zero if amount < 0.0 => 0.0,
            NegativeAmountPolicy::Zero => amount,
        }
    }
}

impl fmt::Display for NegativeAmountPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NegativeAmountPolicy::PassThrough => "pass_through",
            NegativeAmountPolicy::Zero => "zero",
        };
        f.write_str(label)
    }
}

impl<'de> Deserialize<'de> for NegativeAmountPolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.and_then(|v| v.parse().ok()).unwrap_or_default())
    }
}

/// Options threaded through a report computation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOptions {
    pub category_order: CategoryOrder,
    pub negative_amounts: NegativeAmountPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_order_falls_back_to_first_seen() {
        let order: CategoryOrder = serde_json::from_str("\"newest\"").unwrap();
        assert_eq!(order, CategoryOrder::FirstSeen);
        let order: CategoryOrder = serde_json::from_str("\"Alphabetical\"").unwrap();
        assert_eq!(order, CategoryOrder::Alphabetical);
    }

    #[test]
    fn policies_parse_leniently() {
        assert_eq!("  Sorted ".parse(), Ok(CategoryOrder::Alphabetical));
        assert_eq!("".parse(), Ok(CategoryOrder::FirstSeen));
        assert_eq!("CLAMP".parse(), Ok(NegativeAmountPolicy::Zero));
        assert_eq!("keep".parse(), Ok(NegativeAmountPolicy::PassThrough));
    }

    #[test]
    fn zero_policy_only_touches_negatives() {
        assert_eq!(NegativeAmountPolicy::Zero.apply(-3.0), 0.0);
        assert_eq!(NegativeAmountPolicy::Zero.apply(3.0), 3.0);
        assert_eq!(NegativeAmountPolicy::PassThrough.apply(-3.0), -3.0);
    }
}
