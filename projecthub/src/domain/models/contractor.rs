use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::ContractorId;
use crate::domain::money::{rate_or_zero, DEFAULT_CURRENCY};

/// A contractor that can be assigned to work items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contractor {
    pub id: ContractorId,
    pub name: String,
    pub email: String,
    /// Older records carry a single `specialty` string instead of a list.
    #[serde(default, alias = "specialty", deserialize_with = "one_or_many")]
    pub skills: Vec<String>,
    /// Hourly rate. Older records store a formatted string such as `"$75/hr"`.
    #[serde(deserialize_with = "amount_or_formatted")]
    pub rate: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl Contractor {
    pub fn currency(&self) -> &str {
        self.currency.as_deref().unwrap_or(DEFAULT_CURRENCY)
    }

    /// Label used in pickers and team listings, e.g. `"Jane Doe - Rust, Go"`.
    pub fn label(&self) -> String {
        if self.skills.is_empty() {
            self.name.clone()
        } else {
            format!("{} - {}", self.name, self.skills.join(", "))
        }
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(skill) if skill.trim().is_empty() => Vec::new(),
        OneOrMany::One(skill) => vec![skill],
        OneOrMany::Many(skills) => skills,
    })
}

fn amount_or_formatted<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawRate {
        Amount(Decimal),
        Formatted(String),
    }

    Ok(match RawRate::deserialize(deserializer)? {
        RawRate::Amount(rate) => rate,
        RawRate::Formatted(text) => rate_or_zero(&text),
    })
}
