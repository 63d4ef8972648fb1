use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// An id as found in stored JSON. Older records hold numeric ids such as
/// `1700000000000` or `3`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Unsigned(u64),
    Signed(i64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            Self::Text(id) => id,
            Self::Unsigned(id) => id.to_string(),
            Self::Signed(id) => id.to_string(),
        }
    }
}

/// Declares an opaque string identifier.
///
/// Ids are always written as JSON strings, and read from either strings or
/// integers. Fresh ids are random UUID v4 strings.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                RawId::deserialize(deserializer).map(|raw| Self(raw.into_string()))
            }
        }

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a fresh random identifier.
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

string_id!(
    /// A client identifier.
    ClientId
);

string_id!(
    /// A contractor identifier.
    ContractorId
);

string_id!(
    /// A project or task identifier.
    WorkItemId
);

string_id!(
    /// A sub-task identifier, unique within its parent work item.
    SubTaskId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = WorkItemId::generate();
        let b = WorkItemId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = ContractorId::new("1700000000000");
        let json = serde_json::to_string(&id).expect("serialize id");
        assert_eq!(json, "\"1700000000000\"");

        let back: ContractorId = serde_json::from_str(&json).expect("deserialize id");
        assert_eq!(back, id);
    }

    #[test]
    fn numeric_ids_are_read_as_strings() {
        let id: WorkItemId = serde_json::from_str("1700000000000").expect("numeric id");
        assert_eq!(id, WorkItemId::new("1700000000000"));

        let ids: Vec<ClientId> = serde_json::from_str(r#"[1, "2", -3]"#).expect("mixed ids");
        assert_eq!(
            ids,
            vec![ClientId::new("1"), ClientId::new("2"), ClientId::new("-3")]
        );

        assert_eq!(serde_json::to_string(&id).expect("serialize id"), "\"1700000000000\"");
    }

    #[test]
    fn non_integer_ids_are_rejected() {
        assert!(serde_json::from_str::<SubTaskId>("1.5").is_err());
        assert!(serde_json::from_str::<SubTaskId>("null").is_err());
    }
}
