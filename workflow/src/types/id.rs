//! Typed ID wrappers for compile-time type safety.
//!
//! The backend issues integer keys while ids minted on the client are UUIDs,
//! so every wrapper stores the textual form and accepts either a JSON number
//! or a JSON string.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

/// Canonical textual form. Numeric keys drop leading zeros so that
/// `"02"` and `2` name the same record.
fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.parse::<i64>() {
        Ok(key) => key.to_string(),
        Err(_) => trimmed.to_string(),
    }
}

/// Macro to generate typed ID wrappers with common trait implementations.
macro_rules! typed_id {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            /// Creates a new random ID.
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Returns the textual form of the ID.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the numeric key when the backend issued one.
            pub fn as_i64(&self) -> Option<i64> {
                self.0.parse().ok()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(normalize(s)))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(normalize(s))
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(normalize(&s))
            }
        }

        impl From<i64> for $name {
            fn from(key: i64) -> Self {
                Self(key.to_string())
            }
        }

        impl From<i32> for $name {
            fn from(key: i32) -> Self {
                Self(key.to_string())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                match self.as_i64() {
                    Some(key) => serializer.serialize_i64(key),
                    None => serializer.serialize_str(&self.0),
                }
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                match RawId::deserialize(deserializer)? {
                    RawId::Number(key) => Ok(Self::from(key)),
                    RawId::Text(text) if text.trim().is_empty() => {
                        Err(serde::de::Error::custom("empty identifier"))
                    }
                    RawId::Text(text) => Ok(Self::from(text)),
                }
            }
        }
    };
}

typed_id!(LeaveTypeId, "Unique identifier for a leave type.");
typed_id!(RequestId, "Unique identifier for a leave request.");
typed_id!(PrincipalId, "Unique identifier for a registered account.");
