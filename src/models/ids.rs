//! Strongly-typed ID wrappers for all entity types
//!
//! IDs are UUIDv7, so they sort by creation time. The short display form uses
//! the trailing (random) hex digits because the leading ones are the
//! timestamp and collide for records created in the same instant.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Number of hex characters shown in the short display form
pub const SHORT_ID_LEN: usize = 8;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new time-ordered ID
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Create an ID from an existing UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Parse an ID from a full UUID string
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                Ok(Self(Uuid::parse_str(s)?))
            }

            /// Check whether user input refers to this ID.
            ///
            /// Accepts the full UUID, the short display form (`txn-1a2b3c4d`)
            /// or the bare short hex suffix.
            pub fn matches(&self, input: &str) -> bool {
                let input = input.trim();
                if let Ok(uuid) = Uuid::parse_str(input) {
                    return uuid == self.0;
                }
                let short = input.strip_prefix($display_prefix).unwrap_or(input);
                short.len() == SHORT_ID_LEN && self.short().eq_ignore_ascii_case(short)
            }

            fn short(&self) -> String {
                let simple = self.0.simple().to_string();
                simple[simple.len() - SHORT_ID_LEN..].to_string()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.short())
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s.trim())
            }
        }
    };
}

define_id!(TransactionId, "txn-");
define_id!(CategoryId, "cat-");
define_id!(UserId, "usr-");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        let id = TransactionId::new();
        let display = format!("{}", id);
        assert!(display.starts_with("txn-"));
        assert_eq!(display.len(), 12);
    }

    #[test]
    fn test_ids_are_time_ordered() {
        let first = TransactionId::new();
        let second = TransactionId::new();
        assert!(first < second);
    }

    #[test]
    fn test_short_forms_differ_for_same_instant() {
        let a = CategoryId::new();
        let b = CategoryId::new();
        assert_ne!(a.to_string(), b.to_string());
    }

    #[test]
    fn test_matches_full_and_short() {
        let id = TransactionId::new();
        let full = id.as_uuid().to_string();
        let display = id.to_string();
        let bare = display.trim_start_matches("txn-").to_string();

        assert!(id.matches(&full));
        assert!(id.matches(&display));
        assert!(id.matches(&bare));
        assert!(id.matches(&bare.to_uppercase()));
        assert!(!id.matches("txn-00000000"));
        assert!(!id.matches(""));
    }

    #[test]
    fn test_id_serialization() {
        let id = UserId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_id_parse() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id = CategoryId::parse(uuid_str).unwrap();
        assert_eq!(id.as_uuid().to_string(), uuid_str);
        assert_eq!(id.to_string(), "cat-55440000");
    }
}
