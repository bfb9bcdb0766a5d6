//! Newtype IDs for type-safe identifiers.
//!
//! Every identifier in this crate is assigned by a remote service, so the IDs
//! only wrap strings; nothing here generates them.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($name:ident) => {
        /// A gateway-assigned identifier.
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(LineItemId);
define_id!(RestaurantId);
define_id!(FoodId);
define_id!(ToppingGroupId);
define_id!(ChoiceId);
define_id!(VoucherId);
define_id!(DeliveryOptionId);
define_id!(AddressId);
define_id!(OrderId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_string() {
        let id: RestaurantId = "res-456".into();
        assert_eq!(id.as_str(), "res-456");
        assert_eq!(format!("{}", id), "res-456");
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = LineItemId::new("li-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"li-1\"");

        let parsed: LineItemId = serde_json::from_str("\"li-2\"").unwrap();
        assert_eq!(parsed, LineItemId::new("li-2"));
    }
}
