//! Newtype IDs for type-safe identifiers.
//!
//! The provider keys every table by UUID; the newtypes keep a product id from
//! being passed where an order id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a new random (v4) ID.
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the ID is a well-formed UUID.
            pub fn is_uuid(&self) -> bool {
                is_uuid(&self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
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

define_id!(
    /// Row id in `products`.
    ProductId
);
define_id!(
    /// Auth user id, shared by `profiles`, `cart_items` and `wishlist_items`.
    UserId
);
define_id!(CustomerId);
define_id!(OrderId);
define_id!(OrderItemId);
define_id!(CartItemId);
define_id!(WishlistItemId);
define_id!(PostId);
define_id!(ReviewId);

/// Whether `s` parses as a UUID in hyphenated form.
pub fn is_uuid(s: &str) -> bool {
    s.len() == 36 && Uuid::parse_str(s).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique_uuids() {
        let a = OrderId::generate();
        let b = OrderId::generate();
        assert_ne!(a, b);
        assert!(a.is_uuid());
    }

    #[test]
    fn test_is_uuid() {
        assert!(is_uuid("6f1c2a8e-4b7d-4f6a-9c3e-1d2b3a4c5d6e"));
        assert!(!is_uuid("prod-123"));
        assert!(!is_uuid("6f1c2a8e4b7d4f6a9c3e1d2b3a4c5d6e"));
        assert!(!ProductId::new("1").is_uuid());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = ProductId::new("p-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"p-1\"");
        let back: ProductId = serde_json::from_str("\"p-1\"").unwrap();
        assert_eq!(back, id);
        assert_eq!(format!("{}", back), "p-1");
    }
}
