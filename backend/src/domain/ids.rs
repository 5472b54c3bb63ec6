//! Strongly typed primary keys.
//!
//! Every table uses an integer serial key; the wrappers keep a delivery id
//! from being passed where a recipient id is expected.

use serde::{Deserialize, Serialize};

macro_rules! define_entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Wrap a raw key.
            pub const fn new(value: i32) -> Self {
                Self(value)
            }

            /// Raw key value.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl From<i32> for $name {
            fn from(value: i32) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_entity_id!(
    /// Identifier of an administrator account.
    UserId
);
define_entity_id!(
    /// Identifier of a courier.
    DeliverymanId
);
define_entity_id!(
    /// Identifier of a delivery recipient.
    RecipientId
);
define_entity_id!(
    /// Identifier of a delivery.
    DeliveryId
);
define_entity_id!(
    /// Identifier of a reported delivery problem.
    ProblemId
);
