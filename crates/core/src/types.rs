//! Identifier types.
//!
//! All identifiers are opaque integer keys assigned by whichever store owns the
//! entity. They are `Copy` and totally ordered so they can be used directly as
//! map keys and in sorted sets.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! integer_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Wrap a raw integer key.
            #[inline]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// The raw integer key.
            #[inline]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

integer_id!(
    /// Identifier of a mission chain.
    ChainId
);

integer_id!(
    /// Identifier of a mission in the external mission catalog.
    MissionId
);

integer_id!(
    /// Identifier of a user whose progress is projected.
    UserId
);
