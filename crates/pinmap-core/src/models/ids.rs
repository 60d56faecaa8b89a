//! Backend-issued numeric identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! backend_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "i64", into = "i64")]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw backend id. Returns `None` for non-positive values.
            #[must_use]
            pub const fn new(raw: i64) -> Option<Self> {
                if raw > 0 {
                    Some(Self(raw))
                } else {
                    None
                }
            }

            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl TryFrom<i64> for $name {
            type Error = IdParseError;

            fn try_from(raw: i64) -> Result<Self, Self::Error> {
                Self::new(raw).ok_or(IdParseError::NotPositive(raw))
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s.trim().parse::<i64>().map_err(IdParseError::Malformed)?;
                Self::try_from(raw)
            }
        }
    };
}

/// Failure to parse an identifier from user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    #[error("invalid id: {0}")]
    Malformed(ParseIntError),
    #[error("id must be positive, got {0}")]
    NotPositive(i64),
}

backend_id!(
    /// Identifier of a registered user
    UserId
);
backend_id!(
    /// Identifier of a pin (a "post" on the backend)
    PinId
);
backend_id!(
    /// Identifier of a pin folder
    FolderId
);
backend_id!(
    /// Identifier of a friendship edge
    FriendshipId
);
