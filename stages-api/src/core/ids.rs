//! Strongly typed entity identifiers.
//!
//! Every identifier is a positive integer. The types are distinct so a stage
//! query can never be handed a pipeline id where an event id belongs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a string is not a valid identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdParseError {
    /// The input was empty.
    #[error("identifier is empty")]
    Empty,
    /// The input contained something other than ASCII digits.
    #[error("identifier '{0}' is not a number")]
    NotANumber(String),
    /// The input was zero.
    #[error("identifier must be greater than zero")]
    Zero,
    /// The input does not fit in 64 bits.
    #[error("identifier '{0}' is too large")]
    Overflow(String),
}

fn parse_positive(s: &str) -> Result<NonZeroU64, IdParseError> {
    if s.is_empty() {
        return Err(IdParseError::Empty);
    }
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(IdParseError::NotANumber(s.to_string()));
    }
    let value: u64 = s
        .parse()
        .map_err(|_| IdParseError::Overflow(s.to_string()))?;
    NonZeroU64::new(value).ok_or(IdParseError::Zero)
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(NonZeroU64);

        impl $name {
            /// Creates an identifier, returning `None` for zero.
            #[must_use]
            pub const fn new(value: u64) -> Option<Self> {
                match NonZeroU64::new(value) {
                    Some(v) => Some(Self(v)),
                    None => None,
                }
            }

            /// Returns the raw numeric value.
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0.get()
            }
        }

        impl From<NonZeroU64> for $name {
            fn from(value: NonZeroU64) -> Self {
                Self(value)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_positive(s).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Identifier of a pipeline.
    PipelineId
);
entity_id!(
    /// Identifier of an event.
    EventId
);
entity_id!(
    /// Identifier of a stage.
    StageId
);
entity_id!(
    /// Identifier of a job referenced by a stage.
    JobId
);
