//! Typed identifiers for blocks and documents.
//!
//! Both ID types wrap an opaque string owned by the middleware. Locally created
//! blocks get a UUIDv7 text id so they sort in creation order; ids arriving in
//! events are taken as-is. The `short()` form is for logs only, never used
//! as a lookup key.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from parsing identifiers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    /// Identifiers must not be empty.
    #[error("identifier is empty")]
    Empty,
}

/// A block identifier, unique within its document.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

/// A document identifier (the context a batch of events applies to).
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

// ── Shared behavior ─────────────────────────────────────────────────────────

macro_rules! impl_string_id {
    ($T:ident, $name:literal) => {
        impl $T {
            /// Wrap an existing identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Create a fresh time-ordered identifier (UUIDv7 text).
            pub fn generate() -> Self {
                Self(uuid::Uuid::now_v7().as_simple().to_string())
            }

            /// Parse, rejecting empty input.
            pub fn parse(s: &str) -> Result<Self, IdError> {
                if s.is_empty() {
                    Err(IdError::Empty)
                } else {
                    Ok(Self(s.to_string()))
                }
            }

            /// The raw identifier text.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// First 8 characters, for human display only, not lookup.
            pub fn short(&self) -> &str {
                let end = self
                    .0
                    .char_indices()
                    .nth(8)
                    .map(|(i, _)| i)
                    .unwrap_or(self.0.len());
                &self.0[..end]
            }
        }

        impl fmt::Display for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl fmt::Debug for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($name, "({})"), self.0)
            }
        }

        impl From<&str> for $T {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $T {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl AsRef<str> for $T {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

impl_string_id!(BlockId, "BlockId");
impl_string_id!(DocumentId, "DocumentId");

impl DocumentId {
    /// The root block of a document shares the document's identifier.
    pub fn root_block(&self) -> BlockId {
        BlockId(self.0.clone())
    }
}
