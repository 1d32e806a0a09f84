//! Type-safe review identifier.
//!
//! [`ReviewId`] is a newtype wrapper around [`uuid::Uuid`] (v4) providing
//! type safety so that review identifiers cannot be confused with other
//! UUIDs such as session tokens.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a guest review.
///
/// Assigned by the document store at creation time and immutable
/// thereafter. Used as the document key in the reviews collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(uuid::Uuid);

impl ReviewId {
    /// Creates a new random `ReviewId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Creates a `ReviewId` from an existing [`uuid::Uuid`].
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for ReviewId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<uuid::Uuid> for ReviewId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}

impl From<ReviewId> for uuid::Uuid {
    fn from(id: ReviewId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn new_generates_unique_ids() {
        let a = ReviewId::new();
        let b = ReviewId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn serde_round_trip() {
        let id = ReviewId::new();
        let json = serde_json::to_string(&id).ok();
        let Some(json) = json else {
            panic!("serialization failed");
        };
        let deserialized: ReviewId = serde_json::from_str(&json).ok().unwrap_or_else(|| {
            panic!("deserialization failed");
        });
        assert_eq!(id, deserialized);
    }

    #[test]
    fn from_uuid_round_trip() {
        let uuid = uuid::Uuid::new_v4();
        let id = ReviewId::from_uuid(uuid);
        assert_eq!(*id.as_uuid(), uuid);
    }
}
