//! Identifiers shared across the dialogue system.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity of a dialogue asset.
///
/// Two loaded dialogues must never share a GUID; the catalog reports
/// collisions instead of resolving them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DialogueGuid(pub Uuid);

impl DialogueGuid {
    /// Create a new random dialogue GUID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a dialogue GUID from a specific UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Create a nil GUID.
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for DialogueGuid {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DialogueGuid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
