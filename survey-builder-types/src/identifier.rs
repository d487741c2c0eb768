use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a question for the lifetime of one editing session.
///
/// Assigned once when a question is created or loaded and never derived from
/// its position, so it survives reordering, deletion of other questions and
/// duplication (the copy gets its own id). Edit ids are never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EditId {
    uuid: Uuid,
}

impl EditId {
    /// Generate a fresh, random edit id.
    pub fn generate() -> Self {
        Self {
            uuid: Uuid::new_v4(),
        }
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self { uuid }
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.uuid
    }
}

impl fmt::Display for EditId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uuid)
    }
}

/// Save-time identifier of a question, e.g. `"q3"` for the third question.
///
/// Positional ids are recomputed from the final order on every save. Stored
/// documents may contain ids that do not name any question, so any string is
/// accepted here; [`PositionalId::position`] tells whether it is well formed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionalId {
    id: String,
}

impl PositionalId {
    /// Create a positional id from its string form, as found in stored data.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// The id a question at the given 0-based index receives: `q{index + 1}`.
    pub fn from_index(index: usize) -> Self {
        Self::new(format!("q{}", index + 1))
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.id
    }

    /// The 0-based index this id denotes, if it has the canonical `qN` form.
    pub fn position(&self) -> Option<usize> {
        let digits = self.id.strip_prefix('q')?;
        if digits.is_empty() || digits.starts_with('0') {
            return None;
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let number: usize = digits.parse().ok()?;
        Some(number - 1)
    }
}

impl Ord for PositionalId {
    fn cmp(&self, other: &Self) -> Ordering {
        let rank = |id: &Self| id.position().unwrap_or(usize::MAX);
        rank(self)
            .cmp(&rank(other))
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for PositionalId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PositionalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl From<&str> for PositionalId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PositionalId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
