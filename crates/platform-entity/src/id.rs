//! Entity identifiers
//!
//! Every addressable entity in the platform graph is keyed by an [`EntityId`].
//! Identifiers appear inside resource URIs and grant descriptors, so parsing
//! is a total classification: a string either is a canonical entity id or it
//! is not, and callers never have to catch a failure to find out.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Canonical identifier of an entity in the platform graph.
///
/// The canonical string form is the hyphenated UUID representation. Parsing
/// accepts every textual UUID form (simple, hyphenated, braced, URN) and
/// normalizes it, so `{A1B2...}` and `a1b2...` refer to the same entity.
///
/// # Examples
///
/// ```
/// use platform_entity::EntityId;
///
/// let id = EntityId::new();
/// let parsed = EntityId::try_parse(&id.to_string().to_uppercase()).unwrap();
/// assert_eq!(id, parsed);
///
/// assert!(EntityId::try_parse("company").is_none());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct EntityId(Uuid);

impl EntityId {
    /// Generate a fresh, time-ordered entity id.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Parse a string as an entity id.
    ///
    /// Surrounding whitespace is ignored. Returns `None` for anything that is
    /// not a UUID in one of its textual forms.
    ///
    /// # Examples
    ///
    /// ```
    /// use platform_entity::EntityId;
    ///
    /// assert!(EntityId::try_parse("0191e4c4-7a3b-7c1d-9f00-000000000001").is_some());
    /// assert!(EntityId::try_parse("0191E4C47A3B7C1D9F00000000000001").is_some());
    /// assert!(EntityId::try_parse("logo.png").is_none());
    /// assert!(EntityId::try_parse("").is_none());
    /// ```
    pub fn try_parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s.trim()).ok().map(Self)
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// The canonical string form (lower-case hyphenated).
    pub fn canonical(&self) -> String {
        self.0.hyphenated().to_string()
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for EntityId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

impl From<Uuid> for EntityId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_form_is_hyphenated() {
        let id = EntityId::new();
        let canonical = id.canonical();
        assert_eq!(canonical.len(), 36);
        assert_eq!(canonical, id.to_string());
    }

    #[test]
    fn test_try_parse_normalizes_forms() {
        let id = EntityId::new();
        let simple = id.as_uuid().simple().to_string().to_uppercase();
        let braced = id.as_uuid().braced().to_string();

        assert_eq!(EntityId::try_parse(&simple), Some(id));
        assert_eq!(EntityId::try_parse(&braced), Some(id));
        assert_eq!(EntityId::try_parse(&format!("  {}  ", id)), Some(id));
    }

    #[test]
    fn test_try_parse_rejects_labels() {
        assert!(EntityId::try_parse("company").is_none());
        assert!(EntityId::try_parse("*").is_none());
        assert!(EntityId::try_parse("index.html").is_none());
        assert!(EntityId::try_parse("").is_none());
        assert!(EntityId::try_parse("ROOT").is_none());
    }

    #[test]
    fn test_from_str() {
        let id = EntityId::new();
        let parsed: EntityId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-an-id".parse::<EntityId>().is_err());
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = EntityId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
        let back: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
