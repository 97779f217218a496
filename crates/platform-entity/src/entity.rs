//! Entity graph domain models
//!
//! Entities are the nodes of the platform graph (companies, campaigns,
//! creatives, users). Each entity carries its outgoing associations, which is
//! all the access matcher needs to walk parent/child relationships.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::EntityId;

/// Kind of directed edge between two entities.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AssociationType {
    /// The target is owned by (nested under) the source.
    Child,
    /// Looser link between two entities.
    ///
    /// Older writers record ownership edges with this type, so the access
    /// matcher can be configured to treat it as [`AssociationType::Child`].
    Relationship,
    /// The target owns the source.
    Parent,
}

impl AssociationType {
    /// Get the string representation of the association type.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssociationType::Child => "child",
            AssociationType::Relationship => "relationship",
            AssociationType::Parent => "parent",
        }
    }

    /// Parse association type from string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "child" => Some(AssociationType::Child),
            "relationship" => Some(AssociationType::Relationship),
            "parent" => Some(AssociationType::Parent),
            _ => None,
        }
    }
}

/// A directed edge from an entity to `target_entity_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Association {
    /// The entity this edge points at.
    pub target_entity_id: EntityId,
    /// What the edge means.
    pub association_type: AssociationType,
}

impl Association {
    /// Create a new association.
    pub fn new(target_entity_id: EntityId, association_type: AssociationType) -> Self {
        Self {
            target_entity_id,
            association_type,
        }
    }

    /// Shorthand for a [`AssociationType::Child`] edge.
    pub fn child(target_entity_id: EntityId) -> Self {
        Self::new(target_entity_id, AssociationType::Child)
    }
}

/// A node in the platform entity graph.
///
/// # Examples
///
/// ```
/// use platform_entity::{Entity, EntityId, AssociationType};
///
/// let campaign = EntityId::new();
/// let company = Entity::new(EntityId::new(), "company")
///     .with_association(campaign, AssociationType::Child);
///
/// assert!(company.has_association(&campaign, AssociationType::Child));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier
    pub id: EntityId,

    /// Entity category, e.g. "company" or "campaign"
    pub entity_type: String,

    /// Optional display name
    pub name: Option<String>,

    /// Outgoing edges
    #[serde(default)]
    pub associations: Vec<Association>,

    /// When the entity was created
    pub created_at: DateTime<Utc>,

    /// When the entity was last updated
    pub updated_at: DateTime<Utc>,
}

impl Entity {
    /// Creates a new entity with no associations.
    pub fn new(id: EntityId, entity_type: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            entity_type: entity_type.into(),
            name: None,
            associations: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add an outgoing association.
    pub fn with_association(mut self, target: EntityId, association_type: AssociationType) -> Self {
        self.associate(target, association_type);
        self
    }

    /// Add an outgoing association in place.
    pub fn associate(&mut self, target: EntityId, association_type: AssociationType) {
        self.associations
            .push(Association::new(target, association_type));
        self.updated_at = Utc::now();
    }

    /// Check for an edge of exactly `association_type` to `target`.
    pub fn has_association(&self, target: &EntityId, association_type: AssociationType) -> bool {
        self.associations
            .iter()
            .any(|a| a.target_entity_id == *target && a.association_type == association_type)
    }

    /// All associations pointing at `target`, whatever their type.
    pub fn associations_to<'a>(
        &'a self,
        target: &'a EntityId,
    ) -> impl Iterator<Item = &'a Association> + 'a {
        self.associations
            .iter()
            .filter(move |a| a.target_entity_id == *target)
    }
}

/// A platform user, addressed externally by `user_id` and internally by the
/// entity id that keys the user's access list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// External user identifier (login name, subject claim)
    pub user_id: String,

    /// Entity id of the user in the platform graph
    pub entity_id: EntityId,

    /// Optional contact email
    pub email: Option<String>,

    /// When the user was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user bound to `entity_id`.
    pub fn new(user_id: impl Into<String>, entity_id: EntityId) -> Self {
        Self {
            user_id: user_id.into(),
            entity_id,
            email: None,
            created_at: Utc::now(),
        }
    }

    /// Set the contact email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}
