//! Transitional compatibility rules
//!
//! Two legacy allowances live here so that the matcher itself never has to
//! know about them:
//!
//! - Resources outside the entity service (`/api/entity/...`) predate
//!   canonical grants and are allowed without matching.
//! - Older writers record ownership edges as `Relationship` instead of
//!   `Child`.
//!
//! Both are on by default. [`CompatibilityPolicy::strict`] turns them off.

use platform_entity::{Association, AssociationType};
use serde::{Deserialize, Serialize};

use crate::canonical::CanonicalResource;

/// Switches for the transitional compatibility rules.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CompatibilityPolicy {
    /// Allow every resource that is not an entity-service resource.
    pub allow_non_canonical: bool,

    /// Count `Relationship` associations as `Child` associations.
    pub relationship_as_child: bool,
}

impl Default for CompatibilityPolicy {
    fn default() -> Self {
        Self {
            allow_non_canonical: true,
            relationship_as_child: true,
        }
    }
}

impl CompatibilityPolicy {
    /// Policy with every transitional allowance disabled.
    pub fn strict() -> Self {
        Self {
            allow_non_canonical: false,
            relationship_as_child: false,
        }
    }

    /// Check if a resource is subject to grant matching under the
    /// transitional rule: only entity-service API resources are.
    pub fn is_canonical(&self, resource: &CanonicalResource) -> bool {
        resource.targets_entity_service()
    }

    /// Check if a resource is allowed without consulting any grant.
    pub fn bypasses_matching(&self, resource: &CanonicalResource) -> bool {
        self.allow_non_canonical && !self.is_canonical(resource)
    }

    /// Check if an association makes its target a child of its source.
    pub fn is_effective_child(&self, association: &Association) -> bool {
        match association.association_type {
            AssociationType::Child => true,
            AssociationType::Relationship => self.relationship_as_child,
            AssociationType::Parent => false,
        }
    }
}
