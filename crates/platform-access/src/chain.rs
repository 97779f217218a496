//! Entity-chain checks
//!
//! The only part of an access decision that reads the entity graph. Both
//! checks ask one question of the repository: does entity A list entity B as
//! a child?
//!
//! - **Derivation** builds a virtual parent chain when a grant names a
//!   company and the request addresses one of its children directly, and
//!   lets a grant reach sub-resources addressed through its own entity.
//! - **Validation** rejects `PARENT:<a>:CHILD:<b>` requests where `b` is not
//!   actually a child of `a`.

use platform_entity::{EntityId, EntityRepository, RepositoryContext};
use tracing::debug;

use crate::compat::CompatibilityPolicy;
use crate::descriptor::{
    compare_chain_tokens, entity_ids, expand_access_descriptor_tokens, ChainElement, COMPANY,
    WILDCARD,
};
use crate::error::AccessResult;

/// Deepest resource chain (in namespace/id levels) eligible for derivation.
pub const MAX_DERIVATION_LEVELS: usize = 2;

/// Chain length on which parent/child validation is enforced.
pub const VALIDATED_CHAIN_LEN: usize = 4;

/// Entity-graph queries for one access decision.
pub struct ChainResolver<'a> {
    entities: &'a dyn EntityRepository,
    ctx: &'a RepositoryContext,
    policy: &'a CompatibilityPolicy,
}

impl<'a> ChainResolver<'a> {
    /// Create a resolver over a repository.
    pub fn new(
        entities: &'a dyn EntityRepository,
        ctx: &'a RepositoryContext,
        policy: &'a CompatibilityPolicy,
    ) -> Self {
        Self {
            entities,
            ctx,
            policy,
        }
    }

    /// Check if `parent` exists and lists `child` as an effective child.
    ///
    /// A missing parent is a plain `false`.
    pub fn is_child_of(&self, parent: &EntityId, child: &EntityId) -> AccessResult<bool> {
        let Some(entity) = self.entities.try_get_entity(self.ctx, parent)? else {
            debug!(parent = %parent, "Parent entity not found");
            return Ok(false);
        };

        let found = entity
            .associations_to(child)
            .any(|a| self.policy.is_effective_child(a));
        Ok(found)
    }

    /// Build `COMPANY:<grant head>:<resource chain...>` when the first entity
    /// id of the grant lists the first entity id of the resource as a child.
    ///
    /// When both chains are headed by the same entity the resource already
    /// sits under the granted entity; the resource chain is returned as-is
    /// without a repository lookup.
    ///
    /// Returns `None` when either chain has no entity id, when the resource
    /// chain is deeper than [`MAX_DERIVATION_LEVELS`], or when the
    /// association does not exist.
    pub fn derive_parent_chain(
        &self,
        resource: &[String],
        grant: &[String],
    ) -> AccessResult<Option<Vec<String>>> {
        if chain_levels(resource) > MAX_DERIVATION_LEVELS {
            return Ok(None);
        }

        let (Some(grant_head), Some(resource_head)) = (head_entity_id(grant), head_entity_id(resource))
        else {
            return Ok(None);
        };

        if grant_head == resource_head {
            return Ok(Some(resource.to_vec()));
        }

        if !self.is_child_of(&grant_head, &resource_head)? {
            return Ok(None);
        }

        let mut derived = Vec::with_capacity(resource.len() + 2);
        derived.push(COMPANY.to_string());
        derived.push(grant_head.canonical().to_uppercase());
        derived.extend(resource.iter().cloned());
        Ok(Some(derived))
    }

    /// Check whether a grant authorizes `resource` through a derived parent
    /// chain.
    ///
    /// The derived chain matches when it compares equal to the expanded
    /// grant, or when any entity id in it also appears in the expanded grant.
    pub fn matches_derived(&self, resource: &[String], grant: &[String]) -> AccessResult<bool> {
        let Some(derived) = self.derive_parent_chain(resource, grant)? else {
            return Ok(false);
        };

        let expanded = expand_access_descriptor_tokens(derived.len(), grant);
        if compare_chain_tokens(&derived, &expanded) {
            return Ok(true);
        }

        let granted = entity_ids(&expanded);
        Ok(entity_ids(&derived).iter().any(|id| granted.contains(id)))
    }

    /// Validate a `NAMESPACE:<parent>:NAMESPACE:<child>` chain against the
    /// entity graph.
    ///
    /// Only chains of exactly [`VALIDATED_CHAIN_LEN`] tokens whose id
    /// positions are both concrete are checked; everything else passes.
    pub fn validate_resource_chain(&self, resource: &[String]) -> AccessResult<bool> {
        if resource.len() != VALIDATED_CHAIN_LEN {
            return Ok(true);
        }
        if resource[1] == WILDCARD || resource[3] == WILDCARD {
            return Ok(true);
        }

        let (Some(parent), Some(child)) = (
            EntityId::try_parse(&resource[1]),
            EntityId::try_parse(&resource[3]),
        ) else {
            debug!(chain = ?resource, "Chain ids are not entity ids");
            return Ok(false);
        };

        self.is_child_of(&parent, &child)
    }
}

/// First entity id in a token list.
fn head_entity_id(tokens: &[String]) -> Option<EntityId> {
    tokens
        .iter()
        .find_map(|t| ChainElement::classify(t).entity_id())
}

/// Number of namespace/id levels in a chain.
fn chain_levels(tokens: &[String]) -> usize {
    (tokens.len() + 1) / 2
}
