//! # Access Matcher
//!
//! Decides whether a user's grant descriptors authorize a canonical resource.
//!
//! ## Decision order
//!
//! ```text
//! 1. Exact       descriptor == grant (case-insensitive)
//! 2. Inherited   grant chain expanded to the resource length, compared
//!                token by token with wildcards and globs
//! 3. Derived     grant names a parent entity of the resource head;
//!                compare against COMPANY:<parent>:<resource chain>.
//!                A grant headed by the resource's own head entity covers
//!                its sub-resources directly
//! ```
//!
//! Each step only runs when the previous ones found nothing; step 3 is the
//! only one that reads the entity repository. A user check additionally
//! validates two-level `PARENT:<a>:CHILD:<b>` chains against the graph.

use std::sync::Arc;

use platform_entity::{EntityId, EntityRepository, RepositoryContext, UserAccessListStore};
use tracing::{debug, instrument};

use crate::canonical::CanonicalResource;
use crate::chain::ChainResolver;
use crate::compat::CompatibilityPolicy;
use crate::config::AccessConfig;
use crate::descriptor::{
    compare_chain_tokens, compare_modifier_tokens, expand_access_descriptor_tokens,
    extract_action, extract_message, extract_resource_list, COMPANY, WILDCARD,
};
use crate::error::AccessResult;

/// Grant-descriptor access matcher.
///
/// Holds no per-request state; one instance can serve concurrent callers.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use platform_access::{AccessConfig, AccessMatcher, CanonicalResource};
/// use platform_entity::{EntityId, InMemoryAccessListStore, InMemoryEntityRepository};
///
/// let user = EntityId::new();
/// let company = EntityId::new();
/// let grants = InMemoryAccessListStore::new()
///     .with_grants(user, [format!("COMPANY:{}:#:GET", company)]);
///
/// let matcher = AccessMatcher::new(
///     Arc::new(InMemoryEntityRepository::new()),
///     Arc::new(grants),
///     AccessConfig::default(),
/// );
///
/// let uri = format!("http://host/api/entity/company/{}", company);
/// let resource = CanonicalResource::build(&uri, "GET").unwrap();
/// assert!(matcher.check_access(&resource, Some(&user)).unwrap());
/// assert!(!matcher.check_access(&resource, None).unwrap());
/// ```
pub struct AccessMatcher {
    entities: Arc<dyn EntityRepository>,
    access_lists: Arc<dyn UserAccessListStore>,
    global_access_list: Vec<String>,
    policy: CompatibilityPolicy,
    context: RepositoryContext,
}

impl std::fmt::Debug for AccessMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessMatcher")
            .field("global_access_list", &self.global_access_list)
            .field("policy", &self.policy)
            .finish()
    }
}

impl AccessMatcher {
    /// Create a matcher over the given collaborators.
    pub fn new(
        entities: Arc<dyn EntityRepository>,
        access_lists: Arc<dyn UserAccessListStore>,
        config: AccessConfig,
    ) -> Self {
        Self {
            entities,
            access_lists,
            global_access_list: config.global_access_list,
            policy: config.compatibility,
            context: RepositoryContext::default(),
        }
    }

    /// Use a specific repository context for every lookup.
    pub fn with_context(mut self, context: RepositoryContext) -> Self {
        self.context = context;
        self
    }

    /// The repository context forwarded to lookups.
    pub fn context(&self) -> &RepositoryContext {
        &self.context
    }

    /// Check whether a user may access a resource.
    ///
    /// A missing user is denied. Resources outside the entity service are
    /// allowed while the non-canonical compatibility rule is on. Otherwise
    /// the user's grants must match and the resource chain must be valid.
    #[instrument(skip(self, resource), fields(descriptor = %resource))]
    pub fn check_access(
        &self,
        resource: &CanonicalResource,
        user: Option<&EntityId>,
    ) -> AccessResult<bool> {
        let Some(user) = user else {
            debug!("No user entity, denying");
            return Ok(false);
        };

        if self.policy.bypasses_matching(resource) {
            debug!("Non-canonical resource allowed by compatibility rule");
            return Ok(true);
        }

        let grants = self.access_lists.get_user_access_list(user)?;
        if !self.match_access(resource, &grants, false)? {
            return Ok(false);
        }

        let valid = self.validate_resource_chain(resource)?;
        if !valid {
            debug!("Resource chain failed parent/child validation");
        }
        Ok(valid)
    }

    /// Check a resource against the global allow-list.
    ///
    /// Never reads the entity graph.
    pub fn check_global_access(&self, resource: &CanonicalResource) -> bool {
        let grants = &self.global_access_list;
        Self::exact_match(resource, grants) || Self::inherited_match(resource, grants).0
    }

    /// Evaluate a resource against an explicit grant list.
    ///
    /// With `check_global_only` set, parent-chain derivation is skipped and
    /// no repository lookup happens.
    pub fn match_access(
        &self,
        resource: &CanonicalResource,
        grants: &[String],
        check_global_only: bool,
    ) -> AccessResult<bool> {
        if Self::exact_match(resource, grants) {
            debug!(descriptor = %resource, "Exact grant match");
            return Ok(true);
        }

        let (matched, candidates) = Self::inherited_match(resource, grants);
        if matched {
            debug!(descriptor = %resource, "Inherited grant match");
            return Ok(true);
        }
        if check_global_only {
            return Ok(false);
        }

        let resolver = ChainResolver::new(self.entities.as_ref(), &self.context, &self.policy);
        for grant in candidates {
            if resolver.matches_derived(resource.resource_chain(), &extract_resource_list(grant))? {
                debug!(descriptor = %resource, grant = %grant, "Derived parent chain match");
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Validate the parent/child relationship encoded in a two-level chain.
    pub fn validate_resource_chain(&self, resource: &CanonicalResource) -> AccessResult<bool> {
        ChainResolver::new(self.entities.as_ref(), &self.context, &self.policy)
            .validate_resource_chain(resource.resource_chain())
    }

    /// Company id named by the first `COMPANY:<id>` grant of a user.
    ///
    /// Returns a single-element list, or an empty one when no grant names a
    /// concrete company.
    pub fn get_user_company_by_access_list(&self, user: &EntityId) -> AccessResult<Vec<EntityId>> {
        let grants = self.access_lists.get_user_access_list(user)?;
        let company = grants.iter().find_map(|grant| {
            let tokens = extract_resource_list(grant);
            match tokens.as_slice() {
                [namespace, id, ..] if namespace.eq_ignore_ascii_case(COMPANY) && id != WILDCARD => {
                    EntityId::try_parse(id)
                }
                _ => None,
            }
        });
        Ok(company.into_iter().collect())
    }

    fn exact_match(resource: &CanonicalResource, grants: &[String]) -> bool {
        grants
            .iter()
            .any(|grant| grant.to_uppercase() == resource.descriptor())
    }

    /// Wildcard/glob match. Also returns the grants that survived the action
    /// and message filters, for the derivation step.
    fn inherited_match<'g>(
        resource: &CanonicalResource,
        grants: &'g [String],
    ) -> (bool, Vec<&'g String>) {
        let chain = resource.resource_chain();
        let action = vec![extract_action(resource.descriptor())];
        let message = vec![extract_message(resource.descriptor())];

        let candidates: Vec<&String> = grants
            .iter()
            .filter(|grant| compare_modifier_tokens(&action, &[extract_action(grant)]))
            .filter(|grant| compare_modifier_tokens(&message, &[extract_message(grant)]))
            .collect();

        let matched = candidates.iter().any(|grant| {
            let expanded = expand_access_descriptor_tokens(chain.len(), &extract_resource_list(grant));
            compare_chain_tokens(chain, &expanded)
        });

        (matched, candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform_entity::{
        AssociationType, Entity, InMemoryAccessListStore, InMemoryEntityRepository,
        RepositoryError, RepositoryResult,
    };

    struct Unreachable;

    impl EntityRepository for Unreachable {
        fn try_get_entity(
            &self,
            _ctx: &RepositoryContext,
            _id: &EntityId,
        ) -> RepositoryResult<Option<Entity>> {
            Err(RepositoryError::Transport("connection refused".to_string()))
        }
    }

    impl UserAccessListStore for Unreachable {
        fn get_user_access_list(&self, _user: &EntityId) -> RepositoryResult<Vec<String>> {
            Err(RepositoryError::Transport("connection refused".to_string()))
        }
    }

    fn matcher(repo: InMemoryEntityRepository, grants: InMemoryAccessListStore) -> AccessMatcher {
        AccessMatcher::new(Arc::new(repo), Arc::new(grants), AccessConfig::default())
    }

    fn resource(uri: &str, action: &str) -> CanonicalResource {
        CanonicalResource::build(uri, action).unwrap()
    }

    fn grants(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let m = matcher(InMemoryEntityRepository::new(), InMemoryAccessListStore::new());
        let r = resource("http://host/api/entity/company", "GET");
        assert!(m.match_access(&r, &grants(&["company:*:#:get"]), true).unwrap());
    }

    #[test]
    fn test_action_filter() {
        let m = matcher(InMemoryEntityRepository::new(), InMemoryAccessListStore::new());
        let r = resource("http://host/api/entity/company", "POST");
        assert!(!m.match_access(&r, &grants(&["COMPANY:*:#:GET"]), false).unwrap());
        assert!(m.match_access(&r, &grants(&["COMPANY:*:#:*"]), false).unwrap());
        assert!(m.match_access(&r, &grants(&["COMPANY:*:#:P*"]), false).unwrap());
    }

    #[test]
    fn test_message_filter() {
        let m = matcher(InMemoryEntityRepository::new(), InMemoryAccessListStore::new());
        let r = resource("http://host/api/entity/company?view=summary", "GET");
        assert_eq!(r.descriptor(), "COMPANY:*:#:GET:SUMMARY");

        assert!(!m.match_access(&r, &grants(&["COMPANY:*:#:GET"]), false).unwrap());
        assert!(!m.match_access(&r, &grants(&["COMPANY:*:#:GET:DETAIL"]), false).unwrap());
        assert!(m.match_access(&r, &grants(&["COMPANY:*:#:GET:*"]), false).unwrap());
        assert!(m.match_access(&r, &grants(&["COMPANY:*:#:GET:SUMMARY"]), false).unwrap());
        assert!(m.match_access(&r, &grants(&["COMPANY:#:GET:SUM*", "COMPANY:*:#:GET:SUM*"]), false).unwrap());
    }

    #[test]
    fn test_sticky_wildcard_grant_covers_subchains() {
        let company = EntityId::new();
        let campaign = EntityId::new();
        let m = matcher(InMemoryEntityRepository::new(), InMemoryAccessListStore::new());
        let r = resource(
            &format!("http://host/api/entity/company/{}/campaign/{}/creative", company, campaign),
            "GET",
        );
        let grant = format!("COMPANY:{}:*:#:GET", company);
        assert!(m.match_access(&r, &[grant], false).unwrap());

        let other = format!("COMPANY:{}:*:#:GET", EntityId::new());
        assert!(!m.match_access(&r, &[other], false).unwrap());
    }

    #[test]
    fn test_company_grant_covers_own_subchains_by_derivation() {
        let company = EntityId::new();
        let m = matcher(InMemoryEntityRepository::new(), InMemoryAccessListStore::new());
        let r = resource(&format!("http://host/api/entity/company/{}/campaign", company), "GET");
        let grant = vec![format!("COMPANY:{}:#:GET", company)];

        assert!(!m.match_access(&r, &grant, true).unwrap());
        assert!(m.match_access(&r, &grant, false).unwrap());

        let post = resource(&format!("http://host/api/entity/company/{}/campaign", company), "POST");
        assert!(!m.match_access(&post, &grant, false).unwrap());
    }

    #[test]
    fn test_derivation_skipped_for_global_checks() {
        let campaign = EntityId::new();
        let company = Entity::new(EntityId::new(), "company").with_association(campaign, AssociationType::Child);
        let company_id = company.id;
        let m = matcher(
            InMemoryEntityRepository::new().with_entity(company),
            InMemoryAccessListStore::new(),
        );
        let r = resource(&format!("http://host/api/entity/campaign/{}", campaign), "GET");
        let grant = vec![format!("COMPANY:{}:#:GET", company_id)];

        assert!(!m.match_access(&r, &grant, true).unwrap());
        assert!(m.match_access(&r, &grant, false).unwrap());
    }

    #[test]
    fn test_derivation_respects_action_filter() {
        let campaign = EntityId::new();
        let company = Entity::new(EntityId::new(), "company").with_association(campaign, AssociationType::Child);
        let company_id = company.id;
        let m = matcher(
            InMemoryEntityRepository::new().with_entity(company),
            InMemoryAccessListStore::new(),
        );
        let r = resource(&format!("http://host/api/entity/campaign/{}", campaign), "DELETE");
        let grant = vec![format!("COMPANY:{}:#:GET", company_id)];
        assert!(!m.match_access(&r, &grant, false).unwrap());
    }

    #[test]
    fn test_user_company_by_access_list() {
        let user = EntityId::new();
        let company = EntityId::new();
        let store = InMemoryAccessListStore::new().with_grants(
            user,
            vec![
                "ROOT:#:GET".to_string(),
                "COMPANY:*:#:GET".to_string(),
                "COMPANY:ACME:#:GET".to_string(),
                format!("company:{}:campaign:*:#:GET", company),
                format!("COMPANY:{}:#:GET", EntityId::new()),
            ],
        );
        let m = matcher(InMemoryEntityRepository::new(), store);

        assert_eq!(m.get_user_company_by_access_list(&user).unwrap(), vec![company]);
        assert!(m
            .get_user_company_by_access_list(&EntityId::new())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_grant_store_failure_propagates() {
        let m = AccessMatcher::new(
            Arc::new(InMemoryEntityRepository::new()),
            Arc::new(Unreachable),
            AccessConfig::default(),
        );
        let r = resource("http://host/api/entity/company", "GET");
        let err = m.check_access(&r, Some(&EntityId::new())).unwrap_err();
        assert_eq!(err.error_code(), "LOOKUP_FAILED");
    }

    #[test]
    fn test_repository_failure_propagates_from_derivation() {
        let m = AccessMatcher::new(
            Arc::new(Unreachable),
            Arc::new(InMemoryAccessListStore::new()),
            AccessConfig::default(),
        );
        let r = resource(&format!("http://host/api/entity/campaign/{}", EntityId::new()), "GET");
        let grant = vec![format!("COMPANY:{}:#:GET", EntityId::new())];
        assert!(m.match_access(&r, &grant, false).is_err());
        assert!(!m.match_access(&r, &grant, true).unwrap());
    }

    #[test]
    fn test_malformed_grants_never_fail() {
        let m = matcher(InMemoryEntityRepository::new(), InMemoryAccessListStore::new());
        let r = resource("http://host/api/entity/company", "GET");
        let junk = grants(&["", ":", ":#:", "#", "COMPANY", "::::#::::", "[*"]);
        assert!(!m.match_access(&r, &junk, false).unwrap());
    }

    #[test]
    fn test_matcher_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AccessMatcher>();
    }
}
