//! Access checks addressed by external user id.

use platform_entity::UserDirectory;
use tracing::debug;

use crate::canonical::CanonicalResource;
use crate::error::{AccessError, AccessResult};
use crate::matcher::AccessMatcher;

/// Resolves external user ids before checking access.
pub trait UserAccessExt {
    /// Resolve `user_id` through `directory`, then run
    /// [`AccessMatcher::check_access`] for the user's entity.
    ///
    /// An unknown user fails with [`AccessError::EntityNotFound`]; other
    /// directory failures surface as [`AccessError::Lookup`].
    fn check_user_access(
        &self,
        directory: &dyn UserDirectory,
        resource: &CanonicalResource,
        user_id: &str,
    ) -> AccessResult<bool>;
}

impl UserAccessExt for AccessMatcher {
    fn check_user_access(
        &self,
        directory: &dyn UserDirectory,
        resource: &CanonicalResource,
        user_id: &str,
    ) -> AccessResult<bool> {
        let user = directory.get_user(self.context(), user_id).map_err(|e| {
            if e.is_not_found() {
                debug!(user_id = %user_id, "Unknown user");
                AccessError::EntityNotFound {
                    user_id: user_id.to_string(),
                    source: e,
                }
            } else {
                AccessError::Lookup(e)
            }
        })?;

        self.check_access(resource, Some(&user.entity_id))
    }
}
