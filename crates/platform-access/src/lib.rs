//! # Platform Access
//!
//! This crate provides canonical-resource access control for the Relay
//! platform: request URIs are reduced to canonical descriptors and matched
//! against the grant descriptors stored for a user.
//!
//! ## Overview
//!
//! The platform-access crate handles:
//! - **Canonicalization**: URI + action → `CHAIN:#:ACTION[:MESSAGE]`
//! - **Descriptors**: Tokenizing, aligning and comparing grant tokens
//! - **Matching**: Exact, wildcard and derived-parent-chain matches
//! - **Validation**: Parent/child checks against the entity graph
//! - **Global access**: A configurable allow-list for anonymous requests
//!
//! ## Architecture
//!
//! ```text
//! Descriptor = RESOURCE_CHAIN :#: ACTION [: MESSAGE]
//!
//! Examples:
//!   "COMPANY:*:#:GET"             - List companies
//!   "COMPANY:<id>:#:GET"          - Read one company (and its direct children)
//!   "COMPANY:<id>:*:#:*"          - Anything under one company
//!   "*:#:*:*"                     - Superuser
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use platform_access::{AccessConfig, AccessMatcher, CanonicalResource};
//! use platform_entity::{EntityId, InMemoryAccessListStore, InMemoryEntityRepository};
//!
//! let admin = EntityId::new();
//! let grants = InMemoryAccessListStore::new().with_grants(admin, ["*:#:*:*"]);
//! let matcher = AccessMatcher::new(
//!     Arc::new(InMemoryEntityRepository::new()),
//!     Arc::new(grants),
//!     AccessConfig::default(),
//! );
//!
//! let resource = CanonicalResource::build("http://host/api/entity/company", "DELETE").unwrap();
//! assert!(matcher.check_access(&resource, Some(&admin)).unwrap());
//!
//! let page = CanonicalResource::build("http://host/about.html", "GET").unwrap();
//! assert!(matcher.check_global_access(&page));
//! ```
//!
//! ## Compatibility
//!
//! Two transitional allowances are on by default (see [`CompatibilityPolicy`]):
//! resources outside `/api/entity` bypass matching, and `Relationship`
//! associations count as `Child` associations.

pub mod canonical;
pub mod chain;
pub mod compat;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod ext;
pub mod matcher;
pub mod pattern;

// Re-export main types for convenience
pub use canonical::CanonicalResource;
pub use compat::CompatibilityPolicy;
pub use config::{AccessConfig, ConfigError};
pub use descriptor::ChainElement;
pub use error::{AccessError, AccessResult};
pub use ext::UserAccessExt;
pub use matcher::AccessMatcher;
