//! # Platform Entity
//!
//! This crate provides the entity graph model and the lookup contracts that
//! the platform access matcher reads through.
//!
//! ## Overview
//!
//! The platform-entity crate handles:
//! - **Identifiers**: [`EntityId`], with total (non-panicking) parsing
//! - **Entities**: Graph nodes and their typed [`Association`]s
//! - **Users**: External user ids bound to entity ids
//! - **Contracts**: [`EntityRepository`], [`UserAccessListStore`], [`UserDirectory`]
//!
//! ## Architecture
//!
//! ```text
//! Company (Entity)
//!   ├─ Child ─→ Campaign (Entity)
//!   │             └─ Child ─→ Creative (Entity)
//!   └─ Relationship ─→ Advertiser (Entity)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use platform_entity::{
//!     AssociationType, Entity, EntityId, EntityRepository, InMemoryEntityRepository,
//!     RepositoryContext,
//! };
//!
//! let campaign = EntityId::new();
//! let company = Entity::new(EntityId::new(), "company")
//!     .with_association(campaign, AssociationType::Child);
//! let company_id = company.id;
//!
//! let repo = InMemoryEntityRepository::new().with_entity(company);
//! let found = repo
//!     .try_get_entity(&RepositoryContext::default(), &company_id)
//!     .unwrap();
//! assert!(found.is_some());
//! ```
//!
//! ## Integration
//!
//! This crate is designed to work with:
//! - `platform-access`: Canonical-resource access control

pub mod entity;
pub mod error;
pub mod id;
pub mod repository;

// Re-export main types for convenience
pub use entity::{Association, AssociationType, Entity, User};
pub use error::{RepositoryError, RepositoryResult};
pub use id::EntityId;
pub use repository::{
    EntityRepository, InMemoryAccessListStore, InMemoryEntityRepository, InMemoryUserDirectory,
    RepositoryContext, UserAccessListStore, UserDirectory,
};
