//! `storefront-core`: shared building blocks for the storefront client.
//!
//! This crate contains **pure** primitives (no IO, no async, no caching):
//! identifiers, pagination windows, the entity-type key used for cache
//! invalidation, and the domain error model.

pub mod entity;
pub mod error;
pub mod id;
pub mod page;

pub use entity::{Entity, EntityType, SearchFields};
pub use error::{DomainError, DomainResult};
pub use id::{ProductId, PurchaseOrderId, ServiceOrderId, SupplierId, UserId};
pub use page::{Page, PageRequest};
