//! `storefront-client`
//!
//! **Responsibility:** client-side write/read coordination for the storefront
//! and the admin back-office.
//!
//! This crate provides:
//! - A paginated list cache with neighbour prefetch and per-entity-type invalidation
//! - A mutation coordinator (pending/error state, notifications, invalidation)
//! - An explicit application store for cart and identity state
//! - View-state screens: add-to-cart control, suppliers, purchase orders, service history
//!
//! The REST API, notifications, navigation and export are collaborators
//! injected through the traits in [`api`], [`notify`], [`identity`] and [`export`].

pub mod api;
pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod export;
pub mod identity;
pub mod mutation;
pub mod notify;
pub mod screens;
pub mod store;

#[cfg(test)]
mod test_support;

pub use api::{CartApi, PurchaseOrderApi, SupplierApi};
pub use cache::{CacheKey, ListCache};
pub use config::{ClientConfig, Messages, UnauthenticatedCartPolicy};
pub use context::AppContext;
pub use error::{ApiError, ApiResult, ClientError};
pub use export::Exporter;
pub use identity::{IdentitySource, Navigator, ServiceOrder, UserProfile};
pub use mutation::{MutationCoordinator, MutationPlan, MutationState};
pub use notify::{NotificationSink, TracingNotifier};
pub use screens::{
    AddToCartControl, AddToCartOutcome, PurchaseOrderForm, PurchaseOrderScreen, ServiceHistoryView,
    SupplierForm, SupplierScreen, service_history,
};
pub use store::{AppStore, ProfileStatus};
