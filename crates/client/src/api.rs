//! API collaborator contracts.
//!
//! Transport is out of scope here: implementations wrap whatever HTTP client
//! the host application uses and map failures with [`ApiError::from_response`]
//! and [`ApiError::transport`].
//!
//! [`ApiError::from_response`]: crate::error::ApiError::from_response
//! [`ApiError::transport`]: crate::error::ApiError::transport

use async_trait::async_trait;

use storefront_cart::{AddToCart, CartLine};
use storefront_core::{Page, PageRequest, PurchaseOrderId, SupplierId};
use storefront_parties::{Supplier, SupplierDraft};
use storefront_purchasing::{PurchaseOrder, PurchaseOrderDraft};

use crate::error::ApiResult;

/// Cart endpoints.
#[async_trait]
pub trait CartApi: Send + Sync {
    /// Add units to the signed-in user's cart; returns the resulting line.
    async fn add_to_cart(&self, request: &AddToCart) -> ApiResult<CartLine>;
}

/// Supplier endpoints.
#[async_trait]
pub trait SupplierApi: Send + Sync {
    async fn list(&self, request: PageRequest) -> ApiResult<Page<Supplier>>;

    async fn create(&self, draft: &SupplierDraft) -> ApiResult<Supplier>;

    async fn update(&self, id: &SupplierId, draft: &SupplierDraft) -> ApiResult<Supplier>;

    async fn delete(&self, id: &SupplierId) -> ApiResult<()>;
}

/// Purchase-order endpoints.
#[async_trait]
pub trait PurchaseOrderApi: Send + Sync {
    async fn list(&self, request: PageRequest) -> ApiResult<Page<PurchaseOrder>>;

    async fn create(&self, draft: &PurchaseOrderDraft) -> ApiResult<PurchaseOrder>;

    async fn update(
        &self,
        id: &PurchaseOrderId,
        draft: &PurchaseOrderDraft,
    ) -> ApiResult<PurchaseOrder>;

    async fn delete(&self, id: &PurchaseOrderId) -> ApiResult<()>;
}
