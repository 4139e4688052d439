use serde::{Deserialize, Serialize};

use storefront_core::ProductId;

/// Catalog product as seen by the storefront.
///
/// `end_stock` is a snapshot taken when the product was loaded; it may be
/// stale relative to the server (no reservation or locking client-side).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: ProductId,
    #[serde(default)]
    pub name: String,
    pub end_stock: u32,
}

impl Product {
    pub fn new(product_id: ProductId, name: impl Into<String>, end_stock: u32) -> Self {
        Self {
            product_id,
            name: name.into(),
            end_stock,
        }
    }

    pub fn in_stock(&self) -> bool {
        self.end_stock > 0
    }
}
