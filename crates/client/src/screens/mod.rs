//! View-state for the storefront and back-office screens.
//!
//! Each screen owns a cancellation token for its lifetime; closing (or
//! dropping) the screen cancels in-flight writes it started.

pub mod add_to_cart;
pub mod purchase_orders;
pub mod service_history;
pub mod suppliers;

pub use add_to_cart::{AddToCartControl, AddToCartOutcome};
pub use purchase_orders::{PurchaseOrderForm, PurchaseOrderScreen};
pub use service_history::{ServiceHistoryView, service_history};
pub use suppliers::{SupplierForm, SupplierScreen};
