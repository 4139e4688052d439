//! Purchasing domain module (purchase orders as managed by the back-office).
//!
//! This crate contains the purchase-order model, the creation form's rules,
//! and the supplier exclusion list (no IO, no HTTP, no storage).

pub mod order;

pub use order::{PurchaseOrder, PurchaseOrderDraft, SupplierExclusions, SupplierSummary};
