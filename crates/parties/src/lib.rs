//! Parties domain module (suppliers as managed by the back-office).
//!
//! This crate contains the supplier model and the rules the supplier form
//! enforces before anything is sent to the API (no IO, no HTTP, no storage).

pub mod supplier;

pub use supplier::{Supplier, SupplierDraft, SupplierProduct};
