//! Cart domain module (products, cart lines, stock guard).
//!
//! This crate contains the storefront's cart rules, implemented purely as
//! deterministic logic (no IO, no HTTP, no storage). The cart itself lives in
//! the client's application store; this crate only says what a valid cart
//! and a valid add-to-cart request look like.

pub mod cart;
pub mod guard;
pub mod product;

pub use cart::{AddToCart, Cart, CartLine};
pub use guard::{can_add, check_add};
pub use product::Product;
