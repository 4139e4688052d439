//! Stock/quantity guard for the add-to-cart action.
//!
//! Evaluated on every render from the current cart and the current stock
//! snapshot. Never mutates anything.

use storefront_core::{DomainError, DomainResult};

/// Whether `requested` more units may be added on top of `existing` units
/// already in the cart, given `available` stock.
///
/// Overflow of `requested + existing` counts as exceeding stock.
pub fn can_add(requested: u32, existing: u32, available: u32) -> bool {
    if available == 0 {
        return false;
    }
    match requested.checked_add(existing) {
        Some(total) => total <= available,
        None => false,
    }
}

/// Like [`can_add`], but explains the rejection.
pub fn check_add(requested: u32, existing: u32, available: u32) -> DomainResult<()> {
    if available == 0 {
        return Err(DomainError::guard("product is out of stock"));
    }
    if !can_add(requested, existing, available) {
        return Err(DomainError::guard(format!(
            "requested {requested} with {existing} already in cart exceeds stock of {available}"
        )));
    }
    Ok(())
}
