//! Application state store: cart contents and the signed-in profile.
//!
//! One `AppStore` is created per application and handed to every consumer
//! as `Arc<AppStore>`. Consumers read snapshots and write through the
//! methods below; nothing holds a lock across an `.await`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use storefront_cart::{Cart, CartLine};
use storefront_core::ProductId;

use crate::identity::{IdentitySource, UserProfile};

/// Whether the profile has been resolved yet.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileStatus {
    Loading,
    SignedOut,
    SignedIn(UserProfile),
}

#[derive(Debug)]
pub struct AppStore {
    cart: RwLock<Cart>,
    profile: RwLock<ProfileStatus>,
    cart_changed: AtomicBool,
}

impl AppStore {
    /// Empty cart, profile still loading.
    pub fn new() -> Self {
        Self {
            cart: RwLock::new(Cart::new()),
            profile: RwLock::new(ProfileStatus::Loading),
            cart_changed: AtomicBool::new(false),
        }
    }

    pub fn cart(&self) -> Cart {
        self.cart.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn cart_quantity(&self, product_id: &ProductId) -> u32 {
        self.cart
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .quantity_of(product_id)
    }

    /// Replace the cart with a freshly fetched one.
    pub fn replace_cart(&self, cart: Cart) {
        *self.cart.write().unwrap_or_else(PoisonError::into_inner) = cart;
    }

    /// Record the server's line after a successful add-to-cart.
    pub fn apply_cart_line(&self, line: CartLine) {
        self.cart
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .apply_line(line);
    }

    pub fn clear_cart(&self) {
        self.cart.write().unwrap_or_else(PoisonError::into_inner).clear();
        self.mark_cart_changed();
    }

    /// Signal that the cart should be refetched by whoever renders it.
    pub fn mark_cart_changed(&self) {
        self.cart_changed.store(true, Ordering::Release);
    }

    /// Read and reset the cart-changed signal.
    pub fn take_cart_changed(&self) -> bool {
        self.cart_changed.swap(false, Ordering::AcqRel)
    }

    pub fn profile_status(&self) -> ProfileStatus {
        self.profile
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Resolve the profile (`None` = signed out).
    pub fn set_profile(&self, profile: Option<UserProfile>) {
        let status = match profile {
            Some(profile) => ProfileStatus::SignedIn(profile),
            None => ProfileStatus::SignedOut,
        };
        *self.profile.write().unwrap_or_else(PoisonError::into_inner) = status;
    }

    /// Sign out: forget the profile and the cart.
    pub fn sign_out(&self) {
        self.set_profile(None);
        self.clear_cart();
    }
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentitySource for AppStore {
    fn current(&self) -> Option<UserProfile> {
        match self.profile_status() {
            ProfileStatus::SignedIn(profile) => Some(profile),
            ProfileStatus::Loading | ProfileStatus::SignedOut => None,
        }
    }
}
