//! Add-to-cart button with its quantity selector.

use std::sync::atomic::{AtomicU32, Ordering};

use tokio_util::sync::CancellationToken;

use storefront_cart::{AddToCart, CartLine, Product, check_add};
use storefront_core::DomainResult;

use crate::config::UnauthenticatedCartPolicy;
use crate::context::AppContext;
use crate::error::ClientError;
use crate::identity::IdentitySource;
use crate::mutation::{MutationCoordinator, MutationPlan};

/// Result of a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddToCartOutcome {
    /// The control was disabled; nothing happened.
    Ignored,
    /// The server accepted the line.
    Added(CartLine),
}

pub struct AddToCartControl {
    ctx: AppContext,
    product: Product,
    end_stock: AtomicU32,
    quantity: AtomicU32,
    mutation: MutationCoordinator,
    cancel: CancellationToken,
}

impl AddToCartControl {
    pub fn new(ctx: AppContext, product: Product) -> Self {
        let mutation = ctx.mutation();
        Self {
            end_stock: AtomicU32::new(product.end_stock),
            quantity: AtomicU32::new(1),
            ctx,
            product,
            mutation,
            cancel: CancellationToken::new(),
        }
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn quantity(&self) -> u32 {
        self.quantity.load(Ordering::Acquire)
    }

    pub fn set_quantity(&self, quantity: u32) {
        self.quantity.store(quantity, Ordering::Release);
    }

    /// Replace the stock snapshot (e.g. after the product is refetched).
    pub fn refresh_stock(&self, end_stock: u32) {
        self.end_stock.store(end_stock, Ordering::Release);
    }

    pub fn end_stock(&self) -> u32 {
        self.end_stock.load(Ordering::Acquire)
    }

    pub fn is_pending(&self) -> bool {
        self.mutation.is_pending()
    }

    /// Stock check for the selected quantity against what is already in the cart.
    pub fn check_stock(&self) -> DomainResult<()> {
        let in_cart = self.ctx.store.cart_quantity(&self.product.product_id);
        check_add(self.quantity(), in_cart, self.end_stock())
    }

    /// Disabled while a submission is pending or the stock guard says no.
    pub fn is_disabled(&self) -> bool {
        self.mutation.is_pending() || self.quantity() == 0 || self.check_stock().is_err()
    }

    pub fn label(&self) -> &str {
        let messages = &self.ctx.config.messages;
        if self.mutation.is_pending() {
            &messages.adding_to_cart_label
        } else {
            &messages.add_to_cart_label
        }
    }

    pub fn last_error(&self) -> Option<String> {
        self.mutation.state().error
    }

    pub async fn click(&self) -> Result<AddToCartOutcome, ClientError> {
        if self.is_disabled() {
            tracing::debug!(product_id = %self.product.product_id, "add-to-cart ignored: control disabled");
            return Ok(AddToCartOutcome::Ignored);
        }

        if !self.ctx.store.is_authenticated() {
            self.ctx.navigator.navigate(&self.ctx.config.auth_route);
            if self.ctx.config.unauthenticated_cart == UnauthenticatedCartPolicy::RedirectOnly {
                tracing::info!(product_id = %self.product.product_id, "add-to-cart suppressed: not signed in");
                return Err(ClientError::Unauthenticated);
            }
        }

        let request = AddToCart::new(self.product.product_id.clone(), self.quantity())?;
        let messages = &self.ctx.config.messages;
        let plan = MutationPlan::for_entity::<CartLine>(
            "cart.add",
            messages.added_to_cart.clone(),
            messages.add_to_cart_failed.clone(),
        );

        let api = self.ctx.cart_api.clone();
        let line = self
            .mutation
            .submit(&plan, &self.cancel, || async move { api.add_to_cart(&request).await })
            .await?;

        self.ctx.store.apply_cart_line(line.clone());
        self.ctx.store.mark_cart_changed();
        self.set_quantity(1);
        Ok(AddToCartOutcome::Added(line))
    }

    /// Tear down: cancel any in-flight submission.
    pub fn close(&self) {
        self.cancel.cancel();
    }
}

impl Drop for AddToCartControl {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
