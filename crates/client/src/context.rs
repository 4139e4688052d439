//! Shared application context handed to every screen.

use std::sync::Arc;

use crate::api::{CartApi, PurchaseOrderApi, SupplierApi};
use crate::cache::ListCache;
use crate::config::ClientConfig;
use crate::identity::Navigator;
use crate::mutation::MutationCoordinator;
use crate::notify::NotificationSink;
use crate::store::AppStore;

/// Application-wide collaborators and state, cheap to clone.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ClientConfig>,
    pub store: Arc<AppStore>,
    pub cache: Arc<ListCache>,
    pub notifier: Arc<dyn NotificationSink>,
    pub navigator: Arc<dyn Navigator>,
    pub cart_api: Arc<dyn CartApi>,
    pub supplier_api: Arc<dyn SupplierApi>,
    pub purchase_order_api: Arc<dyn PurchaseOrderApi>,
}

impl AppContext {
    /// Create a context with a fresh store and a cache sized from `config`.
    pub fn new(
        config: ClientConfig,
        cart_api: Arc<dyn CartApi>,
        supplier_api: Arc<dyn SupplierApi>,
        purchase_order_api: Arc<dyn PurchaseOrderApi>,
        notifier: Arc<dyn NotificationSink>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let cache = Arc::new(ListCache::from_config(&config));
        Self {
            config: Arc::new(config),
            store: Arc::new(AppStore::new()),
            cache,
            notifier,
            navigator,
            cart_api,
            supplier_api,
            purchase_order_api,
        }
    }

    /// Forget the signed-in user, their cart and every cached list page.
    pub fn sign_out(&self) {
        self.store.sign_out();
        let dropped = self.cache.len();
        self.cache.clear();
        tracing::info!(cached_pages = dropped, "signed out");
    }

    /// A fresh coordinator for one control.
    pub fn mutation(&self) -> MutationCoordinator {
        MutationCoordinator::new(
            self.cache.clone(),
            self.notifier.clone(),
            self.config.messages.invalid_data_prefix.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheKey;
    use crate::identity::UserProfile;
    use crate::screens::SupplierScreen;
    use crate::store::ProfileStatus;
    use crate::test_support::{Harness, product, supplier};
    use storefront_cart::CartLine;
    use storefront_core::{EntityType, UserId};

    #[tokio::test]
    async fn sign_out_drops_profile_cart_and_cached_pages() {
        let h = Harness::new(
            ClientConfig::default(),
            vec![supplier("s-1", "Acme Tools", "0800-111", "1 Main St")],
            Vec::new(),
        );
        h.ctx.store.set_profile(Some(UserProfile {
            user_id: UserId::parse("u-1").unwrap(),
            service_orders: Vec::new(),
        }));
        let item = product("p-1", 5);
        h.ctx.store.apply_cart_line(CartLine::new(item.product_id.clone(), 2).unwrap());
        let mut screen = SupplierScreen::new(h.ctx.clone());
        screen.load().await.unwrap();
        let key = CacheKey::new(EntityType::Supplier, screen.request());
        assert!(h.ctx.cache.is_fresh(&key));

        h.ctx.sign_out();

        assert_eq!(h.ctx.store.profile_status(), ProfileStatus::SignedOut);
        assert_eq!(h.ctx.store.cart_quantity(&item.product_id), 0);
        assert!(h.ctx.cache.is_empty());

        screen.load().await.unwrap();
        assert_eq!(h.supplier_api.list_calls(), 2);
    }
}
