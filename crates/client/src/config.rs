//! Client configuration (page sizes, cache age, sign-in policy, user-facing text).

use core::str::FromStr;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

/// What add-to-cart does when nobody is signed in.
///
/// The redirect to the sign-in route always happens; the policy decides
/// whether the cart call is still sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnauthenticatedCartPolicy {
    /// Redirect and still submit the call; the server is expected to reject it.
    #[default]
    RedirectAndSubmit,
    /// Redirect and suppress the call client-side.
    RedirectOnly,
}

impl FromStr for UnauthenticatedCartPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redirect_and_submit" => Ok(Self::RedirectAndSubmit),
            "redirect_only" => Ok(Self::RedirectOnly),
            other => bail!("unknown unauthenticated cart policy: {other:?}"),
        }
    }
}

/// User-facing notification and label text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub add_to_cart_label: String,
    pub adding_to_cart_label: String,
    pub added_to_cart: String,
    pub add_to_cart_failed: String,

    pub supplier_created: String,
    pub supplier_updated: String,
    pub supplier_deleted: String,
    pub supplier_create_failed: String,
    pub supplier_update_failed: String,
    pub supplier_delete_failed: String,

    pub purchase_order_created: String,
    pub purchase_order_updated: String,
    pub purchase_order_deleted: String,
    pub purchase_order_create_failed: String,
    pub purchase_order_update_failed: String,
    pub purchase_order_delete_failed: String,
    pub supplier_required: String,
    pub supplier_unavailable: String,

    /// Prefix for server-reported validation messages.
    pub invalid_data_prefix: String,

    pub supplier_export_title: String,
    pub purchase_order_export_title: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            add_to_cart_label: "ADD TO CART".to_string(),
            adding_to_cart_label: "ADDING...".to_string(),
            added_to_cart: "Product added to cart".to_string(),
            add_to_cart_failed: "Something went wrong while adding the product to the cart."
                .to_string(),

            supplier_created: "Supplier created".to_string(),
            supplier_updated: "Supplier updated".to_string(),
            supplier_deleted: "Supplier deleted".to_string(),
            supplier_create_failed: "Could not create the supplier.".to_string(),
            supplier_update_failed: "Could not update the supplier.".to_string(),
            supplier_delete_failed: "Could not delete the supplier.".to_string(),

            purchase_order_created: "Purchase order created".to_string(),
            purchase_order_updated: "Purchase order updated".to_string(),
            purchase_order_deleted: "Purchase order deleted".to_string(),
            purchase_order_create_failed: "Could not create the purchase order.".to_string(),
            purchase_order_update_failed: "Could not update the purchase order.".to_string(),
            purchase_order_delete_failed: "Could not delete the purchase order.".to_string(),
            supplier_required: "Please choose a supplier.".to_string(),
            supplier_unavailable: "This supplier already has an open purchase order.".to_string(),

            invalid_data_prefix: "Invalid data: ".to_string(),

            supplier_export_title: "Suppliers".to_string(),
            purchase_order_export_title: "Purchase orders".to_string(),
        }
    }
}

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub supplier_page_size: u32,
    pub purchase_order_page_size: u32,
    /// Page size used to load the purchase-order form's supplier options.
    pub supplier_option_limit: u32,
    /// Cached pages older than this are refetched; `None` disables age checks.
    pub cache_max_age_secs: Option<u64>,
    pub unauthenticated_cart: UnauthenticatedCartPolicy,
    pub auth_route: String,
    pub messages: Messages,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            supplier_page_size: 5,
            purchase_order_page_size: 6,
            supplier_option_limit: 100,
            cache_max_age_secs: Some(300),
            unauthenticated_cart: UnauthenticatedCartPolicy::default(),
            auth_route: "/auth".to_string(),
            messages: Messages::default(),
        }
    }
}

impl ClientConfig {
    /// Load from `STOREFRONT_*` environment variables, defaulting anything unset.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (used by `from_env` and tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup("STOREFRONT_SUPPLIER_PAGE_SIZE") {
            config.supplier_page_size = parse_page_size("STOREFRONT_SUPPLIER_PAGE_SIZE", &raw)?;
        }
        if let Some(raw) = lookup("STOREFRONT_PURCHASE_ORDER_PAGE_SIZE") {
            config.purchase_order_page_size =
                parse_page_size("STOREFRONT_PURCHASE_ORDER_PAGE_SIZE", &raw)?;
        }
        if let Some(raw) = lookup("STOREFRONT_SUPPLIER_OPTION_LIMIT") {
            config.supplier_option_limit =
                parse_page_size("STOREFRONT_SUPPLIER_OPTION_LIMIT", &raw)?;
        }
        if let Some(raw) = lookup("STOREFRONT_CACHE_MAX_AGE_SECS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("invalid STOREFRONT_CACHE_MAX_AGE_SECS: {raw:?}"))?;
            // 0 disables age-based staleness.
            config.cache_max_age_secs = (secs > 0).then_some(secs);
        }
        if let Some(raw) = lookup("STOREFRONT_UNAUTHENTICATED_CART") {
            config.unauthenticated_cart = raw
                .parse()
                .context("invalid STOREFRONT_UNAUTHENTICATED_CART")?;
        }
        if let Some(raw) = lookup("STOREFRONT_AUTH_ROUTE") {
            if !raw.starts_with('/') {
                bail!("STOREFRONT_AUTH_ROUTE must start with '/': {raw:?}");
            }
            config.auth_route = raw;
        }

        Ok(config)
    }

    pub fn cache_max_age(&self) -> Option<chrono::Duration> {
        self.cache_max_age_secs
            .and_then(|secs| i64::try_from(secs).ok())
            .map(chrono::Duration::seconds)
    }
}

fn parse_page_size(key: &str, raw: &str) -> anyhow::Result<u32> {
    let value: u32 = raw
        .trim()
        .parse()
        .with_context(|| format!("invalid {key}: {raw:?}"))?;
    if value == 0 {
        bail!("{key} must be at least 1");
    }
    Ok(value)
}
