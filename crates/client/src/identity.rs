//! Identity and navigation collaborators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use storefront_core::{ServiceOrderId, UserId};

/// A customer's past service order (rendered by the service history page).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOrder {
    pub service_order_id: ServiceOrderId,
    pub created_at: DateTime<Utc>,
    pub total_price: u64,
    /// Line details, passed through to the card renderer untouched.
    #[serde(rename = "service_order_details", default)]
    pub details: Vec<Value>,
}

/// Signed-in user's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    #[serde(default)]
    pub service_orders: Vec<ServiceOrder>,
}

/// Read access to the current actor's identity.
pub trait IdentitySource: Send + Sync {
    /// Current profile, or `None` when nobody is signed in (or not yet known).
    fn current(&self) -> Option<UserProfile>;

    fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }
}

/// Route changes requested by the core (sign-in redirect, detail pages).
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}
