//! Customer service history page.

use crate::identity::ServiceOrder;
use crate::store::{AppStore, ProfileStatus};

#[derive(Debug, Clone, PartialEq)]
pub enum ServiceHistoryView {
    /// Profile not resolved yet.
    Loading,
    /// Signed out, or signed in without any service orders.
    Empty,
    /// Orders in profile order.
    Orders(Vec<ServiceOrder>),
}

pub fn service_history(store: &AppStore) -> ServiceHistoryView {
    match store.profile_status() {
        ProfileStatus::Loading => ServiceHistoryView::Loading,
        ProfileStatus::SignedOut => ServiceHistoryView::Empty,
        ProfileStatus::SignedIn(profile) if profile.service_orders.is_empty() => {
            ServiceHistoryView::Empty
        }
        ProfileStatus::SignedIn(profile) => ServiceHistoryView::Orders(profile.service_orders),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::identity::UserProfile;
    use storefront_core::{ServiceOrderId, UserId};

    fn order(id: &str, total_price: u64) -> ServiceOrder {
        ServiceOrder {
            service_order_id: ServiceOrderId::parse(id).unwrap(),
            created_at: Utc.with_ymd_and_hms(2025, 5, 20, 10, 0, 0).unwrap(),
            total_price,
            details: Vec::new(),
        }
    }

    fn profile(service_orders: Vec<ServiceOrder>) -> UserProfile {
        UserProfile {
            user_id: UserId::parse("u-1").unwrap(),
            service_orders,
        }
    }

    #[test]
    fn follows_profile_resolution() {
        let store = AppStore::new();
        assert_eq!(service_history(&store), ServiceHistoryView::Loading);

        store.set_profile(None);
        assert_eq!(service_history(&store), ServiceHistoryView::Empty);

        store.set_profile(Some(profile(Vec::new())));
        assert_eq!(service_history(&store), ServiceHistoryView::Empty);
    }

    #[test]
    fn lists_orders_in_profile_order() {
        let store = AppStore::new();
        store.set_profile(Some(profile(vec![order("so-2", 150_000), order("so-1", 90_000)])));

        let ServiceHistoryView::Orders(orders) = service_history(&store) else {
            panic!("Expected orders");
        };
        let ids: Vec<&str> = orders.iter().map(|o| o.service_order_id.as_str()).collect();
        assert_eq!(ids, vec!["so-2", "so-1"]);
    }

    #[test]
    fn profile_payload_deserializes_service_order_details() {
        let json = r#"{
            "user_id": "u-1",
            "service_orders": [{
                "service_order_id": "so-1",
                "created_at": "2025-05-20T10:00:00Z",
                "total_price": 90000,
                "service_order_details": [{"service": "oil change"}]
            }]
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.service_orders[0].details.len(), 1);
    }
}
