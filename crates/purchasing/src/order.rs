use std::collections::BTreeSet;
use std::fmt::Display;

use chrono::{DateTime, Local, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{
    DomainError, DomainResult, Entity, EntityType, PurchaseOrderId, SearchFields, SupplierId,
};
use storefront_parties::Supplier;

/// Supplier fields embedded in a purchase order for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierSummary {
    pub supplier_id: SupplierId,
    pub name: String,
    pub phone_number: String,
}

impl From<&Supplier> for SupplierSummary {
    fn from(supplier: &Supplier) -> Self {
        Self {
            supplier_id: supplier.supplier_id.clone(),
            name: supplier.name.clone(),
            phone_number: supplier.phone_number.clone(),
        }
    }
}

/// Purchase order as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub purchase_order_id: PurchaseOrderId,
    pub supplier_id: SupplierId,
    pub created_at: DateTime<Utc>,
    pub supplier: SupplierSummary,
}

impl PurchaseOrder {
    /// Creation date as shown in the list (`dd/mm/yyyy`), in the viewer's
    /// local time zone.
    pub fn display_date(&self) -> String {
        self.display_date_in(&Local)
    }

    pub fn display_date_in<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        self.created_at.with_timezone(tz).format("%d/%m/%Y").to_string()
    }

    /// Creation time in the server's wire form, e.g. `2025-06-01T08:30:00.000Z`.
    pub fn created_at_iso(&self) -> String {
        self.created_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Route of the order's detail page.
    pub fn detail_route(&self) -> String {
        format!("/admin/purchase-orders-detail/{}", self.purchase_order_id)
    }
}

impl Entity for PurchaseOrder {
    type Id = PurchaseOrderId;

    const ENTITY_TYPE: EntityType = EntityType::PurchaseOrder;

    fn id(&self) -> &Self::Id {
        &self.purchase_order_id
    }
}

impl SearchFields for PurchaseOrder {
    fn search_fields(&self) -> Vec<String> {
        vec![
            self.purchase_order_id.to_string(),
            self.supplier.name.clone(),
            self.supplier.phone_number.clone(),
            self.created_at_iso(),
            self.display_date(),
        ]
    }
}

/// Suppliers that already have an order on the loaded page.
///
/// The creation form hides these from its options and rejects drafts that
/// name one of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupplierExclusions {
    supplier_ids: BTreeSet<SupplierId>,
}

impl SupplierExclusions {
    pub fn from_orders<'a>(orders: impl IntoIterator<Item = &'a PurchaseOrder>) -> Self {
        Self {
            supplier_ids: orders
                .into_iter()
                .map(|order| order.supplier.supplier_id.clone())
                .collect(),
        }
    }

    /// Drop one supplier from the list (an order being edited keeps its own supplier).
    pub fn allowing(mut self, supplier_id: &SupplierId) -> Self {
        self.supplier_ids.remove(supplier_id);
        self
    }

    pub fn contains(&self, supplier_id: &SupplierId) -> bool {
        self.supplier_ids.contains(supplier_id)
    }

    pub fn len(&self) -> usize {
        self.supplier_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.supplier_ids.is_empty()
    }

    /// Suppliers still selectable, in list order.
    pub fn available<'a>(&self, suppliers: &'a [Supplier]) -> Vec<&'a Supplier> {
        suppliers
            .iter()
            .filter(|supplier| !self.contains(&supplier.supplier_id))
            .collect()
    }
}

/// Create/update payload for a purchase order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrderDraft {
    pub supplier_id: Option<SupplierId>,
}

impl PurchaseOrderDraft {
    pub fn for_supplier(supplier_id: SupplierId) -> Self {
        Self {
            supplier_id: Some(supplier_id),
        }
    }

    /// A supplier is required and must not be excluded.
    pub fn validate(&self, exclusions: &SupplierExclusions) -> DomainResult<&SupplierId> {
        let supplier_id = self
            .supplier_id
            .as_ref()
            .ok_or_else(|| DomainError::validation("supplier is required"))?;
        if exclusions.contains(supplier_id) {
            return Err(DomainError::conflict(format!(
                "supplier {supplier_id} already has an open purchase order"
            )));
        }
        Ok(supplier_id)
    }
}

impl From<&PurchaseOrder> for PurchaseOrderDraft {
    fn from(order: &PurchaseOrder) -> Self {
        Self::for_supplier(order.supplier_id.clone())
    }
}
