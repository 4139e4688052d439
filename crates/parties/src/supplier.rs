use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, Entity, EntityType, ProductId, SearchFields, SupplierId};

/// Product reference embedded in a supplier (read-only; only counted for display).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierProduct {
    pub product_id: ProductId,
    #[serde(default)]
    pub name: String,
}

/// Supplier as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub supplier_id: SupplierId,
    pub name: String,
    pub phone_number: String,
    pub address: String,
    #[serde(default)]
    pub products: Vec<SupplierProduct>,
}

impl Entity for Supplier {
    type Id = SupplierId;

    const ENTITY_TYPE: EntityType = EntityType::Supplier;

    fn id(&self) -> &Self::Id {
        &self.supplier_id
    }
}

impl SearchFields for Supplier {
    fn search_fields(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.phone_number.clone(),
            self.address.clone(),
        ]
    }
}

/// Create/update payload for a supplier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierDraft {
    pub name: String,
    pub phone_number: String,
    pub address: String,
}

impl SupplierDraft {
    pub fn new(
        name: impl Into<String>,
        phone_number: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone_number: phone_number.into(),
            address: address.into(),
        }
    }

    /// All three fields are required; blank counts as missing.
    pub fn validate(&self) -> DomainResult<()> {
        let missing: Vec<&str> = [
            ("name", &self.name),
            ("phone_number", &self.phone_number),
            ("address", &self.address),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DomainError::validation(format!(
                "required fields missing: {}",
                missing.join(", ")
            )))
        }
    }
}

impl From<&Supplier> for SupplierDraft {
    fn from(supplier: &Supplier) -> Self {
        Self {
            name: supplier.name.clone(),
            phone_number: supplier.phone_number.clone(),
            address: supplier.address.clone(),
        }
    }
}
