//! Entity traits: identity, cache family, and client-side search surface.

use serde::{Deserialize, Serialize};

/// Entity families known to the list cache.
///
/// This is the sole invalidation granularity: a write to one entity of a
/// family marks every cached page of that family stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Cart,
    Supplier,
    PurchaseOrder,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Cart => "cart",
            EntityType::Supplier => "suppliers",
            EntityType::PurchaseOrder => "purchase_orders",
        }
    }
}

impl core::fmt::Display for EntityType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Cache family this entity belongs to.
    const ENTITY_TYPE: EntityType;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// Display fields matched by the list screens' search box.
pub trait SearchFields {
    fn search_fields(&self) -> Vec<String>;

    /// Case-insensitive substring match over [`SearchFields::search_fields`].
    ///
    /// A blank term matches everything.
    fn matches(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}
