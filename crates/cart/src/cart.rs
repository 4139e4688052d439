use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, Entity, EntityType, ProductId};

/// One product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCartLine")]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl CartLine {
    pub fn new(product_id: ProductId, quantity: u32) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::validation("cart quantity must be positive"));
        }
        Ok(Self {
            product_id,
            quantity,
        })
    }
}

impl Entity for CartLine {
    type Id = ProductId;

    const ENTITY_TYPE: EntityType = EntityType::Cart;

    fn id(&self) -> &Self::Id {
        &self.product_id
    }
}

#[derive(Deserialize)]
struct RawCartLine {
    product_id: ProductId,
    quantity: u32,
}

impl TryFrom<RawCartLine> for CartLine {
    type Error = DomainError;

    fn try_from(raw: RawCartLine) -> Result<Self, Self::Error> {
        CartLine::new(raw.product_id, raw.quantity)
    }
}

/// Add-to-cart request, validated before it reaches the cart API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddToCart {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl AddToCart {
    pub fn new(product_id: ProductId, quantity: u32) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        Ok(Self {
            product_id,
            quantity,
        })
    }
}

/// The current user's cart: at most one line per product, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawCart")]
pub struct Cart {
    #[serde(rename = "cart_details")]
    lines: Vec<CartLine>,
}

/// Server cart payload; lines may repeat a product.
#[derive(Deserialize)]
struct RawCart {
    #[serde(rename = "cart_details", default)]
    lines: Vec<CartLine>,
}

impl From<RawCart> for Cart {
    fn from(raw: RawCart) -> Self {
        Cart::from_lines(raw.lines)
    }
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from server lines, merging duplicates by product.
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            cart.add(line.product_id, line.quantity);
        }
        cart
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Quantity already in the cart for `product_id` (zero when absent).
    pub fn quantity_of(&self, product_id: &ProductId) -> u32 {
        self.lines
            .iter()
            .find(|line| &line.product_id == product_id)
            .map(|line| line.quantity)
            .unwrap_or(0)
    }

    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Add `quantity` units locally; repeated adds grow the existing line.
    pub fn add(&mut self, product_id: ProductId, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.lines.iter_mut().find(|line| line.product_id == product_id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.lines.push(CartLine {
                product_id,
                quantity,
            }),
        }
    }

    /// Replace (or insert) a line with the server's authoritative version.
    pub fn apply_line(&mut self, line: CartLine) {
        match self
            .lines
            .iter_mut()
            .find(|existing| existing.product_id == line.product_id)
        {
            Some(existing) => *existing = line,
            None => self.lines.push(line),
        }
    }

    pub fn remove(&mut self, product_id: &ProductId) -> Option<CartLine> {
        let index = self
            .lines
            .iter()
            .position(|line| &line.product_id == product_id)?;
        Some(self.lines.remove(index))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
