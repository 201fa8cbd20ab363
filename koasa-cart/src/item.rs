//! Cart line items.

use serde::{Deserialize, Serialize};

/// Catalog product identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ProductId(pub u32);

/// One product's entry in the cart.
///
/// Field names are wire-exact with the session snapshot and the order
/// endpoint: `product_id`, `name`, `price`, `unit`, `quantity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    /// Unit price in FCFA. Non-negative.
    pub price: f64,
    /// Sale unit label (`"kg"`, `"pièce"`, ...).
    pub unit: String,
    /// Units in the cart. Always > 0 for an item present in a cart;
    /// fractional values are normal (half-kilo steps).
    pub quantity: f64,
}

impl CartItem {
    /// Line subtotal: `price × quantity`.
    pub fn subtotal(&self) -> f64 {
        self.price * self.quantity
    }
}

// ── Tests ───────────────────────────────────────────────────
