//! Cart state and operations.
//!
//! The cart is an ordered list of [`CartItem`]s with at most one entry
//! per product. Every mutating operation writes the full JSON snapshot
//! to session storage before returning, then notifies observers, so a
//! reload within the same session reconstructs the exact prior state and
//! the visible badges/views stay current.

use koasa_ui::{Notifier, NoticeLevel};

use crate::item::{CartItem, ProductId};
use crate::observer::{CartObserver, CartSnapshot};
use crate::storage::SessionStore;

// ── Constants ───────────────────────────────────────────────

/// Fixed session-storage key holding the serialized cart array.
pub const CART_KEY: &str = "koasa_cart";

/// Default quantity adjustment step for the +/− controls.
///
/// Half-unit steps come from weight-sold products; products sold by the
/// piece can configure a whole-unit step instead.
pub const DEFAULT_QUANTITY_STEP: f64 = 0.5;

// ── Types ───────────────────────────────────────────────────

/// The add-to-cart control's product data.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRef {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub unit: String,
}

/// Answers whether a product can currently be added.
///
/// On listing pages this reflects the product card's disabled state; on
/// pages without product cards [`AlwaysAvailable`] applies — the check
/// cannot refuse what it cannot see.
pub trait AvailabilitySource {
    fn is_available(&self, id: ProductId) -> bool;
}

/// Every product is addable.
pub struct AlwaysAvailable;

impl AvailabilitySource for AlwaysAvailable {
    fn is_available(&self, _id: ProductId) -> bool {
        true
    }
}

/// Cart operation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CartError {
    /// The product is marked unavailable; nothing was added.
    #[error("product unavailable: {name}")]
    ProductUnavailable { name: String },
}

/// The session cart.
pub struct Cart {
    items: Vec<CartItem>,
    store: Box<dyn SessionStore>,
    observers: Vec<Box<dyn CartObserver>>,
    quantity_step: f64,
}

// ── Implementation ──────────────────────────────────────────

impl Cart {
    /// Load the cart from session storage.
    ///
    /// A missing or malformed snapshot yields an empty cart — storage
    /// corruption is recovered silently, never surfaced to the page.
    pub fn load(store: Box<dyn SessionStore>) -> Self {
        let items = match store.get_item(CART_KEY) {
            None => Vec::new(),
            Some(json) => match serde_json::from_str::<Vec<CartItem>>(&json) {
                Ok(items) => items,
                Err(e) => {
                    log::warn!("discarding malformed cart snapshot: {}", e);
                    Vec::new()
                }
            },
        };

        // A foreign writer could have stored non-positive quantities;
        // drop them so `quantity > 0` holds unconditionally in memory.
        let items: Vec<CartItem> = items.into_iter().filter(|i| i.quantity > 0.0).collect();

        Self {
            items,
            store,
            observers: Vec::new(),
            quantity_step: DEFAULT_QUANTITY_STEP,
        }
    }

    /// Register a change observer. Observers are notified in
    /// registration order after every mutation.
    pub fn subscribe(&mut self, observer: Box<dyn CartObserver>) {
        self.observers.push(observer);
    }

    /// Configure the +/− adjustment step.
    pub fn set_quantity_step(&mut self, step: f64) {
        if step > 0.0 {
            self.quantity_step = step;
        }
    }

    pub fn quantity_step(&self) -> f64 {
        self.quantity_step
    }

    // ── Operations ──────────────────────────────────────────

    /// Add one unit of a product.
    ///
    /// An existing line's quantity is incremented by 1 — re-adding never
    /// duplicates a line. Refuses without mutation when the availability
    /// source marks the product unavailable.
    pub fn add(
        &mut self,
        product: &ProductRef,
        availability: &dyn AvailabilitySource,
        notifier: &dyn Notifier,
    ) -> Result<(), CartError> {
        if !availability.is_available(product.id) {
            notifier.toast(
                NoticeLevel::Warning,
                "❌ Ce produit est temporairement indisponible",
            );
            return Err(CartError::ProductUnavailable {
                name: product.name.clone(),
            });
        }

        match self.items.iter().position(|i| i.product_id == product.id) {
            Some(idx) => self.items[idx].quantity += 1.0,
            None => self.items.push(CartItem {
                product_id: product.id,
                name: product.name.clone(),
                price: product.price,
                unit: product.unit.clone(),
                quantity: 1.0,
            }),
        }

        self.after_mutation();
        notifier.toast(NoticeLevel::Success, "✅ Produit ajouté au panier");
        Ok(())
    }

    /// Delete the line matching `id`. No-op when absent.
    pub fn remove(&mut self, id: ProductId) {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != id);
        if self.items.len() != before {
            self.after_mutation();
        }
    }

    /// Set a line's quantity to an exact (possibly fractional) value.
    ///
    /// A value ≤ 0 removes the line entirely. Unknown id: no-op.
    pub fn set_quantity(&mut self, id: ProductId, quantity: f64) {
        if quantity <= 0.0 {
            self.remove(id);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == id) {
            item.quantity = quantity;
            self.after_mutation();
        }
    }

    /// Adjust a line's quantity up by one step.
    pub fn increment(&mut self, id: ProductId) {
        if let Some(q) = self.find(id).map(|i| i.quantity) {
            self.set_quantity(id, q + self.quantity_step);
        }
    }

    /// Adjust a line's quantity down by one step; stepping to or through
    /// zero removes the line.
    pub fn decrement(&mut self, id: ProductId) {
        if let Some(q) = self.find(id).map(|i| i.quantity) {
            self.set_quantity(id, q - self.quantity_step);
        }
    }

    /// Empty the cart unconditionally.
    pub fn clear(&mut self) {
        self.items.clear();
        self.after_mutation();
    }

    // ── Queries ─────────────────────────────────────────────

    /// `Σ price × quantity`, recomputed fresh on every call.
    pub fn total(&self) -> f64 {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    /// `Σ quantity` — cumulative unit count, may be fractional.
    pub fn item_count(&self) -> f64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn find(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product_id == id)
    }

    /// Owned projection for observers and view building.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
            total: self.total(),
            unit_count: self.item_count(),
        }
    }

    // ── Internals ───────────────────────────────────────────

    /// Persist the snapshot, then notify observers. Runs after every
    /// mutation, before the operation returns.
    fn after_mutation(&mut self) {
        self.persist();
        let snapshot = self.snapshot();
        for observer in &self.observers {
            observer.cart_changed(&snapshot);
        }
    }

    fn persist(&mut self) {
        match serde_json::to_string(&self.items) {
            Ok(json) => {
                if let Err(e) = self.store.set_item(CART_KEY, &json) {
                    log::warn!("cart persist failed: {}", e);
                }
            }
            Err(e) => log::warn!("cart serialize failed: {}", e),
        }
    }
}

// ── Tests ───────────────────────────────────────────────────


// ── Property tests ──────────────────────────────────────────
