//! Cart change observers.
//!
//! Every mutation hands an owned [`CartSnapshot`] to each registered
//! observer, in registration order. An empty observer list is the normal
//! headless case, not a degraded one.

use koasa_ui::BadgeState;

use crate::item::CartItem;

// ── Types ───────────────────────────────────────────────────

/// Owned projection of the cart handed to observers after a mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct CartSnapshot {
    /// Line items in insertion order.
    pub items: Vec<CartItem>,
    /// `Σ price × quantity`, recomputed fresh.
    pub total: f64,
    /// `Σ quantity` — cumulative units, may be fractional.
    pub unit_count: f64,
}

impl CartSnapshot {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Something that reacts to cart mutations.
pub trait CartObserver {
    fn cart_changed(&self, snapshot: &CartSnapshot);
}

// ── Provided observers ──────────────────────────────────────

/// Receives badge updates derived from the unit count.
pub trait BadgeSink {
    fn badge_changed(&self, state: BadgeState);
}

/// Pushes a [`BadgeState`] to the navbar badge elements on each change.
pub struct BadgeObserver {
    sink: Box<dyn BadgeSink>,
}

impl BadgeObserver {
    pub fn new(sink: Box<dyn BadgeSink>) -> Self {
        Self { sink }
    }
}

impl CartObserver for BadgeObserver {
    fn cart_changed(&self, snapshot: &CartSnapshot) {
        self.sink
            .badge_changed(BadgeState::from_count(snapshot.unit_count));
    }
}

/// Debug-logs each mutation.
pub struct LoggingObserver;

impl CartObserver for LoggingObserver {
    fn cart_changed(&self, snapshot: &CartSnapshot) {
        log::debug!(
            "cart changed: {} line(s), total {}",
            snapshot.items.len(),
            snapshot.total
        );
    }
}

// ── Tests ───────────────────────────────────────────────────
