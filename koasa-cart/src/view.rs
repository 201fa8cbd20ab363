//! Cart page view-model.
//!
//! Projection of a [`CartSnapshot`] into the labels the cart page
//! renders: one line per item plus the summary totals. The summary is
//! part of the same projection — there is no separate "update summary"
//! pass.

use koasa_ui::{format_fcfa, format_quantity};

use crate::observer::CartSnapshot;

/// One rendered cart line.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineView {
    pub name: String,
    /// `"5 000 FCFA / kg"`
    pub unit_price_label: String,
    pub quantity: f64,
    pub quantity_label: String,
    /// Lower bound of the quantity input (one step).
    pub min_quantity: f64,
    /// Step of the +/− controls and the quantity input.
    pub step: f64,
    pub subtotal_label: String,
}

/// The whole cart page.
#[derive(Debug, Clone, PartialEq)]
pub struct CartPageView {
    pub lines: Vec<CartLineView>,
    pub subtotal_label: String,
    pub total_label: String,
    /// Show the empty-cart message and hide the action buttons.
    pub empty: bool,
}

impl CartPageView {
    pub fn from_snapshot(snapshot: &CartSnapshot, step: f64) -> Self {
        let lines = snapshot
            .items
            .iter()
            .map(|item| CartLineView {
                name: item.name.clone(),
                unit_price_label: format!("{} / {}", format_fcfa(item.price), item.unit),
                quantity: item.quantity,
                quantity_label: format_quantity(item.quantity),
                min_quantity: step,
                step,
                subtotal_label: format_fcfa(item.subtotal()),
            })
            .collect();

        let total_label = format_fcfa(snapshot.total);
        Self {
            lines,
            subtotal_label: total_label.clone(),
            total_label,
            empty: snapshot.is_empty(),
        }
    }
}

// ── Tests ───────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{CartItem, ProductId};

    fn snapshot() -> CartSnapshot {
        let items = vec![
            CartItem {
                product_id: ProductId(1),
                name: String::from("Boeuf 1kg"),
                price: 5000.0,
                unit: String::from("kg"),
                quantity: 2.0,
            },
            CartItem {
                product_id: ProductId(2),
                name: String::from("Poulet"),
                price: 3000.0,
                unit: String::from("kg"),
                quantity: 0.5,
            },
        ];
        let total = items.iter().map(CartItem::subtotal).sum();
        let unit_count = items.iter().map(|i| i.quantity).sum();
        CartSnapshot {
            items,
            total,
            unit_count,
        }
    }

    #[test]
    fn lines_and_totals() {
        let view = CartPageView::from_snapshot(&snapshot(), 0.5);

        assert_eq!(view.lines.len(), 2);
        assert!(!view.empty);
        assert_eq!(view.lines[0].unit_price_label, "5 000 FCFA / kg");
        assert_eq!(view.lines[0].subtotal_label, "10 000 FCFA");
        assert_eq!(view.lines[1].quantity_label, "0.5");
        assert_eq!(view.lines[1].subtotal_label, "1 500 FCFA");
        assert_eq!(view.total_label, "11 500 FCFA");
        assert_eq!(view.subtotal_label, view.total_label);
    }

    #[test]
    fn empty_cart_view() {
        let view = CartPageView::from_snapshot(
            &CartSnapshot {
                items: Vec::new(),
                total: 0.0,
                unit_count: 0.0,
            },
            0.5,
        );

        assert!(view.empty);
        assert!(view.lines.is_empty());
        assert_eq!(view.total_label, "0 FCFA");
    }

    #[test]
    fn step_propagates_to_lines() {
        let view = CartPageView::from_snapshot(&snapshot(), 1.0);
        assert_eq!(view.lines[0].step, 1.0);
        assert_eq!(view.lines[0].min_quantity, 1.0);
    }
}
