//! Product detail view-model.
//!
//! Projects a catalog product into the labels and badges the detail
//! modal renders: availability, stock level, category with fallbacks.

use crate::format::format_fcfa;

// ── Types ───────────────────────────────────────────────────

/// Product category as served with the product payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    /// Icon class name used by the page shell.
    pub icon: String,
}

/// A catalog product, as rendered on listing and detail pages.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub price: f64,
    pub unit: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub stock: u32,
    pub is_available: bool,
    pub category: Option<Category>,
}

/// Stock level classification shown as a colored badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockBadge {
    /// More than 10 units on hand.
    InStock(u32),
    /// 1..=10 units — limited stock warning.
    Limited(u32),
    /// Nothing left.
    OutOfStock,
}

impl StockBadge {
    pub fn from_stock(stock: u32) -> Self {
        match stock {
            0 => StockBadge::OutOfStock,
            1..=10 => StockBadge::Limited(stock),
            n => StockBadge::InStock(n),
        }
    }

    pub fn label(&self) -> String {
        match self {
            StockBadge::InStock(n) => format!("{} disponible(s)", n),
            StockBadge::Limited(n) => format!("{} - Stock limité", n),
            StockBadge::OutOfStock => String::from("Rupture de stock"),
        }
    }
}

// ── View ────────────────────────────────────────────────────

const DEFAULT_CATEGORY_NAME: &str = "Non catégorisé";
const DEFAULT_CATEGORY_ICON: &str = "fas fa-cube";
const DEFAULT_DESCRIPTION: &str = "Viande fraîche de qualité";

/// Everything the product detail modal needs, fallbacks applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductView {
    pub name: String,
    pub price_label: String,
    pub unit: String,
    pub description: String,
    pub image_url: Option<String>,
    pub available: bool,
    pub status_label: &'static str,
    pub stock_badge: StockBadge,
    pub category_name: String,
    pub category_icon: String,
}

impl ProductView {
    pub fn from(product: &Product) -> Self {
        let (category_name, category_icon) = match &product.category {
            Some(c) => (c.name.clone(), c.icon.clone()),
            None => (
                String::from(DEFAULT_CATEGORY_NAME),
                String::from(DEFAULT_CATEGORY_ICON),
            ),
        };

        Self {
            name: product.name.clone(),
            price_label: format_fcfa(product.price),
            unit: product.unit.clone(),
            description: product
                .description
                .clone()
                .unwrap_or_else(|| String::from(DEFAULT_DESCRIPTION)),
            image_url: product.image_url.clone(),
            available: product.is_available,
            status_label: if product.is_available {
                "Disponible"
            } else {
                "Indisponible"
            },
            stock_badge: StockBadge::from_stock(product.stock),
            category_name,
            category_icon,
        }
    }
}

// ── Tests ───────────────────────────────────────────────────
