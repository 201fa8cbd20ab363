//! KOASA client UI surface.
//!
//! Notification capabilities, currency formatting, and the presentation
//! view-models shared by the cart and order flows. Everything here is a
//! pure projection or a narrow trait implemented by the embedding page
//! shell — no DOM access happens in this crate.

pub mod badge;
pub mod format;
pub mod notify;
pub mod product;

pub use badge::BadgeState;
pub use format::{format_fcfa, format_quantity};
pub use notify::{Notice, NoticeLevel, Notifier, NullNotifier, RecordingNotifier};
pub use product::{Category, Product, ProductView, StockBadge};
