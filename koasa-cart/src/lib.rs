//! KOASA shopping cart.
//!
//! An ordered list of line items owned by one browser tab's session:
//! loaded from session storage at startup, written back synchronously
//! after every mutation, and broadcast to an explicit observer list so
//! badges and cart views stay current. Works headless — pages without a
//! cart view simply register no observers.

pub mod cart;
pub mod item;
pub mod observer;
pub mod storage;
pub mod view;

pub use cart::{
    AlwaysAvailable, AvailabilitySource, Cart, CartError, ProductRef, CART_KEY,
    DEFAULT_QUANTITY_STEP,
};
pub use item::{CartItem, ProductId};
pub use observer::{BadgeObserver, BadgeSink, CartObserver, CartSnapshot, LoggingObserver};
pub use storage::{MemoryStore, SessionStore, StorageError};
pub use view::{CartLineView, CartPageView};
