//! KOASA order submission.
//!
//! Projects the cart into the backend's order payload, performs exactly
//! one call through the platform's fetch capability, and relays the
//! outcome: on success the cart is cleared and the WhatsApp deep link is
//! opened in a new browsing context; on any failure the cart is left
//! untouched so the user can retry.

pub mod backend;
pub mod payload;
pub mod submit;

pub use backend::{FailingBackend, OrderBackend, RecordingBackend, StaticBackend, TransportError};
pub use payload::{OrderLine, OrderRequest, OrderResponse, ORDER_ENDPOINT};
pub use submit::{
    submit_order, BusyGuard, ExternalLinks, NullControl, NullLinks, OrderError, OrderOutcome,
    RecordingControl, RecordingLinks, SubmitControl,
};
