//! Order submission flow.
//!
//! One attempt per invocation. The triggering control is busy for the
//! whole attempt and re-enabled on every exit path — the re-enable lives
//! in [`BusyGuard`]'s `Drop`, so no return path can skip it.

use koasa_cart::Cart;
use koasa_ui::{Notifier, NoticeLevel};

use crate::backend::{OrderBackend, TransportError};
use crate::payload::OrderRequest;

// ── Errors ──────────────────────────────────────────────────

/// Order submission errors. All of them leave the cart untouched.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OrderError {
    /// Submitting an empty cart — refused before any network activity.
    #[error("cart is empty")]
    EmptyCart,
    /// The backend answered with `success: false`.
    #[error("order rejected: {message}")]
    Rejected { message: String },
    /// The request itself failed (network fault, malformed body).
    #[error("order request failed: {0}")]
    Transport(#[from] TransportError),
}

// ── Capabilities ────────────────────────────────────────────

/// The control that triggered the submission (the order button).
pub trait SubmitControl {
    /// Disable + show the busy indicator, or restore the idle state.
    fn set_busy(&self, busy: bool);
}

/// For pages where the trigger isn't a trackable control.
pub struct NullControl;

impl SubmitControl for NullControl {
    fn set_busy(&self, _busy: bool) {}
}

/// Opens URLs in a new browsing context (the WhatsApp hand-off).
pub trait ExternalLinks {
    fn open_in_new_context(&self, url: &str);
}

/// Headless pages have nowhere to open a link.
pub struct NullLinks;

impl ExternalLinks for NullLinks {
    fn open_in_new_context(&self, _url: &str) {}
}

/// Keeps the control busy for a scope; restores it on drop, whatever
/// the exit path.
pub struct BusyGuard<'a> {
    control: &'a dyn SubmitControl,
}

impl<'a> BusyGuard<'a> {
    pub fn new(control: &'a dyn SubmitControl) -> Self {
        control.set_busy(true);
        Self { control }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.control.set_busy(false);
    }
}

// ── Flow ────────────────────────────────────────────────────

/// What a successful submission produced.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderOutcome {
    /// Server-supplied confirmation message.
    pub message: String,
    /// Server-assigned order id, when one was returned.
    pub order_id: Option<String>,
    /// The WhatsApp URL that was opened, when one was returned.
    pub opened_url: Option<String>,
}

/// Submit the cart as an order.
///
/// Success clears the cart (observers fire), opens the WhatsApp deep
/// link in a new context and confirms the order id in a modal. Both
/// failure classes — a `success: false` reply and a transport fault —
/// surface as a danger toast and leave the cart exactly as it was.
pub fn submit_order(
    cart: &mut Cart,
    delivery_address: &str,
    notes: &str,
    backend: &dyn OrderBackend,
    notifier: &dyn Notifier,
    links: &dyn ExternalLinks,
    control: &dyn SubmitControl,
) -> Result<OrderOutcome, OrderError> {
    if cart.is_empty() {
        notifier.toast(NoticeLevel::Warning, "❌ Votre panier est vide");
        return Err(OrderError::EmptyCart);
    }

    let _busy = BusyGuard::new(control);

    let request = OrderRequest::from_cart(cart, delivery_address, notes);
    log::debug!(
        "submitting order: {} line(s), total {}",
        request.items.len(),
        request.total
    );

    let response = match backend.send_order(&request) {
        Ok(response) => response,
        Err(e) => {
            notifier.toast(NoticeLevel::Danger, &format!("❌ Erreur: {}", e));
            return Err(OrderError::Transport(e));
        }
    };

    if !response.success {
        notifier.toast(NoticeLevel::Danger, &format!("❌ {}", response.message));
        return Err(OrderError::Rejected {
            message: response.message,
        });
    }

    notifier.toast(NoticeLevel::Success, &response.message);
    cart.clear();

    if let Some(url) = &response.whatsapp_url {
        links.open_in_new_context(url);
    }

    if let Some(order_id) = &response.order_id {
        notifier.modal(
            "✅ Commande créée!",
            &format!(
                "Votre commande a été créée avec succès. ID de commande: {}. \
                 WhatsApp s'ouvre automatiquement — envoyez le message à l'admin.",
                order_id
            ),
            NoticeLevel::Success,
        );
        log::info!("order created: {}", order_id);
    }

    Ok(OrderOutcome {
        message: response.message,
        order_id: response.order_id,
        opened_url: response.whatsapp_url,
    })
}

// ── Test doubles ────────────────────────────────────────────

use std::cell::RefCell;

/// Records every busy transition, in order.
#[derive(Default)]
pub struct RecordingControl {
    events: RefCell<Vec<bool>>,
}

impl RecordingControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<bool> {
        self.events.borrow().clone()
    }
}

impl SubmitControl for RecordingControl {
    fn set_busy(&self, busy: bool) {
        self.events.borrow_mut().push(busy);
    }
}

/// Records every opened URL.
#[derive(Default)]
pub struct RecordingLinks {
    opened: RefCell<Vec<String>>,
}

impl RecordingLinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.borrow().clone()
    }
}

impl ExternalLinks for RecordingLinks {
    fn open_in_new_context(&self, url: &str) {
        self.opened.borrow_mut().push(String::from(url));
    }
}

// ── Tests ───────────────────────────────────────────────────
