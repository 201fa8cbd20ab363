//! End-to-end order flow: cart page load → add items → submit →
//! WhatsApp hand-off, against in-memory storage and backend doubles.

use std::cell::RefCell;
use std::rc::Rc;

use koasa_cart::{
    AlwaysAvailable, Cart, MemoryStore, ProductId, ProductRef, SessionStore, StorageError,
    CART_KEY,
};
use koasa_order::{
    submit_order, NullControl, OrderResponse, RecordingBackend, RecordingLinks, TransportError,
};
use koasa_ui::{NullNotifier, RecordingNotifier};

/// Storage handle shared between the simulated tab and the test.
#[derive(Clone, Default)]
struct SharedStore(Rc<RefCell<MemoryStore>>);

impl SessionStore for SharedStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.0.borrow().get_item(key)
    }
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.0.borrow_mut().set_item(key, value)
    }
    fn remove_item(&mut self, key: &str) {
        self.0.borrow_mut().remove_item(key)
    }
    fn clear(&mut self) {
        self.0.borrow_mut().clear()
    }
    fn length(&self) -> usize {
        self.0.borrow().length()
    }
}

fn add_products(cart: &mut Cart) {
    for (id, name, price) in [(1, "Boeuf 1kg", 5000.0), (2, "Poulet", 3000.0)] {
        cart.add(
            &ProductRef {
                id: ProductId(id),
                name: String::from(name),
                price,
                unit: String::from("kg"),
            },
            &AlwaysAvailable,
            &NullNotifier,
        )
        .unwrap();
    }
}

#[test]
fn successful_order_end_to_end() {
    let store = SharedStore::default();
    let mut cart = Cart::load(Box::new(store.clone()));
    add_products(&mut cart);
    cart.set_quantity(ProductId(2), 0.5);
    assert_eq!(cart.total(), 6500.0);

    let backend = RecordingBackend::succeeding(OrderResponse {
        success: true,
        message: String::from("Commande créée avec succès"),
        whatsapp_url: Some(String::from("https://wa.me/237612345678?text=commande")),
        order_id: Some(String::from("CMD-2024-001")),
    });
    let notifier = RecordingNotifier::new();
    let links = RecordingLinks::new();

    let outcome = submit_order(
        &mut cart,
        "Quartier Mvan, Yaoundé",
        "Livraison après 18h",
        &backend,
        &notifier,
        &links,
        &NullControl,
    )
    .unwrap();

    // Exactly one request, carrying the cart projection.
    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].items.len(), 2);
    assert_eq!(requests[0].items[1].quantity, 0.5);
    assert_eq!(requests[0].total, 6500.0);

    // Cart emptied in memory and in storage.
    assert!(cart.is_empty());
    assert_eq!(store.get_item(CART_KEY).as_deref(), Some("[]"));

    // Exactly one external link opened.
    assert_eq!(links.opened().len(), 1);
    assert_eq!(outcome.order_id.as_deref(), Some("CMD-2024-001"));
}

#[test]
fn failed_order_keeps_cart_for_retry() {
    let store = SharedStore::default();
    let mut cart = Cart::load(Box::new(store.clone()));
    add_products(&mut cart);

    let backend =
        RecordingBackend::failing(TransportError::Network(String::from("offline")));
    let links = RecordingLinks::new();

    let result = submit_order(
        &mut cart,
        "",
        "",
        &backend,
        &RecordingNotifier::new(),
        &links,
        &NullControl,
    );

    assert!(result.is_err());
    assert_eq!(cart.len(), 2);
    assert!(links.opened().is_empty());

    // The persisted snapshot still holds both lines — a reload can retry.
    let reloaded = Cart::load(Box::new(store));
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.total(), 8000.0);
}
