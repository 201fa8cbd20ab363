//! Order wire types.
//!
//! Request and response bodies of the order endpoint. Field names are
//! fixed by the backend contract — `product_id` keys the product on the
//! server side, `name` rides along only so the WhatsApp message can be
//! composed without a second lookup.

use koasa_cart::{Cart, ProductId};
use serde::{Deserialize, Serialize};

/// Backend order endpoint.
pub const ORDER_ENDPOINT: &str = "/api/send-order-whatsapp";

/// One order line, mirroring a cart item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: f64,
    pub price: f64,
    pub unit: String,
}

/// JSON body POSTed to [`ORDER_ENDPOINT`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub items: Vec<OrderLine>,
    /// Precomputed cart total.
    pub total: f64,
    pub delivery_address: String,
    pub notes: String,
}

impl OrderRequest {
    /// Read-only projection of the cart — building a request never
    /// mutates cart state.
    pub fn from_cart(cart: &Cart, delivery_address: &str, notes: &str) -> Self {
        Self {
            items: cart
                .items()
                .iter()
                .map(|item| OrderLine {
                    product_id: item.product_id,
                    name: item.name.clone(),
                    quantity: item.quantity,
                    price: item.price,
                    unit: item.unit.clone(),
                })
                .collect(),
            total: cart.total(),
            delivery_address: String::from(delivery_address),
            notes: String::from(notes),
        }
    }
}

/// JSON response of the order endpoint. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    /// WhatsApp deep link to open on success.
    #[serde(default)]
    pub whatsapp_url: Option<String>,
    /// Server-assigned order identifier, display-only.
    #[serde(default)]
    pub order_id: Option<String>,
}

// ── Tests ───────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use koasa_cart::{AlwaysAvailable, MemoryStore, ProductRef};
    use koasa_ui::NullNotifier;

    fn two_line_cart() -> Cart {
        let mut cart = Cart::load(Box::new(MemoryStore::new()));
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
        cart
    }

    #[test]
    fn request_projects_cart() {
        let cart = two_line_cart();
        let req = OrderRequest::from_cart(&cart, "Quartier Mvan, Yaoundé", "Livraison le soir");

        assert_eq!(req.items.len(), 2);
        assert_eq!(req.total, 8000.0);
        assert_eq!(req.items[0].product_id, ProductId(1));
        assert_eq!(req.items[0].quantity, 1.0);
        assert_eq!(req.delivery_address, "Quartier Mvan, Yaoundé");
    }

    #[test]
    fn building_request_leaves_cart_untouched() {
        let cart = two_line_cart();
        let before = cart.items().to_vec();
        let _ = OrderRequest::from_cart(&cart, "", "");
        assert_eq!(cart.items(), &before[..]);
    }

    #[test]
    fn request_wire_shape() {
        let cart = two_line_cart();
        let req = OrderRequest::from_cart(&cart, "addr", "note");
        let json = serde_json::to_value(&req).unwrap();

        assert!(json["items"].is_array());
        assert_eq!(json["items"][0]["product_id"], 1);
        assert_eq!(json["total"], 8000.0);
        assert_eq!(json["delivery_address"], "addr");
        assert_eq!(json["notes"], "note");
    }

    #[test]
    fn response_with_optional_fields() {
        let resp: OrderResponse = serde_json::from_str(
            r#"{"success":true,"message":"Commande créée","whatsapp_url":"https://wa.me/237","order_id":"CMD-12"}"#,
        )
        .unwrap();
        assert!(resp.success);
        assert_eq!(resp.order_id.as_deref(), Some("CMD-12"));
    }

    #[test]
    fn response_without_optional_fields() {
        let resp: OrderResponse =
            serde_json::from_str(r#"{"success":false,"message":"Panier vide"}"#).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.whatsapp_url, None);
        assert_eq!(resp.order_id, None);
    }

    #[test]
    fn unknown_response_fields_ignored() {
        let resp: OrderResponse = serde_json::from_str(
            r#"{"success":false,"message":"x","redirect":"/profile"}"#,
        )
        .unwrap();
        assert!(!resp.success);
    }
}
