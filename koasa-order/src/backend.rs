//! Backend bridge.
//!
//! The actual POST is performed by the platform; the client layer talks
//! to it through this narrow seam. A real implementation serializes the
//! request to JSON and fetches [`crate::ORDER_ENDPOINT`]; the doubles
//! here cover every outcome the flow has to handle.

use std::cell::RefCell;

use crate::payload::{OrderRequest, OrderResponse};

/// Faults below the order protocol: the request never produced a
/// well-formed response.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// The platform's fetch capability for the order endpoint.
///
/// One call per invocation — retries and timeouts beyond the platform
/// default are not this layer's business.
pub trait OrderBackend {
    fn send_order(&self, request: &OrderRequest) -> Result<OrderResponse, TransportError>;
}

// ── Test doubles ────────────────────────────────────────────

/// Replies with a canned response.
pub struct StaticBackend {
    pub response: OrderResponse,
}

impl OrderBackend for StaticBackend {
    fn send_order(&self, _request: &OrderRequest) -> Result<OrderResponse, TransportError> {
        Ok(self.response.clone())
    }
}

/// Fails every call at the transport level.
pub struct FailingBackend {
    pub error: TransportError,
}

impl OrderBackend for FailingBackend {
    fn send_order(&self, _request: &OrderRequest) -> Result<OrderResponse, TransportError> {
        Err(self.error.clone())
    }
}

/// Captures every request and replies with a configured result.
pub struct RecordingBackend {
    result: Result<OrderResponse, TransportError>,
    requests: RefCell<Vec<OrderRequest>>,
}

impl RecordingBackend {
    pub fn succeeding(response: OrderResponse) -> Self {
        Self {
            result: Ok(response),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn failing(error: TransportError) -> Self {
        Self {
            result: Err(error),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn requests(&self) -> Vec<OrderRequest> {
        self.requests.borrow().clone()
    }
}

impl OrderBackend for RecordingBackend {
    fn send_order(&self, request: &OrderRequest) -> Result<OrderResponse, TransportError> {
        self.requests.borrow_mut().push(request.clone());
        self.result.clone()
    }
}

// ── Tests ───────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> OrderRequest {
        OrderRequest {
            items: Vec::new(),
            total: 0.0,
            delivery_address: String::new(),
            notes: String::new(),
        }
    }

    #[test]
    fn recording_backend_counts_calls() {
        let backend = RecordingBackend::succeeding(OrderResponse {
            success: true,
            message: String::from("ok"),
            whatsapp_url: None,
            order_id: None,
        });

        assert_eq!(backend.call_count(), 0);
        backend.send_order(&request()).unwrap();
        backend.send_order(&request()).unwrap();
        assert_eq!(backend.call_count(), 2);
    }

    #[test]
    fn failing_backend_reports_transport_error() {
        let backend = FailingBackend {
            error: TransportError::Network(String::from("connection refused")),
        };
        let err = backend.send_order(&request()).unwrap_err();
        assert!(matches!(err, TransportError::Network(_)));
    }
}
