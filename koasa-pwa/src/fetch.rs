//! Fetch model.
//!
//! The request/response vocabulary the worker's fetch policy operates
//! on, plus the [`Network`] capability the platform implements. URLs are
//! absolute; origin and host helpers parse just enough of them for the
//! interception rules.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

// ── Requests ────────────────────────────────────────────────

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Options,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
            Method::Patch => "PATCH",
        }
    }
}

/// What the request is fetching, per the platform's request destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// A navigation — top-level HTML document.
    Document,
    Style,
    Script,
    Image,
    Font,
    Other,
}

/// An intercepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Absolute URL.
    pub url: String,
    pub method: Method,
    pub destination: Destination,
}

impl FetchRequest {
    /// A plain GET for a subresource.
    pub fn get(url: &str) -> Self {
        Self {
            url: String::from(url),
            method: Method::Get,
            destination: Destination::Other,
        }
    }

    /// A top-level navigation.
    pub fn navigation(url: &str) -> Self {
        Self {
            url: String::from(url),
            method: Method::Get,
            destination: Destination::Document,
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// `scheme://host[:port]` of the request URL.
    pub fn origin(&self) -> Option<String> {
        url_origin(&self.url)
    }

    /// Host (without port) of the request URL.
    pub fn host(&self) -> Option<String> {
        url_host(&self.url)
    }
}

// ── Responses ───────────────────────────────────────────────

/// Response classification, per the platform's response types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
    /// Same-origin.
    Basic,
    /// Cross-origin, CORS-approved.
    Cors,
    /// Cross-origin, opaque to the page.
    Opaque,
    /// A network-level error response.
    Error,
}

/// A fetched response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub url: String,
    pub status: u16,
    pub response_type: ResponseType,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// A well-formed 200 with a body.
    pub fn ok(url: &str, body: &[u8]) -> Self {
        Self {
            url: String::from(url),
            status: 200,
            response_type: ResponseType::Basic,
            headers: BTreeMap::new(),
            body: body.to_vec(),
        }
    }

    /// Only well-formed successes get cached: HTTP 200 and not an
    /// error-typed response.
    pub fn is_cacheable(&self) -> bool {
        self.status == 200 && self.response_type != ResponseType::Error
    }
}

/// Network-level fetch failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NetworkError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("host unreachable: {0}")]
    HostUnreachable(String),
}

/// The platform network the worker fetches through.
pub trait Network {
    fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, NetworkError>;
}

// ── URL helpers ─────────────────────────────────────────────

/// Extract `scheme://host[:port]` from an absolute URL.
pub fn url_origin(url: &str) -> Option<String> {
    let scheme_end = url.find("://")?;
    let rest = &url[scheme_end + 3..];
    let authority_end = rest
        .find(|c| c == '/' || c == '?' || c == '#')
        .unwrap_or(rest.len());
    if authority_end == 0 {
        return None;
    }
    Some(String::from(&url[..scheme_end + 3 + authority_end]))
}

/// Extract the host (without port) from an absolute URL.
pub fn url_host(url: &str) -> Option<String> {
    let origin = url_origin(url)?;
    let scheme_end = origin.find("://")?;
    let authority = &origin[scheme_end + 3..];
    let host = match authority.rfind(':') {
        Some(idx) if authority[idx + 1..].chars().all(|c| c.is_ascii_digit()) => {
            &authority[..idx]
        }
        _ => authority,
    };
    Some(String::from(host))
}

/// Resolve a manifest path against an origin; absolute URLs pass
/// through untouched.
pub fn resolve_url(origin: &str, path: &str) -> String {
    if path.contains("://") {
        String::from(path)
    } else {
        format!("{}{}", origin.trim_end_matches('/'), path)
    }
}

// ── Test double ─────────────────────────────────────────────

/// Canned network: URL → response, with per-URL failure injection and a
/// fetch log.
#[derive(Default)]
pub struct StaticNetwork {
    responses: BTreeMap<String, FetchResponse>,
    failing: BTreeSet<String>,
    log: RefCell<Vec<String>>,
}

impl StaticNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with a 200 for `url`.
    pub fn serve(&mut self, url: &str, body: &[u8]) {
        self.responses
            .insert(String::from(url), FetchResponse::ok(url, body));
    }

    /// Serve an arbitrary response for `url`.
    pub fn serve_response(&mut self, url: &str, response: FetchResponse) {
        self.responses.insert(String::from(url), response);
    }

    /// Make every fetch of `url` fail at the network level.
    pub fn fail(&mut self, url: &str) {
        self.failing.insert(String::from(url));
    }

    /// Make every fetch fail (offline mode).
    pub fn go_offline(&mut self) {
        let urls: Vec<String> = self.responses.keys().cloned().collect();
        for url in urls {
            self.failing.insert(url);
        }
        self.responses.clear();
    }

    /// URLs fetched so far, in order.
    pub fn fetched(&self) -> Vec<String> {
        self.log.borrow().clone()
    }
}

impl Network for StaticNetwork {
    fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, NetworkError> {
        self.log.borrow_mut().push(request.url.clone());

        if self.failing.contains(&request.url) {
            return Err(NetworkError::ConnectionFailed(request.url.clone()));
        }
        match self.responses.get(&request.url) {
            Some(response) => Ok(response.clone()),
            None => Err(NetworkError::HostUnreachable(request.url.clone())),
        }
    }
}

// ── Tests ───────────────────────────────────────────────────
