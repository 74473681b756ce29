//! HTTP transport types and the execution seam.
//!
//! # Design
//! Requests and responses are described as plain data: the engine builds
//! `HttpRequest` values, a `Transport` executes them, and the engine parses
//! the resulting `HttpResponse`. Keeping the I/O behind a one-method trait
//! means every state transition in the engine can be exercised with scripted
//! responses instead of a live server.
//!
//! All fields use owned types (`String`, `Vec`) so values can be built and
//! moved around without lifetime concerns.

use std::fmt;

/// HTTP method for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// An HTTP request described as plain data.
///
/// Built by `ApiClient::build_*` methods and handed to a `Transport` for
/// execution.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// A response exists for every completed round trip, whatever its status;
/// non-2xx statuses are data for the parse layer, not transport failures.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Executes one HTTP round trip.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// The round trip itself failed: connection refused, DNS, I/O. There is no
/// status code because no response arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError(pub String);

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transport failed: {}", self.0)
    }
}

impl std::error::Error for TransportError {}
