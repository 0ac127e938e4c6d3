//! Transport seam between the promotion engine and the deployment server.
//!
//! The engine only talks to [`ApiTransport`]; [`RestClient`] is the HTTP
//! implementation, tests supply in-memory fakes.

pub mod page;
pub mod rest;

use serde_json::Value;
use thiserror::Error;

pub use page::{DEFAULT_PAGE_SIZE, Page, Pages};
pub use rest::RestClient;

/// Query string parameters, in order.
pub type Query = Vec<(String, String)>;

/// Failures reported by a transport.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The addressed resource or scope does not exist (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// The server refused the request (HTTP 4xx other than 404).
    #[error("Rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Connectivity, timeout or server-side (5xx) failure.
    #[error("{0}")]
    Transport(String),

    /// The payload did not have the expected shape.
    #[error("Invalid payload: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Authenticated JSON access to the server's `/api` tree.
///
/// Paths are relative to `/api`, e.g. `/Spaces-1/projects`.
pub trait ApiTransport {
    fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value, ApiError>;

    fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError>;
}
