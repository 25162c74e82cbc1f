//! Remote collection gateway.
//!
//! The gateway is the only thing in the crate that talks to the outside
//! world. Every call is scoped to the owner the gateway was built for.
//!
//! Two implementations ship with the crate:
//!
//! - [`HttpGateway`]: REST client for a `/todos` collection
//! - [`InMemoryGateway`]: local collection with scriptable failures

use crate::types::{Item, ItemId, ItemPatch, NewItem, UserId};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

mod http;
mod memory;

pub use http::HttpGateway;
pub use memory::{GatewayCall, InMemoryGateway, Operation};

/// Errors a gateway call can fail with
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// The request never produced a response
    #[error("Request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status
    #[error("Server returned status {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// The response body could not be decoded
    #[error("Response parsing failed: {0}")]
    Decode(String),
}

/// Boxed future returned by gateway calls
pub type GatewayFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, GatewayError>> + Send + 'a>>;

/// Access to the owner's item collection.
///
/// Uses explicit `Pin<Box<dyn Future>>` returns so the gateway can live in
/// the reducer environment as `Arc<dyn TodoGateway>`.
pub trait TodoGateway: Send + Sync {
    /// Owner every call is scoped to
    fn owner(&self) -> UserId;

    /// Fetch all items belonging to the owner
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request or decoding fails.
    fn list_items(&self) -> GatewayFuture<'_, Vec<Item>>;

    /// Create an item; the owner is attached by the gateway
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request or decoding fails.
    fn create_item(&self, item: NewItem) -> GatewayFuture<'_, Item>;

    /// Delete an item
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the server rejects the delete.
    fn delete_item(&self, id: ItemId) -> GatewayFuture<'_, ()>;

    /// Apply a partial update to an item
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request or decoding fails.
    fn update_item(&self, id: ItemId, patch: ItemPatch) -> GatewayFuture<'_, Item>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Tests may panic
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = GatewayError::Status {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Server returned status 500: boom");
        assert_eq!(
            GatewayError::Request("refused".to_string()).to_string(),
            "Request failed: refused"
        );
    }
}
