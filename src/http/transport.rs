//! Transport abstraction
//!
//! The pagination engine only needs "send this payload, give me a body".
//! Failures are folded into an empty object so callers have a single
//! sentinel for "no data".

use crate::types::{Encoding, JsonObject};
use async_trait::async_trait;
use std::sync::Arc;

/// Issues one request and returns the decoded body, or an empty object on
/// any failure.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `payload` to `endpoint` with the given body encoding
    async fn call(&self, endpoint: &str, encoding: Encoding, payload: &JsonObject) -> JsonObject;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn call(&self, endpoint: &str, encoding: Encoding, payload: &JsonObject) -> JsonObject {
        (**self).call(endpoint, encoding, payload).await
    }
}
