//! Common types used throughout the scraper
//!
//! Shared type aliases, the request encoding selector and the cancellation
//! flag checked between pagination calls.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// One fetched record (video, hashtag, ...). Structure is whatever the
/// platform returned.
pub type Item = JsonObject;

// ============================================================================
// Request Encoding
// ============================================================================

/// Body encoding of a POST request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// `application/json`
    #[default]
    Json,
    /// `application/x-www-form-urlencoded`
    Form,
}

impl Encoding {
    /// Content type sent for this encoding
    pub fn content_type(&self) -> &'static str {
        match self {
            Encoding::Json => "application/json",
            Encoding::Form => "application/x-www-form-urlencoded",
        }
    }
}

// ============================================================================
// Cancellation
// ============================================================================

/// Shared flag that aborts a pagination run between calls.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
    /// Create a flag that is not set
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Check whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Render a scalar JSON value as plain text.
///
/// Strings lose their quotes, `null` becomes empty, anything else uses its
/// JSON representation.
pub fn value_to_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}
