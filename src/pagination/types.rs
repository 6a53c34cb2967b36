//! Pagination types and traits
//!
//! Defines the cursor, the per-operation request descriptor and the
//! strategy trait that advances one into the next.

use crate::types::{Encoding, Item, JsonObject, JsonValue};
use std::fmt;
use tracing::warn;

/// Continuation token for the next page
#[derive(Debug, Clone, PartialEq)]
pub enum Cursor {
    /// Page counter
    Page(u32),
    /// Server-assigned identifier of the last item seen
    LastItem(JsonValue),
}

impl Cursor {
    /// The value written into the request payload
    pub fn to_value(&self) -> JsonValue {
        match self {
            Cursor::Page(page) => JsonValue::from(*page),
            Cursor::LastItem(id) => id.clone(),
        }
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cursor::Page(page) => write!(f, "page {page}"),
            Cursor::LastItem(id) => write!(f, "after {id}"),
        }
    }
}

/// Core trait for cursor advancement
pub trait CursorStrategy: Send + Sync + fmt::Debug {
    /// Cursor used for the first request
    fn initial(&self) -> Cursor;

    /// Cursor for the page after `current`, given the last accumulated item.
    ///
    /// `None` means no further cursor can be derived and the run ends.
    fn advance(&self, current: &Cursor, last_item: Option<&Item>) -> Option<Cursor>;

    /// Write the cursor into a request payload
    fn apply(&self, cursor: &Cursor, payload: &mut JsonObject);
}

/// Everything needed to fetch one entity listing. Built once per operation.
#[derive(Debug)]
pub struct RequestDescriptor {
    /// Short name used in logs
    pub name: String,
    /// Endpoint URL
    pub endpoint: String,
    /// Body encoding
    pub encoding: Encoding,
    /// Payload sent with every page, before the cursor is applied
    pub payload: JsonObject,
    /// Dotted path to the item list in the response body
    pub list_path: String,
    /// How the cursor moves between pages
    pub cursor: Box<dyn CursorStrategy>,
}

impl RequestDescriptor {
    /// Create a descriptor
    pub fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        encoding: Encoding,
        payload: JsonObject,
        list_path: impl Into<String>,
        cursor: impl CursorStrategy + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            encoding,
            payload,
            list_path: list_path.into(),
            cursor: Box::new(cursor),
        }
    }

    /// Fresh payload for the page at `cursor`
    pub fn payload_for(&self, cursor: &Cursor) -> JsonObject {
        let mut payload = self.payload.clone();
        self.cursor.apply(cursor, &mut payload);
        payload
    }

    /// Items of one response page
    pub fn items(&self, body: &JsonObject) -> Vec<Item> {
        extract_items(body, &self.list_path)
    }
}

/// Tracks pagination state during a run
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationState {
    /// Cursor for the next request
    pub cursor: Cursor,
    /// Requests issued so far
    pub pages: usize,
    /// Items accumulated so far
    pub total_fetched: usize,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Create state starting at `cursor`
    pub fn new(cursor: Cursor) -> Self {
        Self {
            cursor,
            pages: 0,
            total_fetched: 0,
            done: false,
        }
    }

    /// Whether no request was issued yet
    pub fn is_first_page(&self) -> bool {
        self.pages == 0
    }

    /// Record one issued request
    pub fn add_page(&mut self) {
        self.pages += 1;
    }

    /// Add to total fetched
    pub fn add_fetched(&mut self, count: usize) {
        self.total_fetched += count;
    }

    /// Move to the next cursor
    pub fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }
}

/// Extract the item list at a dotted path (`data.videoList`).
///
/// A missing path or a non-array value yields no items. Entries that are not
/// objects are skipped.
pub fn extract_items(body: &JsonObject, path: &str) -> Vec<Item> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    let mut parts = path.split('.');

    let Some(first) = parts.next() else {
        return Vec::new();
    };
    let mut current = match body.get(first) {
        Some(value) => value,
        None => return Vec::new(),
    };
    for part in parts {
        match current.get(part) {
            Some(value) => current = value,
            None => return Vec::new(),
        }
    }

    let Some(list) = current.as_array() else {
        return Vec::new();
    };

    let mut items = Vec::with_capacity(list.len());
    for entry in list {
        match entry {
            JsonValue::Object(map) => items.push(map.clone()),
            other => warn!("Skipping non-object list entry at '{}': {}", path, other),
        }
    }
    items
}
