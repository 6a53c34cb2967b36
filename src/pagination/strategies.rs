//! Cursor strategy implementations
//!
//! Each strategy handles one way of asking the server for the next page.

use super::types::{Cursor, CursorStrategy};
use crate::types::{Item, JsonObject, JsonValue};
use tracing::warn;

// ============================================================================
// Last Item Cursor
// ============================================================================

/// Continue after the last item's server-assigned identifier.
///
/// Used by video listings: `lastPostId` ← last item's `postId`.
#[derive(Debug, Clone)]
pub struct LastItemCursor {
    /// Payload field carrying the cursor
    pub param: String,
    /// Item field holding the identifier
    pub field: String,
    /// Value sent with the first request
    pub initial: JsonValue,
}

impl LastItemCursor {
    /// Create a new last-item cursor
    pub fn new(
        param: impl Into<String>,
        field: impl Into<String>,
        initial: impl Into<JsonValue>,
    ) -> Self {
        Self {
            param: param.into(),
            field: field.into(),
            initial: initial.into(),
        }
    }
}

impl CursorStrategy for LastItemCursor {
    fn initial(&self) -> Cursor {
        Cursor::LastItem(self.initial.clone())
    }

    fn advance(&self, _current: &Cursor, last_item: Option<&Item>) -> Option<Cursor> {
        let item = last_item?;
        match item.get(&self.field) {
            Some(JsonValue::Null) | None => {
                warn!(
                    "Last item has no '{}', cannot request the next page",
                    self.field
                );
                None
            }
            Some(id) => Some(Cursor::LastItem(id.clone())),
        }
    }

    fn apply(&self, cursor: &Cursor, payload: &mut JsonObject) {
        payload.insert(self.param.clone(), cursor.to_value());
    }
}

// ============================================================================
// Page Number Cursor
// ============================================================================

/// Page counter incremented after every page.
///
/// Used by hashtag listings: `page` = 1, 2, 3, ...
#[derive(Debug, Clone)]
pub struct PageNumberCursor {
    /// Payload field carrying the page number
    pub param: String,
    /// First page number (usually 0 or 1)
    pub start_page: u32,
}

impl PageNumberCursor {
    /// Create a new page number cursor
    pub fn new(param: impl Into<String>, start_page: u32) -> Self {
        Self {
            param: param.into(),
            start_page,
        }
    }
}

impl CursorStrategy for PageNumberCursor {
    fn initial(&self) -> Cursor {
        Cursor::Page(self.start_page)
    }

    fn advance(&self, current: &Cursor, _last_item: Option<&Item>) -> Option<Cursor> {
        match current {
            Cursor::Page(page) => page.checked_add(1).map(Cursor::Page),
            Cursor::LastItem(_) => Some(Cursor::Page(self.start_page + 1)),
        }
    }

    fn apply(&self, cursor: &Cursor, payload: &mut JsonObject) {
        payload.insert(self.param.clone(), cursor.to_value());
    }
}
