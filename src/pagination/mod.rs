//! Pagination module
//!
//! Supports: last-item cursor, page number
//!
//! # Overview
//!
//! A [`RequestDescriptor`] fixes what is fetched (endpoint, encoding,
//! payload template, where the item list lives). Its [`CursorStrategy`]
//! decides how the next request differs from the last one. The loop that
//! drives them lives in [`crate::engine`].

mod strategies;
mod types;

pub use strategies::{LastItemCursor, PageNumberCursor};
pub use types::{extract_items, Cursor, CursorStrategy, PaginationState, RequestDescriptor};
