//! Engine types
//!
//! Result and statistics types produced by a pagination run.

use serde::{Serialize, Serializer};
use std::fmt;

/// Why a pagination run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Accumulated items reached the requested limit
    LimitReached,
    /// The source returned an empty page or no further cursor
    Exhausted,
    /// No limit was given; one page was fetched
    SinglePage,
    /// Transport returned no data (HTTP status, timeout, bad body)
    TransportFailure,
    /// The body carried a platform error signal
    ValidationFailure,
    /// Two successive polls ended on the same element
    NoNewContent,
    /// The rendering session failed mid-run
    RenderFailure,
    /// The cancel flag was set
    Cancelled,
}

impl StopReason {
    /// Whether the run ended because something went wrong
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::TransportFailure | Self::ValidationFailure | Self::RenderFailure
        )
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::LimitReached => "limit reached",
            Self::Exhausted => "source exhausted",
            Self::SinglePage => "single page",
            Self::TransportFailure => "transport failure",
            Self::ValidationFailure => "validation failure",
            Self::NoNewContent => "no new content",
            Self::RenderFailure => "render failure",
            Self::Cancelled => "cancelled",
        };
        f.write_str(text)
    }
}

/// Statistics from a pagination run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Requests (or polls) issued
    pub pages_fetched: usize,
    /// Items received before truncation
    pub items_fetched: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl RunStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page
    pub fn add_page(&mut self) {
        self.pages_fetched += 1;
    }

    /// Add items
    pub fn add_items(&mut self, count: usize) {
        self.items_fetched += count;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}

/// Ordered, bounded items of one run, in fetch order.
///
/// Serializes as a plain JSON array of the items.
#[derive(Debug, Clone)]
pub struct ResultSet<T> {
    items: Vec<T>,
    stop_reason: StopReason,
    stats: RunStats,
}

impl<T> ResultSet<T> {
    /// Assemble a finished result
    pub fn new(items: Vec<T>, stop_reason: StopReason, stats: RunStats) -> Self {
        Self {
            items,
            stop_reason,
            stats,
        }
    }

    /// Empty result
    pub fn empty(stop_reason: StopReason) -> Self {
        Self::new(Vec::new(), stop_reason, RunStats::default())
    }

    /// Items in fetch order
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no items were fetched
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the items
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Why the run ended
    pub fn stop_reason(&self) -> StopReason {
        self.stop_reason
    }

    /// Run statistics
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Take the items
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Convert every item, keeping stop reason and stats
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ResultSet<U> {
        ResultSet {
            items: self.items.into_iter().map(f).collect(),
            stop_reason: self.stop_reason,
            stats: self.stats,
        }
    }
}

impl<T> IntoIterator for ResultSet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a ResultSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Serialize> Serialize for ResultSet<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}
