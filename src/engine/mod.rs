//! Execution engine module
//!
//! The pagination loop shared by every listing operation.
//!
//! # Overview
//!
//! - [`PaginationEngine`] - drives `Transport` calls for a
//!   [`RequestDescriptor`] until the limit is met or the source runs dry
//! - [`ScrollPaginator`] - the same loop shape over a rendered page
//! - [`ResultSet`] / [`StopReason`] / [`RunStats`] - what a run returns
//!
//! Runs are strictly sequential: one request in flight, the rate limiter
//! awaited between requests, failures ending the run with whatever was
//! accumulated.

mod scroll;
mod types;

pub use scroll::ScrollPaginator;
pub use types::{ResultSet, RunStats, StopReason};

use crate::http::{RateLimiter, ResponseValidator, Transport};
use crate::pagination::{PaginationState, RequestDescriptor};
use crate::types::{CancelFlag, Item};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Pagination engine for API listings
#[derive(Clone)]
pub struct PaginationEngine {
    /// Issues the requests
    transport: Arc<dyn Transport>,
    /// Checks bodies for platform errors
    validator: ResponseValidator,
    /// Pause between pages
    rate_limiter: RateLimiter,
    /// Checked before every request
    cancel: CancelFlag,
}

impl PaginationEngine {
    /// Create an engine with the default validator and rate limiter
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            validator: ResponseValidator::default(),
            rate_limiter: RateLimiter::default(),
            cancel: CancelFlag::default(),
        }
    }

    /// Set the response validator
    #[must_use]
    pub fn with_validator(mut self, validator: ResponseValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Set the rate limiter
    #[must_use]
    pub fn with_rate_limiter(mut self, rate_limiter: RateLimiter) -> Self {
        self.rate_limiter = rate_limiter;
        self
    }

    /// Set the cancel flag
    #[must_use]
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Get the rate limiter
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    /// Get the cancel flag
    pub fn cancel_flag(&self) -> &CancelFlag {
        &self.cancel
    }

    /// Fetch up to `limit` items.
    ///
    /// With no limit exactly one page is requested and returned as-is.
    /// Transport and validation failures end the run and keep what was
    /// accumulated; they are never retried.
    pub async fn fetch(&self, request: &RequestDescriptor, limit: Option<usize>) -> ResultSet<Item> {
        if limit == Some(0) {
            debug!("{}: limit is 0, nothing to request", request.name);
            return ResultSet::empty(StopReason::LimitReached);
        }

        let start = Instant::now();
        let mut stats = RunStats::new();
        let mut state = PaginationState::new(request.cursor.initial());
        let mut items: Vec<Item> = Vec::new();

        let stop_reason = loop {
            if self.cancel.is_cancelled() {
                break StopReason::Cancelled;
            }
            if !state.is_first_page() {
                self.rate_limiter.wait().await;
            }

            // FETCHING
            let payload = request.payload_for(&state.cursor);
            debug!("{}: requesting {}", request.name, state.cursor);
            let body = self
                .transport
                .call(&request.endpoint, request.encoding, &payload)
                .await;
            state.add_page();
            stats.add_page();

            if body.is_empty() {
                break StopReason::TransportFailure;
            }
            let body = self.validator.validate(body);
            if body.is_empty() {
                break StopReason::ValidationFailure;
            }

            // ACCUMULATING
            let page = request.items(&body);
            let page_len = page.len();
            debug!(
                "{}: page {} returned {} items",
                request.name, state.pages, page_len
            );
            if page.is_empty() {
                break StopReason::Exhausted;
            }
            items.extend(page);
            state.add_fetched(page_len);
            stats.add_items(page_len);

            let Some(limit) = limit else {
                break StopReason::SinglePage;
            };
            if items.len() >= limit {
                break StopReason::LimitReached;
            }

            match request.cursor.advance(&state.cursor, items.last()) {
                Some(cursor) => state.set_cursor(cursor),
                None => break StopReason::Exhausted,
            }
        };
        state.mark_done();

        // DONE
        if let Some(limit) = limit {
            items.truncate(limit);
        }
        stats.set_duration(start.elapsed().as_millis() as u64);

        if stop_reason.is_failure() {
            warn!(
                "{}: stopped after {} pages ({}), returning {} items",
                request.name,
                stats.pages_fetched,
                stop_reason,
                items.len()
            );
        } else {
            info!(
                "{}: {} items in {} pages ({})",
                request.name,
                items.len(),
                stats.pages_fetched,
                stop_reason
            );
        }

        ResultSet::new(items, stop_reason, stats)
    }
}

impl std::fmt::Debug for PaginationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationEngine")
            .field("validator", &self.validator)
            .field("rate_limiter", &self.rate_limiter)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}
