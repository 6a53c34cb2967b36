//! Scroll-driven pagination
//!
//! Items come from a rendered page that loads more content when the last
//! visible element is scrolled into view. The loop has the same shape as
//! [`PaginationEngine::fetch`](super::PaginationEngine::fetch): poll,
//! accumulate, decide, pause.

use super::types::{ResultSet, RunStats, StopReason};
use crate::http::RateLimiter;
use crate::render::{Renderer, Selector};
use crate::types::CancelFlag;
use std::time::Instant;
use tracing::{debug, warn};

/// Collects elements by scrolling a rendered page
#[derive(Debug, Clone, Default)]
pub struct ScrollPaginator {
    rate_limiter: RateLimiter,
    cancel: CancelFlag,
}

impl ScrollPaginator {
    /// Create a paginator pausing with `rate_limiter` after every scroll
    pub fn new(rate_limiter: RateLimiter) -> Self {
        Self {
            rate_limiter,
            cancel: CancelFlag::default(),
        }
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

    /// Collect up to `limit` elements matching `selector`.
    ///
    /// Stops when enough elements are visible, or when a scroll leaves the
    /// trailing element unchanged.
    pub async fn collect<R>(
        &self,
        renderer: &R,
        selector: &Selector,
        limit: usize,
    ) -> ResultSet<R::Element>
    where
        R: Renderer + ?Sized,
    {
        let start = Instant::now();
        let mut stats = RunStats::new();

        let mut elements = match renderer.list_elements(selector).await {
            Ok(elements) => elements,
            Err(e) => {
                warn!("Listing {} failed: {}", selector, e);
                return ResultSet::empty(StopReason::RenderFailure);
            }
        };
        stats.add_page();

        let stop_reason = loop {
            if elements.is_empty() {
                break StopReason::Exhausted;
            }
            if elements.len() >= limit {
                break StopReason::LimitReached;
            }
            if self.cancel.is_cancelled() {
                break StopReason::Cancelled;
            }

            let Some(trailing) = elements.last().cloned() else {
                break StopReason::Exhausted;
            };
            if let Err(e) = renderer.scroll_into_view(&trailing).await {
                warn!("Scrolling to {} failed: {}", selector, e);
                break StopReason::RenderFailure;
            }
            self.rate_limiter.wait().await;

            let next = match renderer.list_elements(selector).await {
                Ok(next) => next,
                Err(e) => {
                    warn!("Listing {} failed: {}", selector, e);
                    break StopReason::RenderFailure;
                }
            };
            stats.add_page();
            debug!("{} visible after scroll: {}", selector, next.len());

            match next.last() {
                None => break StopReason::NoNewContent,
                Some(last) if *last == trailing => {
                    elements = next;
                    break StopReason::NoNewContent;
                }
                Some(_) => elements = next,
            }
        };

        stats.add_items(elements.len());
        elements.truncate(limit);
        stats.set_duration(start.elapsed().as_millis() as u64);
        debug!(
            "Collected {} of {} requested ({})",
            elements.len(),
            limit,
            stop_reason
        );

        ResultSet::new(elements, stop_reason, stats)
    }
}
