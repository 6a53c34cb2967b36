//! HTTP module
//!
//! Transport, response validation and request pacing.
//!
//! # Features
//!
//! - **Transport**: one POST per call, failures folded into an empty body
//! - **Validation**: Likee's in-body `message` / `msg` error signals
//! - **Rate Limiting**: base pause plus random jitter between pages

mod client;
mod rate_limit;
mod transport;
mod validate;

pub use client::{form_pairs, HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use transport::Transport;
pub use validate::{ResponseValidator, SuccessRule};
