// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Likee Scraper
//!
//! A scraping client for the Likee short-video platform: user, video,
//! hashtag and comment metadata through the platform's web endpoints, with
//! optional video downloads.
//!
//! ## Features
//!
//! - **Paginated listings**: one engine for every listing, continued by
//!   last-item id or page number
//! - **Response validation**: both `message`/`msg` success conventions
//! - **Polite pacing**: base pause plus random jitter between requests
//! - **Partial results**: transport and platform errors end a run with what
//!   was already fetched
//! - **Rendered pages**: comments and username lookups through WebDriver
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use likee_scraper::{LikeeApi, ScraperConfig};
//!
//! #[tokio::main]
//! async fn main() -> likee_scraper::Result<()> {
//!     let api = LikeeApi::new(ScraperConfig::default())?;
//!
//!     let hashtags = api.get_trending_hashtags(Some(40)).await;
//!     for hashtag in &hashtags {
//!         println!("{}", hashtag["eventId"]);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          LikeeApi                               │
//! │  user_info  user_videos  trending_*  hashtag_videos  comments   │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌───────────┬──────────────────┴──┬───────────────┬──────────────┐
//! │   HTTP    │      Paginate       │    Engine     │    Render    │
//! ├───────────┼─────────────────────┼───────────────┼──────────────┤
//! │ Transport │ Last item cursor    │ fetch loop    │ Renderer     │
//! │ Validator │ Page number cursor  │ scroll loop   │ WebDriver    │
//! │ Rate Limit│ Request descriptor  │ ResultSet     │              │
//! └───────────┴─────────────────────┴───────────────┴──────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the scraper
pub mod error;

/// Common types and type aliases
pub mod types;

/// Scraper configuration
pub mod config;

/// HTTP transport, response validation and rate limiting
pub mod http;

/// Cursor strategies and request descriptors
pub mod pagination;

/// Pagination engine and scroll paginator
pub mod engine;

/// Rendered-page collaborator
pub mod render;

/// Likee endpoints and operations
pub mod api;

/// Result files and download naming
pub mod output;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use api::{Comment, LikeeApi};
pub use config::ScraperConfig;
pub use engine::{PaginationEngine, ResultSet, StopReason};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
