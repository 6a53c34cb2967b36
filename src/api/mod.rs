//! Likee API module
//!
//! Operations offered by the scraper, built on the pagination engine and
//! the rendering collaborator.
//!
//! # Example
//!
//! ```rust,ignore
//! use likee_scraper::{LikeeApi, ScraperConfig};
//!
//! let api = LikeeApi::new(ScraperConfig::default())?;
//! let videos = api.get_trending_videos(Some(50)).await;
//! println!("{} videos ({})", videos.len(), videos.stop_reason());
//! ```

mod client;
mod comments;
pub mod endpoints;

pub use client::{extract_poster_uid, strip_watermark, LikeeApi};
pub use comments::{parse_count, read_comment, read_comment_count, Comment};
pub use endpoints::Endpoints;
