//! CLI module
//!
//! Command-line interface for the scraper.
//!
//! # Commands
//!
//! - `user-id` - Resolve a username to its numeric id
//! - `user-info` - Profile data of a user
//! - `user-post-count` - Post and like counters of a user
//! - `user-videos` - Videos uploaded by a user
//! - `trending-videos` - Trending videos
//! - `trending-hashtags` - Trending hashtags
//! - `hashtag-videos` - Videos under a hashtag
//! - `video-comments` - Comments under a video

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::{Outcome, Runner};
