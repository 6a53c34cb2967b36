//! CLI commands and argument parsing

use crate::config::ScraperConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Likee scraper CLI
#[derive(Parser, Debug)]
#[command(name = "likee-scraper")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Number of results to return (one page when omitted)
    #[arg(short, long, global = true)]
    pub limit: Option<usize>,

    /// JSON file to save the result to
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Download the videos in the result
    #[arg(short, long, global = true)]
    pub download: bool,

    /// Print the result and log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Country code, overrides the config file
    #[arg(long, global = true)]
    pub country: Option<String>,

    /// Language code, overrides the config file
    #[arg(long, global = true)]
    pub language: Option<String>,

    /// Base pause between requests in seconds, overrides the config file
    #[arg(long, global = true)]
    pub pause: Option<f64>,

    /// Show the browser window
    #[arg(long, global = true)]
    pub show_browser: bool,

    /// WebDriver server URL, overrides the config file
    #[arg(long, global = true)]
    pub webdriver_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Resolve a username to its numeric user id
    UserId {
        /// Username as shown in the profile URL
        username: String,
    },

    /// Profile data of a user
    UserInfo {
        /// Numeric user id
        user_id: String,
    },

    /// Post and like counters of a user
    UserPostCount {
        /// Numeric user id
        user_id: String,
    },

    /// Videos uploaded by a user
    UserVideos {
        /// Numeric user id
        user_id: String,
    },

    /// Trending videos
    TrendingVideos,

    /// Trending hashtags
    TrendingHashtags,

    /// Videos under a hashtag
    HashtagVideos {
        /// Hashtag id (`eventId` of a trending hashtag)
        hashtag_id: String,
    },

    /// Comments under a video
    VideoComments {
        /// Video page URL
        video_url: String,
    },
}

impl Commands {
    /// Whether the command needs a browser session
    pub fn needs_browser(&self) -> bool {
        matches!(self, Self::UserId { .. } | Self::VideoComments { .. })
    }
}

impl Cli {
    /// Apply the command-line overrides to a loaded configuration
    pub fn apply_overrides(&self, config: &mut ScraperConfig) {
        if let Some(country) = &self.country {
            config.country.clone_from(country);
        }
        if let Some(language) = &self.language {
            config.language.clone_from(language);
        }
        if let Some(pause) = self.pause {
            config.pause_time = pause;
        }
        if self.show_browser {
            config.headless = false;
        }
        if let Some(url) = &self.webdriver_url {
            config.webdriver_url.clone_from(url);
        }
    }
}
