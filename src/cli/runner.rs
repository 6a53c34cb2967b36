//! CLI runner - executes commands

use crate::api::LikeeApi;
use crate::cli::commands::{Cli, Commands};
use crate::config::ScraperConfig;
use crate::error::{Error, Result, ResultExt};
use crate::output::{ensure_dir, to_pretty_json, video_path, write_json};
use crate::render::{Renderer, WebDriverRenderer};
use crate::types::{value_to_text, CancelFlag, Item, JsonValue};
use tracing::{info, warn};

/// What a command produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    /// Result written to the output file and stdout
    pub value: JsonValue,
    /// Video items eligible for `--download`
    pub videos: Vec<Item>,
}

impl Outcome {
    fn value(value: JsonValue) -> Self {
        Self {
            value,
            videos: Vec::new(),
        }
    }

    fn videos(videos: Vec<Item>) -> Self {
        Self {
            value: JsonValue::Array(videos.iter().cloned().map(JsonValue::Object).collect()),
            videos,
        }
    }
}

/// CLI runner
pub struct Runner {
    cli: Cli,
    cancel: CancelFlag,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            cancel: CancelFlag::new(),
        }
    }

    /// Share a cancel flag with the runs started by this runner
    #[must_use]
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Configuration file values with the command-line overrides applied
    pub fn load_config(&self) -> Result<ScraperConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ScraperConfig::from_file(path)
                .with_context(|| format!("Loading {}", path.display()))?,
            None => ScraperConfig::default(),
        };
        self.cli.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;
        let api = LikeeApi::new(config)?.with_cancel_flag(self.cancel.clone());

        let outcome = if self.cli.command.needs_browser() {
            let config = api.config();
            let renderer =
                WebDriverRenderer::connect(&config.webdriver_url, config.headless).await?;
            let outcome = self.execute_rendered(&api, &renderer).await;
            if let Err(e) = renderer.close().await {
                warn!("Closing the browser session failed: {}", e);
            }
            outcome?
        } else {
            self.execute(&api).await?
        };

        self.emit(&api, &outcome).await
    }

    /// Execute a command that needs no browser session
    pub async fn execute(&self, api: &LikeeApi) -> Result<Outcome> {
        let limit = self.cli.limit;
        let outcome = match &self.cli.command {
            Commands::UserInfo { user_id } => {
                Outcome::value(api.get_user_info(user_id).await.unwrap_or(JsonValue::Null))
            }
            Commands::UserPostCount { user_id } => Outcome::value(
                api.get_user_post_count(user_id)
                    .await
                    .unwrap_or(JsonValue::Null),
            ),
            Commands::UserVideos { user_id } => {
                Outcome::videos(api.get_user_videos(user_id, limit).await.into_items())
            }
            Commands::TrendingVideos => {
                Outcome::videos(api.get_trending_videos(limit).await.into_items())
            }
            Commands::TrendingHashtags => {
                let hashtags = api.get_trending_hashtags(limit).await;
                Outcome::value(serde_json::to_value(&hashtags)?)
            }
            Commands::HashtagVideos { hashtag_id } => {
                Outcome::videos(api.get_hashtag_videos(hashtag_id, limit).await.into_items())
            }
            Commands::UserId { .. } | Commands::VideoComments { .. } => {
                return Err(Error::config(format!(
                    "{:?} needs a browser session",
                    self.cli.command
                )));
            }
        };
        Ok(outcome)
    }

    /// Execute a command, using `renderer` for the browser-backed ones
    pub async fn execute_rendered<R>(&self, api: &LikeeApi, renderer: &R) -> Result<Outcome>
    where
        R: Renderer + ?Sized,
    {
        match &self.cli.command {
            Commands::UserId { username } => {
                let uid = api.get_user_id(renderer, username).await;
                Ok(Outcome::value(uid.map_or(JsonValue::Null, JsonValue::String)))
            }
            Commands::VideoComments { video_url } => {
                let limit = self.cli.limit.unwrap_or(api.config().max_video_comments);
                let comments = api.get_video_comments(renderer, video_url, limit).await;
                Ok(Outcome::value(serde_json::to_value(&comments)?))
            }
            _ => self.execute(api).await,
        }
    }

    /// Write, print and download the outcome as the flags ask
    pub async fn emit(&self, api: &LikeeApi, outcome: &Outcome) -> Result<()> {
        if let Some(path) = &self.cli.output {
            write_json(path, &outcome.value)?;
            info!("Saved results to {}", path.display());
        }
        if self.cli.verbose || self.cli.output.is_none() {
            println!("{}", to_pretty_json(&outcome.value)?);
        }
        if self.cli.download {
            self.download(api, &outcome.videos).await?;
        }
        Ok(())
    }

    /// Save every video item under the configured download directory,
    /// pausing before each request
    async fn download(&self, api: &LikeeApi, videos: &[Item]) -> Result<()> {
        if videos.is_empty() {
            warn!("Nothing to download");
            return Ok(());
        }
        let dir = &api.config().download_dir;
        ensure_dir(dir)?;

        let mut saved = 0usize;
        for (index, video) in videos.iter().enumerate() {
            if self.cancel.is_cancelled() {
                warn!("Downloads cancelled after {} files", saved);
                break;
            }
            let Some(url) = video.get("videoUrl").map(value_to_text).filter(|u| !u.is_empty())
            else {
                warn!("Video {} has no videoUrl, skipping", index);
                continue;
            };
            let Some(path) = video_path(dir, video) else {
                warn!("Video {} has no likeeId/postId, skipping", index);
                continue;
            };

            api.rate_limiter().wait().await;
            if self.cli.verbose {
                println!("Downloading: {}", path.display());
            }
            if api.download_video(&url, &path).await {
                saved += 1;
            }
        }

        info!("Downloaded {} of {} videos to {}", saved, videos.len(), dir.display());
        Ok(())
    }
}
