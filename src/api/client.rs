//! Likee operations
//!
//! Listings go through the [`PaginationEngine`]; single-shot lookups issue
//! one validated call; comments and the username lookup drive a
//! [`Renderer`].

use super::comments::{read_comment, read_comment_count, Comment};
use super::endpoints::{self, Endpoints, COMMENT_ITEM_CLASS, PROFILE_VIDEO_XPATH, VIDEO_CARD_CLASS};
use crate::config::ScraperConfig;
use crate::engine::{PaginationEngine, ResultSet, RunStats, ScrollPaginator, StopReason};
use crate::error::Result;
use crate::http::{HttpClient, RateLimiter, ResponseValidator, Transport};
use crate::render::{Renderer, Selector};
use crate::types::{value_to_text, CancelFlag, Encoding, Item, JsonObject, JsonValue};
use regex::Regex;
use std::path::Path;
use std::sync::{Arc, LazyLock};
use tracing::{debug, info, warn};

static WINDOW_DATA_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"window\.data = (\{.*?\});").unwrap());

/// Client for the Likee endpoints
#[derive(Clone)]
pub struct LikeeApi {
    config: ScraperConfig,
    endpoints: Endpoints,
    client: HttpClient,
    transport: Arc<dyn Transport>,
    validator: ResponseValidator,
    rate_limiter: RateLimiter,
    engine: PaginationEngine,
    scroll: ScrollPaginator,
}

impl LikeeApi {
    /// Create a client issuing real HTTP requests
    pub fn new(config: ScraperConfig) -> Result<Self> {
        let client = HttpClient::with_config(config.http_client())?;
        let transport: Arc<dyn Transport> = Arc::new(client.clone());
        Ok(Self::assemble(config, client, transport))
    }

    /// Create a client whose API calls go through `transport`.
    ///
    /// Page source and video downloads still use a real HTTP client.
    pub fn with_transport(config: ScraperConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let client = HttpClient::with_config(config.http_client())?;
        Ok(Self::assemble(config, client, transport))
    }

    fn assemble(config: ScraperConfig, client: HttpClient, transport: Arc<dyn Transport>) -> Self {
        let rate_limiter = RateLimiter::new(config.rate_limit());
        let validator = ResponseValidator::default();
        let engine = PaginationEngine::new(transport.clone())
            .with_validator(validator.clone())
            .with_rate_limiter(rate_limiter.clone());
        let scroll = ScrollPaginator::new(rate_limiter.clone());

        Self {
            config,
            endpoints: Endpoints::default(),
            client,
            transport,
            validator,
            rate_limiter,
            engine,
            scroll,
        }
    }

    /// Send requests to other base URLs
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Replace the pause used between pages and page loads
    #[must_use]
    pub fn with_rate_limiter(mut self, rate_limiter: RateLimiter) -> Self {
        self.engine = self.engine.with_rate_limiter(rate_limiter.clone());
        self.scroll = self.scroll.with_rate_limiter(rate_limiter.clone());
        self.rate_limiter = rate_limiter;
        self
    }

    /// Stop paginated runs when `cancel` is set
    #[must_use]
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.engine = self.engine.with_cancel_flag(cancel.clone());
        self.scroll = self.scroll.with_cancel_flag(cancel);
        self
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Pause used between pages, page loads and downloads
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    // ========================================================================
    // Single-shot lookups
    // ========================================================================

    /// Profile data of a user (`data` of the response)
    pub async fn get_user_info(&self, uid: &str) -> Option<JsonValue> {
        let body = self
            .call_once(&self.endpoints.user_info(), endpoints::user_info_payload(uid))
            .await?;
        body.get("data").cloned()
    }

    /// Post and like counters of a user
    pub async fn get_user_post_count(&self, uid: &str) -> Option<JsonValue> {
        let payload = endpoints::user_post_count_payload(&self.config, uid);
        let body = self
            .call_once(&self.endpoints.user_post_count(), payload)
            .await?;
        let counts = body.get("data")?.get("postInfoMap")?.get(uid).cloned();
        if counts.is_none() {
            warn!("No post counts for user {}", uid);
        }
        counts
    }

    async fn call_once(&self, endpoint: &str, payload: JsonObject) -> Option<JsonObject> {
        let body = self.transport.call(endpoint, Encoding::Json, &payload).await;
        if body.is_empty() {
            return None;
        }
        let body = self.validator.validate(body);
        (!body.is_empty()).then_some(body)
    }

    // ========================================================================
    // Listings
    // ========================================================================

    /// Videos uploaded by a user
    pub async fn get_user_videos(&self, uid: &str, limit: Option<usize>) -> ResultSet<Item> {
        let request = endpoints::user_videos(&self.endpoints, &self.config, uid);
        self.engine.fetch(&request, limit).await
    }

    /// Trending videos
    pub async fn get_trending_videos(&self, limit: Option<usize>) -> ResultSet<Item> {
        let request = endpoints::trending_videos(&self.endpoints, &self.config);
        self.engine.fetch(&request, limit).await
    }

    /// Trending hashtags
    pub async fn get_trending_hashtags(&self, limit: Option<usize>) -> ResultSet<Item> {
        let request = endpoints::trending_hashtags(&self.endpoints, &self.config);
        self.engine.fetch(&request, limit).await
    }

    /// Videos under a hashtag
    pub async fn get_hashtag_videos(
        &self,
        hashtag_id: &str,
        limit: Option<usize>,
    ) -> ResultSet<Item> {
        let request = endpoints::hashtag_videos(&self.endpoints, &self.config, hashtag_id);
        self.engine.fetch(&request, limit).await
    }

    // ========================================================================
    // Rendered pages
    // ========================================================================

    /// Up to `limit` comments of the video at `video_url`.
    ///
    /// The limit is lowered to the comment count shown on the page when
    /// that count is readable.
    pub async fn get_video_comments<R>(
        &self,
        renderer: &R,
        video_url: &str,
        limit: usize,
    ) -> ResultSet<Comment>
    where
        R: Renderer + ?Sized,
    {
        if let Err(e) = renderer.navigate(video_url).await {
            warn!("Opening {} failed: {}", video_url, e);
            return ResultSet::empty(StopReason::RenderFailure);
        }
        self.rate_limiter.wait().await;

        let card = match renderer.require_element(&Selector::class(VIDEO_CARD_CLASS)).await {
            Ok(card) => card,
            Err(e) if e.is_lookup_failure() => {
                warn!("No data on {}: {}", video_url, e);
                return ResultSet::empty(StopReason::Exhausted);
            }
            Err(e) => {
                warn!("Looking up the video on {} failed: {}", video_url, e);
                return ResultSet::empty(StopReason::RenderFailure);
            }
        };
        if let Err(e) = renderer.click(&card).await {
            warn!("Opening the video on {} failed: {}", video_url, e);
            return ResultSet::empty(StopReason::RenderFailure);
        }
        self.rate_limiter.wait().await;

        let limit = match read_comment_count(renderer).await {
            Some(total) if (total as usize) < limit => {
                debug!("Video has {} comments, lowering limit from {}", total, limit);
                total as usize
            }
            _ => limit,
        };

        let elements = self
            .scroll
            .collect(renderer, &Selector::class(COMMENT_ITEM_CLASS), limit)
            .await;
        let stop_reason = elements.stop_reason();
        let stats: RunStats = elements.stats().clone();

        let mut comments = Vec::with_capacity(elements.len());
        for element in &elements {
            comments.push(read_comment(renderer, element).await);
        }
        info!("{} comments from {} ({})", comments.len(), video_url, stop_reason);

        ResultSet::new(comments, stop_reason, stats)
    }

    /// Numeric user id behind a username.
    ///
    /// Opens the user's first video and reads `poster_uid` from the data
    /// embedded in that page's source.
    pub async fn get_user_id<R>(&self, renderer: &R, username: &str) -> Option<String>
    where
        R: Renderer + ?Sized,
    {
        let profile = self.endpoints.profile_page(username);
        if let Err(e) = renderer.navigate(&profile).await {
            warn!("Opening {} failed: {}", profile, e);
            return None;
        }
        self.rate_limiter.wait().await;

        let video = match renderer.require_element(&Selector::xpath(PROFILE_VIDEO_XPATH)).await {
            Ok(video) => video,
            Err(e) if e.is_lookup_failure() => {
                warn!("Unable to get user id, no videos found for {}", username);
                return None;
            }
            Err(e) => {
                warn!("Unable to get user id for {}: {}", username, e);
                return None;
            }
        };
        if let Err(e) = renderer.click(&video).await {
            warn!("Opening the first video of {} failed: {}", username, e);
            return None;
        }
        self.rate_limiter.wait().await;

        let video_url = match renderer.current_url().await {
            Ok(url) => url,
            Err(e) => {
                warn!("Reading the video url failed: {}", e);
                return None;
            }
        };
        let source = match self.client.get_text(&video_url).await {
            Ok(source) => source,
            Err(e) => {
                warn!("Fetching {} failed: {}", video_url, e);
                return None;
            }
        };

        let uid = extract_poster_uid(&source);
        if uid.is_none() {
            warn!("No poster_uid in the page data of {}", video_url);
        }
        uid
    }

    /// Save a video file to `path`. Returns whether the file was written.
    pub async fn download_video(&self, video_url: &str, path: &Path) -> bool {
        let url = strip_watermark(video_url);
        match self.client.download(&url, path).await {
            Ok(bytes) => {
                info!("Downloaded {} ({} bytes)", path.display(), bytes);
                true
            }
            Err(e) => {
                warn!("Downloading {} failed: {}", url, e);
                false
            }
        }
    }
}

impl std::fmt::Debug for LikeeApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LikeeApi")
            .field("config", &self.config)
            .field("endpoints", &self.endpoints)
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

/// `poster_uid` from the `window.data = {...};` assignment in a page source
pub fn extract_poster_uid(source: &str) -> Option<String> {
    let captures = WINDOW_DATA_REGEX.captures(source)?;
    let data: JsonValue = match serde_json::from_str(captures.get(1)?.as_str()) {
        Ok(data) => data,
        Err(e) => {
            debug!("Embedded page data is not JSON: {}", e);
            return None;
        }
    };

    match data.get("poster_uid")? {
        JsonValue::Null => None,
        uid => Some(value_to_text(uid)).filter(|uid| !uid.is_empty()),
    }
}

/// Video URL without the `_4` marker that selects the watermarked rendition
pub fn strip_watermark(video_url: &str) -> String {
    video_url.replace("_4", "")
}
