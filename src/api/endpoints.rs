//! Likee endpoints and request descriptors
//!
//! Field names and constant values in the payloads are what the platform
//! expects; changing them changes the request on the wire.

use crate::config::ScraperConfig;
use crate::pagination::{LastItemCursor, PageNumberCursor, RequestDescriptor};
use crate::types::{Encoding, JsonObject, JsonValue};
use serde_json::json;

/// Base URL of the activity-flow API
pub const API_BASE: &str = "https://api.like-video.com/likee-activity-flow-micro";

/// Base URL of the public website (also hosts the form-encoded endpoints)
pub const WEBSITE_BASE: &str = "https://likee.video";

/// Class of the video cards on a video page
pub const VIDEO_CARD_CLASS: &str = "video-card";

/// Class of one comment row
pub const COMMENT_ITEM_CLASS: &str = "comment-item";

/// Classes of the fields inside a comment row
pub const COMMENT_TEXT_CLASS: &str = "msg_min";
pub const COMMENT_LIKES_CLASS: &str = "like-count";
pub const COMMENT_USER_CLASS: &str = "nickname";
pub const COMMENT_TIME_CLASS: &str = "time";

/// Element holding the total comment count of the opened video
pub const COMMENT_COUNT_XPATH: &str =
    "/html/body/div[2]/div[2]/div[1]/div/div[3]/div[1]/div[3]/span[2]";

/// First video card on a user profile
pub const PROFILE_VIDEO_XPATH: &str = r#"//div[@class="card-video poster-bg"]"#;

/// Where each operation sends its requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Base for the JSON endpoints
    pub api_base: String,
    /// Base for the form endpoints and the profile pages
    pub website_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api_base: API_BASE.to_string(),
            website_base: WEBSITE_BASE.to_string(),
        }
    }
}

impl Endpoints {
    /// Serve every endpoint from one base URL
    pub fn with_base(base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self {
            api_base: base.clone(),
            website_base: base,
        }
    }

    /// Profile lookup by uid
    pub fn user_info(&self) -> String {
        format!("{}/userApi/getUserInfo", self.api_base)
    }

    /// Post counters keyed by uid
    pub fn user_post_count(&self) -> String {
        format!("{}/userApi/getUserPostNum", self.api_base)
    }

    /// Videos uploaded by one user
    pub fn user_videos(&self) -> String {
        format!("{}/videoApi/getUserVideo", self.api_base)
    }

    /// Popular videos feed
    pub fn trending_videos(&self) -> String {
        format!("{}/videoApi/getSquareVideos", self.api_base)
    }

    /// Recommended hashtags, served by the website host
    pub fn trending_hashtags(&self) -> String {
        format!(
            "{}/official_website/RecommendApi/getRecommendHashtag",
            self.website_base
        )
    }

    /// Videos posted under one hashtag
    pub fn hashtag_videos(&self) -> String {
        format!("{}/official_website/VideoApi/getEventVideo", self.website_base)
    }

    /// Profile page of a user
    pub fn profile_page(&self, username: &str) -> String {
        format!("{}/@{}", self.website_base, username)
    }
}

fn object(value: JsonValue) -> JsonObject {
    match value {
        JsonValue::Object(map) => map,
        _ => JsonObject::new(),
    }
}

// ============================================================================
// Single-shot payloads
// ============================================================================

/// JSON body for [`Endpoints::user_info`]
pub fn user_info_payload(uid: &str) -> JsonObject {
    object(json!({ "uid": uid }))
}

/// JSON body for [`Endpoints::user_post_count`]
pub fn user_post_count_payload(config: &ScraperConfig, uid: &str) -> JsonObject {
    object(json!({
        "country": config.country,
        "tabType": 0,
        "uid": uid,
    }))
}

// ============================================================================
// Paginated listings
// ============================================================================

/// Videos uploaded by a user, continued by `lastPostId`
pub fn user_videos(endpoints: &Endpoints, config: &ScraperConfig, uid: &str) -> RequestDescriptor {
    let payload = object(json!({
        "country": config.country,
        "count": 100,
        "page": 1,
        "pageSize": 28,
        "tabType": 0,
        "uid": uid,
    }));
    RequestDescriptor::new(
        "user_videos",
        endpoints.user_videos(),
        Encoding::Json,
        payload,
        "data.videoList",
        LastItemCursor::new("lastPostId", "postId", ""),
    )
}

/// Popular videos for the configured country and language
pub fn trending_videos(endpoints: &Endpoints, config: &ScraperConfig) -> RequestDescriptor {
    let payload = object(json!({
        "scene": "WELOG_POPULAR",
        "fetchNum": 30,
        "startNum": 0,
        "language": config.language,
        "country": config.country,
        "deviceId": "1",
        "uid": 1,
    }));
    RequestDescriptor::new(
        "trending_videos",
        endpoints.trending_videos(),
        Encoding::Json,
        payload,
        "data.videoList",
        LastItemCursor::new("lastPostId", "postId", 0),
    )
}

/// Recommended hashtags, 20 per page
pub fn trending_hashtags(endpoints: &Endpoints, config: &ScraperConfig) -> RequestDescriptor {
    let payload = object(json!({
        "pagesize": 20,
        "language": config.language,
        "country": config.country,
    }));
    RequestDescriptor::new(
        "trending_hashtags",
        endpoints.trending_hashtags(),
        Encoding::Form,
        payload,
        "data.eventList",
        PageNumberCursor::new("page", 1),
    )
}

/// Popular videos under a hashtag, 50 per page
pub fn hashtag_videos(
    endpoints: &Endpoints,
    config: &ScraperConfig,
    hashtag_id: &str,
) -> RequestDescriptor {
    let payload = object(json!({
        "topicId": hashtag_id,
        "pageSize": 50,
        "country": config.country,
    }));
    RequestDescriptor::new(
        "hashtag_videos",
        endpoints.hashtag_videos(),
        Encoding::Form,
        payload,
        "data.videoList",
        PageNumberCursor::new("page", 1),
    )
}
