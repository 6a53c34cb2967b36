//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: operation → request payloads → pages →
//! result files, with a scripted browser for the rendered pages

use async_trait::async_trait;
use likee_scraper::api::endpoints::{
    COMMENT_COUNT_XPATH, COMMENT_ITEM_CLASS, COMMENT_LIKES_CLASS, COMMENT_TEXT_CLASS,
    COMMENT_TIME_CLASS, COMMENT_USER_CLASS, PROFILE_VIDEO_XPATH, VIDEO_CARD_CLASS,
};
use likee_scraper::api::{Comment, Endpoints, LikeeApi};
use likee_scraper::cli::{Cli, Runner};
use likee_scraper::engine::StopReason;
use likee_scraper::http::{RateLimiter, RateLimiterConfig};
use likee_scraper::render::{Renderer, Selector};
use likee_scraper::{Result, ScraperConfig};
use clap::Parser;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tempfile::tempdir;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helpers
// ============================================================================

fn api_for(server: &MockServer, config: ScraperConfig) -> LikeeApi {
    LikeeApi::new(config)
        .unwrap()
        .with_endpoints(Endpoints::with_base(server.uri()))
        .with_rate_limiter(RateLimiter::disabled())
}

fn videos(first: u64, count: u64) -> Vec<Value> {
    (first..first + count)
        .map(|id| {
            json!({
                "postId": id.to_string(),
                "likeeId": "creator",
                "videoUrl": format!("https://video.like.video/v/{id}_4.mp4"),
            })
        })
        .collect()
}

fn video_page(first: u64, count: u64) -> Value {
    json!({"code": 0, "message": "ok", "data": {"videoList": videos(first, count)}})
}

fn ids(items: &[serde_json::Map<String, Value>]) -> Vec<String> {
    items
        .iter()
        .map(|item| item["postId"].as_str().unwrap().to_string())
        .collect()
}

// ============================================================================
// Listing Tests
// ============================================================================

#[tokio::test]
async fn test_trending_videos_follow_last_post_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/videoApi/getSquareVideos"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "scene": "WELOG_POPULAR",
            "fetchNum": 30,
            "lastPostId": 0,
            "country": "US",
            "language": "en",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(video_page(1, 3)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/videoApi/getSquareVideos"))
        .and(body_partial_json(json!({"lastPostId": "3"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(video_page(4, 3)))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, ScraperConfig::default());
    let result = api.get_trending_videos(Some(5)).await;

    assert_eq!(ids(result.items()), vec!["1", "2", "3", "4", "5"]);
    assert_eq!(result.stop_reason(), StopReason::LimitReached);
    assert_eq!(result.stats().pages_fetched, 2);
}

#[tokio::test]
async fn test_trending_hashtags_form_pages_until_empty() {
    let server = MockServer::start().await;
    let hashtags: Vec<Value> = (1..=20)
        .map(|id| json!({"eventId": id.to_string(), "hashtag": format!("tag{id}")}))
        .collect();

    Mock::given(method("POST"))
        .and(path("/official_website/RecommendApi/getRecommendHashtag"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("pagesize=20"))
        .and(body_string_contains("page=1"))
        .and(body_string_contains("country=GB"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "msg": "success",
            "data": {"eventList": hashtags}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/official_website/RecommendApi/getRecommendHashtag"))
        .and(body_string_contains("page=2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "msg": "success",
            "data": {"eventList": []}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = ScraperConfig {
        country: "GB".to_string(),
        ..Default::default()
    };
    let api = api_for(&server, config);
    let result = api.get_trending_hashtags(Some(50)).await;

    assert_eq!(result.len(), 20);
    assert_eq!(result.stop_reason(), StopReason::Exhausted);
    assert_eq!(result.items()[0]["eventId"], "1");
}

#[tokio::test]
async fn test_user_videos_keep_pages_before_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/videoApi/getUserVideo"))
        .and(body_partial_json(json!({"lastPostId": "", "uid": "1420839773", "pageSize": 28})))
        .respond_with(ResponseTemplate::new(200).set_body_json(video_page(1, 4)))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/videoApi/getUserVideo"))
        .and(body_partial_json(json!({"lastPostId": "4"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"code": 1, "message": "busy"})),
        )
        .mount(&server)
        .await;

    let api = api_for(&server, ScraperConfig::default());
    let result = api.get_user_videos("1420839773", Some(10)).await;

    assert_eq!(ids(result.items()), vec!["1", "2", "3", "4"]);
    assert_eq!(result.stop_reason(), StopReason::ValidationFailure);
}

#[tokio::test]
async fn test_hashtag_videos_http_error_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/official_website/VideoApi/getEventVideo"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, ScraperConfig::default());
    let result = api.get_hashtag_videos("6628875352397581241", Some(10)).await;

    assert!(result.is_empty());
    assert_eq!(result.stop_reason(), StopReason::TransportFailure);
}

#[tokio::test]
async fn test_unbounded_listing_is_one_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/official_website/VideoApi/getEventVideo"))
        .and(body_string_contains("topicId=6628875352397581241"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "msg": "success",
            "data": {"videoList": videos(1, 50)}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, ScraperConfig::default());
    let result = api.get_hashtag_videos("6628875352397581241", None).await;

    assert_eq!(result.len(), 50);
    assert_eq!(result.stop_reason(), StopReason::SinglePage);
}

// ============================================================================
// Single-shot Tests
// ============================================================================

#[tokio::test]
async fn test_user_info_returns_data() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/userApi/getUserInfo"))
        .and(body_partial_json(json!({"uid": "1420839773"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "ok",
            "data": {"userName": "ulvaatkins", "fansCount": null}
        })))
        .mount(&server)
        .await;

    let api = api_for(&server, ScraperConfig::default());
    let info = api.get_user_info("1420839773").await.unwrap();
    assert_eq!(info["userName"], "ulvaatkins");
}

#[tokio::test]
async fn test_user_info_api_error_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/userApi/getUserInfo"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "invalid uid", "data": {"userName": "x"}})),
        )
        .mount(&server)
        .await;

    let api = api_for(&server, ScraperConfig::default());
    assert_eq!(api.get_user_info("0").await, None);
}

#[tokio::test]
async fn test_user_post_count_keyed_by_uid() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/userApi/getUserPostNum"))
        .and(body_partial_json(json!({"country": "US", "tabType": 0, "uid": "42"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "ok",
            "data": {"postInfoMap": {"42": {"postCount": 7, "allLikeCount": 1200}}}
        })))
        .mount(&server)
        .await;

    let api = api_for(&server, ScraperConfig::default());
    let counts = api.get_user_post_count("42").await.unwrap();
    assert_eq!(counts, json!({"postCount": 7, "allLikeCount": 1200}));
}

// ============================================================================
// Download Tests
// ============================================================================

#[tokio::test]
async fn test_download_video_without_watermark() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/eu_live/1KWxuO.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mp4-bytes".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let file = dir.path().join("video.mp4");
    let api = api_for(&server, ScraperConfig::default());

    let url = format!("{}/eu_live/1KWxuO_4.mp4", server.uri());
    assert!(api.download_video(&url, &file).await);
    assert_eq!(std::fs::read(&file).unwrap(), b"mp4-bytes");
}

#[tokio::test]
async fn test_download_video_missing_is_false() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let file = dir.path().join("video.mp4");
    let api = api_for(&server, ScraperConfig::default());

    assert!(!api.download_video(&format!("{}/gone.mp4", server.uri()), &file).await);
    assert!(!file.exists());
}

// ============================================================================
// Scripted Browser
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Card,
    Count,
    ProfileVideo,
    Comment(usize),
    Field(usize, String),
}

#[derive(Debug, Clone)]
struct FakeComment {
    nickname: &'static str,
    text: Option<&'static str>,
    time: &'static str,
    likes: &'static str,
}

/// Page that reveals `step` more comments each time the last one is scrolled to
struct FakeBrowser {
    comments: Vec<FakeComment>,
    visible: Mutex<usize>,
    step: usize,
    has_card: bool,
    count_text: Option<&'static str>,
    url: String,
    visited: Mutex<Vec<String>>,
}

impl FakeBrowser {
    fn with_comments(total: usize, visible: usize, step: usize) -> Self {
        let comments = (0..total)
            .map(|i| FakeComment {
                nickname: if i % 2 == 0 { "ana" } else { "ben" },
                text: if i == 1 { None } else { Some("great video") },
                time: "2d ago",
                likes: if i == 0 { "1.2K" } else { "3" },
            })
            .collect();
        Self {
            comments,
            visible: Mutex::new(visible),
            step,
            has_card: true,
            count_text: None,
            url: "about:blank".to_string(),
            visited: Mutex::new(Vec::new()),
        }
    }

    fn field(&self, index: usize, class: &str) -> Option<&'static str> {
        let comment = self.comments.get(index)?;
        match class {
            c if c == COMMENT_USER_CLASS => Some(comment.nickname),
            c if c == COMMENT_TEXT_CLASS => comment.text,
            c if c == COMMENT_TIME_CLASS => Some(comment.time),
            c if c == COMMENT_LIKES_CLASS => Some(comment.likes),
            _ => None,
        }
    }
}

#[async_trait]
impl Renderer for FakeBrowser {
    type Element = Node;

    async fn navigate(&self, url: &str) -> Result<()> {
        self.visited.lock().unwrap().push(url.to_string());
        Ok(())
    }

    async fn find_element(&self, selector: &Selector) -> Result<Option<Node>> {
        Ok(match selector {
            Selector::Class(name) if name == VIDEO_CARD_CLASS && self.has_card => Some(Node::Card),
            Selector::XPath(expr) if expr == COMMENT_COUNT_XPATH => {
                self.count_text.map(|_| Node::Count)
            }
            Selector::XPath(expr) if expr == PROFILE_VIDEO_XPATH && self.has_card => {
                Some(Node::ProfileVideo)
            }
            _ => None,
        })
    }

    async fn find_within(&self, parent: &Node, selector: &Selector) -> Result<Option<Node>> {
        let (Node::Comment(index), Selector::Class(class)) = (parent, selector) else {
            return Ok(None);
        };
        Ok(self
            .field(*index, class)
            .map(|_| Node::Field(*index, class.clone())))
    }

    async fn list_elements(&self, selector: &Selector) -> Result<Vec<Node>> {
        match selector {
            Selector::Class(name) if name == COMMENT_ITEM_CLASS => {
                let visible = *self.visible.lock().unwrap();
                Ok((0..visible).map(Node::Comment).collect())
            }
            _ => Ok(Vec::new()),
        }
    }

    async fn click(&self, _element: &Node) -> Result<()> {
        Ok(())
    }

    async fn scroll_into_view(&self, _element: &Node) -> Result<()> {
        let mut visible = self.visible.lock().unwrap();
        *visible = (*visible + self.step).min(self.comments.len());
        Ok(())
    }

    async fn read_text(&self, element: &Node) -> Result<String> {
        Ok(match element {
            Node::Count => self.count_text.unwrap_or_default().to_string(),
            Node::Field(index, class) => self.field(*index, class).unwrap_or_default().to_string(),
            _ => String::new(),
        })
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.url.clone())
    }
}

// ============================================================================
// Rendered Page Tests
// ============================================================================

const VIDEO_URL: &str = "https://likee.video/@HouseofB/video/7263259022822072270";

#[tokio::test]
async fn test_comments_scroll_until_limit() {
    let server = MockServer::start().await;
    let browser = FakeBrowser::with_comments(12, 5, 5);
    let api = api_for(&server, ScraperConfig::default());

    let comments = api.get_video_comments(&browser, VIDEO_URL, 8).await;

    assert_eq!(comments.len(), 8);
    assert_eq!(comments.stop_reason(), StopReason::LimitReached);
    assert_eq!(
        comments.items()[0],
        Comment {
            username: "ana".to_string(),
            comment_text: "great video".to_string(),
            time: "2d ago".to_string(),
            like_count: 1200,
        }
    );
    assert_eq!(comments.items()[1].comment_text, "");
    assert_eq!(comments.items()[1].like_count, 3);
    assert_eq!(*browser.visited.lock().unwrap(), vec![VIDEO_URL.to_string()]);
}

#[tokio::test]
async fn test_comments_stop_when_nothing_new_loads() {
    let server = MockServer::start().await;
    let browser = FakeBrowser::with_comments(3, 3, 5);
    let api = api_for(&server, ScraperConfig::default());

    let comments = api.get_video_comments(&browser, VIDEO_URL, 5).await;

    assert_eq!(comments.len(), 3);
    assert_eq!(comments.stop_reason(), StopReason::NoNewContent);
}

#[tokio::test]
async fn test_comment_count_lowers_limit() {
    let server = MockServer::start().await;
    let mut browser = FakeBrowser::with_comments(12, 5, 5);
    browser.count_text = Some("2 comments");
    let api = api_for(&server, ScraperConfig::default());

    let comments = api.get_video_comments(&browser, VIDEO_URL, 10).await;
    assert_eq!(comments.len(), 2);
}

#[tokio::test]
async fn test_comments_without_video_card_is_empty() {
    let server = MockServer::start().await;
    let mut browser = FakeBrowser::with_comments(4, 4, 1);
    browser.has_card = false;
    let api = api_for(&server, ScraperConfig::default());

    let comments = api.get_video_comments(&browser, VIDEO_URL, 10).await;
    assert!(comments.is_empty());
}

#[tokio::test]
async fn test_user_id_from_page_data() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/@ulvaatkins/video/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><script>window.data = {"poster_uid":"1420839773","nick_name":"u"};</script></html>"#,
        ))
        .mount(&server)
        .await;

    let mut browser = FakeBrowser::with_comments(0, 0, 0);
    browser.url = format!("{}/@ulvaatkins/video/1", server.uri());
    let api = api_for(&server, ScraperConfig::default());

    let uid = api.get_user_id(&browser, "ulvaatkins").await;
    assert_eq!(uid, Some("1420839773".to_string()));
    assert_eq!(
        *browser.visited.lock().unwrap(),
        vec![format!("{}/@ulvaatkins", server.uri())]
    );
}

#[tokio::test]
async fn test_user_id_without_videos_is_none() {
    let server = MockServer::start().await;
    let mut browser = FakeBrowser::with_comments(0, 0, 0);
    browser.has_card = false;
    let api = api_for(&server, ScraperConfig::default());

    assert_eq!(api.get_user_id(&browser, "nobody").await, None);
}

// ============================================================================
// CLI Runner Tests
// ============================================================================

#[tokio::test]
async fn test_runner_writes_output_and_downloads() {
    let server = MockServer::start().await;
    let page: Vec<Value> = (1..=2)
        .map(|id| {
            json!({
                "postId": id.to_string(),
                "likeeId": "creator",
                "videoUrl": format!("{}/v/{id}_4.mp4", server.uri()),
            })
        })
        .collect();

    Mock::given(method("POST"))
        .and(path("/videoApi/getSquareVideos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "ok",
            "data": {"videoList": page}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v/1.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"one".to_vec()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v/2.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"two".to_vec()))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let output = dir.path().join("trending.json");
    let downloads = dir.path().join("videos");

    let cli = Cli::try_parse_from([
        "likee-scraper",
        "trending-videos",
        "--limit",
        "2",
        "--download",
        "--output",
        output.to_str().unwrap(),
    ])
    .unwrap();
    let runner = Runner::new(cli);

    let config = ScraperConfig {
        download_dir: downloads.clone(),
        ..Default::default()
    };
    let api = api_for(&server, config);

    let outcome = runner.execute(&api).await.unwrap();
    runner.emit(&api, &outcome).await.unwrap();

    let saved: Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(saved.as_array().unwrap().len(), 2);
    assert_eq!(saved[0]["postId"], "1");

    assert_eq!(std::fs::read(downloads.join("creator_1.mp4")).unwrap(), b"one");
    assert_eq!(std::fs::read(downloads.join("creator_2.mp4")).unwrap(), b"two");
}

#[tokio::test]
async fn test_runner_pauses_before_every_download() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v/9.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"nine".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let downloads = dir.path().join("videos");
    let cli = Cli::try_parse_from(["likee-scraper", "trending-videos", "--download"]).unwrap();
    let runner = Runner::new(cli);

    let config = ScraperConfig {
        download_dir: downloads.clone(),
        ..Default::default()
    };
    let pause = RateLimiterConfig::new(Duration::from_millis(60)).with_jitter(Duration::ZERO);
    let api = api_for(&server, config).with_rate_limiter(RateLimiter::new(pause));

    let video = json!({
        "postId": "9",
        "likeeId": "solo",
        "videoUrl": format!("{}/v/9_4.mp4", server.uri()),
    });
    let videos = vec![video.as_object().unwrap().clone()];
    let outcome = likee_scraper::cli::Outcome {
        value: Value::Array(vec![video]),
        videos,
    };

    let start = Instant::now();
    runner.emit(&api, &outcome).await.unwrap();

    assert!(start.elapsed() >= Duration::from_millis(60));
    assert_eq!(std::fs::read(downloads.join("solo_9.mp4")).unwrap(), b"nine");
}

#[tokio::test]
async fn test_runner_comments_use_configured_default_limit() {
    let server = MockServer::start().await;
    let browser = FakeBrowser::with_comments(20, 10, 10);

    let cli = Cli::try_parse_from(["likee-scraper", "video-comments", VIDEO_URL]).unwrap();
    let runner = Runner::new(cli);
    let config = ScraperConfig {
        max_video_comments: 4,
        ..Default::default()
    };
    let api = api_for(&server, config);

    let outcome = runner.execute_rendered(&api, &browser).await.unwrap();
    let comments = outcome.value.as_array().unwrap();
    assert_eq!(comments.len(), 4);
    assert_eq!(comments[0]["username"], "ana");
    assert!(outcome.videos.is_empty());
}

#[tokio::test]
async fn test_runner_rejects_browser_command_without_browser() {
    let server = MockServer::start().await;
    let cli = Cli::try_parse_from(["likee-scraper", "user-id", "someone"]).unwrap();
    let runner = Runner::new(cli);
    let api = api_for(&server, ScraperConfig::default());

    assert!(runner.execute(&api).await.is_err());
}

#[test]
fn test_runner_config_file_with_overrides() {
    let dir = tempdir().unwrap();
    let path: PathBuf = dir.path().join("config.yaml");
    std::fs::write(&path, "country: DE\nlanguage: de\npause_time: 1.5\n").unwrap();

    let cli = Cli::try_parse_from([
        "likee-scraper",
        "--config",
        path.to_str().unwrap(),
        "--language",
        "en",
        "trending-hashtags",
    ])
    .unwrap();
    let config = Runner::new(cli).load_config().unwrap();

    assert_eq!(config.country, "DE");
    assert_eq!(config.language, "en");
    assert_eq!(config.pause_time, 1.5);
}
