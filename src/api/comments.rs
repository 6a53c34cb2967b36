//! Comment extraction from a rendered video page

use super::endpoints::{
    COMMENT_COUNT_XPATH, COMMENT_LIKES_CLASS, COMMENT_TEXT_CLASS, COMMENT_TIME_CLASS,
    COMMENT_USER_CLASS,
};
use crate::render::{Renderer, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One comment under a video
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Commenter's display name
    pub username: String,
    /// Comment body
    pub comment_text: String,
    /// Relative time as shown on the page ("2d ago")
    pub time: String,
    /// Likes on the comment
    pub like_count: u64,
}

/// Parse a displayed count such as `"352"`, `"1.2K comments"` or `"3M"`.
///
/// Only the first whitespace-separated token is read. The number before a
/// suffix is truncated to a whole count first, so `"1.9K"` reads as 1000.
pub fn parse_count(text: &str) -> Option<u64> {
    let token = text.split_whitespace().next()?;

    let (number, multiplier) = match token.chars().last()? {
        'K' | 'k' => (&token[..token.len() - 1], 1_000.0),
        'M' | 'm' => (&token[..token.len() - 1], 1_000_000.0),
        _ => (token, 1.0),
    };

    if multiplier == 1.0 {
        if let Ok(count) = number.replace(',', "").parse::<u64>() {
            return Some(count);
        }
    }

    let value: f64 = number.replace(',', "").parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some((value.trunc() * multiplier) as u64)
}

/// Total comment count of the opened video, when the page shows one
pub async fn read_comment_count<R>(renderer: &R) -> Option<u64>
where
    R: Renderer + ?Sized,
{
    let selector = Selector::xpath(COMMENT_COUNT_XPATH);
    let element = match renderer.find_element(&selector).await {
        Ok(Some(element)) => element,
        Ok(None) => {
            debug!("Comment count not shown");
            return None;
        }
        Err(e) => {
            debug!("Comment count lookup failed: {}", e);
            return None;
        }
    };

    let text = renderer.read_text(&element).await.ok()?;
    let count = parse_count(&text);
    debug!("Comment count text {:?} -> {:?}", text, count);
    count
}

/// Build a [`Comment`] from one `comment-item` element.
///
/// Missing fields fall back to empty text and zero likes.
pub async fn read_comment<R>(renderer: &R, element: &R::Element) -> Comment
where
    R: Renderer + ?Sized,
{
    let username = child_text(renderer, element, COMMENT_USER_CLASS).await;
    let comment_text = child_text(renderer, element, COMMENT_TEXT_CLASS).await;
    let time = child_text(renderer, element, COMMENT_TIME_CLASS).await;
    let like_count = child_text(renderer, element, COMMENT_LIKES_CLASS)
        .await
        .and_then(|text| parse_count(&text))
        .unwrap_or(0);

    Comment {
        username: username.unwrap_or_default(),
        comment_text: comment_text.unwrap_or_default(),
        time: time.unwrap_or_default(),
        like_count,
    }
}

async fn child_text<R>(renderer: &R, parent: &R::Element, class: &str) -> Option<String>
where
    R: Renderer + ?Sized,
{
    match renderer.find_within(parent, &Selector::class(class)).await {
        Ok(Some(child)) => match renderer.read_text(&child).await {
            Ok(text) => Some(text),
            Err(e) => {
                debug!("Reading .{} failed: {}", class, e);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            debug!("Lookup of .{} failed: {}", class, e);
            None
        }
    }
}
