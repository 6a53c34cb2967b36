//! JSON result writer
//!
//! Provides utilities for writing results and placing downloads.

use crate::error::{Error, Result};
use crate::types::{value_to_text, Item};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Render a value as indented JSON
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Write a value as indented JSON to `path`, replacing any existing file
pub fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    let json = to_pretty_json(value)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    fs::write(path, json).map_err(|e| {
        Error::output(format!("Failed to write '{}': {e}", path.display()))
    })?;

    debug!("Wrote results to {}", path.display());
    Ok(())
}

/// Create a directory (and parents) if it does not exist
pub fn ensure_dir(dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|e| {
        Error::output(format!("Failed to create directory '{}': {e}", dir.display()))
    })
}

/// File name for a downloaded video: `{likeeId}_{postId}.mp4`.
///
/// `None` when the item lacks either identifier.
pub fn video_filename(item: &Item) -> Option<String> {
    let likee_id = item.get("likeeId").map(value_to_text)?;
    let post_id = item.get("postId").map(value_to_text)?;
    if likee_id.is_empty() || post_id.is_empty() {
        return None;
    }

    // identifiers come from the server; keep them from leaving the directory
    let clean = |id: String| id.replace(['/', '\\'], "_");
    Some(format!("{}_{}.mp4", clean(likee_id), clean(post_id)))
}

/// Where a video item is saved under `dir`
pub fn video_path(dir: impl AsRef<Path>, item: &Item) -> Option<PathBuf> {
    video_filename(item).map(|name| dir.as_ref().join(name))
}
