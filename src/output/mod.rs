//! Output module
//!
//! Handles result files and downloaded videos.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Writing results as pretty-printed JSON
//! - Naming and placing downloaded video files

mod writer;

pub use writer::{ensure_dir, to_pretty_json, video_filename, video_path, write_json};
