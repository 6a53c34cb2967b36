//! Rendering module
//!
//! The rendered-page collaborator used where data is only reachable through
//! a browser (comments, username → uid lookup).

mod types;
mod webdriver;

pub use types::{Renderer, Selector};
pub use webdriver::{WebDriverRenderer, WebElement};
