//! WebDriver-backed renderer
//!
//! Drives a Firefox session through a WebDriver server (geckodriver,
//! selenium) with fantoccini.

use super::types::{Renderer, Selector};
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use tracing::debug;

/// Element handle with a comparable WebDriver reference
#[derive(Clone)]
pub struct WebElement {
    inner: Element,
    reference: JsonValue,
}

impl WebElement {
    fn wrap(inner: Element) -> Result<Self> {
        let reference = serde_json::to_value(&inner)?;
        Ok(Self { inner, reference })
    }
}

impl PartialEq for WebElement {
    fn eq(&self, other: &Self) -> bool {
        self.reference == other.reference
    }
}

impl std::fmt::Debug for WebElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("WebElement").field(&self.reference).finish()
    }
}

/// Browser session over the WebDriver protocol
pub struct WebDriverRenderer {
    client: Client,
}

impl WebDriverRenderer {
    /// Start a Firefox session on the WebDriver server at `webdriver_url`
    pub async fn connect(webdriver_url: &str, headless: bool) -> Result<Self> {
        let args: Vec<&str> = if headless { vec!["-headless"] } else { Vec::new() };
        let mut capabilities = JsonObject::new();
        capabilities.insert("browserName".to_string(), json!("firefox"));
        capabilities.insert("moz:firefoxOptions".to_string(), json!({ "args": args }));

        let client = ClientBuilder::rustls()
            .capabilities(capabilities)
            .connect(webdriver_url)
            .await
            .map_err(|e| Error::WebDriverSession {
                message: format!("{webdriver_url}: {e}"),
            })?;

        debug!("WebDriver session started at {}", webdriver_url);
        Ok(Self { client })
    }
}

impl std::fmt::Debug for WebDriverRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebDriverRenderer").finish_non_exhaustive()
    }
}

/// Split a selector into the owned text fantoccini locators borrow from
fn locator_parts(selector: &Selector) -> (bool, String) {
    match selector {
        Selector::XPath(expr) => (true, expr.clone()),
        other => (false, other.to_css().unwrap_or_default()),
    }
}

fn locator(is_xpath: bool, text: &str) -> Locator<'_> {
    if is_xpath {
        Locator::XPath(text)
    } else {
        Locator::Css(text)
    }
}

fn command_error(e: CmdError) -> Error {
    Error::render(e.to_string())
}

/// Turn "no such element" into `None`
fn optional(result: std::result::Result<Element, CmdError>) -> Result<Option<WebElement>> {
    match result {
        Ok(element) => WebElement::wrap(element).map(Some),
        Err(e) if e.is_miss() => Ok(None),
        Err(e) => Err(command_error(e)),
    }
}

#[async_trait]
impl Renderer for WebDriverRenderer {
    type Element = WebElement;

    async fn navigate(&self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);
        self.client.goto(url).await.map_err(command_error)
    }

    async fn find_element(&self, selector: &Selector) -> Result<Option<WebElement>> {
        let (is_xpath, text) = locator_parts(selector);
        optional(self.client.find(locator(is_xpath, &text)).await)
    }

    async fn find_within(
        &self,
        parent: &WebElement,
        selector: &Selector,
    ) -> Result<Option<WebElement>> {
        let (is_xpath, text) = locator_parts(selector);
        optional(parent.inner.find(locator(is_xpath, &text)).await)
    }

    async fn list_elements(&self, selector: &Selector) -> Result<Vec<WebElement>> {
        let (is_xpath, text) = locator_parts(selector);
        let elements = self
            .client
            .find_all(locator(is_xpath, &text))
            .await
            .map_err(command_error)?;
        elements.into_iter().map(WebElement::wrap).collect()
    }

    async fn click(&self, element: &WebElement) -> Result<()> {
        element.inner.click().await.map_err(command_error)
    }

    async fn scroll_into_view(&self, element: &WebElement) -> Result<()> {
        self.client
            .execute(
                "arguments[0].scrollIntoView();",
                vec![element.reference.clone()],
            )
            .await
            .map(|_| ())
            .map_err(command_error)
    }

    async fn read_text(&self, element: &WebElement) -> Result<String> {
        element.inner.text().await.map_err(command_error)
    }

    async fn current_url(&self) -> Result<String> {
        self.client
            .current_url()
            .await
            .map(|url| url.to_string())
            .map_err(command_error)
    }

    async fn close(&self) -> Result<()> {
        debug!("Closing WebDriver session");
        self.client.clone().close().await.map_err(command_error)
    }
}
