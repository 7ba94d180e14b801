// src/render/http.rs
// =============================================================================
// A PageRenderer that fetches pages over plain HTTP.
//
// How it works:
// 1. open() builds one reqwest Client that is reused for every page
// 2. navigate() downloads the page (request + body) under the timeout and
//    parses it once with scraper
// 3. evaluate_*() run CSS selectors against that parsed document
//
// Differences from a real browser:
// - No JavaScript, so content is the HTML as served
// - Sub-resources (images, fonts, stylesheets) are never requested
// - There are no native dialogs, so accept_dialogs() keeps the default
//
// href attributes are resolved against the final (post-redirect) URL, the
// same way a browser reports anchor.href.
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

use super::PageRenderer;
use crate::error::{CrawlError, CrawlResult};

const USER_AGENT: &str = concat!("email-harvester/", env!("CARGO_PKG_VERSION"));

// A page we successfully loaded
#[derive(Debug, Clone)]
struct LoadedPage {
    url: Url,
    html: String,
    document: Html,
}

impl LoadedPage {
    fn parse(url: Url, html: String) -> Self {
        let document = Html::parse_document(&html);
        LoadedPage {
            url,
            html,
            document,
        }
    }
}

#[derive(Debug, Default)]
pub struct HttpRenderer {
    client: Option<Client>,
    page: Option<LoadedPage>,
}

impl HttpRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    async fn open(&mut self) -> CrawlResult<()> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| CrawlError::Session(e.to_string()))?;

        self.client = Some(client);
        Ok(())
    }

    async fn navigate(&mut self, url: &str, timeout: Duration) -> CrawlResult<()> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| CrawlError::Session("renderer is not open".into()))?;

        // Whatever happens next, the previous page is gone
        self.page = None;

        let page = match tokio::time::timeout(timeout, fetch_page(client, url)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(CrawlError::Timeout {
                    url: url.to_string(),
                    secs: timeout.as_secs(),
                })
            }
        };

        self.page = Some(page);
        Ok(())
    }

    fn content(&self) -> &str {
        self.page.as_ref().map(|p| p.html.as_str()).unwrap_or("")
    }

    fn evaluate_single(&self, selector: &str, attribute: &str) -> Option<String> {
        let page = self.page.as_ref()?;
        let selector = Selector::parse(selector).ok()?;

        let element = page.document.select(&selector).next()?;
        element.value().attr(attribute).map(str::to_string)
    }

    fn evaluate_all(&self, selector: &str, attribute: &str) -> Vec<String> {
        let Some(page) = self.page.as_ref() else {
            return Vec::new();
        };
        let Ok(selector) = Selector::parse(selector) else {
            return Vec::new();
        };

        page.document
            .select(&selector)
            .filter_map(|element| element.value().attr(attribute))
            .filter_map(|value| reflect_attribute(&page.url, attribute, value))
            .collect()
    }

    async fn close(&mut self) {
        self.page = None;
        self.client = None;
    }
}

// Downloads a page and checks that it is something we can read
async fn fetch_page(client: &Client, url: &str) -> CrawlResult<LoadedPage> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| CrawlError::navigation(url, e))?;

    if !response.status().is_success() {
        return Err(CrawlError::navigation(
            url,
            format!("HTTP {}", response.status()),
        ));
    }

    // Missing content-type is allowed, anything else must look like markup
    if let Some(content_type) = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    {
        if !is_markup(content_type) {
            return Err(CrawlError::navigation(
                url,
                format!("unsupported content type {content_type}"),
            ));
        }
    }

    let final_url = response.url().clone();
    let html = response
        .text()
        .await
        .map_err(|e| CrawlError::navigation(url, e))?;

    Ok(LoadedPage::parse(final_url, html))
}

// text/html, application/xhtml+xml and friends; text/plain or text/css are not pages
fn is_markup(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.contains("html") || content_type.contains("xml")
}

// URL-valued attributes come back absolute, like the DOM reports them
fn reflect_attribute(base: &Url, attribute: &str, value: &str) -> Option<String> {
    if matches!(attribute, "href" | "src") {
        base.join(value.trim()).ok().map(|url| url.to_string())
    } else {
        Some(value.to_string())
    }
}
