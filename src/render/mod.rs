// src/render/mod.rs
// =============================================================================
// The page-rendering layer, behind a trait.
//
// The crawl core never talks to the network directly. It asks a PageRenderer
// to load a URL and then reads the loaded page through a few questions:
// - content(): the whole page as text
// - evaluate_single(): one attribute of the first matching element (meta tags)
// - evaluate_all(): one attribute of every matching element (hrefs)
//
// Submodules:
// - http: a renderer backed by reqwest + scraper (no JavaScript)
//
// Tests drive the core with a fake renderer that returns canned pages.
// =============================================================================

mod http;

pub use http::HttpRenderer;

use async_trait::async_trait;
use std::time::Duration;

use crate::error::CrawlResult;

#[async_trait]
pub trait PageRenderer: Send {
    /// Acquire the session; failing here aborts the whole run
    async fn open(&mut self) -> CrawlResult<()>;

    /// Load a page; fails on timeout, network errors or unusable content
    async fn navigate(&mut self, url: &str, timeout: Duration) -> CrawlResult<()>;

    /// Full content of the current page (empty before the first navigation)
    fn content(&self) -> &str;

    /// Attribute of the first element matching the selector, if any
    fn evaluate_single(&self, selector: &str, attribute: &str) -> Option<String>;

    /// Attribute of every matching element, in document order
    fn evaluate_all(&self, selector: &str, attribute: &str) -> Vec<String>;

    /// Auto-accept native dialogs (alert/confirm/prompt) from now on
    ///
    /// Backends without dialogs keep the default.
    async fn accept_dialogs(&mut self) -> CrawlResult<()> {
        Ok(())
    }

    /// Release the session; must be safe to call more than once
    async fn close(&mut self);
}

// Reads <meta name="..." content="..."> from the current page
// A missing tag is just an empty string
pub fn read_meta<R: PageRenderer + ?Sized>(renderer: &R, name: &str) -> String {
    renderer
        .evaluate_single(&format!("meta[name={name}]"), "content")
        .unwrap_or_default()
}
