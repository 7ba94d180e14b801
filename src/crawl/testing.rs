// src/crawl/testing.rs
// =============================================================================
// Test doubles for the crawl core: a renderer serving canned pages and a
// search provider serving canned results. No network involved.
// =============================================================================

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::error::{CrawlError, CrawlResult};
use crate::render::PageRenderer;
use crate::search::SearchProvider;

#[derive(Debug, Clone, Default)]
pub struct FakePage {
    pub text: String,
    pub links: Vec<String>,
    pub keywords: Option<String>,
    pub description: Option<String>,
}

impl FakePage {
    pub fn new(text: &str, links: &[&str]) -> Self {
        FakePage {
            text: text.to_string(),
            links: links.iter().map(|l| l.to_string()).collect(),
            ..FakePage::default()
        }
    }

    pub fn with_meta(mut self, keywords: &str, description: &str) -> Self {
        self.keywords = Some(keywords.to_string());
        self.description = Some(description.to_string());
        self
    }
}

#[derive(Debug, Default)]
pub struct FakeRenderer {
    pages: HashMap<String, FakePage>,
    timeouts: HashSet<String>,
    panics: HashSet<String>,
    current: Option<String>,
    pub fail_open: bool,
    pub navigations: Vec<String>,
    pub opened: usize,
    pub closed: usize,
}

impl FakeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, page: FakePage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    pub fn timeout(mut self, url: &str) -> Self {
        self.timeouts.insert(url.to_string());
        self
    }

    pub fn panic_on(mut self, url: &str) -> Self {
        self.panics.insert(url.to_string());
        self
    }

    fn current_page(&self) -> Option<&FakePage> {
        self.current.as_ref().and_then(|url| self.pages.get(url))
    }
}

#[async_trait]
impl PageRenderer for FakeRenderer {
    async fn open(&mut self) -> CrawlResult<()> {
        if self.fail_open {
            return Err(CrawlError::Session("browser missing".into()));
        }
        self.opened += 1;
        Ok(())
    }

    async fn navigate(&mut self, url: &str, timeout: Duration) -> CrawlResult<()> {
        self.navigations.push(url.to_string());
        self.current = None;

        if self.panics.contains(url) {
            panic!("renderer crashed on {url}");
        }
        if self.timeouts.contains(url) {
            return Err(CrawlError::Timeout {
                url: url.to_string(),
                secs: timeout.as_secs(),
            });
        }
        if !self.pages.contains_key(url) {
            return Err(CrawlError::navigation(url, "HTTP 404 Not Found"));
        }

        self.current = Some(url.to_string());
        Ok(())
    }

    fn content(&self) -> &str {
        self.current_page().map(|p| p.text.as_str()).unwrap_or("")
    }

    fn evaluate_single(&self, selector: &str, attribute: &str) -> Option<String> {
        let page = self.current_page()?;
        match (selector, attribute) {
            ("meta[name=keywords]", "content") => page.keywords.clone(),
            ("meta[name=description]", "content") => page.description.clone(),
            _ => None,
        }
    }

    fn evaluate_all(&self, selector: &str, attribute: &str) -> Vec<String> {
        match (self.current_page(), selector, attribute) {
            (Some(page), "a[href]", "href") => page.links.clone(),
            _ => Vec::new(),
        }
    }

    async fn close(&mut self) {
        self.current = None;
        self.closed += 1;
    }
}

#[derive(Debug, Default)]
pub struct FakeSearch {
    results: HashMap<String, Vec<String>>,
}

impl FakeSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results(mut self, query: &str, urls: &[&str]) -> Self {
        self.results
            .insert(query.to_string(), urls.iter().map(|u| u.to_string()).collect());
        self
    }
}

#[async_trait]
impl SearchProvider for FakeSearch {
    async fn search(&self, query: &str, limit: usize) -> CrawlResult<Vec<String>> {
        match self.results.get(query) {
            Some(urls) => Ok(urls.iter().take(limit).cloned().collect()),
            None => Err(CrawlError::Search {
                query: query.to_string(),
                reason: "HTTP 429 Too Many Requests".into(),
            }),
        }
    }
}
