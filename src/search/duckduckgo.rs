// src/search/duckduckgo.rs
// =============================================================================
// Search results from DuckDuckGo's HTML endpoint.
//
// How it works:
// 1. GET https://html.duckduckgo.com/html/?q=<query>
// 2. Select every result title link (a.result__a)
// 3. Unwrap DuckDuckGo's redirect links (/l/?uddg=<target>)
// 4. Keep valid http(s) URLs, drop ads and duplicates, stop at the limit
//
// The HTML endpoint works without JavaScript, which is why we use it instead
// of the main site.
// =============================================================================

use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

use super::SearchProvider;
use crate::error::{CrawlError, CrawlResult};
use crate::extract::normalize_url;

pub const SEARCH_URL: &str = "https://html.duckduckgo.com/html/";

static RESULT_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.result__a").expect("result selector is valid"));

#[derive(Debug, Clone)]
pub struct DuckDuckGoSearch {
    client: Client,
    endpoint: String,
}

impl DuckDuckGoSearch {
    pub fn new() -> CrawlResult<Self> {
        Self::with_endpoint(SEARCH_URL)
    }

    pub fn with_endpoint(endpoint: &str) -> CrawlResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("email-harvester/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CrawlError::Session(e.to_string()))?;

        Ok(DuckDuckGoSearch {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    async fn search(&self, query: &str, limit: usize) -> CrawlResult<Vec<String>> {
        let search_error = |reason: String| CrawlError::Search {
            query: query.to_string(),
            reason,
        };

        let mut url = Url::parse(&self.endpoint).map_err(|e| search_error(e.to_string()))?;
        url.query_pairs_mut().append_pair("q", query);

        tracing::debug!(url = %url, "Fetching search results");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| search_error(e.to_string()))?;

        if !response.status().is_success() {
            return Err(search_error(format!("HTTP {}", response.status())));
        }

        let html = response
            .text()
            .await
            .map_err(|e| search_error(e.to_string()))?;

        Ok(parse_results(&html, limit))
    }
}

// Pulls result URLs out of a DuckDuckGo HTML results page
pub fn parse_results(html: &str, limit: usize) -> Vec<String> {
    let document = Html::parse_document(html);
    let base = Url::parse(SEARCH_URL).ok();
    let mut urls: Vec<String> = Vec::new();

    for element in document.select(&RESULT_LINK) {
        if urls.len() == limit {
            break;
        }

        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(target) = unwrap_redirect(base.as_ref(), href) else {
            continue;
        };

        // Ads and internal links point back at duckduckgo.com
        if crate::domain::registrable_domain(&target)
            .is_some_and(|d| d.as_str() == "duckduckgo.com")
        {
            continue;
        }

        if !urls.contains(&target) {
            urls.push(target);
        }
    }

    urls
}

// "//duckduckgo.com/l/?uddg=https%3A%2F%2Facme.example%2F&rut=..." -> "https://acme.example/"
fn unwrap_redirect(base: Option<&Url>, href: &str) -> Option<String> {
    let url = match base {
        Some(base) => base.join(href).ok()?,
        None => Url::parse(href).ok()?,
    };

    if url.path() == "/l/" {
        let target = url
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, value)| value.into_owned())?;
        return normalize_url(&target);
    }

    normalize_url(url.as_str())
}
