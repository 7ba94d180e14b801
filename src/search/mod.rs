// src/search/mod.rs
// =============================================================================
// The search step: turn a query into a ranked list of seed URLs.
//
// Submodules:
// - duckduckgo: scrapes DuckDuckGo's no-JavaScript results page
//
// The query runner only depends on the SearchProvider trait, so tests can
// hand it canned results.
// =============================================================================

mod duckduckgo;

pub use duckduckgo::DuckDuckGoSearch;

use async_trait::async_trait;

use crate::error::CrawlResult;

#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Ranked result URLs for a query, at most `limit` of them,
    /// all valid absolute http(s) URLs
    async fn search(&self, query: &str, limit: usize) -> CrawlResult<Vec<String>>;
}
