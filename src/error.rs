// src/error.rs
// =============================================================================
// Error types for the crawl core.
//
// How errors flow:
// - Navigation and Timeout are recovered inside the traversal: the page is
//   logged and skipped, the crawl goes on
// - Search failures are recovered by the query runner: the query gets an
//   empty seed list but still shows up in the report
// - Session failures (we could not open the page renderer) are fatal and
//   bubble all the way up to main
//
// The application layer (main.rs, config, report) uses anyhow on top of this.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlError {
    /// The page could not be loaded (network, DNS, bad status, non-HTML body)
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// The page did not finish loading within the navigation timeout
    #[error("navigation to {url} timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    /// The rendering session could not be opened
    #[error("could not open page session: {0}")]
    Session(String),

    /// The search provider failed for a query
    #[error("search for '{query}' failed: {reason}")]
    Search { query: String, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CrawlError {
    pub fn navigation(url: impl Into<String>, reason: impl ToString) -> Self {
        CrawlError::Navigation {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// True for errors the traversal swallows (the page is just skipped)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CrawlError::Navigation { .. } | CrawlError::Timeout { .. } | CrawlError::Search { .. }
        )
    }
}

pub type CrawlResult<T> = std::result::Result<T, CrawlError>;
