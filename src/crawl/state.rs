// src/crawl/state.rs
// =============================================================================
// Per-query crawl state.
//
// A CrawlState is created by the query runner at the start of every query and
// consumed when the QueryResult is built. Only code in crate::crawl can create
// or mutate one, so two queries can never share visited URLs or emails.
// =============================================================================

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// What we learned from one successfully loaded page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    pub keywords: String,
    pub description: String,
    /// Emails first seen on this page (earlier pages keep their own)
    pub emails: Vec<String>,
}

#[derive(Debug, Default)]
pub struct CrawlState {
    visited: IndexSet<String>,
    emails: IndexSet<String>,
    pages: Vec<PageRecord>,
}

impl CrawlState {
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Visited URLs in visit order, failed pages included
    pub fn visited(&self) -> &IndexSet<String> {
        &self.visited
    }

    /// All emails found so far, in discovery order
    pub fn emails(&self) -> &IndexSet<String> {
        &self.emails
    }

    pub fn pages(&self) -> &[PageRecord] {
        &self.pages
    }

    // Returns false if the URL was already visited
    pub(super) fn mark_visited(&mut self, url: String) -> bool {
        self.visited.insert(url)
    }

    pub(super) fn record_page(&mut self, record: PageRecord) {
        self.emails.extend(record.emails.iter().cloned());
        self.pages.push(record);
    }

    pub(super) fn into_parts(self) -> (Vec<PageRecord>, Vec<String>) {
        (self.pages, self.emails.into_iter().collect())
    }
}
