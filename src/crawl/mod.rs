// src/crawl/mod.rs
// =============================================================================
// This module handles the crawl itself.
//
// Features:
// - Depth-first link following from each seed, bounded by max_depth
// - At most urls_per_depth links followed from any single page
// - Per-query dedup of visited URLs and found emails
// - One page session opened before the first query and closed after the last
//
// Submodules:
// - state: the per-query CrawlState and the PageRecord it collects
// - traversal: visits pages and decides what to visit next
// - runner: one traversal per query, plus the session lifecycle
// =============================================================================

mod runner;
mod state;
mod traversal;

#[cfg(test)]
mod testing;

pub use runner::{crawl_queries, crawl_seeds, QueryResult};
#[cfg(test)]
pub use state::PageRecord;
