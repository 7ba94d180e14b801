// src/crawl/runner.rs
// =============================================================================
// One traversal per query, and the page session around all of them.
//
// How a query runs:
// 1. Ask the search provider for seed URLs (capped at urls_per_query)
// 2. Start a fresh CrawlState
// 3. Crawl every seed in search order, one after the other
// 4. Turn the state into a QueryResult with the elapsed time
//
// Session lifecycle (crawl_queries / crawl_seeds):
// - The renderer is opened once before the first query; if that fails the
//   whole run fails, since no page could be loaded anyway
// - It is closed once after the last query, whether the crawl finished,
//   returned early, or panicked
// =============================================================================

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::panic::AssertUnwindSafe;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::state::{CrawlState, PageRecord};
use super::traversal::CrawlTraversal;
use crate::config::CrawlConfig;
use crate::error::CrawlResult;
use crate::extract::normalize_url;
use crate::render::PageRenderer;
use crate::search::SearchProvider;

/// Everything we found for one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub query: String,
    pub seed_urls: Vec<String>,
    pub pages: Vec<PageRecord>,
    pub emails: Vec<String>,
    /// Wall-clock seconds for search + crawl, two decimals
    pub elapsed_secs: f64,
}

pub struct QueryRunner<'a, R: PageRenderer + ?Sized, S: SearchProvider + ?Sized> {
    renderer: &'a mut R,
    search: &'a S,
    config: &'a CrawlConfig,
}

impl<'a, R, S> QueryRunner<'a, R, S>
where
    R: PageRenderer + ?Sized,
    S: SearchProvider + ?Sized,
{
    pub fn new(renderer: &'a mut R, search: &'a S, config: &'a CrawlConfig) -> Self {
        QueryRunner {
            renderer,
            search,
            config,
        }
    }

    // Runs one query end to end; never fails, failures just mean fewer pages
    pub async fn run(&mut self, query: &str) -> QueryResult {
        let started = Instant::now();
        info!(query = %query, "Starting query");

        let seeds = match self.search.search(query, self.config.urls_per_query).await {
            Ok(urls) => select_seeds(urls, self.config.urls_per_query),
            Err(e) => {
                warn!(query = %query, error = %e, "Search failed, no seeds for this query");
                Vec::new()
            }
        };

        crawl_seed_list(&mut *self.renderer, self.config, query, seeds, started).await
    }
}

// Crawls every query with one page session
//
// The report always has one QueryResult per query, in input order.
pub async fn crawl_queries<R, S>(
    renderer: &mut R,
    search: &S,
    config: &CrawlConfig,
    queries: &[String],
) -> CrawlResult<Vec<QueryResult>>
where
    R: PageRenderer + ?Sized,
    S: SearchProvider + ?Sized,
{
    config.validate()?;
    open_session(renderer).await?;

    let outcome = AssertUnwindSafe(async {
        let mut runner = QueryRunner::new(&mut *renderer, search, config);
        let mut results = Vec::with_capacity(queries.len());
        for query in queries {
            results.push(runner.run(query).await);
        }
        results
    })
    .catch_unwind()
    .await;

    close_session(renderer, outcome).await
}

// Crawls explicit seed URLs (no search step) as a single labelled result
pub async fn crawl_seeds<R>(
    renderer: &mut R,
    config: &CrawlConfig,
    label: &str,
    seeds: &[String],
) -> CrawlResult<QueryResult>
where
    R: PageRenderer + ?Sized,
{
    config.validate()?;
    open_session(renderer).await?;

    let started = Instant::now();
    let seeds = select_seeds(seeds.to_vec(), config.urls_per_query);

    let outcome = AssertUnwindSafe(crawl_seed_list(
        &mut *renderer,
        config,
        label,
        seeds,
        started,
    ))
    .catch_unwind()
    .await;

    close_session(renderer, outcome).await
}

async fn crawl_seed_list<R: PageRenderer + ?Sized>(
    renderer: &mut R,
    config: &CrawlConfig,
    query: &str,
    seeds: Vec<String>,
    started: Instant,
) -> QueryResult {
    let mut state = CrawlState::new();

    {
        let mut traversal = CrawlTraversal::new(renderer, config);
        for seed in &seeds {
            traversal.visit(seed, 0, &mut state).await;
        }
    }

    let elapsed_secs = round_secs(started.elapsed().as_secs_f64());

    info!(
        query = %query,
        seeds = seeds.len(),
        pages = state.pages().len(),
        emails = state.emails().len(),
        elapsed_secs,
        "Query finished"
    );

    let (pages, emails) = state.into_parts();

    QueryResult {
        query: query.to_string(),
        seed_urls: seeds,
        pages,
        emails,
        elapsed_secs,
    }
}

// Keeps valid absolute URLs, normalized and deduplicated, up to the limit
fn select_seeds(urls: Vec<String>, limit: usize) -> Vec<String> {
    let mut seeds: Vec<String> = Vec::new();
    for url in urls {
        if seeds.len() == limit {
            break;
        }
        match normalize_url(&url) {
            Some(seed) if !seeds.contains(&seed) => seeds.push(seed),
            Some(_) => {}
            None => debug!(url = %url, "Dropping invalid seed URL"),
        }
    }
    seeds
}

async fn open_session<R: PageRenderer + ?Sized>(renderer: &mut R) -> CrawlResult<()> {
    renderer.open().await?;

    // A dialog we cannot dismiss should not stop the crawl
    if let Err(e) = renderer.accept_dialogs().await {
        debug!(error = %e, "Could not install dialog handler, continuing");
    }

    Ok(())
}

async fn close_session<R: PageRenderer + ?Sized, T>(
    renderer: &mut R,
    outcome: std::thread::Result<T>,
) -> CrawlResult<T> {
    renderer.close().await;

    match outcome {
        Ok(value) => Ok(value),
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

fn round_secs(secs: f64) -> f64 {
    (secs * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::testing::{FakePage, FakeRenderer, FakeSearch};
    use crate::error::CrawlError;

    fn queries(list: &[&str]) -> Vec<String> {
        list.iter().map(|q| q.to_string()).collect()
    }

    fn acme_site() -> FakeRenderer {
        FakeRenderer::new()
            .page(
                "https://acme.example/",
                FakePage::new(
                    "<p>Write to Sales@ACME.example</p>",
                    &["https://acme.example/contact", "https://www.facebook.com/acme"],
                ),
            )
            .page("https://acme.example/contact", FakePage::new("<p>Call us</p>", &[]))
            .page("https://www.facebook.com/acme", FakePage::new("", &[]))
    }

    #[tokio::test]
    async fn test_acme_corp_end_to_end() {
        let mut renderer = acme_site();
        let search = FakeSearch::new().results("acme corp", &["https://acme.example/"]);
        let config = CrawlConfig {
            urls_per_query: 1,
            max_depth: 1,
            urls_per_depth: 2,
            ..CrawlConfig::default()
        };

        let results = crawl_queries(&mut renderer, &search, &config, &queries(&["acme corp"]))
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        let result = &results[0];
        assert_eq!(result.query, "acme corp");
        assert_eq!(result.seed_urls, vec!["https://acme.example/"]);
        assert_eq!(result.emails, vec!["sales@acme.example"]);
        assert_eq!(result.pages.len(), 2);
        assert_eq!(result.pages[0].url, "https://acme.example/");
        assert_eq!(result.pages[1].url, "https://acme.example/contact");
        assert_eq!(
            renderer.navigations,
            vec!["https://acme.example/", "https://acme.example/contact"]
        );
    }

    #[tokio::test]
    async fn test_no_filters_follows_whitelisted_links() {
        let mut renderer = acme_site();
        let search = FakeSearch::new().results("acme corp", &["https://acme.example/"]);
        let config = CrawlConfig {
            urls_per_query: 1,
            max_depth: 1,
            urls_per_depth: 2,
            no_filters: true,
            ..CrawlConfig::default()
        };

        crawl_queries(&mut renderer, &search, &config, &queries(&["acme corp"]))
            .await
            .unwrap();

        assert!(renderer
            .navigations
            .contains(&"https://www.facebook.com/acme".to_string()));
    }

    #[tokio::test]
    async fn test_queries_do_not_share_state() {
        let mut renderer = acme_site();
        let search = FakeSearch::new()
            .results("acme corp", &["https://acme.example/"])
            .results("acme inc", &["https://acme.example/"]);
        let config = CrawlConfig {
            max_depth: 0,
            ..CrawlConfig::default()
        };

        let results = crawl_queries(
            &mut renderer,
            &search,
            &config,
            &queries(&["acme corp", "acme inc"]),
        )
        .await
        .unwrap();

        // Same page, same email, found again by the second query
        assert_eq!(results[0].emails, vec!["sales@acme.example"]);
        assert_eq!(results[1].emails, vec!["sales@acme.example"]);
        assert_eq!(results[1].pages.len(), 1);
    }

    #[tokio::test]
    async fn test_search_failure_keeps_query_in_report() {
        let mut renderer = acme_site();
        let search = FakeSearch::new().results("acme corp", &["https://acme.example/"]);
        let config = CrawlConfig {
            max_depth: 0,
            ..CrawlConfig::default()
        };

        let results = crawl_queries(
            &mut renderer,
            &search,
            &config,
            &queries(&["unknown query", "acme corp"]),
        )
        .await
        .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].query, "unknown query");
        assert!(results[0].seed_urls.is_empty());
        assert!(results[0].pages.is_empty());
        assert_eq!(results[1].emails, vec!["sales@acme.example"]);
    }

    #[tokio::test]
    async fn test_failed_seed_does_not_stop_next_seed() {
        let mut renderer = acme_site().timeout("https://down.example/");
        let search = FakeSearch::new().results(
            "acme corp",
            &["https://down.example/", "https://acme.example/"],
        );
        let config = CrawlConfig {
            max_depth: 0,
            ..CrawlConfig::default()
        };

        let results = crawl_queries(&mut renderer, &search, &config, &queries(&["acme corp"]))
            .await
            .unwrap();

        assert_eq!(
            results[0].seed_urls,
            vec!["https://down.example/", "https://acme.example/"]
        );
        assert_eq!(results[0].pages.len(), 1);
        assert_eq!(results[0].emails, vec!["sales@acme.example"]);
    }

    #[tokio::test]
    async fn test_session_opened_and_closed_once() {
        let mut renderer = acme_site();
        let search = FakeSearch::new()
            .results("a", &["https://acme.example/"])
            .results("b", &["https://acme.example/contact"]);

        crawl_queries(
            &mut renderer,
            &search,
            &CrawlConfig::default(),
            &queries(&["a", "b"]),
        )
        .await
        .unwrap();

        assert_eq!(renderer.opened, 1);
        assert_eq!(renderer.closed, 1);
    }

    #[tokio::test]
    async fn test_open_failure_is_fatal() {
        let mut renderer = acme_site();
        renderer.fail_open = true;
        let search = FakeSearch::new().results("a", &["https://acme.example/"]);

        let err = crawl_queries(&mut renderer, &search, &CrawlConfig::default(), &queries(&["a"]))
            .await
            .unwrap_err();

        assert!(matches!(err, CrawlError::Session(_)));
        assert!(renderer.navigations.is_empty());
    }

    #[tokio::test]
    async fn test_session_closed_when_crawl_panics() {
        let mut renderer = acme_site().panic_on("https://acme.example/contact");
        let search = FakeSearch::new().results("a", &["https://acme.example/"]);
        let config = CrawlConfig::default();
        let list = queries(&["a"]);

        let outcome = AssertUnwindSafe(crawl_queries(&mut renderer, &search, &config, &list))
            .catch_unwind()
            .await;

        assert!(outcome.is_err());
        assert_eq!(renderer.closed, 1);
    }

    #[tokio::test]
    async fn test_invalid_config_rejected_before_opening() {
        let mut renderer = acme_site();
        let config = CrawlConfig {
            urls_per_query: 0,
            ..CrawlConfig::default()
        };

        let err = crawl_seeds(&mut renderer, &config, "seeds", &queries(&["https://acme.example/"]))
            .await
            .unwrap_err();

        assert!(matches!(err, CrawlError::InvalidConfig(_)));
        assert_eq!(renderer.opened, 0);
    }

    #[tokio::test]
    async fn test_crawl_seeds_skips_search() {
        let mut renderer = acme_site();
        let config = CrawlConfig {
            max_depth: 1,
            ..CrawlConfig::default()
        };
        let seeds = queries(&["not a url", "https://ACME.example", "https://acme.example/"]);

        let result = crawl_seeds(&mut renderer, &config, "direct", &seeds)
            .await
            .unwrap();

        assert_eq!(result.query, "direct");
        assert_eq!(result.seed_urls, vec!["https://acme.example/"]);
        assert_eq!(result.pages.len(), 2);
        assert_eq!(renderer.closed, 1);
    }

    #[test]
    fn test_select_seeds_caps_after_filtering() {
        let urls = queries(&["javascript:void(0)", "https://a.example/", "https://b.example/", "https://c.example/"]);
        assert_eq!(
            select_seeds(urls, 2),
            vec!["https://a.example/", "https://b.example/"]
        );
    }

    #[test]
    fn test_round_secs() {
        assert_eq!(round_secs(1.23456), 1.23);
        assert_eq!(round_secs(0.005), 0.01);
        assert_eq!(round_secs(2.0), 2.0);
    }
}
