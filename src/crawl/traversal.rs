// src/crawl/traversal.rs
// =============================================================================
// Depth-bounded, depth-first traversal from one seed URL.
//
// How it works:
// 1. Put the seed on a work stack with its depth
// 2. Pop a URL; skip it if this query already visited it
// 3. Mark it visited BEFORE loading, so a page that fails is never retried
// 4. Load it, read its meta tags, pull out new emails, record the page
// 5. Unless we are at max_depth, filter its links, keep the first
//    urls_per_depth of them, and push them (reversed) on the stack
// 6. Repeat until the stack is empty
//
// Pushing children in reverse means they pop in document order, and a whole
// subtree finishes before the next sibling starts. That is exactly the order
// of a sequential recursive crawl, without growing the call stack.
//
// Page states: Unvisited -> Visiting -> VisitedSuccess | VisitedFailed.
// Nothing ever goes back to Unvisited.
// =============================================================================

use tracing::{debug, error, info, warn};

use super::state::{CrawlState, PageRecord};
use crate::config::CrawlConfig;
use crate::extract::{extract_emails, filter_links, normalize_url, LinkPolicy};
use crate::render::{read_meta, PageRenderer};

// What happened when we popped one URL off the stack
#[derive(Debug, PartialEq, Eq)]
enum PageOutcome {
    /// Already visited, or deeper than max_depth
    Skipped,
    Failed,
    Visited { children: Vec<String> },
}

pub struct CrawlTraversal<'a, R: PageRenderer + ?Sized> {
    renderer: &'a mut R,
    config: &'a CrawlConfig,
    policy: LinkPolicy,
    page_budget: usize,
}

impl<'a, R: PageRenderer + ?Sized> CrawlTraversal<'a, R> {
    pub fn new(renderer: &'a mut R, config: &'a CrawlConfig) -> Self {
        CrawlTraversal {
            renderer,
            config,
            policy: LinkPolicy::from_config(config),
            page_budget: config.page_budget(),
        }
    }

    // Crawls everything reachable from `url`, starting at `depth`
    //
    // Failures are logged and never returned: a page that cannot be loaded
    // just ends its own branch.
    pub async fn visit(&mut self, url: &str, depth: usize, state: &mut CrawlState) {
        let root = normalize_url(url).unwrap_or_else(|| url.to_lowercase());
        let mut stack: Vec<(String, usize)> = vec![(root, depth)];

        while let Some((url, depth)) = stack.pop() {
            if let PageOutcome::Visited { children } = self.visit_page(&url, depth, state).await {
                stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
            }
        }
    }

    async fn visit_page(&mut self, url: &str, depth: usize, state: &mut CrawlState) -> PageOutcome {
        if depth > self.config.max_depth {
            return PageOutcome::Skipped;
        }

        if !state.mark_visited(url.to_string()) {
            debug!(url = %url, "Already visited, skipping");
            return PageOutcome::Skipped;
        }

        info!(
            url = %url,
            depth,
            progress = %format!("{}/{}", state.visited().len(), self.page_budget),
            "Visiting page"
        );

        if let Err(e) = self
            .renderer
            .navigate(url, self.config.navigation_timeout())
            .await
        {
            if e.is_recoverable() {
                warn!(url = %url, error = %e, "Failed to load page");
            } else {
                error!(url = %url, error = %e, "Page session failed");
            }
            return PageOutcome::Failed;
        }

        let keywords = read_meta(&*self.renderer, "keywords");
        let description = read_meta(&*self.renderer, "description");

        let emails = extract_emails(
            self.renderer.content(),
            url,
            state.emails(),
            !self.config.no_filters,
        );
        if !emails.is_empty() {
            info!(url = %url, count = emails.len(), "Found new emails");
        }

        state.record_page(PageRecord {
            url: url.to_string(),
            keywords,
            description,
            emails,
        });

        if depth == self.config.max_depth {
            return PageOutcome::Visited {
                children: Vec::new(),
            };
        }

        let hrefs = self.renderer.evaluate_all("a[href]", "href");
        let mut children = filter_links(&hrefs, state.visited(), url, &self.policy);
        children.truncate(self.config.urls_per_depth);

        debug!(
            url = %url,
            links = hrefs.len(),
            following = children.len(),
            "Filtered page links"
        );

        PageOutcome::Visited { children }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a Vec as a stack instead of recursion?
//    - Recursive async fns need boxing in Rust (their future type would be
//      infinitely sized otherwise)
//    - A Vec used with push()/pop() is a LIFO stack and gives the same
//      depth-first order
//    - The depth travels with each entry, so max_depth is enforced no matter
//      how deep the stack gets
//
// 2. Why `R: PageRenderer + ?Sized`?
//    - ?Sized lets R be a trait object too (&mut dyn PageRenderer)
//    - Tests plug in a fake renderer, main.rs plugs in HttpRenderer
//
// 3. Why is CrawlState passed in as &mut?
//    - The traversal borrows the state, it does not own it
//    - The caller (the query runner) creates one per query and keeps it
//      after the traversal is done
// -----------------------------------------------------------------------------
