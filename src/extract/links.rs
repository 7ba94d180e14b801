// src/extract/links.rs
// =============================================================================
// Link filtering: which hyperlinks on a page do we follow?
//
// A link survives only if ALL of these hold:
// 1. It is a valid absolute http(s) URL
// 2. We have not visited it yet in this query
// 3. It is not whitelisted (search engines, social networks, ...)
// 4. It is on the same registrable domain as the page it was found on
//
// Rules 3 and 4 are switched off by no_filters. Rule 4 alone can be relaxed
// with LinkScope::Any (follow external links but still skip whitelisted ones).
//
// Order is kept exactly as the links appear in the page. The caller caps the
// result at urls_per_depth.
// =============================================================================

use indexmap::IndexSet;
use url::Url;

use crate::config::{CrawlConfig, LinkScope};
use crate::domain::{is_whitelisted, same_domain};

// The filtering knobs, lifted out of CrawlConfig once per crawl
#[derive(Debug, Clone)]
pub struct LinkPolicy {
    pub whitelist: Vec<String>,
    pub domain_filter: bool,
    pub scope: LinkScope,
}

impl LinkPolicy {
    pub fn from_config(config: &CrawlConfig) -> Self {
        LinkPolicy {
            whitelist: config.whitelist.clone(),
            domain_filter: !config.no_filters,
            scope: config.link_scope,
        }
    }
}

// Normalizes a URL for visiting and deduplication
//
// Returns None unless the input is an absolute http(s) URL with a host.
// The fragment is dropped ("/about#team" is the same page as "/about") and
// the result is lower-cased.
//
// Examples:
//   "https://Acme.Example"        -> Some("https://acme.example/")
//   "https://acme.example/a#team" -> Some("https://acme.example/a")
//   "mailto:sales@acme.example"   -> None
//   "/contact"                    -> None (relative)
pub fn normalize_url(href: &str) -> Option<String> {
    let mut url = Url::parse(href.trim()).ok()?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return None;
    }

    url.set_fragment(None);
    Some(url.as_str().to_lowercase())
}

// Filters a page's links down to the ones we should visit next
//
// Parameters:
//   hrefs: links in document order (absolute, as a browser reports them)
//   visited: URLs already visited in this query (normalized)
//   current_url: the page the links were found on
//   policy: whitelist and domain-scope settings
//
// Returns: normalized candidate URLs, in document order, without duplicates
pub fn filter_links(
    hrefs: &[String],
    visited: &IndexSet<String>,
    current_url: &str,
    policy: &LinkPolicy,
) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();

    for href in hrefs {
        let Some(url) = normalize_url(href) else {
            continue;
        };

        if visited.contains(&url) || candidates.contains(&url) {
            continue;
        }

        if policy.domain_filter {
            if is_whitelisted(&url, &policy.whitelist) {
                continue;
            }

            if policy.scope == LinkScope::SameDomain && !same_domain(current_url, &url) {
                continue;
            }
        }

        candidates.push(url);
    }

    candidates
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is `let Some(url) = ... else { continue; }`?
//    - A let-else statement: bind the value if the pattern matches,
//      otherwise run the else block (which must leave the loop or function)
//    - It keeps the happy path unindented
//
// 2. Why IndexSet instead of HashSet?
//    - Same O(1) lookups as HashSet
//    - But it remembers insertion order, so the report lists visited URLs
//      in the order we actually visited them
// -----------------------------------------------------------------------------
