// src/extract/email.rs
// =============================================================================
// Email extraction from page text.
//
// How it works:
// 1. Scan the text for local-part@host.tld shaped tokens
// 2. Lower-case every match
// 3. With the domain filter on, keep only emails whose domain (the part after
//    '@') equals the registrable domain of the page we found them on
// 4. Drop anything the caller has already seen, or that we already returned
//
// Example:
//   page = https://shop.example.com/a
//   text = "Write to Sales@Example.com or other@unrelated.org"
//   filter on  -> ["sales@example.com"]
//   filter off -> ["sales@example.com", "other@unrelated.org"]
// =============================================================================

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::registrable_domain;

// Local part: letters, digits and _.+-
// Host: letter/hyphen labels separated by dots, at least two labels
//
// ASCII only (-u): with Unicode case folding [a-z] would also match look-alikes
// such as U+212A KELVIN SIGN, which to_ascii_lowercase leaves untouched.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i-u)\b[a-z0-9_.+-]+@[a-z-]+(?:\.[a-z-]+)+\b").expect("email pattern is valid")
});

// Extracts newly discovered emails from page text
//
// Parameters:
//   page_text: the rendered page content (raw HTML is fine, mailto: links match too)
//   page_url: the URL of the page the text came from
//   already_seen: emails found earlier in this query
//   domain_filter: when false every match is kept
//
// Returns: only the emails not in already_seen, in first-seen order.
// Merging them into the running set is the caller's job.
pub fn extract_emails(
    page_text: &str,
    page_url: &str,
    already_seen: &IndexSet<String>,
    domain_filter: bool,
) -> Vec<String> {
    let page_domain = registrable_domain(page_url);

    // An unresolved page domain matches nothing
    if domain_filter && page_domain.is_none() {
        return Vec::new();
    }

    let mut found: Vec<String> = Vec::new();

    for token in EMAIL_PATTERN.find_iter(page_text) {
        let email = token.as_str().to_ascii_lowercase();

        if domain_filter {
            let matches_page = match (&page_domain, email_domain(&email)) {
                (Some(page), Some(domain)) => page.as_str() == domain,
                _ => false,
            };
            if !matches_page {
                continue;
            }
        }

        if already_seen.contains(&email) || found.contains(&email) {
            continue;
        }

        found.push(email);
    }

    found
}

// Everything after the last '@'
pub fn email_domain(email: &str) -> Option<&str> {
    email
        .rsplit_once('@')
        .map(|(_, domain)| domain)
        .filter(|domain| !domain.is_empty())
}
