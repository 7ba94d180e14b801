// src/domain/matcher.rs
// =============================================================================
// Registrable domain lookup and comparison.
//
// How it works:
// 1. Pull the host out of the input (a full URL or a bare host)
// 2. Reject IP literals and single-label hosts (no organization there)
// 3. Ask the Public Suffix List where the suffix starts
// 4. Keep exactly one label in front of the suffix
//
// Examples:
//   "https://mail.example.co.uk/x" -> example.co.uk  (organization: example)
//   "www.google.com"               -> google.com     (organization: google)
//   "http://192.168.0.1/"          -> None
//
// Hosts under a TLD that the list does not know fall back to the list's
// implicit "*" rule, so "acme.example" resolves to itself.
// =============================================================================

use std::fmt;
use url::{Host, Url};

// A registrable domain, e.g. "example.co.uk"
//
// We keep the length of the suffix so suffix() and organization() are just
// slices into the same string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Domain {
    name: String,
    suffix_len: usize,
}

impl Domain {
    /// The full registrable name, e.g. "example.co.uk"
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// The public suffix, e.g. "co.uk"
    pub fn suffix(&self) -> &str {
        &self.name[self.name.len() - self.suffix_len..]
    }

    /// The label in front of the suffix, e.g. "example"
    pub fn organization(&self) -> &str {
        // suffix_len < name.len() is checked when the Domain is built,
        // and there is always a '.' between the two parts
        &self.name[..self.name.len() - self.suffix().len() - 1]
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// Resolves a URL or bare host to its registrable domain
//
// Returns None ("unresolved") for IP addresses, malformed input, single-label
// hosts like "localhost", and hosts that are themselves a public suffix.
// Callers treat None as "never matches".
pub fn registrable_domain(host_or_url: &str) -> Option<Domain> {
    let host = extract_host(host_or_url)?;

    let name = psl::domain_str(&host)?;
    let suffix = psl::suffix_str(name)?;

    if suffix.len() >= name.len() {
        return None;
    }

    Some(Domain {
        name: name.to_string(),
        suffix_len: suffix.len(),
    })
}

// True only when both sides resolve and the registrable domains are equal
pub fn same_domain(a: &str, b: &str) -> bool {
    match (registrable_domain(a), registrable_domain(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

// Checks the organization label of a URL against a whitelist of labels
//
// Example: "https://www.facebook.com/acme" with whitelist ["google", "facebook"]
// is whitelisted because its organization label is "facebook".
// Unresolved URLs are never whitelisted.
pub fn is_whitelisted<S: AsRef<str>>(url: &str, whitelist: &[S]) -> bool {
    match registrable_domain(url) {
        Some(domain) => whitelist
            .iter()
            .any(|label| label.as_ref().eq_ignore_ascii_case(domain.organization())),
        None => false,
    }
}

// Pulls a lower-cased domain host out of a URL or bare host string
fn extract_host(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let host = if input.contains("://") {
        let url = Url::parse(input).ok()?;
        match url.host()? {
            Host::Domain(domain) => domain.to_string(),
            Host::Ipv4(_) | Host::Ipv6(_) => return None,
        }
    } else {
        match Host::parse(input).ok()? {
            Host::Domain(domain) => domain,
            Host::Ipv4(_) | Host::Ipv6(_) => return None,
        }
    };

    let host = host.trim_end_matches('.').to_ascii_lowercase();

    // Need at least "organization.suffix", and no empty labels ("a..b")
    if !host.contains('.') || host.split('.').any(str::is_empty) {
        return None;
    }

    Some(host)
}
