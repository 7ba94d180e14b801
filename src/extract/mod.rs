// src/extract/mod.rs
// =============================================================================
// This module decides what we keep from a visited page.
//
// Submodules:
// - email: finds email-shaped tokens in page text and applies the domain rule
// - links: decides which hyperlinks on a page are worth following
//
// Both are plain synchronous functions over strings and sets, so they can be
// tested without any network or browser.
// =============================================================================

mod email;
mod links;

pub use email::{email_domain, extract_emails};
pub use links::{filter_links, normalize_url, LinkPolicy};
