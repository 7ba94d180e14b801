// src/domain/mod.rs
// =============================================================================
// This module answers "which organization does this URL or email belong to?"
//
// Features:
// - Registrable domain lookup using the Public Suffix List
//   (mail.example.co.uk -> example.co.uk)
// - Same-domain comparison
// - Whitelist check on the organization label (google, facebook, ...)
//
// Anything we cannot resolve (IP addresses, garbage, bare suffixes) comes back
// as None, and None never matches anything.
// =============================================================================

mod matcher;

pub use matcher::{is_whitelisted, registrable_domain, same_domain, Domain};
