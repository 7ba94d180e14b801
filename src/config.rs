// src/config.rs
// =============================================================================
// Crawl configuration.
//
// Where settings come from (later wins):
// 1. Built-in defaults (see CrawlConfig::default)
// 2. An optional JSON file passed with --config
// 3. Command-line flags
//
// The crawl core only ever sees a validated CrawlConfig. Nothing is read from
// environment variables or globals.
//
// Example config file:
//   {
//     "queries": ["acme corp", "globex"],
//     "urls_per_query": 3,
//     "max_depth": 1,
//     "urls_per_depth": 5,
//     "no_filters": false
//   }
// camelCase keys (urlsPerQuery, maxDepth, ...) are accepted too.
// =============================================================================

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{CrawlError, CrawlResult};

/// Which links may be followed when domain filtering is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LinkScope {
    /// Only links on the same registrable domain as the page
    #[default]
    SameDomain,
    /// Any link that is not whitelisted
    Any,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// How many search results to use as seeds per query
    #[serde(alias = "urlsPerQuery")]
    pub urls_per_query: usize,
    /// Seeds are depth 0; links followed from depth max_depth are not
    #[serde(alias = "maxDepth")]
    pub max_depth: usize,
    /// How many links to follow from a single page
    #[serde(alias = "urlsPerDepth")]
    pub urls_per_depth: usize,
    /// Disables domain matching and the whitelist
    #[serde(alias = "noFilters")]
    pub no_filters: bool,
    #[serde(alias = "linkScope")]
    pub link_scope: LinkScope,
    /// Organization labels we never follow links into
    pub whitelist: Vec<String>,
    #[serde(alias = "navigationTimeoutSecs")]
    pub navigation_timeout_secs: u64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        CrawlConfig {
            urls_per_query: 10,
            max_depth: 2,
            urls_per_depth: 10,
            no_filters: false,
            link_scope: LinkScope::SameDomain,
            whitelist: vec!["google".to_string(), "facebook".to_string()],
            navigation_timeout_secs: 120,
        }
    }
}

impl CrawlConfig {
    pub fn validate(&self) -> CrawlResult<()> {
        if self.urls_per_query == 0 {
            return Err(CrawlError::InvalidConfig(
                "urls_per_query must be at least 1".into(),
            ));
        }
        if self.urls_per_depth == 0 {
            return Err(CrawlError::InvalidConfig(
                "urls_per_depth must be at least 1".into(),
            ));
        }
        if self.navigation_timeout_secs == 0 {
            return Err(CrawlError::InvalidConfig(
                "navigation_timeout_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    // Upper bound on pages visited for one query, used for progress logs:
    // urls_per_query * (1 + k + k^2 + ... + k^max_depth)
    //
    // Saturates at usize::MAX, and stays cheap for any max_depth.
    pub fn page_budget(&self) -> usize {
        let per_seed = match self.urls_per_depth {
            0 => 1,
            1 => self.max_depth.saturating_add(1),
            fan_out => {
                // level at least doubles, so this saturates within a few dozen rounds
                let mut total: usize = 0;
                let mut level: usize = 1;
                for _ in 0..=self.max_depth {
                    total = total.saturating_add(level);
                    if total == usize::MAX {
                        break;
                    }
                    level = level.saturating_mul(fan_out);
                }
                total
            }
        };
        per_seed.saturating_mul(self.urls_per_query)
    }
}

// The shape of a --config file: the queries plus any CrawlConfig fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HarvestFile {
    #[serde(default)]
    pub queries: Vec<String>,
    #[serde(flatten)]
    pub crawl: CrawlConfig,
}

impl HarvestFile {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let file: HarvestFile = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(file)
    }
}
