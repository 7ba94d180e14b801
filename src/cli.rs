// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - search: run each query through the search engine, crawl the results
// - site: skip the search, crawl the URLs given on the command line
//
// Both share the same crawl flags (CrawlArgs). The flags are layered on top
// of an optional --config JSON file, see src/config.rs.
// =============================================================================

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{CrawlConfig, HarvestFile, LinkScope};

#[derive(Parser, Debug)]
#[command(
    name = "email-harvester",
    version,
    about = "Crawl search results and collect contact emails from the same domain",
    long_about = "email-harvester searches for each query, follows links from the top results \
                  up to a fixed depth, and reports every email address that belongs to the \
                  domain of the page it was found on."
)]
pub struct Cli {
    /// Show debug logs (RUST_LOG overrides this)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search for each query and crawl the top results
    ///
    /// Example: email-harvester search "acme corp" --max-depth 1
    Search {
        /// Search queries (appended to any queries in --config)
        queries: Vec<String>,

        #[command(flatten)]
        crawl: CrawlArgs,
    },

    /// Crawl the given URLs directly, without searching
    ///
    /// Example: email-harvester site https://acme.example --urls-per-depth 5
    Site {
        /// Seed URLs
        #[arg(required = true)]
        urls: Vec<String>,

        #[command(flatten)]
        crawl: CrawlArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct CrawlArgs {
    /// JSON file with queries and crawl settings
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of search results used as seeds per query (default: 10)
    #[arg(long)]
    pub urls_per_query: Option<usize>,

    /// How many links deep to follow from each seed (default: 2)
    ///
    /// Depth 0 = only the seed pages
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Maximum links followed from a single page (default: 10)
    #[arg(long)]
    pub urls_per_depth: Option<usize>,

    /// Keep every email and follow every link, ignoring domains and the whitelist
    #[arg(long)]
    pub no_filters: bool,

    /// Which links to follow when filtering is on
    #[arg(long, value_enum)]
    pub link_scope: Option<LinkScope>,

    /// Extra organization labels to never follow (repeatable), e.g. --exclude twitter
    #[arg(long = "exclude", value_name = "LABEL")]
    pub exclude: Vec<String>,

    /// Page load timeout in seconds (default: 120)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Write the JSON report to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the JSON report instead of the summary table
    #[arg(long)]
    pub json: bool,
}

impl CrawlArgs {
    // Builds the final query list and config: defaults < file < flags
    pub fn resolve(&self, queries: &[String]) -> Result<(Vec<String>, CrawlConfig)> {
        let file = match &self.config {
            Some(path) => HarvestFile::load(path)?,
            None => HarvestFile::default(),
        };

        let mut all_queries = file.queries;
        all_queries.extend(queries.iter().cloned());

        let mut config = file.crawl;
        if let Some(n) = self.urls_per_query {
            config.urls_per_query = n;
        }
        if let Some(depth) = self.max_depth {
            config.max_depth = depth;
        }
        if let Some(n) = self.urls_per_depth {
            config.urls_per_depth = n;
        }
        if self.no_filters {
            config.no_filters = true;
        }
        if let Some(scope) = self.link_scope {
            config.link_scope = scope;
        }
        for label in &self.exclude {
            let label = label.to_ascii_lowercase();
            if !config.whitelist.contains(&label) {
                config.whitelist.push(label);
            }
        }
        if let Some(secs) = self.timeout {
            config.navigation_timeout_secs = secs;
        }

        config.validate()?;
        Ok((all_queries, config))
    }
}
